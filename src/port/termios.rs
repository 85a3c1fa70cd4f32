//! Settings the `serialport` builder doesn't expose, applied directly to the
//! tty file descriptor: read thresholds (`VMIN`/`VTIME`) and Linux RS-485
//! direction control.

#![cfg_attr(not(target_os = "linux"), allow(dead_code))]

use super::error::PortError;
use super::link::Rs485Config;
use std::os::unix::io::RawFd;

/// Set `VMIN`/`VTIME` on an open tty.
///
/// Linux goes through `termios2` so a baud rate already programmed with
/// `BOTHER` survives the round trip.
#[cfg(target_os = "linux")]
pub fn apply_read_thresholds(fd: RawFd, vmin: u8, vtime: u8) -> Result<(), PortError> {
    let mut tio = std::mem::MaybeUninit::<libc::termios2>::uninit();
    // SAFETY: `fd` is an open tty owned by the caller and TCGETS2 fills the
    // whole struct on success.
    let mut tio = unsafe {
        if libc::ioctl(fd, libc::TCGETS2 as _, tio.as_mut_ptr()) != 0 {
            return Err(std::io::Error::last_os_error().into());
        }
        tio.assume_init()
    };

    tio.c_cc[libc::VMIN] = vmin;
    tio.c_cc[libc::VTIME] = vtime;

    // SAFETY: `tio` is a fully initialised termios2 read from the same fd.
    if unsafe { libc::ioctl(fd, libc::TCSETS2 as _, &tio) } != 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn apply_read_thresholds(fd: RawFd, vmin: u8, vtime: u8) -> Result<(), PortError> {
    let mut tio = std::mem::MaybeUninit::<libc::termios>::uninit();
    // SAFETY: `fd` is an open tty owned by the caller and tcgetattr fills the
    // whole struct on success.
    let mut tio = unsafe {
        if libc::tcgetattr(fd, tio.as_mut_ptr()) != 0 {
            return Err(std::io::Error::last_os_error().into());
        }
        tio.assume_init()
    };

    tio.c_cc[libc::VMIN] = vmin;
    tio.c_cc[libc::VTIME] = vtime;

    // SAFETY: `tio` is a fully initialised termios read from the same fd.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &tio) } != 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    Ok(())
}

const SER_RS485_ENABLED: u32 = 1 << 0;
const SER_RS485_RTS_ON_SEND: u32 = 1 << 1;
const SER_RS485_RTS_AFTER_SEND: u32 = 1 << 2;

/// Kernel `struct serial_rs485`.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SerialRs485 {
    pub flags: u32,
    pub delay_rts_before_send: u32,
    pub delay_rts_after_send: u32,
    padding: [u32; 5],
}

impl From<Rs485Config> for SerialRs485 {
    fn from(config: Rs485Config) -> Self {
        let mut flags = 0;
        if config.enabled {
            flags |= SER_RS485_ENABLED;
            if config.rts_high_during_send {
                flags |= SER_RS485_RTS_ON_SEND;
            }
            if config.rts_high_after_send {
                flags |= SER_RS485_RTS_AFTER_SEND;
            }
        }
        Self {
            flags,
            ..Default::default()
        }
    }
}

/// Switch the UART driver into RS-485 mode.
#[cfg(target_os = "linux")]
pub fn apply_rs485(fd: RawFd, config: Rs485Config) -> Result<(), PortError> {
    let rs485 = SerialRs485::from(config);
    // SAFETY: `rs485` matches the kernel layout and outlives the call.
    if unsafe { libc::ioctl(fd, libc::TIOCSRS485 as _, &rs485) } != 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn apply_rs485(_fd: RawFd, _config: Rs485Config) -> Result<(), PortError> {
    Err(PortError::Unsupported("RS-485 direction control"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rs485_struct_matches_kernel_size() {
        assert_eq!(std::mem::size_of::<SerialRs485>(), 32);
    }

    #[test]
    fn test_rs485_flags() {
        let rs485 = SerialRs485::from(Rs485Config {
            enabled: true,
            rts_high_during_send: true,
            rts_high_after_send: false,
        });
        assert_eq!(rs485.flags, SER_RS485_ENABLED | SER_RS485_RTS_ON_SEND);

        let rs485 = SerialRs485::from(Rs485Config {
            enabled: true,
            rts_high_during_send: false,
            rts_high_after_send: true,
        });
        assert_eq!(rs485.flags, SER_RS485_ENABLED | SER_RS485_RTS_AFTER_SEND);
    }

    #[test]
    fn test_rts_flags_ignored_when_disabled() {
        let rs485 = SerialRs485::from(Rs485Config {
            enabled: false,
            rts_high_during_send: true,
            rts_high_after_send: true,
        });
        assert_eq!(rs485.flags, 0);
    }
}
