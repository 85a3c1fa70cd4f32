use clap::Parser;
use esp8266_stub::cli::Args;
use esp8266_stub::{logging, AppError, Responder, RuleSet, SyncSerialPort};
use std::process::ExitCode;
use tracing::{info, warn};

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.report());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    // Reject bad option combinations before logging or the device is touched.
    let settings = args.settings()?;

    logging::init(&settings.config.logging, args.log_level.as_deref())?;
    info!("ESP8266 stub v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = settings.config_path {
        info!(path = %path.display(), "loaded configuration");
    }

    let link = settings.link;
    let port = SyncSerialPort::open(&link).map_err(AppError::from_open)?;
    info!(port = %link.port_name, baud = link.baud_rate, "serial port open");

    let mut responder = Responder::new(port, RuleSet::esp8266());
    if let Err(e) = responder.discard_pending_input() {
        warn!(error = %e, "could not flush stale input");
    }
    responder.run().map_err(AppError::LinkFailed)
}
