//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "ESP8266_STUB";

/// Config file name
const CONFIG_FILE_NAME: &str = "esp8266-stub.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "ESP8266_STUB_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `ESP8266_STUB_CONFIG` environment variable (explicit path)
    /// 2. `./esp8266-stub.toml` (current directory)
    /// 3. `esp8266-stub.toml` in the platform config directory
    /// 4. Built-in defaults (no file required)
    ///
    /// Environment variables can override any config file values.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = match config_path {
            Some(ref path) => load_from_file(path)?,
            None => Config::default(),
        };

        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a specific file path.
    ///
    /// Unlike [`ConfigLoader::load`], a missing file is an error here.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    // 1. Explicit environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. Current directory
    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    // 3. Platform config directory
    if let Some(app_config) = get_default_config_path() {
        if app_config.exists() {
            return Some(app_config);
        }
    }

    // 4. No config file found - will use defaults
    None
}

/// Get the platform-specific config directory for this tool.
pub fn get_default_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "esp8266-stub")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the default config file path.
pub fn get_default_config_path() -> Option<PathBuf> {
    get_default_config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

/// Read and parse `ESP8266_STUB_<key>` if it is set.
fn env_value<T: FromStr>(key: &str) -> ConfigResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    let var = format!("{}_{}", ENV_PREFIX, key);
    match std::env::var(&var) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::env_parse(var, e.to_string())),
        Err(_) => Ok(None),
    }
}

/// Booleans additionally accept `1`/`0`, `yes`/`no` and `on`/`off`.
fn env_flag(key: &str) -> ConfigResult<Option<bool>> {
    let var = format!("{}_{}", ENV_PREFIX, key);
    match std::env::var(&var) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::env_parse(var, "expected a boolean")),
        },
        Err(_) => Ok(None),
    }
}

/// Apply environment variable overrides to the configuration.
///
/// Environment variables follow the pattern `ESP8266_STUB_<SECTION>_<KEY>`,
/// for example `ESP8266_STUB_SERIAL_PORT=/dev/ttyUSB0` or
/// `ESP8266_STUB_LOGGING_FORMAT=json`.
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    let serial = &mut config.serial;

    if let Some(val) = env_value("SERIAL_PORT")? {
        serial.port = val;
    }
    if let Some(val) = env_value("SERIAL_BAUD")? {
        serial.baud = val;
    }
    if let Some(val) = env_value("SERIAL_DATABITS")? {
        serial.databits = val;
    }
    if let Some(val) = env_value("SERIAL_STOPBITS")? {
        serial.stopbits = val;
    }
    if let Some(val) = env_value("SERIAL_MINREAD")? {
        serial.minread = val;
    }
    if let Some(val) = env_value("SERIAL_CHARTIMEOUT")? {
        serial.chartimeout = val;
    }
    if let Some(val) = env_flag("SERIAL_EVEN")? {
        serial.even = val;
    }
    if let Some(val) = env_flag("SERIAL_ODD")? {
        serial.odd = val;
    }
    if let Some(val) = env_flag("SERIAL_RS485")? {
        serial.rs485 = val;
    }
    if let Some(val) = env_flag("SERIAL_RS485_HIGH_DURING_SEND")? {
        serial.rs485_high_during_send = val;
    }
    if let Some(val) = env_flag("SERIAL_RS485_HIGH_AFTER_SEND")? {
        serial.rs485_high_after_send = val;
    }

    if let Some(val) = env_value("LOGGING_LEVEL")? {
        config.logging.level = val;
    }
    if let Some(val) = env_value("LOGGING_FORMAT")? {
        config.logging.format = val;
    }

    Ok(())
}
