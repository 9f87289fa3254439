//! JSON configuration for the CLI helper and the transfer client.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::transport::TransferOptions;

pub const DEFAULT_WAIT_MSG: &str = "Press any key to continue...";

/// Settings for a `Cli` session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Message shown by `wait(0, false)` before blocking on input.
    pub wait_msg: String,
    /// Emit ANSI escape codes. Off on Windows unless set explicitly.
    pub ansi: bool,
    /// Length of one `wait` second, in milliseconds.
    pub tick_ms: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            wait_msg: DEFAULT_WAIT_MSG.to_string(),
            ansi: !cfg!(windows),
            tick_ms: 1000,
        }
    }
}

impl CliConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Settings for a `TransferClient`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Options applied to every transfer unless the request sets them.
    pub defaults: TransferOptions,
}

/// Combined file layout used by the `courier` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cli: CliConfig,
    pub client: ClientConfig,
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::OptionKey;

    #[test]
    fn empty_object_yields_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cli.wait_msg, DEFAULT_WAIT_MSG);
        assert_eq!(config.cli.tick(), Duration::from_secs(1));
    }

    #[test]
    fn partial_cli_section_keeps_other_defaults() {
        let config = Config::from_json(r#"{"cli": {"ansi": false}}"#).unwrap();
        assert!(!config.cli.ansi);
        assert_eq!(config.cli.tick_ms, 1000);
    }

    #[test]
    fn client_defaults_are_loaded() {
        let config = Config::from_json(
            r#"{"client": {"defaults": {"timeout_ms": 1500, "max_redirects": 2}}}"#,
        )
        .unwrap();
        assert_eq!(config.client.defaults.int(OptionKey::TimeoutMs), Some(1500));
        assert_eq!(config.client.defaults.int(OptionKey::MaxRedirects), Some(2));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Config::from_json("{cli:").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load("/nonexistent/courier.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
