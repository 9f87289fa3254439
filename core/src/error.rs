//! Error types for the CLI helper, the transfer client and configuration
//! loading.
//!
//! # Design
//! The two halves of the crate never share failures, so each gets its own
//! enum. `CliError::InvalidColorName` is a local validation failure that
//! retrying cannot fix. `ClientError` separates a rejected option set (no
//! network attempt was made) from a failed transfer (the request may have
//! reached the remote side), so callers can pick their own retry policy.

use std::fmt;

use thiserror::Error;

use crate::transport::OptionKey;

/// Which of the two palettes a color name was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLayer {
    Foreground,
    Background,
}

impl fmt::Display for ColorLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorLayer::Foreground => write!(f, "foreground"),
            ColorLayer::Background => write!(f, "background"),
        }
    }
}

/// Errors returned by the interactive CLI helper.
#[derive(Debug, Error)]
pub enum CliError {
    /// The color name is not in the palette for its layer.
    #[error("invalid CLI {layer} color: {name}")]
    InvalidColorName { layer: ColorLayer, name: String },

    /// Standard input reached end-of-file while a line was required.
    #[error("input closed while waiting for a response")]
    InputClosed,

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by `TransferClient::send`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport refused the option set. Nothing was sent.
    #[error("failed to apply transfer options for {uri}: {source}")]
    ClientConfigurationError {
        uri: String,
        #[source]
        source: OptionRejected,
    },

    /// The transfer itself failed. `status` is the last status seen, if any.
    #[error("error fetching remote {uri} [ status {} ] {message}", display_status(.status))]
    TransferError {
        uri: String,
        status: Option<u16>,
        message: String,
    },
}

/// Errors raised while loading JSON configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A transport rejected one option of the set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("option `{key}` rejected: {reason}")]
pub struct OptionRejected {
    pub key: OptionKey,
    pub reason: String,
}

/// A transport failed while executing a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportFailure {
    pub status: Option<u16>,
    pub message: String,
}

fn display_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}
