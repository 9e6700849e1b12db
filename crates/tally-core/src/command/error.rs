use std::fmt;

use thiserror::Error;

use crate::client::ClientError;

#[derive(Debug, Error)]
pub enum CommandError {
    /// Bad configuration: malformed param map, blank field (before or after
    /// expansion), or a broken `${` reference. Raised before any network
    /// activity.
    #[error("invalid '{command}' configuration: {reason}")]
    Config {
        command: &'static str,
        reason: String,
    },

    /// The network call itself failed.
    #[error("transport failure: {0}")]
    Transport(#[from] ClientError),

    /// The service answered, but not with a success status.
    #[error("unexpected status code {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// The service answered with a success status but an unreadable body.
    #[error("failed to decode reply: {0}")]
    Decode(String),

    /// The cooperative stop signal fired before or during the call.
    #[error("command canceled")]
    Canceled,
}

impl CommandError {
    /// Build a `Config` error from anything displayable.
    pub fn config(command: &'static str, reason: impl fmt::Display) -> Self {
        Self::Config {
            command,
            reason: reason.to_string(),
        }
    }

    /// Stable label used to classify errors in metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Transport(_) => "transport",
            Self::UnexpectedStatus { .. } => "status",
            Self::Decode(_) => "decode",
            Self::Canceled => "canceled",
        }
    }
}
