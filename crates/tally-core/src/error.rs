use thiserror::Error;

use crate::command::CommandError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("command error: {0}")]
    Command(#[from] CommandError),
}
