pub mod client;
pub mod command;
pub mod error;
pub mod metrics;
pub mod registry;

pub mod prelude {
    pub use crate::client::{ApiClient, ApiResponse, ClientError};
    pub use crate::command::{Command, CommandError, ExpansionSink, TaskContext, run_command};
    pub use crate::error::CoreError;
    pub use crate::registry::{CommandFactory, CommandRegistry};
}
