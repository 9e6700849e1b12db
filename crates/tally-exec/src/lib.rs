mod error;
pub use error::ExecError;

mod http;
pub use http::HttpApiClient;

mod inc;
pub use inc::{IncCommand, register_inc_command};
