mod counter;
pub use counter::Counter;

mod expansion;
pub use expansion::Expansions;

mod params;
pub use params::{IncParams, ParamMap};

mod task;
pub use task::TaskId;

mod constants;
pub use constants::{INC_COMMAND_NAME, INC_ROUTE, TASK_ID_HEADER};

mod error;
pub use error::{ModelError, ModelResult};
