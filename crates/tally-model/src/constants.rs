//! Common model-level constants.
//!
//! This module contains well-known string keys shared by the counter
//! service and the commands that call it. Keeping them here avoids
//! scattering magic strings throughout the codebase.

/// Name under which the increment command registers itself.
///
/// Task documents refer to the command by this name; the registry uses it
/// to look up the matching factory.
pub const INC_COMMAND_NAME: &str = "inc";

/// Route segment the counter service serves increments on.
///
/// Clients POST to `<base-url>/inc`; the constant is shared so the
/// client and the server cannot drift apart.
pub const INC_ROUTE: &str = "inc";

/// Header carrying the [`crate::TaskId`] on outbound requests.
pub const TASK_ID_HEADER: &str = "x-tally-task-id";
