//! The increment command.
//!
//! Bumps one named counter on the remote service and publishes the
//! post-increment value into the task's expansion sink, where later
//! pipeline stages pick it up as `${<destination>}`.
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use tally_core::command::{Command, CommandError, TaskContext};
use tally_core::registry::CommandRegistry;
use tally_model::{Counter, INC_COMMAND_NAME, INC_ROUTE, IncParams, ParamMap};

/// Command that increments a remote counter once.
pub struct IncCommand {
    params: IncParams,
}

impl IncCommand {
    /// Build from already-decoded configuration.
    pub fn new(params: IncParams) -> Self {
        Self { params }
    }

    /// Decode and validate raw configuration.
    ///
    /// Registered as the factory for [`INC_COMMAND_NAME`]; a malformed map
    /// or a blank `key`/`destination` is rejected here, before a command
    /// instance exists.
    pub fn from_params(params: &ParamMap) -> Result<Box<dyn Command>, CommandError> {
        let params = IncParams::from_params(params)
            .and_then(|p| p.validate().map(|()| p))
            .map_err(|e| CommandError::config(INC_COMMAND_NAME, e))?;

        Ok(Box::new(Self::new(params)))
    }
}

#[async_trait]
impl Command for IncCommand {
    fn name(&self) -> &'static str {
        INC_COMMAND_NAME
    }

    async fn execute(&self, ctx: &TaskContext) -> Result<(), CommandError> {
        // Placeholders resolve against the table as it stands right now;
        // both fields must still be non-blank afterwards.
        let snapshot = ctx.expansions().snapshot();
        let params = self
            .params
            .expanded(&snapshot)
            .map_err(|e| CommandError::config(INC_COMMAND_NAME, e))?;

        // A stop signal that fired before this point skips the call entirely.
        if ctx.cancel().is_cancelled() {
            return Err(CommandError::Canceled);
        }

        debug!(key = %params.key, task = %ctx.task_id(), "incrementing counter");

        let body = Value::String(params.key.clone());
        let resp = tokio::select! {
            res = ctx.client().post_json(INC_ROUTE, &body) => res?,
            _ = ctx.cancel().cancelled() => {
                debug!(key = %params.key, "cancellation requested; abandoning call");
                return Err(CommandError::Canceled);
            }
        };

        if !resp.is_success() {
            return Err(CommandError::UnexpectedStatus {
                status: resp.status(),
                message: resp.body_text(),
            });
        }

        let counter: Counter = resp.json().map_err(|e| CommandError::Decode(e.to_string()))?;

        debug!(key = %counter.key, value = counter.value, "counter incremented");
        ctx.expansions()
            .put(params.destination, counter.value.to_string());

        Ok(())
    }
}

/// Register the increment command in the given registry.
///
/// After this call, the registry resolves [`INC_COMMAND_NAME`] to a ready
/// [`IncCommand`].
pub fn register_inc_command(registry: &mut CommandRegistry) {
    registry.register(INC_COMMAND_NAME, IncCommand::from_params);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::error::CoreError;

    fn params_from_json(raw: &str) -> ParamMap {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn factory_accepts_complete_params() {
        let map = params_from_json(r#"{"key":"testkey","destination":"testkey"}"#);

        let cmd = IncCommand::from_params(&map).unwrap();

        assert_eq!(cmd.name(), "inc");
    }

    #[test]
    fn factory_rejects_blank_key() {
        let map = params_from_json(r#"{"key":"","destination":"d"}"#);

        let err = IncCommand::from_params(&map).unwrap_err();

        assert!(matches!(err, CommandError::Config { command: "inc", .. }));
    }

    #[test]
    fn factory_rejects_missing_destination() {
        let map = params_from_json(r#"{"key":"testkey"}"#);

        let err = IncCommand::from_params(&map).unwrap_err();

        assert!(matches!(err, CommandError::Config { .. }));
    }

    #[test]
    fn factory_rejects_malformed_map() {
        let map = params_from_json(r#"{"key":17,"destination":"d"}"#);

        let err = IncCommand::from_params(&map).unwrap_err();

        assert!(matches!(err, CommandError::Config { .. }));
    }

    #[test]
    fn registration_makes_the_command_resolvable() {
        let mut registry = CommandRegistry::new();
        register_inc_command(&mut registry);

        let map = params_from_json(r#"{"key":"k","destination":"d"}"#);
        let cmd = registry.resolve(INC_COMMAND_NAME, &map).unwrap();

        assert_eq!(cmd.name(), INC_COMMAND_NAME);
    }

    #[test]
    fn unknown_names_stay_unknown() {
        let mut registry = CommandRegistry::new();
        register_inc_command(&mut registry);

        let res = registry.resolve("dec", &ParamMap::new());

        assert!(matches!(res, Err(CoreError::UnknownCommand(_))));
    }
}
