//! Command registry that resolves a command name to a ready-to-run instance.
//!
//! Commands are registered at startup under a fixed name token together
//! with a factory that decodes their configuration. Resolution is a plain
//! map lookup followed by the factory call; there is no runtime discovery.
use std::collections::BTreeMap;

use tracing::{debug, trace};

use tally_model::ParamMap;

use crate::{command::Command, error::CoreError};

/// Builds a command instance from its raw configuration map.
///
/// The factory owns configuration decoding, so a malformed map or a blank
/// required field surfaces as a configuration error here, before a command
/// instance exists.
pub type CommandFactory = fn(&ParamMap) -> Result<Box<dyn Command>, crate::command::CommandError>;

/// Static name-to-factory table.
///
/// Registered once at startup; later registrations under the same name
/// replace the earlier one.
#[derive(Default)]
pub struct CommandRegistry {
    factories: BTreeMap<&'static str, CommandFactory>,
}

impl CommandRegistry {
    /// Create an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register a factory under a fixed name token.
    #[inline]
    pub fn register(&mut self, name: &'static str, factory: CommandFactory) {
        debug!(command = name, "registering command");
        self.factories.insert(name, factory);
    }

    /// Returns `true` if a command is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Look up `name` and build a command from `params`.
    ///
    /// An unregistered name is [`CoreError::UnknownCommand`]; a factory
    /// failure (bad configuration) is [`CoreError::Command`].
    pub fn resolve(&self, name: &str, params: &ParamMap) -> Result<Box<dyn Command>, CoreError> {
        trace!(command = name, "resolving command");

        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| CoreError::UnknownCommand(name.to_string()))?;

        let cmd = factory(params)?;
        debug!(command = name, "command resolved");
        Ok(cmd)
    }
}
