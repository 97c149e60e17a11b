//! Handler registration and lookup.
//!
//! Commands are pre-registered: the platform assigns each command an id at publish time, and
//! [`Config::commands`][crate::config::Config::commands] maps those ids onto built-in handler
//! names. The resulting table is built once at startup and never mutated, so concurrent
//! lookups need no synchronization.
//!
//! Components are not pre-registered. Their identifiers are minted dynamically by earlier
//! responses, so a [`ComponentResolver`] loads handlers on demand from the `custom_id` string
//! and reports "no such handler" as a distinguishable
//! [`Error::ComponentNotFound`][crate::error::Error::ComponentNotFound] rather than a generic
//! failure. A stale id is routine, not a bug.

use crate::config::{Config, SharedConfig};
use crate::deferred::Scheduler;
use crate::dig;
use crate::dig::SharedQuerier;
use crate::edit::SharedEditor;
use crate::error::Error;
use crate::interactions::model::{Interaction, ResponseEnvelope};
use crate::report::SharedReporter;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Declared schema for one command option, mirrored from the published command manifest.
#[derive(Debug, Clone)]
pub struct OptionSchema {
    pub name: &'static str,
    pub kind: &'static str,
    pub required: bool,
    pub choices: &'static [&'static str],
}

/// The uniform contract every command and component collaborator implements.
#[async_trait::async_trait]
pub trait Handler: Send + Sync {
    fn name(&self) -> &'static str;

    fn options(&self) -> Vec<OptionSchema> {
        Vec::new()
    }

    async fn execute(&self, ctx: &Context) -> Result<ResponseEnvelope, Error>;
}

/// Everything a handler may touch while executing one interaction.
///
/// Built fresh per interaction by the dispatcher. The ack gate inside is released by the
/// dispatcher once the handler's immediate response has been produced, which is what lets
/// deferred work order its corrective edit strictly after the ack.
pub struct Context {
    pub interaction: Interaction,
    pub config: SharedConfig,
    pub scheduler: Scheduler,
    pub reporter: SharedReporter,
    pub editor: SharedEditor,
    pub querier: SharedQuerier,
    acked: Mutex<Option<oneshot::Receiver<()>>>,
}

impl Context {
    pub fn new(
        interaction: Interaction,
        config: SharedConfig,
        scheduler: Scheduler,
        reporter: SharedReporter,
        editor: SharedEditor,
        querier: SharedQuerier,
    ) -> (Self, oneshot::Sender<()>) {
        let (acked_tx, acked_rx) = oneshot::channel();
        let ctx = Self {
            interaction,
            config,
            scheduler,
            reporter,
            editor,
            querier,
            acked: Mutex::new(Some(acked_rx)),
        };
        (ctx, acked_tx)
    }

    /// The string value of the named command option, if present.
    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.interaction.option_str(name)
    }

    pub(crate) fn take_ack_gate(&self) -> Option<oneshot::Receiver<()>> {
        self.acked.lock().ok().and_then(|mut gate| gate.take())
    }
}

/// On-demand loading of component handlers by `custom_id`.
pub trait ComponentResolver: Send + Sync {
    /// Resolve a handler for the given `custom_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ComponentNotFound`] when no handler exists for the id. Any other error
    /// is treated by the dispatcher as an execution failure.
    fn resolve(&self, custom_id: &str) -> Result<Arc<dyn Handler>, Error>;
}

lazy_static! {
    static ref BUILTIN_COMMANDS: HashMap<&'static str, Arc<dyn Handler>> = {
        let mut commands: HashMap<&'static str, Arc<dyn Handler>> = HashMap::new();
        commands.insert("dig", Arc::new(dig::command::Dig));
        commands
    };
}

/// Read-only mapping from command and component identifiers to handler units.
pub struct Registry {
    commands: HashMap<String, Arc<dyn Handler>>,
    components: Box<dyn ComponentResolver>,
}

impl Registry {
    pub fn new(
        commands: HashMap<String, Arc<dyn Handler>>,
        components: Box<dyn ComponentResolver>,
    ) -> Self {
        Self {
            commands,
            components,
        }
    }

    /// Build the command table from the configured id -> handler-name map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCommandHandler`] if the config names a handler that isn't
    /// built in.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let mut commands = HashMap::with_capacity(config.commands.len());
        for (id, name) in &config.commands {
            let handler = BUILTIN_COMMANDS
                .get(name.as_str())
                .ok_or_else(|| Error::UnknownCommandHandler(name.clone()))?;
            commands.insert(id.clone(), handler.clone());
        }
        Ok(Self::new(commands, Box::new(BuiltinResolver)))
    }

    pub fn command(&self, id: &str) -> Option<Arc<dyn Handler>> {
        self.commands.get(id).cloned()
    }

    /// Resolve a component handler, or fail with a distinguishable not-found error.
    ///
    /// # Errors
    ///
    /// See [`ComponentResolver::resolve`].
    pub fn component(&self, custom_id: &str) -> Result<Arc<dyn Handler>, Error> {
        self.components.resolve(custom_id)
    }
}

/// Resolves built-in component handlers from the prefix their `custom_id`s are minted with.
pub struct BuiltinResolver;

impl ComponentResolver for BuiltinResolver {
    fn resolve(&self, custom_id: &str) -> Result<Arc<dyn Handler>, Error> {
        match custom_id.split(':').next() {
            Some("dig") => Ok(Arc::new(dig::command::DigRerun)),
            _ => Err(Error::ComponentNotFound(custom_id.to_string())),
        }
    }
}
