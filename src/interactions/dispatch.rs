//! Classification and routing of verified interactions.

use crate::config::SharedConfig;
use crate::deferred::Scheduler;
use crate::dig::SharedQuerier;
use crate::edit::SharedEditor;
use crate::error::Error;
use crate::interactions::model::{
    Interaction, InteractionKind, MessageData, ResponseEnvelope,
};
use crate::registry::{Context, Registry};
use crate::report::{SharedReporter, Tags};

/// Shown (only to the invoking user) when a command handler fails. The raw error never
/// reaches the caller.
pub const APOLOGY_CONTENT: &str = "Sorry, something went wrong running that command.";

/// The terminal result of routing one verified interaction.
#[derive(Debug)]
pub enum Outcome {
    /// 200 with a JSON [`ResponseEnvelope`] body.
    Reply(ResponseEnvelope),
    /// 404, empty body. Unknown command id or stale component id; never reported.
    NotFound,
    /// 500, empty body. A component handler failed; already reported.
    Failed,
    /// 501, empty body. An interaction kind this service doesn't implement.
    Unimplemented,
}

/// Routes verified interactions to their handler units.
///
/// Holds only read-only or cloneable state, so concurrent dispatches share nothing mutable.
/// Each dispatch builds a fresh [`Context`] owning that interaction's token and ack gate.
pub struct Dispatcher {
    registry: Registry,
    config: SharedConfig,
    scheduler: Scheduler,
    reporter: SharedReporter,
    editor: SharedEditor,
    querier: SharedQuerier,
}

impl Dispatcher {
    pub fn new(
        registry: Registry,
        config: SharedConfig,
        scheduler: Scheduler,
        reporter: SharedReporter,
        editor: SharedEditor,
        querier: SharedQuerier,
    ) -> Self {
        Self {
            registry,
            config,
            scheduler,
            reporter,
            editor,
            querier,
        }
    }

    /// Produce the one response for a verified, parsed interaction.
    pub async fn dispatch(&self, interaction: Interaction) -> Outcome {
        match interaction.kind {
            // Liveness checks must succeed even with an empty registry.
            InteractionKind::Ping => Outcome::Reply(ResponseEnvelope::pong()),
            InteractionKind::Command => self.dispatch_command(interaction).await,
            InteractionKind::Component => self.dispatch_component(interaction).await,
            InteractionKind::Unknown(kind) => {
                tracing::debug!("unimplemented interaction type {kind}");
                Outcome::Unimplemented
            }
        }
    }

    async fn dispatch_command(&self, interaction: Interaction) -> Outcome {
        let Some(id) = interaction
            .data
            .as_ref()
            .and_then(|data| data.id.clone())
        else {
            return Outcome::NotFound;
        };
        let Some(handler) = self.registry.command(&id) else {
            tracing::debug!("no command registered for id {id}");
            return Outcome::NotFound;
        };

        let tags = Tags::command(handler.name());
        let (ctx, acked) = self.context(interaction);
        match handler.execute(&ctx).await {
            Ok(envelope) => {
                let _ = acked.send(());
                Outcome::Reply(envelope)
            }
            Err(err) => {
                self.reporter.report(&err, &tags);
                Outcome::Reply(ResponseEnvelope::message(MessageData::ephemeral_text(
                    APOLOGY_CONTENT,
                )))
            }
        }
    }

    async fn dispatch_component(&self, interaction: Interaction) -> Outcome {
        let Some(custom_id) = interaction
            .data
            .as_ref()
            .and_then(|data| data.custom_id.clone())
        else {
            return Outcome::NotFound;
        };

        let handler = match self.registry.component(&custom_id) {
            Ok(handler) => handler,
            Err(Error::ComponentNotFound(id)) => {
                tracing::debug!("no component handler for custom id {id}");
                return Outcome::NotFound;
            }
            Err(err) => {
                self.reporter.report(&err, &Tags::component(custom_id));
                return Outcome::Failed;
            }
        };

        let tags = Tags::component(handler.name());
        let (ctx, acked) = self.context(interaction);
        match handler.execute(&ctx).await {
            Ok(envelope) => {
                let _ = acked.send(());
                Outcome::Reply(envelope)
            }
            Err(err) => {
                self.reporter.report(&err, &tags);
                Outcome::Failed
            }
        }
    }

    fn context(&self, interaction: Interaction) -> (Context, tokio::sync::oneshot::Sender<()>) {
        Context::new(
            interaction,
            self.config.clone(),
            self.scheduler.clone(),
            self.reporter.clone(),
            self.editor.clone(),
            self.querier.clone(),
        )
    }
}
