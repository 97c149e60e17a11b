//! The two-phase "ack now, finish later" response protocol.
//!
//! The platform treats an interaction as failed unless it gets a synchronous reply within a
//! few seconds. Handlers whose real work can exceed that window return a deferred
//! acknowledgement immediately and hand the work to [`respond_later`], which runs it as a
//! supervised background task and edits the original response when done.
//!
//! Tasks are never fire-and-forget. Every spawned task's [`JoinHandle`] is registered with a
//! [`Supervisor`] that awaits it and logs failures and panics, so an error inside deferred
//! work always reaches the process's top-level fault log even though the HTTP response that
//! created the task has long since been sent.

use crate::error::Error;
use crate::interactions::model::{MessageData, ResponseEnvelope};
use crate::registry::Context;
use crate::report::Tags;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Shown to the user when deferred work fails. The original error never reaches them.
pub const FAILURE_CONTENT: &str =
    "Something went wrong completing this lookup. Please try again later.";

struct Task {
    name: String,
    handle: JoinHandle<Result<(), Error>>,
}

/// Create a connected [`Scheduler`]/[`Supervisor`] pair.
#[must_use]
pub fn new() -> (Scheduler, Supervisor) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Scheduler { tx }, Supervisor { rx })
}

/// Spawns background tasks and registers their handles for supervision.
#[derive(Clone)]
pub struct Scheduler {
    tx: mpsc::UnboundedSender<Task>,
}

impl Scheduler {
    pub fn spawn<F>(&self, name: impl Into<String>, fut: F)
    where
        F: Future<Output = Result<(), Error>> + Send + 'static,
    {
        let task = Task {
            name: name.into(),
            handle: tokio::spawn(fut),
        };
        if self.tx.send(task).is_err() {
            // The task is already running, it just won't be awaited.
            tracing::warn!("supervisor is gone; deferred task left untracked");
        }
    }
}

/// Awaits every scheduled task until it settles, logging failures and panics.
pub struct Supervisor {
    rx: mpsc::UnboundedReceiver<Task>,
}

impl Supervisor {
    /// Run until every [`Scheduler`] clone has been dropped and all tasks have settled.
    pub async fn run(mut self) {
        while let Some(task) = self.rx.recv().await {
            match task.handle.await {
                Ok(Ok(())) => tracing::debug!(task = %task.name, "deferred task settled"),
                Ok(Err(err)) => {
                    tracing::error!(task = %task.name, "deferred task failed: {err}");
                }
                Err(join_err) => {
                    tracing::error!(task = %task.name, "deferred task panicked: {join_err}");
                }
            }
        }
    }
}

/// Acknowledge now, complete later.
///
/// Returns the deferred acknowledgement envelope for the handler to hand back to the
/// dispatcher, and schedules `work` as a supervised background task tied to this
/// interaction's token. The task:
///
/// 1. Waits for the dispatcher to confirm the ack was produced. Editing before the platform
///    has seen the ack risks it not yet recognizing the interaction token.
/// 2. Runs `work` and issues a single edit of the original response with its result.
/// 3. On failure, attempts exactly one best-effort edit carrying [`FAILURE_CONTENT`]
///    (a failed fallback edit is only logged), reports the original error with `tags`, and
///    propagates it to the supervisor so it isn't silently lost.
pub fn respond_later<F>(ctx: &Context, tags: Tags, work: F) -> ResponseEnvelope
where
    F: Future<Output = Result<MessageData, Error>> + Send + 'static,
{
    let token = ctx.interaction.token.clone();
    let editor = ctx.editor.clone();
    let reporter = ctx.reporter.clone();
    let gate = ctx.take_ack_gate();

    ctx.scheduler.spawn(tags.name.clone(), async move {
        if let Some(gate) = gate {
            if gate.await.is_err() {
                // The dispatcher dropped the gate without confirming the ack, so the platform
                // has no deferred response to edit.
                tracing::debug!("ack never confirmed; dropping deferred work");
                return Ok(());
            }
        }

        let result = async {
            let data = work.await?;
            editor.edit_original(&token, &data).await
        }
        .await;

        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                if let Err(edit_err) = editor
                    .edit_original(&token, &MessageData::text(FAILURE_CONTENT))
                    .await
                {
                    tracing::warn!("fallback edit failed: {edit_err}");
                }
                reporter.report(&err, &tags);
                Err(err)
            }
        }
    });

    ResponseEnvelope::deferred()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn supervisor_receives_task_failures() {
        let (scheduler, mut supervisor) = new();
        scheduler.spawn("boom", async { Err(Error::MissingOption("name")) });
        scheduler.spawn("fine", async { Ok(()) });

        let first = supervisor.rx.recv().await.unwrap();
        assert_eq!(first.name, "boom");
        assert!(matches!(
            first.handle.await.unwrap(),
            Err(Error::MissingOption("name"))
        ));

        let second = supervisor.rx.recv().await.unwrap();
        assert!(second.handle.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn supervisor_run_drains_until_schedulers_drop() {
        let (scheduler, supervisor) = new();
        scheduler.spawn("one", async { Ok(()) });
        drop(scheduler);
        // Completes because the channel closes once all schedulers are gone.
        supervisor.run().await;
    }
}
