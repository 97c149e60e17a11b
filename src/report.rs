//! Failure reporting to the observability collaborator.
//!
//! Handler and deferred-task failures are pushed to an [`ErrorReporter`] together with
//! contextual tags before being converted into a safe, generic user-facing message. The
//! reporter is a sink: it has no return value and must never fail the path that calls it.
//! Expected traffic (bad signatures, unknown command ids, stale component ids) is never
//! reported.

use crate::error::Error;
use std::sync::Arc;

pub type SharedReporter = Arc<dyn ErrorReporter>;

/// Context attached to every report: which kind of interaction failed and the name of the
/// command or component involved.
#[derive(Debug, Clone)]
pub struct Tags {
    pub kind: &'static str,
    pub name: String,
}

impl Tags {
    pub fn command(name: impl Into<String>) -> Self {
        Self {
            kind: "command",
            name: name.into(),
        }
    }

    pub fn component(name: impl Into<String>) -> Self {
        Self {
            kind: "component",
            name: name.into(),
        }
    }
}

/// Adapter seam for whatever vendor observability client is plugged in. Keeping the
/// capability behind a trait means the vendor client is wrapped explicitly rather than
/// patched at runtime, and tests can substitute a recording implementation.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &Error, tags: &Tags);
}

/// Default reporter: structured error-level log records.
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, error: &Error, tags: &Tags) {
        tracing::error!(
            kind = tags.kind,
            name = %tags.name,
            "handler failure: {error}"
        );
    }
}
