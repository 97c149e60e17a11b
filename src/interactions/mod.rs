//! Signed interaction webhooks.
//!
//! The platform delivers every user action as a signed `POST` to a single webhook endpoint:
//! liveness pings, slash-command invocations, and clicks on message components. This module
//! owns the protocol side of those deliveries:
//!
//! * [`verify`] authenticates the raw request bytes against the platform's Ed25519 signature
//!   headers before anything else looks at the body.
//! * [`model`] defines the parsed [`Interaction`][model::Interaction] and the
//!   [`ResponseEnvelope`][model::ResponseEnvelope] returned to the platform.
//! * [`dispatch`] classifies a verified interaction and routes it to the matching handler,
//!   normalizing lookup misses and handler failures into HTTP-style outcomes.
//!
//! The platform only waits a few seconds for the synchronous reply. Handlers whose real work
//! can exceed that window return a deferred acknowledgement and finish via the
//! [`deferred`][crate::deferred] coordinator.

pub mod dispatch;
pub mod model;
pub mod verify;
