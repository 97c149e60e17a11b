//! Dig Crab
//!
//! A signed-webhook interactions endpoint that answers DNS lookups from chat slash commands.
//!
//! The chat platform delivers every user action (liveness ping, slash-command invocation,
//! button click) as an Ed25519-signed `POST` to [`/interactions`][crate::api]. Requests are
//! verified against the platform public key before anything parses them, routed to the
//! matching [handler][crate::registry], and answered within the platform's synchronous reply
//! window. Lookups that may take longer use the [deferred protocol][crate::deferred]:
//! acknowledge immediately, resolve in a supervised background task, then edit the original
//! response with the answers.
//!
#![warn(clippy::pedantic)]

pub mod api;
pub mod config;
#[doc(hidden)]
pub mod crab;
pub mod deferred;
pub mod dig;
pub mod edit;
pub mod error;
pub mod interactions;
pub mod registry;
pub mod report;

pub use config::{Config, SharedConfig};
pub use interactions::dispatch::Dispatcher;
pub use registry::Registry;
