//! HTTP surface for the interactions webhook and supporting routes.
//!
//! # Endpoints
//!
//! ## `/interactions` (POST)
//!
//!   The signed webhook endpoint. Requires `X-Signature-Ed25519` and
//!   `X-Signature-Timestamp` headers; the body is verified as raw bytes before it is parsed
//!   as an interaction. Responses:
//!
//!   * `200` with a JSON response envelope on success
//!   * `401` empty body when signature verification fails
//!   * `404` empty body for an unknown command or component id
//!   * `500` empty body when a component handler fails
//!   * `501` empty body for an unrecognized interaction type
//!
//! ## `/health` (GET)
//!
//!   Returns HTTP 200 (OK) with the plain text body `OK` and explicit no-cache directives.
//!
//! ## `/privacy`, `/terms` (GET)
//!
//!   Static plain-text policy content.
//!
//! ## `/invite`, `/server`, `/github`, `/` (GET)
//!
//!   `301` redirects: `/invite` to the OAuth authorization URL built from the configured
//!   application id, the rest to configured external URLs.
//!
//! Anything else is a 404.

mod content;
mod routes;
pub mod server;

pub use server::{new, router};
