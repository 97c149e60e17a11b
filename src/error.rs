//! Error types.

use trust_dns_proto::error::ProtoError;

/// Error enumerates the possible Dig Crab error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when [`Config::verifying_key`][`crate::config::Config::verifying_key`] is given
    /// a `public_key` value that isn't 32 hex-encoded bytes of valid Ed25519 key material.
    #[error("public key is not a valid hex-encoded Ed25519 key")]
    InvalidPublicKey,

    /// Returned when a [`Config::commands`][`crate::config::Config::commands`] entry names a
    /// handler that isn't built in to Dig Crab.
    #[error("no built-in command handler named \"{0}\"")]
    UnknownCommandHandler(String),

    /// Returned by a [`ComponentResolver`][`crate::registry::ComponentResolver`] when no handler
    /// can be loaded for a component `custom_id`. Component identifiers are minted by earlier
    /// responses, so this is a routine outcome for stale UI rather than a fault worth reporting.
    #[error("no component handler for custom id \"{0}\"")]
    ComponentNotFound(String),

    /// Returned when a command interaction omits an option its handler declares as required.
    #[error("interaction is missing required option \"{0}\"")]
    MissingOption(&'static str),

    /// Returned when a component `custom_id` resolves to a handler but doesn't carry the
    /// arguments that handler encodes into its identifiers.
    #[error("malformed component custom id \"{0}\"")]
    MalformedCustomId(String),

    /// Returned when the platform rejects an edit of an interaction's original response, or the
    /// edit request can't be sent at all.
    #[error("response edit failed")]
    EditFailed(#[from] reqwest::Error),

    /// Returned when an upstream DNS lookup fails with a generic DNS protocol error.
    #[error("DNS error")]
    Lookup(#[from] ProtoError),

    /// Returned when an upstream DNS query fails after the client connection was established.
    #[error("DNS query failed")]
    Query(#[from] trust_dns_client::error::ClientError),

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when processing JSON from disk (e.g.
    /// [trying to load a `Config`][crate::config::Config::try_from_file]) fails due to invalid
    /// JSON content.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),
}
