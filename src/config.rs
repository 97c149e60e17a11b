use crate::error::Error;
use ed25519_dalek::VerifyingKey;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub type SharedConfig = Arc<Config>;

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Hex-encoded Ed25519 public key the platform signs interaction webhooks with.
    pub public_key: String,
    /// The platform-assigned application (client) id, used for the OAuth invite URL and for
    /// addressing the original-response edit endpoint.
    pub application_id: String,
    pub api_bind_addr: SocketAddr,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub api_timeout: Duration,
    /// Upstream recursive resolver queried by the `dig` command.
    pub resolver_addr: SocketAddr,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub dns_timeout: Duration,
    /// Platform-assigned command id -> built-in handler name.
    pub commands: HashMap<String, String>,
    pub server_url: String,
    pub github_url: String,
}

impl Config {
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let conf: Config = serde_json::from_reader(reader)?;
        // Fail at startup, not on the first inbound webhook.
        conf.verifying_key()?;
        Ok(conf)
    }

    /// Decode the configured `public_key` into a key usable for signature verification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPublicKey`] if the value isn't valid hex, isn't 32 bytes long, or
    /// isn't a valid Ed25519 public key.
    pub fn verifying_key(&self) -> Result<VerifyingKey, Error> {
        let bytes = hex::decode(&self.public_key).map_err(|_| Error::InvalidPublicKey)?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| Error::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| Error::InvalidPublicKey)
    }

    /// The OAuth URL for adding the application to a server, parameterized by
    /// [`Config::application_id`].
    pub fn invite_url(&self) -> String {
        format!(
            "https://discord.com/oauth2/authorize?client_id={}&scope=applications.commands",
            self.application_id
        )
    }
}
