//! Editing an interaction's original response after a deferred acknowledgement.

use crate::config::Config;
use crate::error::Error;
use crate::interactions::model::MessageData;

pub type SharedEditor = std::sync::Arc<dyn ResponseEditor>;

/// The single allowed mutation of an interaction's visible output after the initial ack.
///
/// Each interaction owns its own token; an edit for one interaction must never be issued with
/// another interaction's token, which is why the token travels with the deferred work rather
/// than living in any shared state.
#[async_trait::async_trait]
pub trait ResponseEditor: Send + Sync {
    async fn edit_original(&self, token: &str, data: &MessageData) -> Result<(), Error>;
}

/// Edits the original response through the platform's webhook endpoint.
pub struct WebhookEditor {
    http: reqwest::Client,
    base_url: String,
    application_id: String,
}

const PLATFORM_API_BASE: &str = "https://discord.com/api/v10";

impl WebhookEditor {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: PLATFORM_API_BASE.to_string(),
            application_id: config.application_id.clone(),
        }
    }
}

#[async_trait::async_trait]
impl ResponseEditor for WebhookEditor {
    async fn edit_original(&self, token: &str, data: &MessageData) -> Result<(), Error> {
        let url = format!(
            "{}/webhooks/{}/{}/messages/@original",
            self.base_url, self.application_id, token
        );
        self.http
            .patch(&url)
            .json(data)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
