//! Automation webhook client.

use store::{Dispatched, EmailRequest, EmailTrigger, TransportError, WebhookConfig};

/// Posts [`EmailRequest`]s to the automation webhook and never reads the
/// response. In the browser the request is sent in `no-cors` mode, so the
/// response would be opaque anyway.
#[derive(Clone, Debug)]
pub struct WebhookClient {
    client: reqwest::Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn from_config(config: &WebhookConfig) -> Self {
        Self::new(config.url.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl EmailTrigger for WebhookClient {
    async fn send(&self, request: &EmailRequest) -> Result<Dispatched, TransportError> {
        tracing::info!("Sending email via webhook: {}", self.url);
        let builder = self.client.post(&self.url).json(request);
        #[cfg(target_arch = "wasm32")]
        let builder = builder.fetch_mode_no_cors();

        builder.send().await.map_err(|e| {
            tracing::error!("Error sending email: {e}");
            TransportError(e.to_string())
        })?;

        Ok(Dispatched::now())
    }
}
