//! The webhook dispatch sink.

use std::time::Duration;

use serde::Serialize;

use tmark_core::DispatchError;
use tmark_engine::dispatch::{DispatchAction, DispatchSink};

use crate::config::{WebhookConfig, WebhookConfigError};

/// Request body POSTed for each action.
#[derive(Debug, Serialize)]
struct ActionPayload<'a> {
    title: &'a str,
    body: &'a str,
    idempotency_key: &'a str,
}

/// Dispatch sink that POSTs actions to the configured webhook endpoint.
///
/// Idempotency is delegated to the receiver via the `idempotency_key`
/// field; a retried post with a key it has already seen should succeed
/// without creating a duplicate.
#[derive(Debug)]
pub struct WebhookSink {
    config: WebhookConfig,
    client: reqwest::blocking::Client,
}

impl WebhookSink {
    /// Build the sink, constructing the HTTP client with the configured
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookConfigError::Client`] if the TLS backend cannot
    /// be initialized.
    pub fn new(config: WebhookConfig) -> Result<Self, WebhookConfigError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WebhookConfigError::Client(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> &str {
        self.config.endpoint.as_str()
    }
}

impl DispatchSink for WebhookSink {
    fn create_action(&mut self, action: &DispatchAction) -> Result<(), DispatchError> {
        let key = action.idempotency_key.as_str();
        let payload = ActionPayload {
            title: &action.title,
            body: &action.body,
            idempotency_key: key,
        };

        let mut request = self.client.post(self.config.endpoint.clone()).json(&payload);
        if !self.config.token.is_empty() {
            request = request.bearer_auth(&self.config.token);
        }

        let response = request.send().map_err(|err| {
            if err.is_timeout() {
                DispatchError::Timeout {
                    key: key.to_string(),
                }
            } else {
                DispatchError::Unavailable {
                    endpoint: self.endpoint().to_string(),
                    reason: err.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(%key, status = status.as_u16(), "webhook accepted action");
            Ok(())
        } else {
            Err(DispatchError::Rejected {
                key: key.to_string(),
                status: status.as_u16(),
            })
        }
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
