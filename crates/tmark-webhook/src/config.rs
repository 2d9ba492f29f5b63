//! Webhook sink configuration.
//!
//! Loaded from environment variables so cron entries stay short and the
//! token never appears in the process list. Override via explicit
//! construction for testing against a local server.

use url::Url;

/// Configuration for the webhook dispatch sink.
///
/// Custom `Debug` implementation redacts the `token` field to prevent
/// credential leakage in log output.
#[derive(Clone)]
pub struct WebhookConfig {
    /// Endpoint the actions are POSTed to.
    pub endpoint: Url,
    /// Bearer token for authentication. Empty means no `Authorization`
    /// header is sent.
    pub token: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl WebhookConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `TMARK_WEBHOOK_URL` (required)
    /// - `TMARK_WEBHOOK_TOKEN` (default: empty, no auth header)
    /// - `TMARK_WEBHOOK_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, WebhookConfigError> {
        let raw =
            std::env::var("TMARK_WEBHOOK_URL").map_err(|_| WebhookConfigError::MissingUrl)?;
        let endpoint = Url::parse(&raw)
            .map_err(|e| WebhookConfigError::InvalidUrl(raw, e.to_string()))?;
        Ok(Self {
            endpoint,
            token: std::env::var("TMARK_WEBHOOK_TOKEN").unwrap_or_default(),
            timeout_secs: std::env::var("TMARK_WEBHOOK_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }

    /// Configuration for a local test server, short timeout, no token.
    pub fn local(port: u16) -> Result<Self, WebhookConfigError> {
        let raw = format!("http://127.0.0.1:{port}/actions");
        let endpoint = Url::parse(&raw)
            .map_err(|e| WebhookConfigError::InvalidUrl(raw, e.to_string()))?;
        Ok(Self {
            endpoint,
            token: String::new(),
            timeout_secs: 5,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum WebhookConfigError {
    #[error("TMARK_WEBHOOK_URL environment variable is required")]
    MissingUrl,
    #[error("invalid webhook URL {0:?}: {1}")]
    InvalidUrl(String, String),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}
