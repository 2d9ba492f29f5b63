//! # tmark-webhook
//!
//! HTTP dispatch sink. Posts each alert action as JSON to a configured
//! webhook endpoint (an issue tracker's inbound integration or similar),
//! carrying the action's idempotency key so the receiver can drop
//! repeats.
//!
//! The client is blocking: a tracker run is a short single-threaded
//! batch, and the handful of posts per cycle do not justify an async
//! runtime.

pub mod config;
pub mod sink;

pub use config::{WebhookConfig, WebhookConfigError};
pub use sink::WebhookSink;
