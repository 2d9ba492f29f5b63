//! # tmark-store
//!
//! JSON-file persistence for the trademark tracker. Implements the
//! `tmark-engine` store traits over flat files, plus the exclusive
//! store lock that serializes whole invocations and the outbox sink
//! that writes dispatch actions as files.
//!
//! ## Durability model
//!
//! Both stores write through a temp file in the same directory followed
//! by an atomic rename, so a crash mid-save leaves the previous content
//! intact. The registry store rejects damaged records individually and
//! keeps loading; structural damage (unreadable file, invalid JSON,
//! duplicate ids) fails the whole load instead.

pub mod json;
pub mod lock;
pub mod outbox;

pub use json::{JsonAlertStore, JsonLicensingStore, JsonRegistryStore};
pub use lock::StoreLock;
pub use outbox::OutboxSink;
