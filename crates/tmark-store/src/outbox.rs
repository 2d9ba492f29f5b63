//! # Outbox Sink
//!
//! A [`DispatchSink`] that writes each action as one JSON file in an
//! outbox directory, named by the action's idempotency key. A downstream
//! process (or a human) drains the directory; this tool only ever adds.
//!
//! Idempotency falls out of the naming scheme: if the file already
//! exists, the action was already emitted and the write is skipped,
//! reported as success.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use tmark_core::DispatchError;
use tmark_engine::dispatch::{DispatchAction, DispatchSink};

/// What one outbox file contains.
#[derive(Debug, Serialize)]
struct OutboxEntry<'a> {
    title: &'a str,
    body: &'a str,
    idempotency_key: &'a str,
}

/// File-per-action dispatch sink.
#[derive(Debug, Clone)]
pub struct OutboxSink {
    dir: PathBuf,
}

impl OutboxSink {
    /// Sink writing into `dir`, which is created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The outbox directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn action_path(&self, key: &str) -> PathBuf {
        // Keys are built from validated slugs, tiers, and ISO dates, so
        // they are safe as filenames as-is.
        self.dir.join(format!("{key}.json"))
    }

    fn io_error(key: &str, source: io::Error) -> DispatchError {
        DispatchError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl DispatchSink for OutboxSink {
    fn create_action(&mut self, action: &DispatchAction) -> Result<(), DispatchError> {
        let key = action.idempotency_key.as_str();
        let path = self.action_path(key);
        if path.exists() {
            tracing::debug!(%key, "outbox entry already present, skipping");
            return Ok(());
        }

        fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(key, e))?;
        let entry = OutboxEntry {
            title: &action.title,
            body: &action.body,
            idempotency_key: key,
        };
        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| Self::io_error(key, io::Error::other(e)))?;

        // Temp then rename, so a reader draining the directory never sees
        // a half-written entry.
        let tmp = self.dir.join(format!(".{key}.tmp"));
        fs::write(&tmp, json).map_err(|e| Self::io_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| Self::io_error(key, e))?;
        tracing::info!(%key, path = %path.display(), "wrote outbox entry");
        Ok(())
    }

    fn name(&self) -> &str {
        "outbox"
    }
}
