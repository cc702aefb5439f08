//! In-memory sink for tests and in-process embedding.

use crate::error::SinkResult;
use crate::sink::SnapshotSink;
use parking_lot::Mutex;
use std::collections::HashMap;

/// A sink that records everything it is handed.
///
/// Channels keep their full message history, the store keeps last-write-wins
/// values, matching the semantics of the real transport.
#[derive(Debug, Default)]
pub struct MemorySink {
    channels: Mutex<HashMap<String, Vec<String>>>,
    store: Mutex<HashMap<String, String>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages published on `channel`, oldest first.
    #[must_use]
    pub fn messages(&self, channel: &str) -> Vec<String> {
        self.channels
            .lock()
            .get(channel)
            .cloned()
            .unwrap_or_default()
    }

    /// Latest value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.store.lock().get(key).cloned()
    }

    /// All store keys currently set.
    #[must_use]
    pub fn stored_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.store.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn clear(&self) {
        self.channels.lock().clear();
        self.store.lock().clear();
    }
}

impl SnapshotSink for MemorySink {
    async fn publish(&self, channel: &str, payload: &str) -> SinkResult<()> {
        self.channels
            .lock()
            .entry(channel.to_owned())
            .or_default()
            .push(payload.to_owned());
        Ok(())
    }

    async fn set(&self, key: &str, payload: &str) -> SinkResult<()> {
        self.store.lock().insert(key.to_owned(), payload.to_owned());
        Ok(())
    }
}
