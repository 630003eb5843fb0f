//! In-memory block store
//!
//! For testing and local development.
//!
//! TigerStyle: Simple in-memory implementation with real version
//! bookkeeping, so concurrency tests exercise the same semantics the
//! hosted store provides.

use crate::store::BlockStore;
use async_trait::async_trait;
use retinue_core::{Result, Version, Versioned, WriteOutcome, BLOCK_LABEL_LENGTH_BYTES_MAX};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;

/// Stored blocks: label -> (value, version)
type Blocks = HashMap<String, (Value, Version)>;

/// In-memory block store
#[derive(Clone, Default)]
pub struct MemoryBlockStore {
    blocks: Arc<RwLock<Blocks>>,
}

impl MemoryBlockStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            blocks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn check_label(label: &str) {
        assert!(!label.is_empty(), "block label cannot be empty");
        assert!(
            label.len() <= BLOCK_LABEL_LENGTH_BYTES_MAX,
            "block label too long: {} bytes",
            label.len()
        );
    }
}

#[async_trait]
impl BlockStore for MemoryBlockStore {
    #[instrument(skip(self), fields(label = %label))]
    async fn read(&self, label: &str) -> Result<Option<Versioned<Value>>> {
        Self::check_label(label);
        let blocks = self.blocks.read().await;
        Ok(blocks
            .get(label)
            .map(|(value, version)| Versioned::new(value.clone(), *version)))
    }

    #[instrument(skip(self, value), fields(label = %label))]
    async fn write(&self, label: &str, value: Value) -> Result<Version> {
        Self::check_label(label);
        let mut blocks = self.blocks.write().await;
        let next = blocks
            .get(label)
            .map(|(_, version)| version.next())
            .unwrap_or_else(|| Version::INITIAL.next());
        blocks.insert(label.to_string(), (value, next));
        Ok(next)
    }

    #[instrument(skip(self, value), fields(label = %label, expected = %expected))]
    async fn write_if_version(
        &self,
        label: &str,
        value: Value,
        expected: Version,
    ) -> Result<WriteOutcome> {
        Self::check_label(label);
        let mut blocks = self.blocks.write().await;
        let actual = blocks
            .get(label)
            .map(|(_, version)| *version)
            .unwrap_or(Version::INITIAL);

        if actual != expected {
            return Ok(WriteOutcome::Conflict { expected, actual });
        }

        let next = actual.next();
        blocks.insert(label.to_string(), (value, next));
        Ok(WriteOutcome::Committed(next))
    }

    #[instrument(skip(self), fields(label = %label))]
    async fn delete(&self, label: &str) -> Result<()> {
        Self::check_label(label);
        let mut blocks = self.blocks.write().await;
        blocks.remove(label);
        Ok(())
    }
}
