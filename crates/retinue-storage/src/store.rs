//! Block store trait
//!
//! TigerStyle: Explicit operations, versioned reads.
//!
//! The external memory service stores whole JSON documents under string
//! labels and offers no partial updates and no transactions. Every read
//! returns the version it observed so callers can choose between
//! last-writer-wins (`write`) and conflict detection (`write_if_version`).

use async_trait::async_trait;
use retinue_core::{Result, Version, Versioned, WriteOutcome};
use serde_json::Value;

/// Gateway to named JSON blocks in the external memory store
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Read a block and the version it was observed at
    async fn read(&self, label: &str) -> Result<Option<Versioned<Value>>>;

    /// Overwrite a block wholesale, last writer wins
    ///
    /// Returns the version assigned to the new value.
    async fn write(&self, label: &str, value: Value) -> Result<Version>;

    /// Overwrite a block only if it is still at the expected version
    ///
    /// `Version::INITIAL` as the expected version commits the creating
    /// write of a block that does not exist yet.
    async fn write_if_version(
        &self,
        label: &str,
        value: Value,
        expected: Version,
    ) -> Result<WriteOutcome>;

    /// Delete a block
    async fn delete(&self, label: &str) -> Result<()>;

    /// Check if a block exists
    async fn exists(&self, label: &str) -> Result<bool> {
        Ok(self.read(label).await?.is_some())
    }
}
