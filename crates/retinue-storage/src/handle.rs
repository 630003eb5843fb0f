//! Typed views over stored blocks
//!
//! `BlockHandle<T>` binds one label to one serde type and runs the
//! read-modify-write cycles every caller follows. The default `update`
//! is last-writer-wins, mirroring the hosted store's observed behavior:
//! two callers that read the same snapshot silently lose one of their
//! updates. `update_with_retry` layers bounded optimistic concurrency on
//! top for callers that cannot tolerate that.

use crate::store::BlockStore;
use retinue_core::{Error, Result, Version, Versioned, WriteOutcome, BLOCK_WRITE_RETRY_COUNT_MAX};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// A typed view over one named block
pub struct BlockHandle<T, S: ?Sized> {
    store: Arc<S>,
    label: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S> BlockHandle<T, S>
where
    T: Serialize + DeserializeOwned + Default + Send,
    S: BlockStore + ?Sized,
{
    /// Create a handle for a label
    pub fn new(store: Arc<S>, label: impl Into<String>) -> Self {
        Self {
            store,
            label: label.into(),
            _marker: PhantomData,
        }
    }

    /// The label this handle is bound to
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Load the current value and its version
    ///
    /// A missing block reads as `T::default()` at the initial version, so
    /// the creating write goes through `write_if_version` cleanly.
    pub async fn load(&self) -> Result<Versioned<T>> {
        match self.store.read(&self.label).await? {
            Some(versioned) => {
                let value: T = serde_json::from_value(versioned.value).map_err(|e| {
                    Error::block_shape_invalid(&self.label, e.to_string())
                })?;
                Ok(Versioned::new(value, versioned.version))
            }
            None => Ok(Versioned::initial(T::default())),
        }
    }

    /// Write the value back, last writer wins
    pub async fn store(&self, value: &T) -> Result<Version> {
        let json = serde_json::to_value(value)?;
        self.store.write(&self.label, json).await
    }

    /// Write the value back only if the block is still at `expected`
    pub async fn store_if_version(&self, value: &T, expected: Version) -> Result<WriteOutcome> {
        let json = serde_json::to_value(value)?;
        self.store.write_if_version(&self.label, json, expected).await
    }

    /// One read-modify-write cycle, last writer wins
    pub async fn update<F, R>(&self, mutate: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> Result<R>,
    {
        let mut snapshot = self.load().await?;
        let outcome = mutate(&mut snapshot.value)?;
        self.store(&snapshot.value).await?;
        Ok(outcome)
    }

    /// Read-modify-write with bounded optimistic retry
    ///
    /// Replays the mutation against a fresh snapshot on every conflict;
    /// after `BLOCK_WRITE_RETRY_COUNT_MAX` attempts the conflict is
    /// reported to the caller.
    pub async fn update_with_retry<F, R>(&self, mut mutate: F) -> Result<R>
    where
        F: FnMut(&mut T) -> Result<R>,
    {
        let mut last_conflict = (Version::INITIAL, Version::INITIAL);

        for attempt in 1..=BLOCK_WRITE_RETRY_COUNT_MAX {
            let mut snapshot = self.load().await?;
            let outcome = mutate(&mut snapshot.value)?;
            match self.store_if_version(&snapshot.value, snapshot.version).await? {
                WriteOutcome::Committed(_) => return Ok(outcome),
                WriteOutcome::Conflict { expected, actual } => {
                    debug!(label = %self.label, attempt, expected = %expected, actual = %actual,
                        "block write conflict; retrying");
                    last_conflict = (expected, actual);
                }
            }
        }

        Err(Error::BlockWriteConflict {
            label: self.label.clone(),
            expected: last_conflict.0.value(),
            actual: last_conflict.1.value(),
        })
    }
}
