//! Gateway to the group registry block
//!
//! `BlockHandle` alone is not enough for the registry: the wire format
//! carries no byte budget and no insertion-order index, so every load must
//! run [`GroupRegistry::rehydrate`] before the value is usable. This
//! gateway owns that step and the read-modify-write cycles built on it.
//!
//! The default `update` is last-writer-wins, matching the hosted store's
//! observed behavior: the agent and the game backend can race on the same
//! snapshot and one update is silently lost. `update_with_retry` layers
//! bounded optimistic concurrency on top for callers that cannot tolerate
//! that.

use crate::handle::BlockHandle;
use crate::store::BlockStore;
use retinue_core::{
    Error, Result, Version, Versioned, WriteOutcome, BLOCK_WRITE_RETRY_COUNT_MAX, GROUP_BLOCK_LABEL,
};
use retinue_group::{GroupRegistry, GroupRegistryConfig};
use std::sync::Arc;
use tracing::debug;

/// Typed gateway to the externally persisted group registry
pub struct GroupBlockGateway {
    handle: BlockHandle<GroupRegistry, dyn BlockStore>,
    config: GroupRegistryConfig,
}

impl GroupBlockGateway {
    /// Create a gateway with the default registry configuration
    pub fn new(store: Arc<dyn BlockStore>) -> Self {
        Self::with_config(store, GroupRegistryConfig::default())
    }

    /// Create a gateway with a custom registry configuration
    pub fn with_config(store: Arc<dyn BlockStore>, config: GroupRegistryConfig) -> Self {
        Self {
            handle: BlockHandle::new(store, GROUP_BLOCK_LABEL),
            config,
        }
    }

    /// The label of the backing block
    pub fn label(&self) -> &str {
        self.handle.label()
    }

    /// Load the registry and the version it was observed at
    ///
    /// A missing block reads as an empty registry at the initial version.
    pub async fn load(&self) -> Result<Versioned<GroupRegistry>> {
        let mut snapshot = self.handle.load().await?;
        snapshot.value.rehydrate(self.config.clone());
        Ok(snapshot)
    }

    /// Write the registry back, last writer wins
    pub async fn store(&self, registry: &GroupRegistry) -> Result<Version> {
        self.handle.store(registry).await
    }

    /// Write the registry back only if the block is still at `expected`
    pub async fn store_if_version(
        &self,
        registry: &GroupRegistry,
        expected: Version,
    ) -> Result<WriteOutcome> {
        self.handle.store_if_version(registry, expected).await
    }

    /// One read-modify-write cycle, last writer wins
    ///
    /// A failing mutation aborts the cycle; nothing is written back.
    pub async fn update<F, R>(&self, mutate: F) -> Result<R>
    where
        F: FnOnce(&mut GroupRegistry) -> Result<R>,
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
        F: FnMut(&mut GroupRegistry) -> Result<R>,
    {
        let mut last_conflict = (Version::INITIAL, Version::INITIAL);

        for attempt in 1..=BLOCK_WRITE_RETRY_COUNT_MAX {
            let mut snapshot = self.load().await?;
            let outcome = mutate(&mut snapshot.value)?;
            match self.store_if_version(&snapshot.value, snapshot.version).await? {
                WriteOutcome::Committed(_) => return Ok(outcome),
                WriteOutcome::Conflict { expected, actual } => {
                    debug!(label = %self.label(), attempt, expected = %expected, actual = %actual,
                        "group block write conflict; retrying");
                    last_conflict = (expected, actual);
                }
            }
        }

        Err(Error::BlockWriteConflict {
            label: self.label().to_string(),
            expected: last_conflict.0.value(),
            actual: last_conflict.1.value(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBlockStore;
    use retinue_group::{EntityId, MemberPatch};

    fn gateway() -> GroupBlockGateway {
        GroupBlockGateway::new(Arc::new(MemoryBlockStore::new()))
    }

    fn id(raw: &str) -> EntityId {
        EntityId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_load_missing_block_yields_empty_registry() {
        let gateway = gateway();

        let snapshot = gateway.load().await.unwrap();

        assert!(snapshot.value.is_empty());
        assert_eq!(snapshot.version, Version::INITIAL);
    }

    #[tokio::test]
    async fn test_update_persists_registry_mutation() {
        let gateway = gateway();

        let outcome = gateway
            .update(|registry| {
                registry.upsert(
                    &id("player_1"),
                    MemberPatch::new().with_name("Bob").with_presence(true),
                )
            })
            .await
            .unwrap();
        assert_eq!(outcome.group_size, 1);

        let reloaded = gateway.load().await.unwrap().value;
        let record = reloaded.get_by_str("player_1").unwrap();
        assert_eq!(record.name, "Bob");
        assert!(record.is_present);
        assert_eq!(reloaded.summary(), "Players in range: Bob");
    }

    #[tokio::test]
    async fn test_failed_mutation_writes_nothing() {
        let gateway = gateway();
        gateway
            .update(|registry| {
                registry.upsert(&id("player_1"), MemberPatch::new().with_name("Bob"))
            })
            .await
            .unwrap();
        let before = gateway.load().await.unwrap().version;

        let result = gateway
            .update(|registry| registry.append_note("nobody", "note"))
            .await;

        assert!(matches!(result, Err(Error::MemberNotFound { .. })));
        assert_eq!(gateway.load().await.unwrap().version, before);
    }

    #[tokio::test]
    async fn test_cross_writer_lost_update() {
        // The agent and the game backend read the same snapshot; the
        // backend writes last and the agent's note is silently discarded.
        // This is the hosted store's real behavior, preserved on purpose.
        let store: Arc<dyn BlockStore> = Arc::new(MemoryBlockStore::new());
        let gateway = GroupBlockGateway::new(Arc::clone(&store));
        gateway
            .update(|registry| {
                registry.upsert(
                    &id("player_1"),
                    MemberPatch::new().with_name("Bob").with_presence(true),
                )
            })
            .await
            .unwrap();

        let mut agent_view = gateway.load().await.unwrap();
        let mut backend_view = gateway.load().await.unwrap();

        agent_view.value.append_note("Bob", "wears a red hat").unwrap();
        gateway.store(&agent_view.value).await.unwrap();

        backend_view
            .value
            .upsert(&id("player_1"), MemberPatch::new().with_presence(false))
            .unwrap();
        gateway.store(&backend_view.value).await.unwrap();

        let final_state = gateway.load().await.unwrap().value;
        let record = final_state.get_by_str("player_1").unwrap();
        assert!(!record.is_present);
        // The note never made it
        assert_eq!(record.notes, "");
    }

    /// Store wrapper that lands a rival write just before each of the
    /// first `remaining` conditional writes
    struct RivalStore {
        inner: MemoryBlockStore,
        rival: serde_json::Value,
        remaining: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl BlockStore for RivalStore {
        async fn read(&self, label: &str) -> Result<Option<Versioned<serde_json::Value>>> {
            self.inner.read(label).await
        }

        async fn write(&self, label: &str, value: serde_json::Value) -> Result<Version> {
            self.inner.write(label, value).await
        }

        async fn write_if_version(
            &self,
            label: &str,
            value: serde_json::Value,
            expected: Version,
        ) -> Result<WriteOutcome> {
            use std::sync::atomic::Ordering;
            let remaining = self.remaining.load(Ordering::SeqCst);
            if remaining > 0 {
                self.remaining.store(remaining - 1, Ordering::SeqCst);
                self.inner.write(label, self.rival.clone()).await?;
            }
            self.inner.write_if_version(label, value, expected).await
        }

        async fn delete(&self, label: &str) -> Result<()> {
            self.inner.delete(label).await
        }
    }

    #[tokio::test]
    async fn test_update_with_retry_keeps_both_writers() {
        // Same interleaving as above, with the agent on the optimistic
        // path: the backend's departure update commits between the agent's
        // read and write, the first write conflicts, and the replay lands
        // the note on top of the backend's snapshot. Both updates survive.
        let mut seed = GroupRegistry::with_defaults();
        seed.upsert(
            &id("player_1"),
            MemberPatch::new().with_name("Bob").with_presence(true),
        )
        .unwrap();

        let mut departed = seed.clone();
        departed
            .upsert(&id("player_1"), MemberPatch::new().with_presence(false))
            .unwrap();

        let store = Arc::new(RivalStore {
            inner: MemoryBlockStore::new(),
            rival: serde_json::to_value(&departed).unwrap(),
            remaining: std::sync::atomic::AtomicUsize::new(1),
        });
        let gateway = GroupBlockGateway::new(store);
        gateway.store(&seed).await.unwrap();

        gateway
            .update_with_retry(|registry| registry.append_note("Bob", "wears a red hat"))
            .await
            .unwrap();

        let final_state = gateway.load().await.unwrap().value;
        let record = final_state.get_by_str("player_1").unwrap();
        assert!(!record.is_present);
        assert_eq!(record.notes, "wears a red hat");
    }

    #[tokio::test]
    async fn test_load_rehydrates_foreign_blob() {
        // A blob written by the game backend directly, without the
        // derived-state bookkeeping this crate maintains
        let store: Arc<dyn BlockStore> = Arc::new(MemoryBlockStore::new());
        store
            .write(
                GROUP_BLOCK_LABEL,
                serde_json::json!({
                    "members": {
                        "player_1": {"name": "Bob", "is_present": false,
                                     "appearance": "", "notes": ""}
                    },
                    "summary": "",
                    "updates": [],
                    "last_updated": "2026-08-01T12:00:00Z"
                }),
            )
            .await
            .unwrap();

        let gateway = GroupBlockGateway::new(store);
        let registry = gateway.load().await.unwrap().value;

        // Absent member without last_seen is repaired on load
        assert!(registry.get_by_str("player_1").unwrap().last_seen.is_some());
    }
}
