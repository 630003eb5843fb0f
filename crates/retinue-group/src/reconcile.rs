//! Identity reconciliation for provisional entities
//!
//! An entity can show up before the backend knows who it is; such records
//! are keyed under the reserved provisional prefix. Once the permanent
//! identity is learned, the provisional record migrates so accumulated
//! notes are not orphaned.

use crate::registry::GroupRegistry;
use crate::types::EntityId;
use retinue_core::{Result, ENTITY_ID_TEMP_PREFIX};
use tracing::debug;

/// Matches newly identified entities against provisional records
#[derive(Debug, Clone)]
pub struct IdentityReconciler {
    temp_prefix: String,
}

impl IdentityReconciler {
    /// Create with the standard provisional prefix
    pub fn new() -> Self {
        Self {
            temp_prefix: ENTITY_ID_TEMP_PREFIX.to_string(),
        }
    }

    /// Create with a custom provisional prefix
    pub fn with_prefix(temp_prefix: impl Into<String>) -> Self {
        let temp_prefix = temp_prefix.into();
        assert!(!temp_prefix.is_empty(), "provisional prefix cannot be empty");
        Self { temp_prefix }
    }

    /// Reconcile an observed name with a proposed permanent ID
    ///
    /// Scans in insertion order for a provisional record whose display
    /// name matches `observed_name` exactly. At most one record migrates;
    /// without a match the registry is untouched and `proposed_id` is
    /// simply the key the caller should upsert under.
    pub fn resolve(
        &self,
        registry: &mut GroupRegistry,
        observed_name: &str,
        proposed_id: &EntityId,
    ) -> Result<EntityId> {
        let found = registry
            .ids()
            .find(|id| {
                id.as_str().starts_with(&self.temp_prefix)
                    && registry
                        .get(id)
                        .map(|record| record.name == observed_name)
                        .unwrap_or(false)
            })
            .cloned();

        match found {
            Some(temp_id) if &temp_id != proposed_id => {
                debug!(temp_id = %temp_id, proposed_id = %proposed_id, name = observed_name,
                    "reconciling provisional identity");
                registry.migrate_member(&temp_id, proposed_id)?;
                Ok(proposed_id.clone())
            }
            _ => Ok(proposed_id.clone()),
        }
    }
}

impl Default for IdentityReconciler {
    fn default() -> Self {
        Self::new()
    }
}
