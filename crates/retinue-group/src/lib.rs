//! Bounded nearby-entities registry for game NPC agents
//!
//! TigerStyle: Typed records, explicit byte budget, derived state never
//! hand-edited.
//!
//! # Overview
//!
//! The group registry tracks the players and NPCs around an agent inside
//! a single externally persisted memory block. Two independent writers
//! mutate it: the agent itself (observation notes) and the game backend
//! (presence, appearance, location). The registry owns:
//!
//! - create-or-merge upserts with automatic presence bookkeeping
//! - a derived membership summary and a bounded update log
//! - byte-budget eviction of the stalest absent member
//! - migration of provisional identities onto permanent ones
//!
//! The registry itself holds no I/O; reading and writing the backing
//! block belongs to the storage gateway.

mod member;
mod reconcile;
mod registry;
mod types;

pub use member::{MemberPatch, MemberRecord, PatchEffect, PresenceChange};
pub use reconcile::IdentityReconciler;
pub use registry::{GroupRegistry, GroupRegistryConfig, UpsertOutcome};
pub use types::{now, EntityId, HealthStatus, Timestamp};
