//! Retinue Core
//!
//! Shared types, errors, and constants for the retinue nearby-entities
//! registry.
//!
//! # Overview
//!
//! Retinue keeps a size-bounded registry of the players and NPCs around a
//! game NPC agent inside an externally persisted memory block, and exposes
//! the validated action and navigation tools that read and mutate it.
//!
//! # TigerStyle
//!
//! This crate follows [TigerStyle](https://github.com/tigerbeetle/tigerbeetle/blob/main/docs/TIGER_STYLE.md)
//! engineering principles:
//! - Safety > Performance > Developer Experience
//! - Explicit limits with big-endian naming (e.g., `GROUP_BLOCK_SIZE_BYTES_MAX_DEFAULT`)
//! - Failures returned as values, not panics

pub mod constants;
pub mod error;
pub mod occ;
pub mod telemetry;

pub use constants::*;
pub use error::{Error, Result};
pub use occ::{Version, Versioned, WriteOutcome};
pub use telemetry::{init_telemetry, TelemetryConfig};
