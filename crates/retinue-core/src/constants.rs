//! TigerStyle constants for retinue
//!
//! All limits are explicit, use big-endian naming (most significant first),
//! and include units in the name.

// =============================================================================
// Group Block Limits
// =============================================================================

/// Default serialized size budget for the group block in bytes
///
/// The external memory store enforces a hard ceiling per block; eviction
/// keeps the serialized registry under this budget.
pub const GROUP_BLOCK_SIZE_BYTES_MAX_DEFAULT: usize = 4800;

/// Minimum configurable group block budget in bytes
///
/// Below this even a single fully populated member record cannot be stored.
pub const GROUP_BLOCK_SIZE_BYTES_MIN: usize = 512;

/// Maximum number of entries retained in the group update log
pub const GROUP_UPDATES_COUNT_MAX: usize = 10;

// =============================================================================
// Entity Limits
// =============================================================================

/// Maximum length of an entity ID in bytes
pub const ENTITY_ID_LENGTH_BYTES_MAX: usize = 256;

/// Reserved prefix marking a provisional entity identity
///
/// Records keyed under this prefix are migration candidates once the
/// permanent identity is learned.
pub const ENTITY_ID_TEMP_PREFIX: &str = "unnamed_";

// =============================================================================
// Block Store Limits
// =============================================================================

/// Maximum length of a block label in bytes
pub const BLOCK_LABEL_LENGTH_BYTES_MAX: usize = 128;

/// Maximum number of optimistic write retries before reporting a conflict
pub const BLOCK_WRITE_RETRY_COUNT_MAX: usize = 3;

/// Label of the block holding the nearby-entities registry
pub const GROUP_BLOCK_LABEL: &str = "group_members";

// Compile-time assertions for constant validity
const _: () = {
    assert!(GROUP_BLOCK_SIZE_BYTES_MIN <= GROUP_BLOCK_SIZE_BYTES_MAX_DEFAULT);
    assert!(GROUP_UPDATES_COUNT_MAX >= 1);
    assert!(ENTITY_ID_LENGTH_BYTES_MAX >= 64);
    assert!(BLOCK_WRITE_RETRY_COUNT_MAX >= 1);
    assert!(!ENTITY_ID_TEMP_PREFIX.is_empty());
};
