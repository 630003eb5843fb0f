//! Write versioning for the shared registry block
//!
//! TigerStyle: Explicit version types instead of raw integers.
//!
//! Two independent writers mutate the registry block: the agent's tool
//! calls and the game backend's presence pushes. Neither holds a lock.
//! Every read therefore carries the version it observed, and a writer
//! chooses its policy per write: `write` keeps the hosted store's
//! last-writer-wins behavior, `write_if_version` turns an interleaved
//! rival commit into a visible [`WriteOutcome::Conflict`] instead of a
//! silent lost update.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of a stored block, bumped on every committed write
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Version(u64);

impl Version {
    /// Version of a block that has never been written
    pub const INITIAL: Self = Version(0);

    /// Create a version from a raw number
    pub const fn new(v: u64) -> Self {
        Version(v)
    }

    /// The raw version number
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The version the next committed write will carry
    pub fn next(&self) -> Self {
        Version(self.0.saturating_add(1))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A block value together with the version it was read at
///
/// Holding on to the version is what lets a caller later ask the store
/// "commit this only if nobody else has written since I looked".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: Version,
}

impl<T> Versioned<T> {
    /// Pair a value with the version it was read at
    pub fn new(value: T, version: Version) -> Self {
        Versioned { value, version }
    }

    /// A value standing in for a block that does not exist yet
    pub fn initial(value: T) -> Self {
        Versioned {
            value,
            version: Version::INITIAL,
        }
    }
}

/// What a conditional write did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The write committed at the given new version
    Committed(Version),
    /// A rival writer committed first; nothing was written
    Conflict { expected: Version, actual: Version },
}

impl WriteOutcome {
    /// Whether the write committed
    pub fn is_committed(&self) -> bool {
        matches!(self, WriteOutcome::Committed(_))
    }

    /// Whether a rival writer won the race
    pub fn is_conflict(&self) -> bool {
        matches!(self, WriteOutcome::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_advance_monotonically() {
        let first = Version::INITIAL.next();
        let second = first.next();

        assert_eq!(Version::INITIAL.value(), 0);
        assert!(first < second);
        assert_eq!(second.value(), 2);
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(7).to_string(), "v7");
    }

    #[test]
    fn test_versioned_remembers_read_point() {
        let snapshot = Versioned::new("registry blob", Version::new(5));
        assert_eq!(snapshot.version, Version::new(5));

        let fresh: Versioned<&str> = Versioned::initial("empty");
        assert_eq!(fresh.version, Version::INITIAL);
    }

    #[test]
    fn test_write_outcome_flags() {
        let committed = WriteOutcome::Committed(Version::new(3));
        assert!(committed.is_committed());
        assert!(!committed.is_conflict());

        let conflict = WriteOutcome::Conflict {
            expected: Version::new(1),
            actual: Version::new(2),
        };
        assert!(conflict.is_conflict());
        assert!(!conflict.is_committed());
    }
}
