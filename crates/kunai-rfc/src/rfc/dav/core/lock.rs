//! Lock metadata types (RFC 4918 §6).
//!
//! Only lock discovery is modelled here. Lock acquisition and refresh
//! are the backend's concern.

use super::depth::Depth;

/// Lock scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockScope {
    /// Only one lock holder at a time.
    Exclusive,
    /// Multiple shared holders.
    Shared,
}

impl LockScope {
    /// Returns the `DAV:` element local name for this scope.
    #[must_use]
    pub const fn as_element_name(self) -> &'static str {
        match self {
            Self::Exclusive => "exclusive",
            Self::Shared => "shared",
        }
    }
}

/// Lock type. RFC 4918 defines only write locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockType {
    /// A write lock.
    Write,
}

impl LockType {
    /// Returns the `DAV:` element local name for this type.
    #[must_use]
    pub const fn as_element_name(self) -> &'static str {
        match self {
            Self::Write => "write",
        }
    }
}

/// One entry of a `supportedlock` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEntry {
    /// Lock scope.
    pub scope: LockScope,
    /// Lock type.
    pub lock_type: LockType,
}

impl LockEntry {
    /// Exclusive write lock entry.
    pub const EXCLUSIVE_WRITE: Self = Self {
        scope: LockScope::Exclusive,
        lock_type: LockType::Write,
    };

    /// Shared write lock entry.
    pub const SHARED_WRITE: Self = Self {
        scope: LockScope::Shared,
        lock_type: LockType::Write,
    };
}

/// A currently held lock, as reported by `lockdiscovery`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveLock {
    /// Lock scope.
    pub scope: LockScope,
    /// Lock type.
    pub lock_type: LockType,
    /// Depth the lock applies to.
    pub depth: Depth,
    /// Owner information supplied at lock time.
    pub owner: Option<String>,
    /// Timeout, e.g. `Second-600`.
    pub timeout: Option<String>,
    /// Lock token href.
    pub token: Option<String>,
    /// Root href of the lock.
    pub root: Option<String>,
}
