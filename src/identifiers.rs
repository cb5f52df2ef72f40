//! Type-safe identifiers.
//!
//! Newtype wrappers keep command, session and timer handles from being
//! mixed up at compile time.
//!
//! | Type | Wire form | Source |
//! |------|-----------|--------|
//! | [`CommandId`] | JSON number | Issue time in milliseconds, strictly increasing |
//! | [`SessionId`] | none | Local generation counter |
//! | [`TimerId`] | none | Scheduler handle |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// CommandId
// ============================================================================

/// Identifier correlating a command envelope with its response.
///
/// Derived from the issue time in milliseconds. Serialized as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(u64);

impl CommandId {
    /// Wraps a raw identifier.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Derives the next identifier from the issue time.
    ///
    /// Uses `now_ms` unless that would not be greater than `previous`,
    /// in which case `previous + 1` is used.
    #[inline]
    #[must_use]
    pub fn next_after(previous: Option<Self>, now_ms: u64) -> Self {
        match previous {
            Some(prev) if now_ms <= prev.0 => Self(prev.0 + 1),
            _ => Self(now_ms),
        }
    }

    /// Returns the raw numeric value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// SessionId
// ============================================================================

/// Generation number of a transport session.
///
/// Every connect attempt gets a fresh id; events tagged with an older
/// generation belong to a replaced session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Wraps a raw generation number.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the following generation.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw numeric value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// TimerId
// ============================================================================

/// Handle to a timer armed through a [`Scheduler`](crate::scheduler::Scheduler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Wraps a raw handle.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
