//! Pending command table.
//!
//! Maps command identifiers to commands awaiting acknowledgment. Every entry
//! owns exactly one armed timeout; removal goes through a [`Scheduler`] so the
//! timeout is cancelled together with the entry.

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;

use crate::identifiers::{CommandId, TimerId};
use crate::protocol::Command;
use crate::scheduler::Scheduler;

// ============================================================================
// PendingCommand
// ============================================================================

/// A command awaiting acknowledgment.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommand {
    /// Identifier sent in the envelope.
    pub id: CommandId,
    /// Command as issued by the caller.
    pub command: Command,
    /// Retries performed before this attempt.
    pub retry_count: u8,
    /// Acknowledgment timeout.
    pub timeout: TimerId,
    /// Issue time in milliseconds.
    pub issued_at: u64,
}

// ============================================================================
// PendingTable
// ============================================================================

/// Commands awaiting acknowledgment, keyed by identifier.
#[derive(Debug, Default)]
pub struct PendingTable {
    entries: FxHashMap<CommandId, PendingCommand>,
}

impl PendingTable {
    /// Creates an empty table.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks a command. Replaces an entry with the same identifier, cancelling
    /// the replaced entry's timeout.
    pub fn insert<S: Scheduler + ?Sized>(&mut self, entry: PendingCommand, scheduler: &mut S) {
        let timeout = entry.timeout;
        if let Some(previous) = self.entries.insert(entry.id, entry)
            && previous.timeout != timeout
        {
            scheduler.cancel(previous.timeout);
        }
    }

    /// Removes an entry and cancels its timeout.
    pub fn remove<S: Scheduler + ?Sized>(
        &mut self,
        id: CommandId,
        scheduler: &mut S,
    ) -> Option<PendingCommand> {
        let entry = self.entries.remove(&id)?;
        scheduler.cancel(entry.timeout);
        Some(entry)
    }

    /// Removes every entry and cancels their timeouts.
    ///
    /// Returns the number of entries removed.
    pub fn clear<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) -> usize {
        let count = self.entries.len();
        for (_, entry) in self.entries.drain() {
            scheduler.cancel(entry.timeout);
        }
        count
    }

    /// Returns the entry for `id`.
    #[inline]
    #[must_use]
    pub fn get(&self, id: CommandId) -> Option<&PendingCommand> {
        self.entries.get(&id)
    }

    /// Returns `true` if `id` is pending.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: CommandId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Returns the number of pending commands.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is pending.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over pending commands in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &PendingCommand> {
        self.entries.values()
    }
}

// ============================================================================
// Tests
// ============================================================================
