//! In-process append-only event journal.
//!
//! Every committed operation appends a [`LedgerEvent`] here with an assigned
//! sequence number. The journal is only written after the operation's state
//! changes are complete, under the same write guard, so it never records an
//! aborted commit.

use serde::{Deserialize, Serialize};

use foodledger_events::{Event, LedgerEvent};

/// A journaled event with its assigned sequence number (dense, starting at 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub sequence: u64,
    pub event: LedgerEvent,
}

#[derive(Debug, Default)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub(crate) fn append(&mut self, event: LedgerEvent) -> u64 {
        let sequence = self.entries.len() as u64 + 1;
        tracing::trace!(event = event.event_type(), sequence, "journal appended");
        self.entries.push(JournalEntry { sequence, event });
        sequence
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Entries whose event carries the given stable type name.
    pub fn entries_of_type<'a>(
        &'a self,
        event_type: &'a str,
    ) -> impl Iterator<Item = &'a JournalEntry> {
        self.entries
            .iter()
            .filter(move |e| e.event.event_type() == event_type)
    }
}
