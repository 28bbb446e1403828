//! Append-only history of engine messages.
//!
//! The journal is the player-facing log. Entries are stamped with the day they
//! were written and a per-day sequence number, so two runs with the same rolls
//! produce identical journals. Wall-clock time is a presentation concern.

use serde::{Deserialize, Serialize};

/// Stable, deterministic identifier for a single journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId {
    /// One-based day counter when the entry was written.
    pub day: u32,
    /// Per-day sequence number (0-based).
    pub seq: u16,
}

impl EntryId {
    #[must_use]
    pub const fn new(day: u32, seq: u16) -> Self {
        Self { day, seq }
    }
}

/// Severity tier used to colour an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogTone {
    #[default]
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: EntryId,
    pub tone: LogTone,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    entries: Vec<LogEntry>,
}

impl Journal {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a message written on `day`. Empty messages are dropped.
    pub fn record(&mut self, day: u32, tone: LogTone, message: impl Into<String>) {
        let message = message.into();
        if message.is_empty() {
            return;
        }
        let seq = self
            .entries
            .last()
            .filter(|entry| entry.id.day == day)
            .map_or(0, |entry| entry.id.seq.saturating_add(1));
        self.entries.push(LogEntry {
            id: EntryId::new(day, seq),
            tone,
            message,
        });
    }

    /// Drop every entry; used when a run restarts.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Whether any entry contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.message.contains(needle))
    }

    /// Entries written on a single day, in order.
    pub fn for_day(&self, day: u32) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |entry| entry.id.day == day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_restarts_each_day() {
        let mut journal = Journal::new();
        journal.record(1, LogTone::Info, "Game started!");
        journal.record(1, LogTone::Info, "Today's event: Cold snap");
        journal.record(2, LogTone::Warning, "Hunger drained by 14.");
        journal.record(2, LogTone::Info, "");

        let ids: Vec<EntryId> = journal.entries().iter().map(|entry| entry.id).collect();
        assert_eq!(
            ids,
            vec![EntryId::new(1, 0), EntryId::new(1, 1), EntryId::new(2, 0)]
        );
        assert_eq!(journal.for_day(1).count(), 2);
        assert!(journal.contains("Hunger drained"));
    }

    #[test]
    fn entries_roundtrip_through_json() {
        let mut journal = Journal::new();
        journal.record(3, LogTone::Critical, "Game over");
        let json = serde_json::to_string(&journal).expect("serialize");
        let restored: Journal = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, journal);
        assert!(json.contains("\"critical\""));
    }
}
