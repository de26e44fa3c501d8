//! Ordered log of accepted command lines plus the dirty/replaying flags.

use serde::{Deserialize, Serialize};

/// Whether a record contributes to a saved script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// Has a replay effect; persisted.
    Replayable,
    /// Kept for audit (`about`); stripped before saving, never dirties.
    Informational,
}

/// A single accepted raw line, stored verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub line: String,
    pub kind: RecordKind,
    /// `dirty` as it was before this record was appended.
    #[serde(skip)]
    dirty_before: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HistoryLog {
    records: Vec<CommandRecord>,
    dirty: bool,
    replaying: bool,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }

    /// Lines that would be written by a save, in replay order.
    pub fn replayable_lines(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter(|r| r.kind == RecordKind::Replayable)
            .map(|r| r.line.as_str())
    }

    /// Appends an accepted line. Replayable records mark the log dirty.
    pub fn record(&mut self, line: impl Into<String>, kind: RecordKind) {
        let dirty_before = self.dirty;
        self.records.push(CommandRecord {
            line: line.into(),
            kind,
            dirty_before,
        });
        if kind == RecordKind::Replayable {
            self.dirty = true;
        }
    }

    /// Removes the most recent record and restores `dirty` to what it was
    /// before that record was appended.
    pub fn undo_last(&mut self) -> Option<CommandRecord> {
        let record = self.records.pop()?;
        self.dirty = record.dirty_before;
        Some(record)
    }

    /// Empties the log and marks it clean.
    pub fn clear(&mut self) {
        self.records.clear();
        self.dirty = false;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn begin_replay(&mut self) {
        self.clear();
        self.replaying = true;
    }

    /// Leaves replay mode. A finished replay matches its file; a cancelled
    /// one is dirty whenever it applied anything.
    pub(crate) fn end_replay(&mut self, completed: bool) {
        self.replaying = false;
        self.dirty = !completed && !self.records.is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_keep_insertion_order() {
        let mut log = HistoryLog::new();
        log.record("move 10", RecordKind::Replayable);
        log.record("about", RecordKind::Informational);
        log.record("left 90", RecordKind::Replayable);
        assert_eq!(log.len(), 3);
        assert_eq!(log.replayable_lines().collect::<Vec<_>>(), ["move 10", "left 90"]);
        assert!(log.is_dirty());
    }

    #[test]
    fn informational_records_do_not_dirty() {
        let mut log = HistoryLog::new();
        log.record("about", RecordKind::Informational);
        assert!(!log.is_dirty());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn undo_restores_previous_dirty_flag() {
        let mut log = HistoryLog::new();
        log.record("move 500", RecordKind::Replayable);
        assert!(log.is_dirty());
        let undone = log.undo_last().unwrap();
        assert_eq!(undone.line, "move 500");
        assert!(log.is_empty());
        assert!(!log.is_dirty());

        log.record("move 5", RecordKind::Replayable);
        log.mark_clean();
        log.record("move 900", RecordKind::Replayable);
        log.undo_last();
        assert!(!log.is_dirty());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn replay_lifecycle() {
        let mut log = HistoryLog::new();
        log.record("move 1", RecordKind::Replayable);
        log.begin_replay();
        assert!(log.is_replaying());
        assert!(log.is_empty());
        log.record("move 2", RecordKind::Replayable);
        log.end_replay(true);
        assert!(!log.is_replaying());
        assert!(!log.is_dirty());

        log.begin_replay();
        log.record("move 3", RecordKind::Replayable);
        log.end_replay(false);
        assert!(log.is_dirty());
    }
}
