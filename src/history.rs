use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::model::{Card, Company, Folder, Store};

/// Oldest snapshots are evicted beyond this.
pub const HISTORY_LIMIT: usize = 50;

/// A deep copy of the undoable portion of the store. Trash contents are
/// deliberately not part of history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub companies: Vec<Company>,
    pub folders: Vec<Folder>,
    pub cards: Vec<Card>,
    /// Epoch millis at capture time.
    pub timestamp: i64,
}

impl Snapshot {
    pub fn capture(store: &Store) -> Self {
        Snapshot {
            companies: store.companies.clone(),
            folders: store.folders.clone(),
            cards: store.cards.clone(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Linear undo stack of whole-state snapshots.
///
/// Every mutating operation records a snapshot after applying its change;
/// undo/redo move a cursor through the entries and copy state back out.
/// A new record truncates any redone-then-abandoned future. The state
/// before the very first mutation is never captured, so the first
/// mutation cannot be undone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<Snapshot>,
    /// Index of the entry matching the current store state, if any.
    cursor: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        History::default()
    }

    /// Rebuild from persisted parts. An out-of-range index is treated as
    /// pointing at the newest entry.
    pub fn from_parts(entries: Vec<Snapshot>, index: i64) -> Self {
        let cursor = if entries.is_empty() || index < 0 {
            None
        } else {
            Some((index as usize).min(entries.len() - 1))
        };
        History { entries, cursor }
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    /// Persisted form of the cursor: -1 when nothing is recorded.
    pub fn index(&self) -> i64 {
        self.cursor.map_or(-1, |c| c as i64)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.entries.len())
    }

    /// Record the store as the new current snapshot, discarding any
    /// entries beyond the cursor and evicting the oldest past the cap.
    pub fn record(&mut self, store: &Store) {
        match self.cursor {
            Some(c) => self.entries.truncate(c + 1),
            None => self.entries.clear(),
        }
        self.entries.push(Snapshot::capture(store));
        if self.entries.len() > HISTORY_LIMIT {
            self.entries.remove(0);
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back one snapshot, restoring into the store.
    /// Returns false (and leaves everything untouched) at the bottom.
    pub fn undo(&mut self, store: &mut Store) -> bool {
        let Some(c) = self.cursor else { return false };
        if c == 0 {
            return false;
        }
        self.cursor = Some(c - 1);
        self.restore(c - 1, store);
        true
    }

    /// Step forward one snapshot. Returns false at the top.
    pub fn redo(&mut self, store: &mut Store) -> bool {
        let Some(c) = self.cursor else { return false };
        if c + 1 >= self.entries.len() {
            return false;
        }
        self.cursor = Some(c + 1);
        self.restore(c + 1, store);
        true
    }

    fn restore(&self, index: usize, store: &mut Store) {
        if let Some(snap) = self.entries.get(index) {
            store.companies = snap.companies.clone();
            store.folders = snap.folders.clone();
            store.cards = snap.cards.clone();
        }
    }
}
