//! Linear undo/redo history of full sheet snapshots.

use gridsheet_engine::engine::Sheet;

/// Default number of snapshots to keep.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Ordered snapshots plus a cursor. The snapshot at `index` always matches
/// the live sheet as of the last recorded action, undo or redo.
#[derive(Clone, Debug)]
pub struct History {
    snapshots: Vec<Sheet>,
    index: usize,
    limit: usize,
}

impl History {
    /// Start a history whose only snapshot is `initial`.
    pub fn new(initial: Sheet, limit: usize) -> Self {
        History {
            snapshots: vec![initial],
            index: 0,
            limit: limit.max(2),
        }
    }

    /// Capture the pre-edit sheet at the cursor and drop any redo tail.
    pub(crate) fn checkpoint(&mut self, before: &Sheet) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots[self.index] = before.clone();
    }

    /// Append the post-edit sheet and move the cursor onto it.
    pub(crate) fn commit(&mut self, after: &Sheet) {
        self.snapshots.push(after.clone());
        if self.snapshots.len() > self.limit {
            self.snapshots.remove(0);
        }
        self.index = self.snapshots.len() - 1;
    }

    /// Step back; `None` at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&Sheet> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.snapshots.get(self.index)
    }

    /// Step forward; `None` at the newest snapshot.
    pub fn redo(&mut self) -> Option<&Sheet> {
        if self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        self.snapshots.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
