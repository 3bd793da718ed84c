/// One recorded state of the raw request editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub raw_text: String,
    pub use_https: bool,
}

impl Snapshot {
    pub fn new(raw_text: impl Into<String>, use_https: bool) -> Self {
        Self {
            raw_text: raw_text.into(),
            use_https,
        }
    }
}

/// Linear undo/redo over editor snapshots.
///
/// Invariant: `index < snapshots.len()` whenever the stack is non-empty, and
/// no two adjacent snapshots are equal.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    snapshots: Vec<Snapshot>,
    index: usize,
    limit: usize,
}

impl HistoryStack {
    pub fn new(limit: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            index: 0,
            limit: limit.max(1),
        }
    }

    /// Drop all history and start over from `seed`.
    pub fn reset(&mut self, seed: Snapshot) {
        self.snapshots.clear();
        self.snapshots.push(seed);
        self.index = 0;
    }

    /// Record `snapshot` after the current one, discarding any redo branch.
    /// Returns `false` when it equals the current snapshot and nothing changed.
    pub fn push(&mut self, snapshot: Snapshot) -> bool {
        if self.current() == Some(&snapshot) {
            return false;
        }
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.index + 1);
        }
        self.snapshots.push(snapshot);
        if self.snapshots.len() > self.limit {
            let excess = self.snapshots.len() - self.limit;
            self.snapshots.drain(..excess);
        }
        self.index = self.snapshots.len() - 1;
        true
    }

    pub fn back(&mut self) -> Option<&Snapshot> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        self.snapshots.get(self.index)
    }

    pub fn forward(&mut self) -> Option<&Snapshot> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        self.snapshots.get(self.index)
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.index)
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(100)
    }
}
