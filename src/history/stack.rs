use std::collections::VecDeque;

use crate::snapshot::Snapshot;

/// Owns the undo and redo stacks.
///
/// Both stacks are LIFO at the back and unbounded by default. Long editing
/// sessions can cap memory by passing a `max_depth`; the oldest undo entry
/// is evicted once the cap is exceeded.
#[derive(Debug, Default)]
pub struct StackManager {
    undo: VecDeque<Snapshot>,
    redo: VecDeque<Snapshot>,
    max_depth: Option<usize>,
}

impl StackManager {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            max_depth,
        }
    }

    /// Push a snapshot onto the undo stack, evicting the oldest entry if a
    /// depth cap is configured.
    pub fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo.push_back(snapshot);
        if let Some(max) = self.max_depth {
            while self.undo.len() > max {
                self.undo.pop_front();
            }
        }
    }

    pub fn push_redo(&mut self, snapshot: Snapshot) {
        self.redo.push_back(snapshot);
    }

    pub fn pop_undo(&mut self) -> Option<Snapshot> {
        self.undo.pop_back()
    }

    pub fn pop_redo(&mut self) -> Option<Snapshot> {
        self.redo.pop_back()
    }

    /// Empty both stacks
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }
}
