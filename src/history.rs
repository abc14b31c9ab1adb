// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bounded undo/redo history of full-state snapshots.
//!
//! The history always holds at least one entry (the state it was created
//! with) and a pointer to the entry that is currently shown. Committing drops
//! everything after the pointer, so a new edit clears the redo tail.

/// Maximum number of snapshots kept.
pub const HISTORY_LIMIT: usize = 50;

/// Undo/redo log over snapshots of `T`.
#[derive(Debug, Clone)]
pub struct History<T: Clone> {
    entries: Vec<T>,
    pointer: usize,
    max_size: usize,
}

impl<T: Clone> History<T> {
    /// Start a history whose only entry is `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            entries: vec![initial],
            pointer: 0,
            max_size: HISTORY_LIMIT,
        }
    }

    /// Record a committed state.
    pub fn commit(&mut self, snapshot: T) {
        self.entries.truncate(self.pointer + 1);
        self.entries.push(snapshot);
        // Limit history size
        if self.entries.len() > self.max_size {
            let excess = self.entries.len() - self.max_size;
            self.entries.drain(..excess);
        }
        self.pointer = self.entries.len() - 1;
    }

    /// Step back one entry; `None` when already at the oldest.
    pub fn undo(&mut self) -> Option<&T> {
        if self.pointer == 0 {
            return None;
        }
        self.pointer -= 1;
        Some(&self.entries[self.pointer])
    }

    /// Step forward one entry; `None` when already at the newest.
    pub fn redo(&mut self) -> Option<&T> {
        if self.pointer + 1 >= self.entries.len() {
            return None;
        }
        self.pointer += 1;
        Some(&self.entries[self.pointer])
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.entries.len()
    }

    /// The snapshot the pointer is on.
    pub fn current(&self) -> &T {
        &self.entries[self.pointer]
    }

    /// Number of stored snapshots
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true; history always holds its seed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the current snapshot
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Forget everything and start over from `initial`.
    pub fn reset(&mut self, initial: T) {
        self.entries.clear();
        self.entries.push(initial);
        self.pointer = 0;
    }
}
