//! Drag-and-drop reordering and the undo history behind the exercise view.

use crate::slots::nearest_slot;

/// Moves the element at `from` to position `to`, shifting the elements in
/// between (remove-then-insert, not a swap). Indices out of range leave the
/// array untouched and return false.
pub fn move_element(values: &mut Vec<i64>, from: usize, to: usize) -> bool {
    if from >= values.len() || to >= values.len() {
        return false;
    }
    let moved = values.remove(from);
    values.insert(to, moved);
    true
}

/// Result of dropping a dragged element onto the compartment box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The drop landed on the element's own slot; nothing changed and no
    /// history entry was recorded.
    Unmoved,
    /// The element moved to another slot. `sorted` reports whether the
    /// array is now fully sorted, which drives the learner feedback text.
    Moved { sorted: bool },
}

/// A stack of array snapshots, one per applied move.
///
/// Undo restores the arrangement from before the most recent move; reset
/// clears the working state back to the exercise's starting array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    snapshots: Vec<Vec<i64>>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the arrangement that held before a move was applied.
    pub fn record(&mut self, previous: Vec<i64>) {
        self.snapshots.push(previous);
    }

    /// Pops the most recent snapshot, or `None` if nothing is left to undo.
    pub fn undo(&mut self) -> Option<Vec<i64>> {
        self.snapshots.pop()
    }

    pub fn reset(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Applies one drag-and-drop gesture: snaps the release coordinate `x` to
/// the nearest compartment, moves the dragged element there, and records
/// the prior arrangement for undo.
pub fn drop_at(
    values: &mut Vec<i64>,
    history: &mut MoveHistory,
    from: usize,
    x: f32,
    total_width: f32,
    slot_width: f32,
) -> DropOutcome {
    let target = nearest_slot(x, values.len(), total_width, slot_width);
    if target == from {
        return DropOutcome::Unmoved;
    }
    let previous = values.clone();
    if !move_element(values, from, target) {
        return DropOutcome::Unmoved;
    }
    history.record(previous);
    DropOutcome::Moved {
        sorted: crate::sim::is_sorted(values),
    }
}
