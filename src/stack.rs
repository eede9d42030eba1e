//! Record of the drops made during one playout.

use crate::{board::MAX_BOARD_SIZE, NodeId};

/// One drop made during a playout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackEntry {
    /// Node the move was made from, `None` for rollout moves that have no
    /// tree edge.
    pub parent: Option<NodeId>,
    pub column: usize,
}

/// LIFO sequence of drops, unwound in reverse play order.
#[derive(Clone, Debug)]
pub struct SimulationStack {
    entries: Vec<StackEntry>,
}

impl SimulationStack {
    /// Creates an empty stack sized for the largest board.
    pub fn new() -> Self {
        SimulationStack { entries: Vec::with_capacity(MAX_BOARD_SIZE * MAX_BOARD_SIZE) }
    }

    /// Records a drop into `column`, made from the tree node `parent` if any.
    #[inline]
    pub fn push(&mut self, parent: Option<NodeId>, column: usize) {
        self.entries.push(StackEntry { parent, column });
    }

    /// Removes the most recent drop.
    ///
    /// # Returns
    /// The entry, or `None` once the stack is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<StackEntry> {
        self.entries.pop()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for SimulationStack {
    fn default() -> Self {
        Self::new()
    }
}
