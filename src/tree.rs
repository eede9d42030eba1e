//! Arena-backed search tree with UCT selection.

use rand::{seq::IteratorRandom, Rng};

use crate::{board::MAX_BOARD_SIZE, BoardState, EngineError};

/// Largest arena capacity: every node id must fit in a `u32`.
pub const MAX_ARENA_NODES: usize = u32::MAX as usize;

/// Index of a node inside the arena. `NodeId::ROOT` is the current position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Statistics of one position.
///
/// `scores[col]` accumulates the signed reward of the move `col` for the
/// side to move at this node; `visits` counts the playouts through it.
#[derive(Clone, Debug)]
pub struct SearchNode {
    children: [Option<NodeId>; MAX_BOARD_SIZE],
    scores: [i64; MAX_BOARD_SIZE],
    visits: u32,
}

impl SearchNode {
    fn new() -> Self {
        SearchNode { children: [None; MAX_BOARD_SIZE], scores: [0; MAX_BOARD_SIZE], visits: 0 }
    }

    #[inline]
    pub fn child(&self, col: usize) -> Option<NodeId> {
        self.children[col]
    }

    #[inline]
    pub fn score(&self, col: usize) -> i64 {
        self.scores[col]
    }

    #[inline]
    pub fn visits(&self) -> u32 {
        self.visits
    }
}

/// Fixed-capacity node storage addressed by [`NodeId`].
#[derive(Clone, Debug)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
    capacity: usize,
}

impl SearchTree {
    /// Creates a tree holding only the root.
    ///
    /// # Parameters
    /// - `capacity`: Maximum number of nodes, root included, clamped to
    ///   `1..=MAX_ARENA_NODES`.
    pub fn new(capacity: usize) -> Self {
        SearchTree { nodes: vec![SearchNode::new()], capacity: capacity.clamp(1, MAX_ARENA_NODES) }
    }

    /// Discards every node and starts over from a fresh root.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(SearchNode::new());
    }

    /// Number of allocated nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root exists from construction on.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Maximum number of nodes the arena accepts.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.index()]
    }

    /// Iterates over every node with its id.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode)> {
        self.nodes.iter().enumerate().map(|(index, node)| (NodeId(index as u32), node))
    }

    #[inline]
    pub fn child(&self, id: NodeId, col: usize) -> Option<NodeId> {
        self.nodes[id.index()].children[col]
    }

    /// Allocates a new node and links it as the child of `id` for `col`.
    ///
    /// # Errors
    /// `ArenaExhausted` when the arena is at capacity; the tree is unchanged.
    pub fn expand(&mut self, id: NodeId, col: usize) -> Result<NodeId, EngineError> {
        if self.nodes.len() >= self.capacity {
            return Err(EngineError::ArenaExhausted { capacity: self.capacity });
        }

        let child = NodeId(self.nodes.len() as u32);
        self.nodes.push(SearchNode::new());
        self.nodes[id.index()].children[col] = Some(child);
        Ok(child)
    }

    /// Returns the existing child for `col`, expanding it if untried.
    pub fn child_or_expand(&mut self, id: NodeId, col: usize) -> Result<NodeId, EngineError> {
        match self.child(id, col) {
            Some(child) => Ok(child),
            None => self.expand(id, col),
        }
    }

    #[inline]
    pub(crate) fn add_score(&mut self, id: NodeId, col: usize, delta: i64) {
        self.nodes[id.index()].scores[col] += delta;
    }

    #[inline]
    pub(crate) fn record_visit(&mut self, id: NodeId) {
        self.nodes[id.index()].visits += 1;
    }

    /// UCT value of the move `col` from `id`:
    /// `score / n + c * sqrt(2 * ln(N) / n)` with `n` the child visits and
    /// `N` the node visits. `None` for an untried or unvisited child.
    pub fn uct(&self, id: NodeId, col: usize, exploration_coef: f64) -> Option<f64> {
        let node = self.node(id);
        let child_visits = self.node(node.child(col)?).visits;
        if child_visits == 0 {
            return None;
        }

        let n = child_visits as f64;
        let parent_visits = node.visits as f64;
        Some(node.score(col) as f64 / n + exploration_coef * (2. * parent_visits.ln() / n).sqrt())
    }

    /// Picks uniformly among the playable columns of `id` that have no child yet.
    pub fn untried_column<R: Rng + ?Sized>(
        &self,
        id: NodeId,
        board: &BoardState,
        rng: &mut R,
    ) -> Option<usize> {
        let node = self.node(id);
        board.feasible_columns().filter(|&col| node.child(col).is_none()).choose(rng)
    }

    /// Chooses the move to follow from `id`.
    ///
    /// Untried playable columns come first, at random. Once every playable
    /// column has a child, the highest UCT value wins, ties going to the
    /// lowest column. `None` when no column is playable.
    pub fn select_child<R: Rng + ?Sized>(
        &self,
        id: NodeId,
        board: &BoardState,
        exploration_coef: f64,
        rng: &mut R,
    ) -> Option<usize> {
        if let Some(col) = self.untried_column(id, board, rng) {
            return Some(col);
        }

        let mut best: Option<(usize, f64)> = None;
        for col in board.feasible_columns() {
            if let Some(value) = self.uct(id, col, exploration_coef) {
                if best.map_or(true, |(_, best_value)| value > best_value) {
                    best = Some((col, value));
                }
            }
        }
        best.map(|(col, _)| col)
    }
}
