//! One search session: imported position, node arena and playouts.
//!
//! A playout walks the tree from the root with one-ply tactics in front of
//! UCT, expands at most one untried move into a random rollout, and then
//! unwinds every drop in reverse order while crediting the tree edges.

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, trace, warn};
use rand::{rngs::StdRng, seq::IteratorRandom, Rng, SeedableRng};

use crate::{
    selector::{self, ColumnStats},
    threat::{classify_threats, Threat},
    BoardState, EngineConfig, EngineError, GameOutcome, NodeId, Player, SearchTree, SimulationStack,
    Snapshot,
};

/// Lifecycle of a session, controlling which calls are allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No position imported yet, or the last import failed.
    Idle,
    /// Playouts can run.
    Ready,
    /// The arena is full. Queries still answer from the existing statistics.
    Exhausted,
}

/// Summary of one completed playout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayoutReport {
    /// Winner of the simulated game, `None` for a tie.
    pub winner: Option<Player>,
    /// Tree nodes the playout went through, root first.
    pub path: Vec<NodeId>,
    /// Moves made along tree edges.
    pub tree_moves: usize,
    /// Moves made during the rollout.
    pub rollout_moves: usize,
    /// Whether the tree policy stopped on a fresh expansion and rolled out.
    pub expanded: bool,
}

/// How a simulated game ended.
#[derive(Clone, Copy, Debug)]
struct Ending {
    winner: Option<Player>,
    /// The first rollout move decided the game.
    immediate: bool,
    expanded: bool,
}

impl Ending {
    fn win(winner: Player) -> Self {
        Ending { winner: Some(winner), immediate: false, expanded: false }
    }

    fn tie() -> Self {
        Ending { winner: None, immediate: false, expanded: false }
    }
}

/// A Monte Carlo Tree Search session for one side of the game.
///
/// The session owns the simulated board, the node arena and the random
/// source; independent sessions share nothing.
///
/// # Type Parameters
/// - `R`: The random number generator driving untried-move and rollout choices.
pub struct MctsEngine<R = StdRng> {
    config: EngineConfig,
    board: BoardState,
    tree: SearchTree,
    stack: SimulationStack,
    path: Vec<NodeId>,
    rng: R,
    state: SessionState,
}

impl MctsEngine<StdRng> {
    /// Creates a session with the default configuration.
    #[inline]
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::DEFAULT)
    }

    /// Creates a session from a configuration, seeding a `StdRng` from
    /// `config.seed` or from the current time.
    pub fn from_config(config: &EngineConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_nanos() as u64)
                .unwrap_or_default()
        });

        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl Default for MctsEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> MctsEngine<R> {
    /// Creates a session driven by the given random number generator.
    pub fn with_rng(config: &EngineConfig, rng: R) -> Self {
        MctsEngine {
            config: *config,
            board: BoardState::default(),
            tree: SearchTree::new(config.max_nodes),
            stack: SimulationStack::new(),
            path: Vec::new(),
            rng,
            state: SessionState::Idle,
        }
    }

    /// The configuration the session was created with.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The simulated board. Between playouts it equals the imported position.
    #[inline]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// The node arena of the current search.
    #[inline]
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    /// Number of nodes in the arena, root included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.tree.len()
    }

    /// Imports the real position and discards the previous tree.
    ///
    /// # Errors
    /// Any validation error of [`BoardState::from_snapshot`]. The session is
    /// then left `Idle`.
    pub fn reset(&mut self, snapshot: &Snapshot<'_>) -> Result<(), EngineError> {
        self.state = SessionState::Idle;
        self.board = BoardState::from_snapshot(snapshot)?;
        self.tree.reset();
        self.stack.clear();
        self.state = SessionState::Ready;

        debug!(
            "position imported: {}x{}, blocked {:?}, last move {:?}",
            self.board.rows(),
            self.board.cols(),
            self.board.blocked(),
            self.board.last_move()
        );
        Ok(())
    }

    /// Runs one complete simulated game from the root with `mover` to play.
    ///
    /// The board is restored before returning, whatever the outcome.
    ///
    /// # Errors
    /// `NotReady` before a successful [`reset`](Self::reset);
    /// `ArenaExhausted` when the playout needed a node the arena could not
    /// hold, and for every later call until the next reset.
    pub fn run_playout(&mut self, mover: Player) -> Result<PlayoutReport, EngineError> {
        match self.state {
            SessionState::Idle => return Err(EngineError::NotReady),
            SessionState::Exhausted => {
                return Err(EngineError::ArenaExhausted { capacity: self.tree.capacity() });
            }
            SessionState::Ready => {}
        }

        self.stack.clear();
        self.path.clear();
        self.path.push(NodeId::ROOT);

        let result = self.tree_policy(mover);
        let ending = match result {
            Ok(ending) => ending,
            Err(EngineError::ArenaExhausted { capacity }) => {
                warn!("search tree full at {capacity} nodes, no further expansion");
                self.state = SessionState::Exhausted;
                Ending::tie()
            }
            Err(err) => return Err(err),
        };

        let total_moves = self.stack.len();
        let tree_moves = self.path.len() - 1;
        self.backpropagate(mover, &ending);

        trace!(
            "playout: winner {:?}, {} tree moves, {} rollout moves",
            ending.winner,
            tree_moves,
            total_moves - tree_moves
        );

        if self.state == SessionState::Exhausted {
            return Err(EngineError::ArenaExhausted { capacity: self.tree.capacity() });
        }

        Ok(PlayoutReport {
            winner: ending.winner,
            path: self.path.clone(),
            tree_moves,
            rollout_moves: total_moves - tree_moves,
            expanded: ending.expanded,
        })
    }

    /// Column with the best average reward at the root, `None` when nothing
    /// qualifies (no playout yet, or no playable column: a tie).
    pub fn best_column(&self) -> Option<usize> {
        selector::best_column(&self.tree, &self.board)
    }

    /// Per-column statistics of the root.
    pub fn root_statistics(&self) -> Vec<ColumnStats> {
        selector::root_statistics(&self.tree, &self.board)
    }

    /// Plays `col` along the tree edge from `node`, expanding it if untried.
    fn tree_move(
        &mut self,
        node: NodeId,
        col: usize,
        mover: Player,
    ) -> Result<(NodeId, GameOutcome), EngineError> {
        let child = self.tree.child_or_expand(node, col)?;
        let outcome = self.board.play(col, mover);

        self.stack.push(Some(node), col);
        self.path.push(child);
        Ok((child, outcome))
    }

    /// Descends from the root until the game is decided or a fresh node has
    /// been expanded and rolled out.
    fn tree_policy(&mut self, mut mover: Player) -> Result<Ending, EngineError> {
        let mut node = NodeId::ROOT;

        loop {
            if self.board.is_full() {
                return Ok(Ending::tie());
            }
            let opponent = mover.opponent();

            match classify_threats(&mut self.board, opponent) {
                Threat::Multi(..) => return Ok(Ending::win(opponent)),
                Threat::Single(col) => {
                    let (child, outcome) = self.tree_move(node, col, mover)?;
                    match outcome {
                        GameOutcome::Win => return Ok(Ending::win(mover)),
                        GameOutcome::Tie => return Ok(Ending::tie()),
                        GameOutcome::Continue => {}
                    }
                    node = child;
                    mover = opponent;
                    continue;
                }
                Threat::None => {}
            }

            if let Some(col) = classify_threats(&mut self.board, mover).winning_column() {
                self.tree_move(node, col, mover)?;
                return Ok(Ending::win(mover));
            }

            if let Some(col) = self.tree.untried_column(node, &self.board, &mut self.rng) {
                let (_, outcome) = self.tree_move(node, col, mover)?;
                if outcome == GameOutcome::Tie {
                    return Ok(Ending::tie());
                }
                return Ok(Ending { expanded: true, ..self.rollout(opponent) });
            }

            let coef = self.config.exploration_coef;
            let Some(col) = self.tree.select_child(node, &self.board, coef, &mut self.rng) else {
                return Ok(Ending::tie());
            };

            let (child, outcome) = self.tree_move(node, col, mover)?;
            match outcome {
                GameOutcome::Win => return Ok(Ending::win(mover)),
                GameOutcome::Tie => return Ok(Ending::tie()),
                GameOutcome::Continue => {}
            }
            node = child;
            mover = opponent;
        }
    }

    /// Plays the game out with one-ply tactics and random moves, pushing
    /// every drop without a tree edge.
    fn rollout(&mut self, mut mover: Player) -> Ending {
        let mut first = true;

        loop {
            let opponent = mover.opponent();

            let col = match classify_threats(&mut self.board, opponent) {
                Threat::Multi(..) => return Ending::win(opponent),
                Threat::Single(col) => Some(col),
                Threat::None => classify_threats(&mut self.board, mover)
                    .winning_column()
                    .or_else(|| self.board.feasible_columns().choose(&mut self.rng)),
            };
            let Some(col) = col else {
                return Ending::tie();
            };

            let outcome = self.board.play(col, mover);
            self.stack.push(None, col);

            match outcome {
                GameOutcome::Win => {
                    return Ending { winner: Some(mover), immediate: first, expanded: false };
                }
                GameOutcome::Tie => return Ending::tie(),
                GameOutcome::Continue => {}
            }
            mover = opponent;
            first = false;
        }
    }

    /// Unwinds the stack in reverse play order, restoring the board and
    /// crediting every tree edge.
    ///
    /// The mover of the edge wins `1 + bonus` or loses `max(1, bonus - 1)`;
    /// a tie leaves the score alone. The bonus starts at `reward` when the
    /// first rollout move won, at 1 otherwise, and shrinks by one per level
    /// down to 0.
    fn backpropagate(&mut self, first_mover: Player, ending: &Ending) {
        let mut bonus = if ending.immediate { self.config.reward } else { 1 };

        while let Some(entry) = self.stack.pop() {
            self.board.undo(entry.column);

            if let Some(parent) = entry.parent {
                // moves alternate, so the entry at an even index was made by `first_mover`
                let edge_mover =
                    if self.stack.len() % 2 == 0 { first_mover } else { first_mover.opponent() };

                let delta = match ending.winner {
                    Some(winner) if winner == edge_mover => 1 + bonus,
                    Some(_) => -(bonus - 1).max(1),
                    None => 0,
                };
                self.tree.add_score(parent, entry.column, delta);

                if let Some(child) = self.tree.child(parent, entry.column) {
                    self.tree.record_visit(child);
                }
            }

            bonus = (bonus - 1).max(0);
        }

        self.tree.record_visit(NodeId::ROOT);
    }
}
