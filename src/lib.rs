//! A Monte Carlo Tree Search (MCTS) move engine for gravity-fill
//! connect-four variants played on boards of up to 12x12 cells with one
//! cell permanently blocked.
//!
//! The host imports the real position once per move, runs as many playouts
//! as its time budget allows, then asks for the best column. Each playout
//! short-circuits immediate wins and forced blocks, follows UCT through the
//! tree, rolls out from a single fresh expansion and backs up a reward that
//! fades toward the root.
//!
//! # Modules
//! - `board`: Simulated grid with reversible drops around the blocked cell.
//! - `judge`: Four-in-a-row and full-board detection.
//! - `threat`: One-ply lookahead for immediate winning columns.
//! - `tree`: Arena of search nodes and UCT selection.
//! - `stack`: Record of the drops made during one playout.
//! - `engine`: The search session running playouts.
//! - `selector`: Final move choice from the root statistics.
//! - `test_utils`: Helpers to build positions from text rows.
//!
//! # Examples
//! ```rust
//! use connect_mcts::{EngineConfig, EngineError, MctsEngine, Player, Snapshot};
//!
//! fn main() -> Result<(), EngineError> {
//!     let (rows, cols) = (6, 7);
//!     let board = vec![0; rows * cols];
//!     let top = vec![rows as i32; cols];
//!
//!     let mut engine = MctsEngine::from_config(&EngineConfig::DEFAULT.with_seed(7));
//!     engine.reset(&Snapshot {
//!         rows,
//!         cols,
//!         top: &top,
//!         board: &board,
//!         last_move: None,
//!         blocked: Some((2, 3)),
//!     })?;
//!
//!     // The host normally loops until its clock runs out
//!     for _ in 0..1000 {
//!         engine.run_playout(Player::Second)?;
//!     }
//!
//!     let column = engine.best_column();
//!     println!("play column {:?} after {} nodes", column, engine.node_count());
//!     assert!(column.is_some());
//!     Ok(())
//! }
//! ```

mod board;
mod config;
mod engine;
mod error;
mod judge;
mod selector;
mod stack;
mod threat;
mod tree;

#[doc(hidden)]
pub mod test_utils;

pub use board::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use judge::*;
pub use selector::*;
pub use stack::*;
pub use threat::*;
pub use tree::*;
