//! Errors surfaced by the search session.

use thiserror::Error;

use crate::board::MAX_BOARD_SIZE;

/// Represents possible errors that can occur while importing a position or
/// running playouts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Board dimensions outside `1..=MAX_BOARD_SIZE`.
    #[error("board dimensions {rows}x{cols} are outside 1..={max}", max = MAX_BOARD_SIZE)]
    InvalidDimensions { rows: usize, cols: usize },

    /// An imported slice does not match the declared dimensions.
    #[error("{what} has {actual} entries, expected {expected}")]
    SnapshotLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A cell or player value other than 0, 1 or 2.
    #[error("invalid mark {0}")]
    InvalidMark(i32),

    /// A fill pointer that does not fit inside its column.
    #[error("fill pointer {value} of column {column} is out of range")]
    FillPointerOutOfRange { column: usize, value: i32 },

    /// A fill pointer whose landing cell is the blocked cell.
    #[error("fill pointer {value} of column {column} lands on the blocked cell")]
    FillPointerOnBlockedCell { column: usize, value: i32 },

    /// The blocked cell lies outside the board.
    #[error("blocked cell ({row}, {col}) is outside the board")]
    BlockedCellOutOfRange { row: usize, col: usize },

    /// A playout was requested before any position was imported.
    #[error("no position has been imported")]
    NotReady,

    /// The node arena reached its capacity; the current search is over.
    #[error("search tree reached its capacity of {capacity} nodes")]
    ArenaExhausted { capacity: usize },
}
