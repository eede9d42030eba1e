//! Simulated board with gravity drops and one permanently blocked cell.
//!
//! Rows are indexed from the top (`0`) to the bottom (`rows - 1`). The fill
//! pointer `top[col]` counts the cells still reachable in a column, so the
//! next piece lands on row `top[col] - 1` and the column is exhausted at `0`.

use crate::{judge, EngineError};

/// Largest supported number of rows and of columns.
pub const MAX_BOARD_SIZE: usize = 12;

/// Mark of an empty cell.
pub const EMPTY: u8 = 0;

/// One of the two sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    First = 1,
    Second = 2,
}

impl Player {
    /// The cell mark written by this player.
    #[inline]
    pub const fn mark(self) -> u8 {
        self as u8
    }

    /// The other side.
    ///
    /// # Returns
    /// `Second` for `First` and `First` for `Second`.
    #[inline]
    pub const fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

impl TryFrom<i32> for Player {
    type Error = EngineError;

    fn try_from(mark: i32) -> Result<Self, Self::Error> {
        match mark {
            1 => Ok(Player::First),
            2 => Ok(Player::Second),
            other => Err(EngineError::InvalidMark(other)),
        }
    }
}

/// State of the game right after a drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Continue,
    Win,
    Tie,
}

/// A position as handed over by the host program.
///
/// `board` is row-major with `rows * cols` marks, `top` has one fill pointer
/// per column and must already account for the blocked cell.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub rows: usize,
    pub cols: usize,
    pub top: &'a [i32],
    pub board: &'a [i32],
    pub last_move: Option<(usize, usize)>,
    pub blocked: Option<(usize, usize)>,
}

/// Mutable board used by the playouts.
///
/// Every [`BoardState::drop`] must be matched by one [`BoardState::undo`] on
/// the same column, in reverse order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardState {
    rows: usize,
    cols: usize,
    cells: [[u8; MAX_BOARD_SIZE]; MAX_BOARD_SIZE],
    top: [usize; MAX_BOARD_SIZE],
    /// Fill pointers as imported; `undo` never goes below them.
    base_top: [usize; MAX_BOARD_SIZE],
    blocked: Option<(usize, usize)>,
    last_move: Option<(usize, usize)>,
}

impl BoardState {
    /// Validates a host snapshot and builds the board from it.
    ///
    /// # Errors
    /// Any dimension, length, mark, fill pointer or blocked cell that does not
    /// fit the declared board, and any fill pointer whose next landing cell is
    /// the blocked one.
    pub fn from_snapshot(snapshot: &Snapshot<'_>) -> Result<Self, EngineError> {
        let Snapshot { rows, cols, top, board, last_move, blocked } = *snapshot;

        if !(1..=MAX_BOARD_SIZE).contains(&rows) || !(1..=MAX_BOARD_SIZE).contains(&cols) {
            return Err(EngineError::InvalidDimensions { rows, cols });
        }
        if board.len() != rows * cols {
            return Err(EngineError::SnapshotLength {
                what: "board",
                expected: rows * cols,
                actual: board.len(),
            });
        }
        if top.len() != cols {
            return Err(EngineError::SnapshotLength {
                what: "fill pointers",
                expected: cols,
                actual: top.len(),
            });
        }
        if let Some((row, col)) = blocked {
            if row >= rows || col >= cols {
                return Err(EngineError::BlockedCellOutOfRange { row, col });
            }
        }

        let mut state = BoardState { rows, cols, blocked, last_move, ..BoardState::default() };

        for (index, &mark) in board.iter().enumerate() {
            if !(0..=2).contains(&mark) {
                return Err(EngineError::InvalidMark(mark));
            }
            state.cells[index / cols][index % cols] = mark as u8;
        }

        for (column, &value) in top.iter().enumerate() {
            let pointer = usize::try_from(value)
                .ok()
                .filter(|&pointer| pointer <= rows)
                .ok_or(EngineError::FillPointerOutOfRange { column, value })?;
            if pointer > 0 && blocked == Some((pointer - 1, column)) {
                return Err(EngineError::FillPointerOnBlockedCell { column, value });
            }
            state.top[column] = pointer;
            state.base_top[column] = pointer;
        }

        Ok(state)
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Mark stored at `(row, col)`.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    /// Fill pointer of a column.
    #[inline]
    pub fn top(&self, col: usize) -> usize {
        self.top[col]
    }

    /// The permanently blocked cell, if any.
    #[inline]
    pub fn blocked(&self) -> Option<(usize, usize)> {
        self.blocked
    }

    /// Last move of the real game, as imported.
    #[inline]
    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    /// A column is playable while its fill pointer has not reached `0`.
    #[inline]
    pub fn column_playable(&self, col: usize) -> bool {
        col < self.cols && self.top[col] > 0
    }

    /// Playable columns in ascending order.
    pub fn feasible_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.cols).filter(move |&col| self.top[col] > 0)
    }

    /// `true` once no column can take another piece.
    #[inline]
    pub fn is_full(&self) -> bool {
        judge::is_board_full(&self.top[..self.cols])
    }

    /// Drops a piece of `player` into `col` and returns the row it landed on.
    ///
    /// If the cell above the landing row is the blocked one, the fill pointer
    /// moves past it.
    ///
    /// # Panics
    /// When `col` is not playable.
    pub fn drop(&mut self, col: usize, player: Player) -> usize {
        assert!(self.column_playable(col), "column {col} is not playable");

        self.top[col] -= 1;
        let row = self.top[col];
        self.cells[row][col] = player.mark();

        if row > 0 && self.blocked == Some((row - 1, col)) {
            self.top[col] -= 1;
        }
        row
    }

    /// Removes the last piece dropped into `col`.
    ///
    /// # Panics
    /// When the column holds no simulated piece, i.e. undoing would go below
    /// the fill level it was imported with.
    pub fn undo(&mut self, col: usize) {
        if self.blocked == Some((self.top[col], col)) {
            self.top[col] += 1;
        }

        let row = self.top[col];
        assert!(row < self.base_top[col], "column {col} has nothing to undo");

        self.cells[row][col] = EMPTY;
        self.top[col] += 1;
    }

    /// Drops a piece and judges the resulting position for `player`.
    pub fn play(&mut self, col: usize, player: Player) -> GameOutcome {
        let row = self.drop(col, player);

        if judge::has_four_in_row(self, row, col, player.mark()) {
            GameOutcome::Win
        } else if self.is_full() {
            GameOutcome::Tie
        } else {
            GameOutcome::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::test_utils::TestPosition;

    fn empty_board(rows: usize, cols: usize, blocked: Option<(usize, usize)>) -> BoardState {
        TestPosition::empty(rows, cols, blocked).board_state()
    }

    #[test]
    fn test_player_marks() {
        assert_eq!(Player::First.mark(), 1);
        assert_eq!(Player::Second.mark(), 2);
        assert_eq!(Player::First.opponent(), Player::Second);
        assert_eq!(Player::try_from(2), Ok(Player::Second));
        assert_matches!(Player::try_from(0), Err(EngineError::InvalidMark(0)));
    }

    #[test]
    fn test_drop_lands_at_bottom() {
        let mut board = empty_board(6, 7, None);

        assert_eq!(board.drop(3, Player::First), 5);
        assert_eq!(board.drop(3, Player::Second), 4);
        assert_eq!(board.cell(5, 3), 1);
        assert_eq!(board.cell(4, 3), 2);
        assert_eq!(board.top(3), 4);
    }

    #[test]
    fn test_drop_skips_blocked_cell() {
        let mut board = empty_board(6, 7, Some((3, 1)));

        board.drop(1, Player::First);
        assert_eq!(board.drop(1, Player::Second), 4);
        assert_eq!(board.top(1), 3);
        assert_eq!(board.drop(1, Player::First), 2);
        assert_eq!(board.cell(3, 1), EMPTY);
    }

    #[test]
    fn test_column_exhausted_by_blocked_top_cell() {
        let mut board = empty_board(3, 4, Some((0, 2)));

        board.drop(2, Player::First);
        board.drop(2, Player::Second);
        assert!(!board.column_playable(2));

        board.undo(2);
        assert!(board.column_playable(2));
        assert_eq!(board.top(2), 2);
    }

    #[test]
    fn test_undo_restores_state_in_reverse_order() {
        let position = TestPosition::from_rows(&[
            ".......",
            ".......",
            "...X...",
            ".......",
            "...2...",
            "..112..",
        ]);
        let original = position.board_state();
        let mut board = original.clone();

        let moves = [3, 2, 3, 4, 3, 0, 6, 6];
        let mut player = Player::First;
        for &col in &moves {
            board.drop(col, player);
            player = player.opponent();
        }
        assert_ne!(board, original);
        assert!(!board.column_playable(3));

        for &col in moves.iter().rev() {
            board.undo(col);
        }
        assert_eq!(board, original);
    }

    #[test]
    fn test_full_board_detection() {
        let mut board = empty_board(2, 2, None);
        assert!(!board.is_full());

        assert_eq!(board.play(0, Player::First), GameOutcome::Continue);
        assert_eq!(board.play(0, Player::Second), GameOutcome::Continue);
        assert_eq!(board.play(1, Player::First), GameOutcome::Continue);
        assert_eq!(board.play(1, Player::Second), GameOutcome::Tie);
        assert!(board.is_full());
        assert_eq!(board.feasible_columns().count(), 0);
    }

    #[test]
    fn test_play_reports_win() {
        let mut board = TestPosition::from_rows(&[
            ".......",
            ".......",
            ".......",
            ".......",
            "....1..",
            "111.2..",
        ])
        .board_state();

        assert_eq!(board.play(3, Player::First), GameOutcome::Win);
    }

    #[test]
    fn test_snapshot_validation() {
        let board = vec![0; 6];
        let top = vec![2; 3];
        let snapshot =
            Snapshot { rows: 2, cols: 3, top: &top, board: &board, last_move: None, blocked: None };
        assert!(BoardState::from_snapshot(&snapshot).is_ok());

        let too_big = Snapshot { rows: 13, ..snapshot };
        assert_matches!(
            BoardState::from_snapshot(&too_big),
            Err(EngineError::InvalidDimensions { rows: 13, cols: 3 })
        );

        let empty = Snapshot { cols: 0, ..snapshot };
        assert_matches!(
            BoardState::from_snapshot(&empty),
            Err(EngineError::InvalidDimensions { .. })
        );

        let short_board = Snapshot { board: &board[..5], ..snapshot };
        assert_matches!(
            BoardState::from_snapshot(&short_board),
            Err(EngineError::SnapshotLength { what: "board", expected: 6, actual: 5 })
        );

        let short_top = Snapshot { top: &top[..2], ..snapshot };
        assert_matches!(
            BoardState::from_snapshot(&short_top),
            Err(EngineError::SnapshotLength { what: "fill pointers", .. })
        );

        let bad_cells = vec![0, 0, 3, 0, 0, 0];
        let bad_mark = Snapshot { board: &bad_cells, ..snapshot };
        assert_matches!(BoardState::from_snapshot(&bad_mark), Err(EngineError::InvalidMark(3)));

        let bad_pointers = vec![2, -1, 2];
        let bad_top = Snapshot { top: &bad_pointers, ..snapshot };
        assert_matches!(
            BoardState::from_snapshot(&bad_top),
            Err(EngineError::FillPointerOutOfRange { column: 1, value: -1 })
        );

        let outside = Snapshot { blocked: Some((2, 0)), ..snapshot };
        assert_matches!(
            BoardState::from_snapshot(&outside),
            Err(EngineError::BlockedCellOutOfRange { row: 2, col: 0 })
        );
    }

    #[test]
    fn test_fill_pointer_landing_on_blocked_cell() {
        let board = vec![0; 12];
        let top = vec![3, 2, 3];
        let snapshot = Snapshot {
            rows: 4,
            cols: 3,
            top: &top,
            board: &board,
            last_move: None,
            blocked: Some((2, 0)),
        };

        assert_matches!(
            BoardState::from_snapshot(&snapshot),
            Err(EngineError::FillPointerOnBlockedCell { column: 0, value: 3 })
        );

        // a pointer already past the blocked cell is accepted
        let top = vec![2, 2, 3];
        let skipped = Snapshot { top: &top, ..snapshot };
        assert!(BoardState::from_snapshot(&skipped).is_ok());
    }

    #[test]
    #[should_panic(expected = "column 3 has nothing to undo")]
    fn test_undo_never_erases_imported_pieces() {
        let mut board = TestPosition::from_rows(&[
            ".......",
            ".......",
            ".......",
            ".......",
            "...2...",
            "..112..",
        ])
        .board_state();

        board.drop(3, Player::First);
        board.undo(3);
        assert_eq!(board.cell(4, 3), 2);

        board.undo(3);
    }
}
