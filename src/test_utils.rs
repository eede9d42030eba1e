//! Test utilities for building positions from text

use crate::{BoardState, Snapshot};

/// A host-side position parsed from text rows, top row first.
///
/// `.` is empty, `1` and `2` are pieces, `X` is the blocked cell.
pub struct TestPosition {
    pub rows: usize,
    pub cols: usize,
    pub board: Vec<i32>,
    pub top: Vec<i32>,
    pub blocked: Option<(usize, usize)>,
}

impl TestPosition {
    /// An empty board, optionally with a blocked cell.
    pub fn empty(rows: usize, cols: usize, blocked: Option<(usize, usize)>) -> Self {
        let mut top = vec![rows as i32; cols];

        if let Some((row, col)) = blocked {
            if row + 1 == rows {
                top[col] -= 1;
            }
        }

        TestPosition { rows, cols, board: vec![0; rows * cols], top, blocked }
    }

    /// Parses the rows and derives the fill pointers: a column is filled
    /// from the bottom up to its first empty cell, the blocked cell counting
    /// as occupied.
    ///
    /// # Panics
    /// On ragged rows or unknown characters.
    pub fn from_rows(text: &[&str]) -> Self {
        let rows = text.len();
        let cols = text.first().map_or(0, |row| row.len());
        let mut board = Vec::with_capacity(rows * cols);
        let mut blocked = None;

        for (row, line) in text.iter().enumerate() {
            assert_eq!(line.len(), cols, "row {row} has a different width");

            for (col, ch) in line.chars().enumerate() {
                board.push(match ch {
                    '.' => 0,
                    '1' => 1,
                    '2' => 2,
                    'X' => {
                        blocked = Some((row, col));
                        0
                    }
                    other => panic!("unexpected character {other:?}"),
                });
            }
        }

        let top = (0..cols)
            .map(|col| {
                let mut pointer = rows;
                while pointer > 0 {
                    let row = pointer - 1;
                    if board[row * cols + col] == 0 && blocked != Some((row, col)) {
                        break;
                    }
                    pointer -= 1;
                }
                pointer as i32
            })
            .collect();

        TestPosition { rows, cols, board, top, blocked }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            rows: self.rows,
            cols: self.cols,
            top: &self.top,
            board: &self.board,
            last_move: None,
            blocked: self.blocked,
        }
    }

    /// # Panics
    /// If the parsed position is not a valid snapshot.
    pub fn board_state(&self) -> BoardState {
        BoardState::from_snapshot(&self.snapshot()).expect("test position should be valid")
    }
}
