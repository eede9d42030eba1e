//! Win and tie detection.

use crate::BoardState;

/// Length of a winning run.
pub const WIN_LENGTH: usize = 4;

/// Row, column, and both diagonals.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Counts consecutive cells equal to `mark`, starting next to `(row, col)`
/// and walking along `(d_row, d_col)`.
fn run_length(
    board: &BoardState,
    row: usize,
    col: usize,
    d_row: isize,
    d_col: isize,
    mark: u8,
) -> usize {
    let mut length = 0;
    let mut r = row as isize + d_row;
    let mut c = col as isize + d_col;

    while r >= 0
        && c >= 0
        && (r as usize) < board.rows()
        && (c as usize) < board.cols()
        && board.cell(r as usize, c as usize) == mark
    {
        length += 1;
        r += d_row;
        c += d_col;
    }
    length
}

/// Returns `true` if the cell `(row, col)` holds `mark` and belongs to a run
/// of at least [`WIN_LENGTH`] equal marks in one of the four line directions.
pub fn has_four_in_row(board: &BoardState, row: usize, col: usize, mark: u8) -> bool {
    if board.cell(row, col) != mark {
        return false;
    }

    DIRECTIONS.iter().any(|&(d_row, d_col)| {
        let forward = run_length(board, row, col, d_row, d_col, mark);
        let backward = run_length(board, row, col, -d_row, -d_col, mark);
        1 + forward + backward >= WIN_LENGTH
    })
}

/// Returns `true` when no column has a remaining cell.
#[inline]
pub fn is_board_full(top: &[usize]) -> bool {
    top.iter().all(|&pointer| pointer == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestPosition;

    #[test]
    fn test_horizontal_run_every_cell() {
        let board = TestPosition::from_rows(&[
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
            ".1111..",
        ])
        .board_state();

        for col in 1..=4 {
            assert!(has_four_in_row(&board, 5, col, 1));
        }
        assert!(!has_four_in_row(&board, 5, 1, 2));
        assert!(!has_four_in_row(&board, 5, 0, 1));
    }

    #[test]
    fn test_run_of_three_is_not_a_win() {
        let board = TestPosition::from_rows(&[
            ".......",
            ".......",
            "2......",
            "2......",
            "2......",
            "111.1..",
        ])
        .board_state();

        for col in [0, 1, 2, 4] {
            assert!(!has_four_in_row(&board, 5, col, 1));
        }
        for row in 2..=4 {
            assert!(!has_four_in_row(&board, row, 0, 2));
        }
    }

    #[test]
    fn test_vertical_run() {
        let board = TestPosition::from_rows(&[
            "......",
            "......",
            "..2...",
            "..2...",
            "..2...",
            "..2...",
        ])
        .board_state();

        assert!(has_four_in_row(&board, 2, 2, 2));
        assert!(has_four_in_row(&board, 5, 2, 2));
    }

    #[test]
    fn test_diagonal_runs() {
        let board = TestPosition::from_rows(&[
            ".......",
            ".......",
            "...1..2",
            "..12.21",
            ".1222.1",
            "121211.",
        ])
        .board_state();

        // rising to the right: (5,0) (4,1) (3,2) (2,3)
        assert!(has_four_in_row(&board, 2, 3, 1));
        assert!(has_four_in_row(&board, 4, 1, 1));
        // falling to the left: (2,6) (3,5) (4,4) (5,3)
        assert!(has_four_in_row(&board, 3, 5, 2));
        assert!(has_four_in_row(&board, 5, 3, 2));
    }

    #[test]
    fn test_board_full() {
        assert!(is_board_full(&[0, 0, 0]));
        assert!(!is_board_full(&[0, 1, 0]));
        assert!(is_board_full(&[]));
    }
}
