//! One-ply lookahead for immediate wins.

use crate::{judge, BoardState, Player};

/// Immediate winning columns available to one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Threat {
    /// No column wins right away.
    None,
    /// Exactly one column wins.
    Single(usize),
    /// At least two columns win; the scan stops at the second one.
    ///
    /// Seen from the other side this position is lost: a single block
    /// cannot cover both columns.
    Multi(usize, usize),
}

impl Threat {
    /// A column that wins immediately, if any.
    #[inline]
    pub fn winning_column(self) -> Option<usize> {
        match self {
            Threat::None => None,
            Threat::Single(col) | Threat::Multi(col, _) => Some(col),
        }
    }
}

/// Trial-drops `player` into every playable column and classifies the
/// columns that would complete four in a row.
///
/// The board is left exactly as it was found.
pub fn classify_threats(board: &mut BoardState, player: Player) -> Threat {
    let mut found = None;

    for col in 0..board.cols() {
        if !board.column_playable(col) {
            continue;
        }

        let row = board.drop(col, player);
        let win = judge::has_four_in_row(board, row, col, player.mark());
        board.undo(col);

        if win {
            match found {
                None => found = Some(col),
                Some(first) => return Threat::Multi(first, col),
            }
        }
    }

    found.map_or(Threat::None, Threat::Single)
}
