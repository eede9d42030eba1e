//! Final move choice from the root statistics.

use crate::{BoardState, NodeId, SearchTree};

/// Statistics of one root move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnStats {
    pub column: usize,
    /// Cumulative signed reward of the move.
    pub score: i64,
    /// Playouts that went through the move.
    pub visits: u32,
}

impl ColumnStats {
    /// Average reward per visit.
    #[inline]
    pub fn mean(&self) -> f64 {
        if self.visits != 0 { self.score as f64 / self.visits as f64 } else { 0.0 }
    }
}

/// Statistics of every playable root column that already has a child.
pub fn root_statistics(tree: &SearchTree, board: &BoardState) -> Vec<ColumnStats> {
    let root = tree.node(NodeId::ROOT);

    board
        .feasible_columns()
        .filter_map(|column| {
            let child = root.child(column)?;
            let visits = tree.node(child).visits();
            Some(ColumnStats { column, score: root.score(column), visits })
        })
        .collect()
}

/// Returns the playable root column with the highest average reward, the
/// lowest column winning ties. `None` when no such column has been visited,
/// which includes a root without any playable column.
pub fn best_column(tree: &SearchTree, board: &BoardState) -> Option<usize> {
    let mut best: Option<ColumnStats> = None;

    for stats in root_statistics(tree, board) {
        if stats.visits == 0 {
            continue;
        }
        if best.map_or(true, |current| stats.mean() > current.mean()) {
            best = Some(stats);
        }
    }
    best.map(|stats| stats.column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestPosition;

    fn root_with(stats: &[(usize, i64, u32)]) -> SearchTree {
        let mut tree = SearchTree::new(32);
        for &(col, score, visits) in stats {
            let child = tree.expand(NodeId::ROOT, col).unwrap();
            tree.add_score(NodeId::ROOT, col, score);
            for _ in 0..visits {
                tree.record_visit(child);
            }
        }
        tree
    }

    #[test]
    fn test_no_decision_without_children() {
        let board = TestPosition::empty(6, 7, None).board_state();
        let tree = SearchTree::new(8);

        assert_eq!(best_column(&tree, &board), None);
        assert!(root_statistics(&tree, &board).is_empty());
    }

    #[test]
    fn test_best_ratio() {
        let board = TestPosition::empty(6, 7, None).board_state();
        let tree = root_with(&[(0, 10, 10), (3, 9, 3), (5, -4, 1), (6, 6, 2)]);

        assert_eq!(best_column(&tree, &board), Some(3));

        let stats = root_statistics(&tree, &board);
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[1], ColumnStats { column: 3, score: 9, visits: 3 });
        assert_eq!(stats[1].mean(), 3.0);
    }

    #[test]
    fn test_unvisited_and_full_columns_are_skipped() {
        let board = TestPosition::from_rows(&["1..", "2..", "1.."]).board_state();
        let tree = root_with(&[(0, 50, 1), (1, -3, 1), (2, 7, 0)]);

        assert_eq!(best_column(&tree, &board), Some(1));
    }
}
