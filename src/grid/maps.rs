//! Fixture maps for demos and tests

use std::ops::Range;

use super::{GridConfig, Pos};

/// A 6x6 map with alternating positive and negative rewards
pub fn small() -> GridConfig {
    let rewards: [(Pos, f64); 11] = [
        ((0, 0), 1.0),
        ((0, 2), 1.0),
        ((0, 5), 1.0),
        ((1, 1), -1.0),
        ((1, 3), 1.0),
        ((1, 5), -1.0),
        ((2, 2), -1.0),
        ((2, 4), 1.0),
        ((3, 3), -1.0),
        ((3, 5), 1.0),
        ((4, 4), -1.0),
    ];

    GridConfig::default()
        .with_size(6)
        .with_walls([(0, 1), (1, 4), (4, 1), (4, 2), (4, 3)])
        .with_rewards(rewards)
        .with_start((3, 2))
}

/// A 20x20 map made of short wall segments, starting near the center
///
/// Two of its rewards sit on wall segments and are ignored when the grid is built.
pub fn large() -> GridConfig {
    let vertical: [(Range<usize>, Vec<usize>); 3] = [
        (3..5, vec![2, 7, 12]),
        (8..10, vec![0, 5, 10, 14]),
        (12..14, vec![3, 8, 13]),
    ];
    let vertical = vertical
        .into_iter()
        .flat_map(|(rows, cols)| rows.flat_map(move |r| cols.clone().into_iter().map(move |c| (r, c))));

    let horizontal: [(Vec<usize>, Range<usize>); 3] = [
        (vec![1, 6, 11, 14], 6..8),
        (vec![0, 5, 10], 11..13),
        (vec![7, 12], 3..5),
    ];
    let horizontal = horizontal
        .into_iter()
        .flat_map(|(rows, cols)| cols.flat_map(move |c| rows.clone().into_iter().map(move |r| (r, c))));

    let positive = [
        (0, 0),
        (0, 14),
        (5, 5),
        (5, 10),
        (7, 7),
        (7, 0),
        (10, 14),
        (10, 5),
        (14, 0),
        (14, 14),
    ];
    let negative = [
        (2, 2),
        (2, 12),
        (6, 6),
        (6, 8),
        (9, 9),
        (9, 4),
        (13, 13),
        (13, 1),
    ];

    GridConfig::default()
        .with_size(20)
        .with_walls(vertical.chain(horizontal))
        .with_rewards(positive.into_iter().map(|pos| (pos, 1.0)))
        .with_rewards(negative.into_iter().map(|pos| (pos, -1.0)))
        .with_start((7, 7))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    #[test]
    fn small_map_builds() {
        let grid = small().build().unwrap();
        assert_eq!(grid.size(), 6);
        assert_eq!(grid.start(), (3, 2));
        assert_eq!(grid.states().count(), 36 - 5, "Five walls");
        assert_eq!(grid.cell((1, 3)), Cell::Reward(1.0));
    }

    #[test]
    fn large_map_builds() {
        let grid = large().build().unwrap();
        assert_eq!(grid.size(), 20);
        assert_eq!(grid.states().count(), 400 - 37, "Overlapping wall segments counted once");
        assert_eq!(grid.cell((6, 6)), Cell::Wall, "Wall wins over reward");
        assert_eq!(grid.cell((13, 13)), Cell::Wall, "Wall wins over reward");
        assert_eq!(grid.cell((9, 9)), Cell::Reward(-1.0));
        assert!(!grid.is_wall(grid.start()));
    }
}
