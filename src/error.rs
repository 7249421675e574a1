use thiserror::Error;

use crate::grid::Pos;

/// Reasons a [`GridConfig`](crate::grid::GridConfig) is rejected when building a
/// [`GridWorld`](crate::grid::GridWorld)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid size must be at least 1")]
    EmptyGrid,

    #[error("{what} at {pos:?} lies outside a {size}x{size} grid")]
    OutOfBounds {
        what: &'static str,
        pos: Pos,
        size: usize,
    },

    #[error("start position {0:?} is a wall")]
    StartOnWall(Pos),

    #[error("terminal configured on wall {0:?}")]
    TerminalOnWall(Pos),

    #[error("reward at {pos:?} is not finite: {value}")]
    InvalidReward { pos: Pos, value: f64 },

    #[error("ambient reward is not finite: {0}")]
    InvalidAmbient(f64),

    #[error("success probability must be in (0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("discount must be in (0, 1), got {0}")]
    InvalidDiscount(f64),

    #[error("cell {0:?} has no passable direction")]
    IsolatedCell(Pos),
}
