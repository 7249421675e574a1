//! Optimal policies for a stochastic grid world, solved by value iteration and policy iteration.
//!
//! ```
//! use gridmdp::grid::maps;
//!
//! let grid = maps::small().build().unwrap();
//! let solution = gridmdp::run_value_iteration(&grid);
//! assert!(solution.policy.get(grid.start()).is_some());
//! ```

/// Dynamic programming solvers
pub mod algo;

/// Environment traits
pub mod env;

/// Configuration errors
pub mod error;

/// The grid world model
pub mod grid;

/// An agent moving through a grid
pub mod walker;

mod util;

pub use algo::{Policy, Solution, Utilities};
pub use error::GridError;
pub use grid::{Action, GridConfig, GridWorld, Pos};

/// Solve `grid` with value iteration using the default [`ValueIterationConfig`](algo::ValueIterationConfig)
pub fn run_value_iteration(grid: &GridWorld) -> Solution {
    algo::ValueIteration::default().solve(grid)
}

/// Solve `grid` with policy iteration using the default [`PolicyIterationConfig`](algo::PolicyIterationConfig)
///
/// The initial policy is random, use [`PolicyIteration`](algo::PolicyIteration) directly to seed it.
pub fn run_policy_iteration(grid: &GridWorld) -> Solution {
    algo::PolicyIteration::default().solve(grid)
}
