use log::{debug, info};

use crate::{assert_interval, grid::GridWorld};

use super::{bellman_backup, extract_policy, Solution, Utilities};

/// Configuration for [`ValueIteration`]
#[derive(Debug, Clone, PartialEq)]
pub struct ValueIterationConfig {
    /// Target max-norm error of the converged utilities
    pub epsilon: f64,
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self { epsilon: 0.05 }
    }
}

/// Value iteration solver
///
/// Repeats synchronous Bellman backups over every non-wall cell, each sweep reading only the previous
/// sweep's table, until the largest change in a sweep is at most ε(1 - γ)/γ. The greedy policy is then
/// read off the converged table.
#[derive(Debug, Clone)]
pub struct ValueIteration {
    epsilon: f64,
}

impl ValueIteration {
    /// Initialize a new `ValueIteration` solver
    ///
    /// **Panics** if `epsilon` is not positive
    pub fn new(config: ValueIterationConfig) -> Self {
        assert_interval!(config.epsilon, f64::MIN_POSITIVE, f64::INFINITY);
        Self {
            epsilon: config.epsilon,
        }
    }

    /// Sweep until convergence
    ///
    /// **Returns** `(utilities, sweeps)`
    pub fn utilities(&self, grid: &GridWorld) -> (Utilities, u32) {
        let gamma = grid.discount();
        let threshold = self.epsilon * (1.0 - gamma) / gamma;

        let mut current = Utilities::zeros(grid.size());
        let mut previous = current.clone();
        let mut delta = f64::INFINITY;
        let mut sweeps = 0;

        while delta > threshold {
            previous.clone_from(&current);
            delta = 0.0;
            for pos in grid.states() {
                let value = bellman_backup(grid, &previous, pos);
                delta = delta.max((value - previous[pos]).abs());
                current[pos] = value;
            }
            sweeps += 1;
            debug!("Value iteration sweep {}: delta {:.6}", sweeps, delta);
        }

        info!("Value iteration converged after {} sweeps", sweeps);
        (current, sweeps)
    }

    /// Run value iteration on `grid`
    pub fn solve(&self, grid: &GridWorld) -> Solution {
        let (utilities, iterations) = self.utilities(grid);
        let policy = extract_policy(grid, &utilities);
        Solution {
            utilities,
            policy,
            iterations,
        }
    }
}

impl Default for ValueIteration {
    fn default() -> Self {
        Self::new(ValueIterationConfig::default())
    }
}
