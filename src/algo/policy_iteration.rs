use log::{debug, info};
use rand::{rngs::StdRng, seq::IteratorRandom, SeedableRng};
use strum::IntoEnumIterator;

use crate::{
    assert_interval,
    grid::{Action, GridWorld},
};

use super::{action_value, improve_policy, Policy, Solution, Utilities};

/// Configuration for [`PolicyIteration`]
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyIterationConfig {
    /// Policy evaluation stops once a sweep changes no cell by more than this
    pub theta: f64,
    /// Hard cap on evaluation sweeps per improvement round
    pub max_sweeps: u32,
    /// Seed for the random initial policy, drawn from entropy when `None`
    pub seed: Option<u64>,
}

impl Default for PolicyIterationConfig {
    fn default() -> Self {
        Self {
            theta: 0.01,
            max_sweeps: 100,
            seed: None,
        }
    }
}

/// Policy iteration solver
///
/// Starts from a random policy and alternates two phases until the policy stops changing:
/// - **Evaluation**: synchronous sweeps of R(s) + γ Σ p · U(next) under the policy's own action, until
///   the sweep delta drops to `theta` or `max_sweeps` is reached. Each round continues from the previous
///   round's utilities.
/// - **Improvement**: every cell switches to its greedy action if that is strictly better than its
///   current one.
#[derive(Debug, Clone)]
pub struct PolicyIteration {
    theta: f64,
    max_sweeps: u32,
    seed: Option<u64>,
}

impl PolicyIteration {
    /// Initialize a new `PolicyIteration` solver
    ///
    /// **Panics** if `theta` is negative or `max_sweeps` is zero
    pub fn new(config: PolicyIterationConfig) -> Self {
        assert_interval!(config.theta, 0.0, f64::INFINITY);
        assert!(
            config.max_sweeps >= 1,
            "Invalid value for `config.max_sweeps`. Must be at least 1."
        );
        Self {
            theta: config.theta,
            max_sweeps: config.max_sweeps,
            seed: config.seed,
        }
    }

    /// A uniformly random action for every non-wall cell
    pub fn initial_policy(&self, grid: &GridWorld) -> Policy {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        grid.states()
            .map(|pos| {
                let action = Action::iter()
                    .choose(&mut rng)
                    .expect("Iterator is not empty");
                (pos, action)
            })
            .collect()
    }

    /// Evaluate `policy` in place, starting from the values already in `utilities`
    ///
    /// Cells missing from `policy` are evaluated under [`Action::Up`].
    ///
    /// **Returns** the number of sweeps performed
    pub fn evaluate(&self, grid: &GridWorld, policy: &Policy, utilities: &mut Utilities) -> u32 {
        let gamma = grid.discount();
        let mut previous = utilities.clone();
        let mut delta = f64::INFINITY;
        let mut sweeps = 0;

        while delta > self.theta && sweeps < self.max_sweeps {
            previous.clone_from(utilities);
            delta = 0.0;
            for pos in grid.states() {
                let value = if grid.is_terminal(pos) {
                    grid.reward_at(pos)
                } else {
                    let action = policy.get(pos).unwrap_or(Action::Up);
                    grid.reward_at(pos) + gamma * action_value(grid, &previous, pos, action)
                };
                delta = delta.max((value - previous[pos]).abs());
                utilities[pos] = value;
            }
            sweeps += 1;
        }

        sweeps
    }

    /// Run policy iteration on `grid`
    pub fn solve(&self, grid: &GridWorld) -> Solution {
        let mut policy = self.initial_policy(grid);
        let mut utilities = Utilities::zeros(grid.size());
        let mut rounds = 0;

        loop {
            let sweeps = self.evaluate(grid, &policy, &mut utilities);
            let changed = improve_policy(grid, &utilities, &mut policy);
            rounds += 1;
            debug!(
                "Policy iteration round {}: {} evaluation sweeps, {} actions changed",
                rounds, sweeps, changed
            );

            if changed == 0 {
                break;
            }
        }

        info!("Policy iteration converged after {} rounds", rounds);
        Solution {
            utilities,
            policy,
            iterations: rounds,
        }
    }
}

impl Default for PolicyIteration {
    fn default() -> Self {
        Self::new(PolicyIterationConfig::default())
    }
}
