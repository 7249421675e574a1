use std::{
    collections::HashMap,
    ops::{Index, IndexMut},
};

use strum::IntoEnumIterator;

use crate::grid::{Action, GridWorld, Pos};

pub mod policy_iteration;
pub mod value_iteration;

pub use policy_iteration::{PolicyIteration, PolicyIterationConfig};
pub use value_iteration::{ValueIteration, ValueIterationConfig};

/// A dense table with one utility per grid cell
///
/// Entries for walls are never updated and carry no meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Utilities {
    size: usize,
    values: Vec<f64>,
}

impl Utilities {
    /// A `size` x `size` table filled with zeros
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Rows of the table, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.size.max(1))
    }

    /// Largest absolute difference over the non-wall cells of `grid`
    pub fn max_diff(&self, other: &Utilities, grid: &GridWorld) -> f64 {
        grid.states()
            .map(|pos| (self[pos] - other[pos]).abs())
            .fold(0.0, f64::max)
    }
}

impl Index<Pos> for Utilities {
    type Output = f64;

    fn index(&self, pos: Pos) -> &Self::Output {
        &self.values[pos.0 * self.size + pos.1]
    }
}

impl IndexMut<Pos> for Utilities {
    fn index_mut(&mut self, pos: Pos) -> &mut Self::Output {
        &mut self.values[pos.0 * self.size + pos.1]
    }
}

/// A mapping from non-wall cells to the action taken there
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    actions: HashMap<Pos, Action>,
}

impl Policy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: Pos) -> Option<Action> {
        self.actions.get(&pos).copied()
    }

    /// Set the action for `pos`, returning the previous one
    pub fn insert(&mut self, pos: Pos, action: Action) -> Option<Action> {
        self.actions.insert(pos, action)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, Action)> + '_ {
        self.actions.iter().map(|(&pos, &action)| (pos, action))
    }
}

impl FromIterator<(Pos, Action)> for Policy {
    fn from_iter<T: IntoIterator<Item = (Pos, Action)>>(iter: T) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

/// What a solver hands back: converged utilities, the resulting policy, and how many iterations it took
///
/// `iterations` counts sweeps for value iteration and improvement rounds for policy iteration.
#[derive(Debug, Clone)]
pub struct Solution {
    pub utilities: Utilities,
    pub policy: Policy,
    pub iterations: u32,
}

/// Expected utility of the cell reached by attempting `action` from `pos`
///
/// Σ<sub>outcomes</sub> p · U(next), where blocked outcomes count the utility of `pos` itself.
pub fn action_value(grid: &GridWorld, utilities: &Utilities, pos: Pos, action: Action) -> f64 {
    debug_assert_eq!(utilities.size(), grid.size(), "Utility table does not match the grid");
    grid.transition_outcomes(pos, action)
        .iter()
        .map(|outcome| outcome.prob * utilities[outcome.next])
        .sum()
}

/// The action with the highest [`action_value`] at `pos`, along with that value
///
/// Ties go to the action declared first in [`Action`].
pub fn greedy_action(grid: &GridWorld, utilities: &Utilities, pos: Pos) -> (Action, f64) {
    Action::iter()
        .map(|action| (action, action_value(grid, utilities, pos, action)))
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .expect("There is always at least one action available")
}

/// Bellman backup for a single cell: R(s) + γ · max<sub>a</sub> Σ p · U(next)
///
/// Terminal cells are pinned to their reward.
pub(crate) fn bellman_backup(grid: &GridWorld, utilities: &Utilities, pos: Pos) -> f64 {
    if grid.is_terminal(pos) {
        return grid.reward_at(pos);
    }
    grid.reward_at(pos) + grid.discount() * greedy_action(grid, utilities, pos).1
}

/// The greedy policy with respect to `utilities`, covering every non-wall cell
pub fn extract_policy(grid: &GridWorld, utilities: &Utilities) -> Policy {
    grid.states()
        .map(|pos| (pos, greedy_action(grid, utilities, pos).0))
        .collect()
}

/// Replace each cell's action with the greedy one when the greedy one is strictly better
///
/// Cells whose current action already ties for best keep it, so a policy that is greedy with respect
/// to `utilities` is left untouched.
///
/// **Returns** the number of cells whose action changed
pub fn improve_policy(grid: &GridWorld, utilities: &Utilities, policy: &mut Policy) -> usize {
    debug_assert_eq!(utilities.size(), grid.size(), "Utility table does not match the grid");
    let mut changed = 0;
    for pos in grid.states() {
        let (best, best_value) = greedy_action(grid, utilities, pos);
        let keep = policy
            .get(pos)
            .is_some_and(|current| action_value(grid, utilities, pos, current) >= best_value);

        if !keep {
            policy.insert(pos, best);
            changed += 1;
        }
    }
    changed
}
