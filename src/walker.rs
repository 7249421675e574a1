use log::trace;
use strum::VariantArray;

use crate::{
    algo::Policy,
    env::{DiscreteActionSpace, DiscreteStateSpace, Environment},
    grid::{Action, GridWorld, Pos},
};

/// An agent moving through a [`GridWorld`]
///
/// Moves are deterministic: the agent steps into the target cell if it is passable and otherwise stays
/// where it is. The noisy movement model only exists in the grid's transition queries used for planning.
#[derive(Debug, Clone)]
pub struct Walker<'g> {
    grid: &'g GridWorld,
    pos: Pos,
    steps: u32,
    total_reward: f64,
}

impl<'g> Walker<'g> {
    /// Place a new walker on the grid's start cell
    pub fn new(grid: &'g GridWorld) -> Self {
        Self {
            grid,
            pos: grid.start(),
            steps: 0,
            total_reward: 0.0,
        }
    }

    pub fn grid(&self) -> &'g GridWorld {
        self.grid
    }

    /// Current position
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Number of steps taken since the last reset
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Sum of rewards collected since the last reset
    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    /// Take the action `policy` prescribes for the current cell
    ///
    /// **Returns** the action taken, or `None` if the episode is over or the policy has no action here
    pub fn follow(&mut self, policy: &Policy) -> Option<Action> {
        if !self.is_active() {
            return None;
        }
        let action = policy.get(self.pos)?;
        self.step(action);
        Some(action)
    }
}

impl Environment for Walker<'_> {
    type State = Pos;
    type Action = Action;

    fn is_active(&self) -> bool {
        !self.grid.is_terminal(self.pos)
    }

    fn step(&mut self, action: Self::Action) -> (Option<Self::State>, f64) {
        if !self.is_active() {
            return (None, 0.0);
        }

        let next = self.grid.target(self.pos, action);
        trace!("{:?} from {:?} to {:?}", action, self.pos, next);
        self.pos = next;
        self.steps += 1;

        let reward = self.grid.reward_at(next);
        self.total_reward += reward;

        if self.is_active() {
            (Some(next), reward)
        } else {
            (None, reward)
        }
    }

    fn reset(&mut self) -> Self::State {
        self.pos = self.grid.start();
        self.steps = 0;
        self.total_reward = 0.0;
        self.pos
    }
}

impl DiscreteActionSpace for Walker<'_> {
    fn actions(&self) -> Vec<Self::Action> {
        Action::VARIANTS.to_vec()
    }
}

impl DiscreteStateSpace for Walker<'_> {
    fn states(&self) -> Vec<Self::State> {
        self.grid.states().collect()
    }
}
