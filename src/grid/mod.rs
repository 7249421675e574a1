use std::collections::{HashMap, HashSet};

use log::warn;
use strum::{EnumIter, VariantArray};

use crate::error::GridError;

pub mod maps;

/// Grid coordinates as `(row, column)`, with row 0 at the top
pub type Pos = (usize, usize);

/// The four compass moves available in every non-wall cell
///
/// Declaration order is the enumeration order used to break ties between equally valued actions.
#[derive(EnumIter, VariantArray, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// The two directions an agent can slip into when attempting this action
    ///
    /// Never contains the reverse direction.
    pub fn perpendicular(self) -> [Action; 2] {
        match self {
            Action::Up | Action::Down => [Action::Left, Action::Right],
            Action::Left | Action::Right => [Action::Up, Action::Down],
        }
    }

    fn delta(self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }

    /// Single character glyph for renderers
    pub fn arrow(self) -> char {
        match self {
            Action::Up => '↑',
            Action::Down => '↓',
            Action::Left => '←',
            Action::Right => '→',
        }
    }
}

/// Static contents of a single grid cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cell {
    Wall,
    Reward(f64),
    Empty,
}

/// One branch of the stochastic transition for a single action
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outcome {
    /// Direction the agent actually moved in
    pub direction: Action,
    /// Resulting position, which is the origin cell if `direction` is blocked
    pub next: Pos,
    pub prob: f64,
}

/// Configuration for a [`GridWorld`]
///
/// Coordinates are `(row, column)`. Cells with no entry in `rewards` receive `ambient_reward`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub size: usize,
    pub walls: HashSet<Pos>,
    pub rewards: HashMap<Pos, f64>,
    /// Absorbing cells whose utility is pinned to their own reward
    pub terminals: HashSet<Pos>,
    pub start: Pos,
    /// Probability of moving in the intended direction, the rest is split between the two perpendicular ones
    pub intended_prob: f64,
    pub discount: f64,
    pub ambient_reward: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 6,
            walls: HashSet::new(),
            rewards: HashMap::new(),
            terminals: HashSet::new(),
            start: (0, 0),
            intended_prob: 0.8,
            discount: 0.99,
            ambient_reward: -0.05,
        }
    }
}

impl GridConfig {
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_walls(mut self, walls: impl IntoIterator<Item = Pos>) -> Self {
        self.walls.extend(walls);
        self
    }

    pub fn with_rewards(mut self, rewards: impl IntoIterator<Item = (Pos, f64)>) -> Self {
        self.rewards.extend(rewards);
        self
    }

    pub fn with_terminals(mut self, terminals: impl IntoIterator<Item = Pos>) -> Self {
        self.terminals.extend(terminals);
        self
    }

    pub fn with_start(mut self, start: Pos) -> Self {
        self.start = start;
        self
    }

    pub fn with_intended_prob(mut self, intended_prob: f64) -> Self {
        self.intended_prob = intended_prob;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_ambient_reward(mut self, ambient_reward: f64) -> Self {
        self.ambient_reward = ambient_reward;
        self
    }

    /// Validate the configuration and build the model
    pub fn build(self) -> Result<GridWorld, GridError> {
        GridWorld::new(self)
    }
}

/// A fully known grid world MDP
///
/// Holds the static layout (walls, rewards, terminals) and the noisy movement model. It has no notion
/// of a current agent position, every query takes the cell it is asked about explicitly. See
/// [`Walker`](crate::walker::Walker) for an agent moving through the grid.
#[derive(Debug, Clone)]
pub struct GridWorld {
    size: usize,
    cells: Vec<Cell>,
    terminal: Vec<bool>,
    start: Pos,
    intended_prob: f64,
    discount: f64,
    ambient_reward: f64,
}

impl GridWorld {
    /// Validate a [`GridConfig`] and build the model
    ///
    /// A reward placed on a wall is ignored, since walls always pay zero.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        let GridConfig {
            size,
            walls,
            rewards,
            terminals,
            start,
            intended_prob,
            discount,
            ambient_reward,
        } = config;

        if size == 0 {
            return Err(GridError::EmptyGrid);
        }
        if !(intended_prob > 0.0 && intended_prob <= 1.0) {
            return Err(GridError::InvalidProbability(intended_prob));
        }
        if !(discount > 0.0 && discount < 1.0) {
            return Err(GridError::InvalidDiscount(discount));
        }
        if !ambient_reward.is_finite() {
            return Err(GridError::InvalidAmbient(ambient_reward));
        }

        let in_bounds = |what: &'static str, pos: Pos| {
            if pos.0 < size && pos.1 < size {
                Ok(())
            } else {
                Err(GridError::OutOfBounds { what, pos, size })
            }
        };

        let mut cells = vec![Cell::Empty; size * size];
        for &pos in &walls {
            in_bounds("wall", pos)?;
            cells[pos.0 * size + pos.1] = Cell::Wall;
        }
        for (&pos, &value) in &rewards {
            in_bounds("reward", pos)?;
            if !value.is_finite() {
                return Err(GridError::InvalidReward { pos, value });
            }
            let cell = &mut cells[pos.0 * size + pos.1];
            if *cell == Cell::Wall {
                warn!("Ignoring reward {} configured on wall {:?}", value, pos);
                continue;
            }
            *cell = Cell::Reward(value);
        }

        let mut terminal = vec![false; size * size];
        for &pos in &terminals {
            in_bounds("terminal", pos)?;
            if cells[pos.0 * size + pos.1] == Cell::Wall {
                return Err(GridError::TerminalOnWall(pos));
            }
            terminal[pos.0 * size + pos.1] = true;
        }

        in_bounds("start", start)?;
        if cells[start.0 * size + start.1] == Cell::Wall {
            return Err(GridError::StartOnWall(start));
        }

        let grid = Self {
            size,
            cells,
            terminal,
            start,
            intended_prob,
            discount,
            ambient_reward,
        };

        let isolated = |pos: Pos| {
            !grid.is_terminal(pos) && !Action::VARIANTS.iter().any(|&a| grid.can_move(pos, a))
        };
        if let Some(pos) = grid.states().find(|&pos| isolated(pos)) {
            return Err(GridError::IsolatedCell(pos));
        }

        Ok(grid)
    }

    /// Side length of the square grid
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn intended_prob(&self) -> f64 {
        self.intended_prob
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn ambient_reward(&self) -> f64 {
        self.ambient_reward
    }

    pub(crate) fn index(&self, pos: Pos) -> usize {
        pos.0 * self.size + pos.1
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.0 < self.size && pos.1 < self.size
    }

    /// Contents of the cell at `pos`
    ///
    /// **Panics** if `pos` is outside the grid
    pub fn cell(&self, pos: Pos) -> Cell {
        assert!(self.contains(pos), "Position {:?} is outside the grid", pos);
        self.cells[self.index(pos)]
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.contains(pos) && self.cells[self.index(pos)] == Cell::Wall
    }

    pub fn is_terminal(&self, pos: Pos) -> bool {
        self.contains(pos) && self.terminal[self.index(pos)]
    }

    /// Immediate reward for occupying `pos`
    ///
    /// Walls and positions outside the grid pay zero.
    pub fn reward_at(&self, pos: Pos) -> f64 {
        if !self.contains(pos) {
            return 0.0;
        }
        match self.cells[self.index(pos)] {
            Cell::Wall => 0.0,
            Cell::Reward(value) => value,
            Cell::Empty => self.ambient_reward,
        }
    }

    /// The adjacent position in `direction`, if it is inside the grid
    fn neighbor(&self, pos: Pos, direction: Action) -> Option<Pos> {
        let (dr, dc) = direction.delta();
        let row = pos.0.checked_add_signed(dr)?;
        let col = pos.1.checked_add_signed(dc)?;
        self.contains((row, col)).then_some((row, col))
    }

    /// Whether moving from `pos` in `direction` lands inside the grid and not on a wall
    pub fn can_move(&self, pos: Pos, direction: Action) -> bool {
        self.neighbor(pos, direction)
            .is_some_and(|next| !self.is_wall(next))
    }

    /// Where moving from `pos` in `direction` actually ends up
    ///
    /// Blocked moves bounce back and leave the agent at `pos`.
    pub fn target(&self, pos: Pos, direction: Action) -> Pos {
        match self.neighbor(pos, direction) {
            Some(next) if !self.is_wall(next) => next,
            _ => pos,
        }
    }

    /// The outcome distribution of attempting `action` from `pos`
    ///
    /// The intended direction comes first with probability `p`, followed by the two perpendicular
    /// directions with `(1 - p) / 2` each.
    pub fn transition_outcomes(&self, pos: Pos, action: Action) -> [Outcome; 3] {
        let slip = (1.0 - self.intended_prob) / 2.0;
        let [side_a, side_b] = action.perpendicular();
        [
            (action, self.intended_prob),
            (side_a, slip),
            (side_b, slip),
        ]
        .map(|(direction, prob)| Outcome {
            direction,
            next: self.target(pos, direction),
            prob,
        })
    }

    /// All non-wall positions in row-major order
    pub fn states(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.size * self.size)
            .filter(|&i| self.cells[i] != Cell::Wall)
            .map(|i| (i / self.size, i % self.size))
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;
    use strum::IntoEnumIterator;

    use super::*;

    fn corridor() -> GridWorld {
        // Row 0 is open, everything below is wall
        GridConfig::default()
            .with_size(3)
            .with_walls([(1, 0), (1, 1), (1, 2), (2, 0), (2, 1), (2, 2)])
            .with_rewards([((0, 2), 1.0)])
            .build()
            .unwrap()
    }

    #[test]
    fn can_move_respects_bounds_and_walls() {
        let grid = corridor();
        assert!(!grid.can_move((0, 0), Action::Up), "Top edge blocks");
        assert!(!grid.can_move((0, 0), Action::Left), "Left edge blocks");
        assert!(!grid.can_move((0, 0), Action::Down), "Wall blocks");
        assert!(grid.can_move((0, 0), Action::Right), "Open cell passes");
        assert!(!grid.can_move((0, 2), Action::Right), "Right edge blocks");
    }

    #[test]
    fn blocked_outcomes_bounce_in_place() {
        let grid = corridor();
        let outcomes = grid.transition_outcomes((0, 1), Action::Up);

        assert_eq!(outcomes[0].direction, Action::Up);
        assert_eq!(outcomes[0].next, (0, 1), "Edge bounces back");
        assert_float_eq!(outcomes[0].prob, 0.8, abs <= 1e-12);

        assert_eq!(outcomes[1].direction, Action::Left);
        assert_eq!(outcomes[1].next, (0, 0));
        assert_eq!(outcomes[2].direction, Action::Right);
        assert_eq!(outcomes[2].next, (0, 2));
        assert_float_eq!(outcomes[1].prob, 0.1, abs <= 1e-12);
        assert_float_eq!(outcomes[2].prob, 0.1, abs <= 1e-12);
    }

    #[test]
    fn wall_blocked_outcomes_bounce_in_place() {
        let grid = corridor();
        let outcomes = grid.transition_outcomes((0, 1), Action::Down);

        assert_eq!(outcomes[0].direction, Action::Down);
        assert_eq!(outcomes[0].next, (0, 1), "Wall bounces back to the origin");
        assert_eq!(outcomes[1].next, (0, 0));
        assert_eq!(outcomes[2].next, (0, 2));
        assert!(!grid.can_move((0, 1), Action::Down));
    }

    #[test]
    fn outcome_probabilities_sum_to_one() {
        for p in [0.1, 0.5, 0.8, 0.95, 1.0] {
            let grid = GridConfig::default().with_intended_prob(p).build().unwrap();
            for action in Action::iter() {
                let total: f64 = grid
                    .transition_outcomes((2, 2), action)
                    .iter()
                    .map(|o| o.prob)
                    .sum();
                assert_float_eq!(total, 1.0, abs <= 1e-12);
            }
        }
    }

    #[test]
    fn perpendicular_never_reverses() {
        for action in Action::iter() {
            let reverse = match action {
                Action::Up => Action::Down,
                Action::Down => Action::Up,
                Action::Left => Action::Right,
                Action::Right => Action::Left,
            };
            let sides = action.perpendicular();
            assert!(!sides.contains(&action), "Intended direction excluded");
            assert!(!sides.contains(&reverse), "Reverse direction excluded");
        }
    }

    #[test]
    fn reward_lookup() {
        let grid = GridConfig::default()
            .with_walls([(1, 1)])
            .with_rewards([((0, 0), 1.0), ((2, 2), -1.0)])
            .build()
            .unwrap();

        assert_eq!(grid.reward_at((0, 0)), 1.0);
        assert_eq!(grid.reward_at((2, 2)), -1.0);
        assert_eq!(grid.reward_at((3, 3)), -0.05, "Ambient reward");
        assert_eq!(grid.reward_at((1, 1)), 0.0, "Walls pay nothing");
        assert_eq!(grid.cell((1, 1)), Cell::Wall);
        assert_eq!(grid.cell((0, 0)), Cell::Reward(1.0));
        assert_eq!(grid.cell((3, 3)), Cell::Empty);
    }

    #[test]
    fn reward_on_wall_is_ignored() {
        let grid = GridConfig::default()
            .with_walls([(1, 1)])
            .with_rewards([((1, 1), 5.0)])
            .build()
            .unwrap();
        assert_eq!(grid.cell((1, 1)), Cell::Wall);
        assert_eq!(grid.reward_at((1, 1)), 0.0);
    }

    #[test]
    fn states_skip_walls() {
        let grid = corridor();
        assert_eq!(grid.states().collect::<Vec<_>>(), vec![(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn invalid_configs_rejected() {
        let base = GridConfig::default().with_size(3);

        assert_eq!(base.clone().with_size(0).build().unwrap_err(), GridError::EmptyGrid);
        assert_eq!(
            base.clone().with_start((1, 1)).with_walls([(1, 1)]).build().unwrap_err(),
            GridError::StartOnWall((1, 1))
        );
        assert_eq!(
            base.clone().with_walls([(3, 0)]).build().unwrap_err(),
            GridError::OutOfBounds {
                what: "wall",
                pos: (3, 0),
                size: 3
            }
        );
        assert_eq!(
            base.clone().with_start((0, 7)).build().unwrap_err(),
            GridError::OutOfBounds {
                what: "start",
                pos: (0, 7),
                size: 3
            }
        );
        assert_eq!(
            base.clone().with_intended_prob(0.0).build().unwrap_err(),
            GridError::InvalidProbability(0.0)
        );
        assert_eq!(
            base.clone().with_discount(1.0).build().unwrap_err(),
            GridError::InvalidDiscount(1.0)
        );
        assert_eq!(
            base.clone()
                .with_walls([(1, 1)])
                .with_terminals([(1, 1)])
                .build()
                .unwrap_err(),
            GridError::TerminalOnWall((1, 1))
        );
        assert_eq!(
            base.clone().with_rewards([((5, 1), 1.0)]).build().unwrap_err(),
            GridError::OutOfBounds {
                what: "reward",
                pos: (5, 1),
                size: 3
            }
        );
        assert_eq!(
            base.clone().with_terminals([(0, 3)]).build().unwrap_err(),
            GridError::OutOfBounds {
                what: "terminal",
                pos: (0, 3),
                size: 3
            }
        );
        assert!(matches!(
            base.clone().with_ambient_reward(f64::INFINITY).build(),
            Err(GridError::InvalidAmbient(value)) if value == f64::INFINITY
        ));
        assert!(matches!(
            base.clone().with_rewards([((0, 0), f64::NAN)]).build(),
            Err(GridError::InvalidReward { pos: (0, 0), .. })
        ));
    }

    #[test]
    fn isolated_cell_rejected() {
        let err = GridConfig::default()
            .with_size(3)
            .with_walls([(0, 1), (1, 0)])
            .with_start((2, 2))
            .build()
            .unwrap_err();
        assert_eq!(err, GridError::IsolatedCell((0, 0)));
    }
}
