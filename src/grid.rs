//! Deterministic grid-world environment
//!
//! The environment is a bounded rectangular grid with a start cell, a goal
//! cell, and a set of blocked cells. Transitions are pure: stepping from a
//! position with an action yields a new position, a reward, and a terminal
//! flag, with no internal state. Moves into walls or out of bounds leave the
//! agent in place but still pay the step reward, so the state space stays
//! closed and the agent learns obstacles through repeated penalty.

use std::collections::HashSet;

use crate::error::{Error, Result};

/// Number of discrete actions
pub const ACTIONS: usize = 4;

/// Smallest allowed grid dimension
pub const MIN_DIM: u32 = 2;

/// Largest allowed grid dimension
pub const MAX_DIM: u32 = 10;

/// One of the four deterministic moves
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Action {
    /// All actions in index order (the order used by the Q-table layout)
    pub const ALL: [Action; ACTIONS] = [Action::Up, Action::Right, Action::Down, Action::Left];

    /// Dense action index in `0..4`
    pub fn index(self) -> usize {
        self as usize
    }

    /// Coordinate delta `(dx, dy)` for this move
    fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (0, -1),
            Action::Right => (1, 0),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
        }
    }
}

/// A grid coordinate
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Result of a single environment transition
#[derive(Clone, Copy, Debug)]
pub struct StepOutcome {
    /// Position after the move (unchanged if the move was blocked)
    pub position: Position,
    /// Reward earned by the transition
    pub reward: f32,
    /// True iff the resulting position is the goal
    pub done: bool,
}

/// Configuration for a [`GridEnvironment`]
#[derive(Debug, Clone)]
pub struct GridConfig {
    pub width: u32,
    pub height: u32,
    /// Episode step cap; defaults to `width * height * 4`
    pub step_limit: Option<u32>,
    pub step_reward: f32,
    pub goal_reward: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            step_limit: None,
            step_reward: -1.0,
            goal_reward: 10.0,
        }
    }
}

/// The grid world: dimensions, obstacles, start/goal cells, and rewards
///
/// Constructed once from a [`GridConfig`] and immutable afterwards. The
/// default layout places the start at `(0, 0)`, the goal at the opposite
/// corner, and, on grids of at least 5x5, a small wall of four obstacle
/// cells between them.
#[derive(Debug, Clone)]
pub struct GridEnvironment {
    width: u32,
    height: u32,
    start: Position,
    goal: Position,
    obstacles: HashSet<Position>,
    step_limit: u32,
    step_reward: f32,
    goal_reward: f32,
}

impl GridEnvironment {
    /// Build an environment with the default obstacle layout
    pub fn new(config: GridConfig) -> Result<Self> {
        let mut obstacles = HashSet::new();
        if config.width >= 5 && config.height >= 5 {
            obstacles.insert(Position::new(2, 1));
            obstacles.insert(Position::new(2, 2));
            obstacles.insert(Position::new(2, 3));
            obstacles.insert(Position::new(1, 3));
        }
        Self::with_obstacles(config, obstacles)
    }

    /// Build an environment with an explicit obstacle set
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGridSize`] when a dimension is outside
    /// `2..=10`, [`Error::InvalidStepLimit`] for a zero step limit, and
    /// [`Error::InvalidCell`] when an obstacle covers the start or goal
    /// cell or lies outside the grid.
    pub fn with_obstacles(config: GridConfig, obstacles: HashSet<Position>) -> Result<Self> {
        let GridConfig {
            width,
            height,
            step_limit,
            step_reward,
            goal_reward,
        } = config;

        if !(MIN_DIM..=MAX_DIM).contains(&width) || !(MIN_DIM..=MAX_DIM).contains(&height) {
            return Err(Error::InvalidGridSize {
                width,
                height,
                min: MIN_DIM,
                max: MAX_DIM,
            });
        }

        let step_limit = step_limit.unwrap_or(width * height * 4);
        if step_limit == 0 {
            return Err(Error::InvalidStepLimit);
        }

        let start = Position::new(0, 0);
        let goal = Position::new(width as i32 - 1, height as i32 - 1);

        let in_bounds =
            |p: &Position| p.x >= 0 && p.x < width as i32 && p.y >= 0 && p.y < height as i32;
        for obstacle in &obstacles {
            if !in_bounds(obstacle) || *obstacle == start || *obstacle == goal {
                return Err(Error::InvalidCell {
                    x: obstacle.x,
                    y: obstacle.y,
                });
            }
        }

        Ok(Self {
            width,
            height,
            start,
            goal,
            obstacles,
            step_limit,
            step_reward,
            goal_reward,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn step_limit(&self) -> u32 {
        self.step_limit
    }

    /// Number of distinct states (`width * height`)
    pub fn state_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// True iff the coordinate is in bounds and not an obstacle
    pub fn is_valid(&self, position: Position) -> bool {
        position.x >= 0
            && position.x < self.width as i32
            && position.y >= 0
            && position.y < self.height as i32
            && !self.obstacles.contains(&position)
    }

    /// Dense state id `y * width + x`
    ///
    /// Every consumer derives state ids through this method so the
    /// coordinate-to-index bijection has a single definition.
    pub fn state_id(&self, position: Position) -> usize {
        debug_assert!(self.is_valid(position));
        (position.y * self.width as i32 + position.x) as usize
    }

    /// Apply one move
    ///
    /// A move into a wall or out of bounds keeps the agent in place and
    /// still pays `step_reward`. The transition is terminal iff the
    /// resulting cell is the goal, in which case `goal_reward` is paid
    /// instead.
    pub fn step(&self, position: Position, action: Action) -> StepOutcome {
        let (dx, dy) = action.delta();
        let target = Position::new(position.x + dx, position.y + dy);
        let next = if self.is_valid(target) { target } else { position };
        let done = next == self.goal;
        StepOutcome {
            position: next,
            reward: if done { self.goal_reward } else { self.step_reward },
            done,
        }
    }

    /// ASCII dump of the grid with the agent at the given position
    ///
    /// Markers: `A` agent, `S` start, `G` goal, `#` obstacle, `.` free.
    pub fn render(&self, agent: Position) -> String {
        let mut out = String::new();
        for y in 0..self.height as i32 {
            let row: Vec<&str> = (0..self.width as i32)
                .map(|x| {
                    let cell = Position::new(x, y);
                    if cell == agent {
                        "A"
                    } else if cell == self.start {
                        "S"
                    } else if cell == self.goal {
                        "G"
                    } else if self.obstacles.contains(&cell) {
                        "#"
                    } else {
                        "."
                    }
                })
                .collect();
            out.push_str(&row.join(" "));
            out.push('\n');
        }
        out
    }
}
