//! Snake - a real-time arcade round played on a square grid.
//!
//! A round counts down, then moves the snake one cell per tick in its current
//! heading. Steering input only queues a direction; the queue is applied at
//! the next tick so several key presses inside one tick still produce a single
//! move, and the last accepted one wins. Reversing straight into the body is
//! rejected against the heading of the last move.
//!
//! The round ends when the head leaves the grid or lands on the body. The
//! ending tick reports the final score exactly once.
//!
//! Food respawns uniformly over the whole grid, occupied cells included.
//!
//! [`runner`] drives a round from tokio timers and a steering channel.

pub mod runner;

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SnakeConfig;

pub const DEFAULT_GRID_SIZE: i32 = 15;
pub const DEFAULT_COUNTDOWN_TICKS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector with y growing downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Parse steering input typed at the prompt (words, WASD, vi keys, ANSI arrows).
    pub fn from_input(raw: &str) -> Option<Direction> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" | "w" | "k" | "\u{1b}[a" => Some(Direction::Up),
            "down" | "s" | "j" | "\u{1b}[b" => Some(Direction::Down),
            "left" | "a" | "h" | "\u{1b}[d" => Some(Direction::Left),
            "right" | "d" | "l" | "\u{1b}[c" => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    OutOfBounds,
    SelfCollision,
    Abandoned,
}

impl EndCause {
    pub fn describe(self) -> &'static str {
        match self {
            EndCause::OutOfBounds => "hit the wall",
            EndCause::SelfCollision => "ran into itself",
            EndCause::Abandoned => "quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Countdown(u32),
    Running,
    Ended(EndCause),
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Countdown { remaining: u32 },
    Started,
    Moved,
    Ate { score: u32 },
    /// Emitted on the tick that ends the round and never again.
    Ended { score: u32, cause: EndCause },
    /// The round ended on an earlier tick.
    Finished,
}

/// Grid size, countdown length and RNG seed for a new round.
#[derive(Debug, Clone, Copy)]
pub struct RoundSettings {
    pub grid_size: i32,
    pub countdown_ticks: u32,
    pub seed: Option<u64>,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            countdown_ticks: DEFAULT_COUNTDOWN_TICKS,
            seed: None,
        }
    }
}

impl From<&SnakeConfig> for RoundSettings {
    fn from(cfg: &SnakeConfig) -> Self {
        Self {
            grid_size: cfg.grid_size as i32,
            countdown_ticks: cfg.countdown_ticks,
            seed: cfg.seed,
        }
    }
}

pub struct SnakeRound {
    grid_size: i32,
    body: VecDeque<Cell>,
    direction: Direction,
    queued: Option<Direction>,
    food: Cell,
    score: u32,
    phase: Phase,
    rng: StdRng,
    reported: bool,
}

impl SnakeRound {
    /// Fresh round: one segment at the centre heading right, food two cells up-left of it.
    pub fn new(settings: RoundSettings) -> Self {
        let grid = settings.grid_size.max(2);
        let centre = grid / 2;
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let phase = if settings.countdown_ticks == 0 {
            Phase::Running
        } else {
            Phase::Countdown(settings.countdown_ticks)
        };
        SnakeRound {
            grid_size: grid,
            body: VecDeque::from(vec![Cell::new(centre, centre)]),
            direction: Direction::Right,
            queued: None,
            food: Cell::new((centre - 2).max(0), (centre - 2).max(0)),
            score: 0,
            phase,
            rng,
            reported: false,
        }
    }

    /// A running round with an explicit layout. `body[0]` is the head.
    pub fn with_layout(
        grid_size: i32,
        body: Vec<Cell>,
        direction: Direction,
        food: Cell,
        seed: u64,
    ) -> Self {
        SnakeRound {
            grid_size: grid_size.max(2),
            body: body.into(),
            direction,
            queued: None,
            food,
            score: 0,
            phase: Phase::Running,
            rng: StdRng::seed_from_u64(seed),
            reported: false,
        }
    }

    pub fn grid_size(&self) -> i32 {
        self.grid_size
    }

    pub fn body(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn head(&self) -> Option<Cell> {
        self.body.front().copied()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn queued_direction(&self) -> Option<Direction> {
        self.queued
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Ended(_))
    }

    fn in_bounds(&self, c: Cell) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.grid_size && c.y < self.grid_size
    }

    /// Queue a heading change for the next tick. Returns whether it was accepted.
    pub fn steer(&mut self, dir: Direction) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        if dir == self.direction.opposite() {
            return false;
        }
        self.queued = Some(dir);
        true
    }

    /// Advance the round by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        match self.phase {
            Phase::Countdown(remaining) => {
                let left = remaining.saturating_sub(1);
                if left == 0 {
                    self.phase = Phase::Running;
                    TickOutcome::Started
                } else {
                    self.phase = Phase::Countdown(left);
                    TickOutcome::Countdown { remaining: left }
                }
            }
            Phase::Running => self.advance(),
            Phase::Ended(_) => TickOutcome::Finished,
        }
    }

    fn advance(&mut self) -> TickOutcome {
        if let Some(dir) = self.queued.take() {
            self.direction = dir;
        }
        let Some(head) = self.head() else {
            return self.end(EndCause::SelfCollision);
        };
        let next = head.step(self.direction);

        if !self.in_bounds(next) {
            return self.end(EndCause::OutOfBounds);
        }
        if self.body.contains(&next) {
            return self.end(EndCause::SelfCollision);
        }

        self.body.push_front(next);
        if next == self.food {
            self.score += 1;
            self.food = self.random_cell();
            TickOutcome::Ate { score: self.score }
        } else {
            self.body.pop_back();
            TickOutcome::Moved
        }
    }

    fn random_cell(&mut self) -> Cell {
        Cell::new(
            self.rng.gen_range(0..self.grid_size),
            self.rng.gen_range(0..self.grid_size),
        )
    }

    fn end(&mut self, cause: EndCause) -> TickOutcome {
        self.phase = Phase::Ended(cause);
        match self.take_report() {
            Some(score) => TickOutcome::Ended { score, cause },
            None => TickOutcome::Finished,
        }
    }

    fn take_report(&mut self) -> Option<u32> {
        if self.reported {
            return None;
        }
        self.reported = true;
        Some(self.score)
    }

    /// End the round early. Returns the score unless it was already reported.
    pub fn abandon(&mut self) -> Option<u32> {
        if !self.is_over() {
            self.phase = Phase::Ended(EndCause::Abandoned);
        }
        self.take_report()
    }

    /// ASCII board: `@` head, `o` body, `*` food, `.` empty, framed with `#`.
    pub fn render(&self) -> String {
        let size = self.grid_size as usize;
        let mut rows = vec![vec!['.'; size]; size];
        if self.in_bounds(self.food) {
            rows[self.food.y as usize][self.food.x as usize] = '*';
        }
        for (i, seg) in self.body.iter().enumerate() {
            if self.in_bounds(*seg) {
                rows[seg.y as usize][seg.x as usize] = if i == 0 { '@' } else { 'o' };
            }
        }
        let border: String = std::iter::repeat('#').take(size + 2).collect();
        let mut out = String::with_capacity((size + 3) * (size + 2));
        out.push_str(&border);
        out.push('\n');
        for row in rows {
            out.push('#');
            out.extend(row);
            out.push_str("#\n");
        }
        out.push_str(&border);
        out
    }
}
