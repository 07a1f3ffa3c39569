use super::action::Direction;
use std::time::Duration;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Fixed-size grid whose edges wrap around
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of cells on the grid
    pub fn capacity(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    /// The neighbouring cell in `direction`, re-entering from the opposite
    /// edge when the step leaves the grid
    pub fn step(&self, pos: Position, direction: Direction) -> Position {
        match direction {
            Direction::Up => Position::new((pos.row + 1) % self.height, pos.col),
            Direction::Down => Position::new((pos.row + self.height - 1) % self.height, pos.col),
            Direction::Left => Position::new(pos.row, (pos.col + self.width - 1) % self.width),
            Direction::Right => Position::new(pos.row, (pos.col + 1) % self.width),
        }
    }

    /// Where `segment` ends up after one move; its direction is left alone
    pub fn advance(&self, segment: &Segment) -> Position {
        self.step(segment.position, segment.direction)
    }
}

/// One unit of the snake's body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub position: Position,
    pub direction: Direction,
}

impl Segment {
    pub fn new(position: Position, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }
}

/// The snake in the game, head first
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    segments: Vec<Segment>,
}

impl Snake {
    /// Create the starting snake: a straight line on row 0 heading right,
    /// head at column `length - 1` and tail at column 0
    pub fn new(length: usize) -> Self {
        let length = length.max(1);
        let segments = (0..length)
            .rev()
            .map(|col| Segment::new(Position::new(0, col), Direction::Right))
            .collect();

        Self { segments }
    }

    /// Build a snake from explicit segments, head first
    ///
    /// # Panics
    ///
    /// Panics if `segments` is empty.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        assert!(!segments.is_empty(), "a snake needs at least one segment");
        Self { segments }
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn tail(&self) -> &Segment {
        &self.segments[self.segments.len() - 1]
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    pub(crate) fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.segments.iter().map(|segment| segment.position)
    }

    /// Check if any segment sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.positions().any(|p| p == pos)
    }

    /// Check `pos` against every segment except the head and the tail.
    ///
    /// The tail vacates its cell during the same tick, so running into it
    /// is allowed.
    pub fn body_collides(&self, pos: Position) -> bool {
        let interior = self.segments.len().saturating_sub(2);
        self.segments
            .iter()
            .skip(1)
            .take(interior)
            .any(|segment| segment.position == pos)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a snake built through `new` or `from_segments`
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Where the game is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Running,
    GameOver,
    Won,
}

/// Score and lifecycle bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub score: u32,
    pub elapsed: Duration,
    pub phase: Phase,
    pub high_score: u32,
    pub win_score: u32,
}

impl GameState {
    pub fn new(win_score: u32) -> Self {
        Self {
            score: 0,
            elapsed: Duration::ZERO,
            phase: Phase::Running,
            high_score: 0,
            win_score,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn has_won(&self) -> bool {
        self.phase == Phase::Won
    }

    /// Clear the per-game fields, keeping the high score
    pub(crate) fn reset(&mut self) {
        self.score = 0;
        self.elapsed = Duration::ZERO;
        self.phase = Phase::Running;
    }
}
