use super::{
    action::Direction,
    config::{ConfigError, GameConfig},
    state::{GameState, Grid, Phase, Position, Segment, Snake},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whether the head was on the food at the start of the tick
    pub ate_food: bool,
    /// Phase after the tick
    pub phase: Phase,
}

/// The simulation that owns the grid, the snake, the food and the score.
///
/// The host drives it with [`Simulation::tick`] at a fixed rate and feeds it
/// directions through [`Simulation::set_direction`] in between.
pub struct Simulation {
    config: GameConfig,
    grid: Grid,
    snake: Snake,
    food: Option<Position>,
    state: GameState,
    rng: StdRng,
}

impl Simulation {
    /// Create a simulation and start the first game.
    ///
    /// Uses `config.seed` when set, entropy otherwise.
    ///
    /// # Panics
    ///
    /// The config is not validated here; a zero-sized grid panics on the
    /// first move. Use [`Simulation::try_new`] for configs from outside.
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Validate `config`, then create the simulation
    pub fn try_new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Create a simulation with a fixed food placement seed.
    ///
    /// Skips validation like [`Simulation::new`].
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let grid = Grid::new(config.grid_width, config.grid_height);
        let mut simulation = Self {
            grid,
            snake: Snake::new(config.initial_snake_length.min(grid.width)),
            food: None,
            state: GameState::new(config.win_score),
            rng,
            config,
        };
        simulation.start();
        simulation
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Put a fresh snake on the board, clear the score and spawn food
    pub fn start(&mut self) {
        let length = self.config.initial_snake_length.min(self.grid.width);
        self.snake = Snake::new(length);
        self.state.reset();
        self.spawn_food();
    }

    /// Record the high score and start a new game. Valid in any phase.
    pub fn restart(&mut self) {
        self.state.high_score = self.state.high_score.max(self.state.score);
        info!(
            score = self.state.score,
            high_score = self.state.high_score,
            "restarting game"
        );
        self.start();
    }

    /// Turn the head, unless that would reverse it into its own neck.
    ///
    /// Returns whether the turn was accepted. The new direction is used on
    /// the next tick; the last accepted call before a tick wins.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        let head = &mut self.snake.segments_mut()[0];
        if head.direction.is_opposite(direction) {
            return false;
        }
        head.direction = direction;
        true
    }

    /// Append a segment one cell behind the tail, travelling the same way
    pub fn grow(&mut self) {
        let tail = *self.snake.tail();
        let behind = self.grid.step(tail.position, tail.direction.opposite());
        self.snake.push(Segment::new(behind, tail.direction));
    }

    /// Place food on a random free cell and return it.
    ///
    /// Leaves the board without food when the snake covers every cell.
    pub fn spawn_food(&mut self) -> Option<Position> {
        let occupied: HashSet<Position> = self.snake.positions().collect();
        if occupied.len() >= self.grid.capacity() {
            self.food = None;
            return None;
        }

        let food = loop {
            let candidate = Position::new(
                self.rng.gen_range(0..self.grid.height),
                self.rng.gen_range(0..self.grid.width),
            );
            if !occupied.contains(&candidate) {
                break candidate;
            }
        };

        debug!(row = food.row, col = food.col, "spawned food");
        self.food = Some(food);
        self.food
    }

    /// Advance the game by one step of `dt`.
    ///
    /// Does nothing once the game is over or won.
    pub fn tick(&mut self, dt: Duration) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome {
                ate_food: false,
                phase: self.state.phase,
            };
        }

        // Food is eaten from where the head stood before this move.
        let ate_food = self.food == Some(self.snake.head().position);
        if ate_food {
            self.grow();
            self.state.score += 1;
            debug!(score = self.state.score, "ate food");

            if self.spawn_food().is_none() {
                info!(score = self.state.score, "board filled, game won");
                self.state.phase = Phase::Won;
                self.state.elapsed += dt;
                return TickOutcome {
                    ate_food,
                    phase: self.state.phase,
                };
            }
        }

        let grid = self.grid;
        let head_direction = self.snake.head().direction;
        let new_head = grid.advance(self.snake.head());
        self.snake.segments_mut()[0].position = new_head;

        if self.snake.body_collides(new_head) {
            info!(score = self.state.score, "snake ran into itself");
            self.state.phase = Phase::GameOver;
        }

        // Each segment moves the way it was heading, then takes over the
        // direction its leader had before this tick.
        let mut carried = head_direction;
        for segment in self.snake.segments_mut().iter_mut().skip(1) {
            segment.position = grid.advance(segment);
            carried = std::mem::replace(&mut segment.direction, carried);
        }

        if self.state.is_running() && self.state.score >= self.state.win_score {
            info!(score = self.state.score, "winning score reached");
            self.state.phase = Phase::Won;
        }

        self.state.elapsed += dt;

        TickOutcome {
            ate_food,
            phase: self.state.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: Duration = Duration::from_millis(100);

    fn simulation(config: GameConfig) -> Simulation {
        Simulation::with_seed(config, 42)
    }

    fn with_snake(sim: &mut Simulation, segments: Vec<Segment>) {
        sim.snake = Snake::from_segments(segments);
    }

    fn seg(row: usize, col: usize, direction: Direction) -> Segment {
        Segment::new(Position::new(row, col), direction)
    }

    #[test]
    fn test_start() {
        let sim = simulation(GameConfig::default());

        assert_eq!(sim.snake().len(), 6);
        assert!(
            sim.snake()
                .segments()
                .iter()
                .all(|s| s.direction == Direction::Right)
        );

        let food = sim.food().unwrap();
        assert!(sim.grid().contains(food));
        assert!(!sim.snake().occupies(food));

        assert!(sim.state().is_running());
        assert_eq!(sim.state().score, 0);
        assert_eq!(sim.state().elapsed, Duration::ZERO);
    }

    #[test]
    fn test_try_new_rejects_empty_grid() {
        let config = GameConfig {
            grid_width: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            Simulation::try_new(config),
            Err(ConfigError::Invalid(_))
        ));

        let sim = Simulation::try_new(GameConfig::default()).unwrap();
        assert_eq!(sim.snake().len(), 6);
    }

    #[test]
    fn test_basic_movement() {
        let mut sim = simulation(GameConfig::default());
        sim.food = Some(Position::new(10, 10));

        let outcome = sim.tick(DT);

        assert!(!outcome.ate_food);
        assert_eq!(outcome.phase, Phase::Running);
        let cols: Vec<usize> = sim.snake().positions().map(|p| p.col).collect();
        assert_eq!(cols, vec![6, 5, 4, 3, 2, 1]);
        assert_eq!(sim.state().elapsed, DT);
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut sim = simulation(GameConfig::default());

        assert!(!sim.set_direction(Direction::Left));
        assert_eq!(sim.snake().head().direction, Direction::Right);

        assert!(sim.set_direction(Direction::Up));
        assert!(!sim.set_direction(Direction::Down));
        assert_eq!(sim.snake().head().direction, Direction::Up);
    }

    #[test]
    fn test_last_turn_before_tick_wins() {
        let mut sim = simulation(GameConfig::default());
        sim.food = Some(Position::new(10, 10));

        assert!(sim.set_direction(Direction::Up));
        assert!(sim.set_direction(Direction::Left));
        sim.tick(DT);

        assert_eq!(sim.snake().head().direction, Direction::Left);
        assert_eq!(sim.snake().head().position, Position::new(0, 4));
        // Two quick turns fold the head back onto its neck.
        assert!(sim.state().is_over());
    }

    #[test]
    fn test_direction_propagates_one_segment_per_tick() {
        let mut sim = simulation(GameConfig::default());
        sim.food = Some(Position::new(10, 10));

        sim.set_direction(Direction::Up);
        sim.tick(DT);

        let segments = sim.snake().segments();
        assert_eq!(segments[0].direction, Direction::Up);
        assert_eq!(segments[0].position, Position::new(1, 5));
        assert_eq!(segments[1].direction, Direction::Up);
        assert_eq!(segments[1].position, Position::new(0, 5));
        assert_eq!(segments[2].direction, Direction::Right);

        sim.tick(DT);

        let segments = sim.snake().segments();
        assert_eq!(segments[1].position, Position::new(1, 5));
        assert_eq!(segments[2].position, Position::new(0, 5));
        assert_eq!(segments[2].direction, Direction::Up);
        assert_eq!(segments[3].direction, Direction::Right);
    }

    #[test]
    fn test_turn_then_left_keeps_body_connected() {
        let mut sim = simulation(GameConfig::default());
        sim.food = Some(Position::new(10, 10));

        sim.set_direction(Direction::Up);
        sim.tick(DT);
        sim.set_direction(Direction::Left);
        for _ in 0..sim.snake().len() {
            sim.tick(DT);
        }

        assert!(sim.state().is_running());
        assert!(
            sim.snake()
                .segments()
                .iter()
                .all(|s| s.direction == Direction::Left)
        );
        let grid = sim.grid();
        for pair in sim.snake().segments().windows(2) {
            assert_eq!(grid.step(pair[1].position, pair[1].direction), pair[0].position);
        }
    }

    #[test]
    fn test_grow_extends_behind_tail() {
        let mut sim = simulation(GameConfig::default());
        let tail = *sim.snake().tail();

        sim.grow();

        assert_eq!(sim.snake().len(), 7);
        let new_tail = sim.snake().tail();
        assert_eq!(new_tail.direction, tail.direction);
        // The starting tail sits on column 0, so the new one wraps to the far edge.
        assert_eq!(new_tail.position, Position::new(0, 19));
    }

    #[test]
    fn test_grow_follows_tail_direction() {
        let mut sim = simulation(GameConfig::default());
        let cases = [
            (Direction::Right, Position::new(5, 4)),
            (Direction::Left, Position::new(5, 6)),
            (Direction::Up, Position::new(4, 5)),
            (Direction::Down, Position::new(6, 5)),
        ];

        for (direction, expected) in cases {
            with_snake(&mut sim, vec![seg(8, 8, Direction::Right), seg(5, 5, direction)]);
            sim.grow();
            assert_eq!(sim.snake().len(), 3);
            assert_eq!(sim.snake().tail().position, expected);
            assert_eq!(sim.snake().tail().direction, direction);
        }
    }

    #[test]
    fn test_food_consumption() {
        let mut sim = simulation(GameConfig::default());
        let head = sim.snake().head().position;
        sim.food = Some(head);

        let outcome = sim.tick(DT);

        assert!(outcome.ate_food);
        assert_eq!(sim.state().score, 1);
        assert_eq!(sim.snake().len(), 7);
        let food = sim.food().unwrap();
        assert!(!sim.snake().occupies(food));
        assert!(sim.grid().contains(food));
    }

    #[test]
    fn test_food_is_eaten_the_tick_after_reaching_it() {
        let mut sim = simulation(GameConfig::default());
        sim.food = Some(Position::new(0, 6));

        assert!(!sim.tick(DT).ate_food);
        assert_eq!(sim.snake().head().position, Position::new(0, 6));
        assert_eq!(sim.state().score, 0);

        assert!(sim.tick(DT).ate_food);
        assert_eq!(sim.state().score, 1);
    }

    #[test]
    fn test_spawn_food_never_on_snake() {
        let mut sim = simulation(GameConfig::default());
        for _ in 0..1000 {
            let food = sim.spawn_food().unwrap();
            assert!(!sim.snake().occupies(food));
            assert!(sim.grid().contains(food));
        }
    }

    #[test]
    fn test_spawn_food_reaches_every_edge() {
        let mut sim = simulation(GameConfig::small());
        let mut rows = HashSet::new();
        let mut cols = HashSet::new();
        for _ in 0..2000 {
            let food = sim.spawn_food().unwrap();
            rows.insert(food.row);
            cols.insert(food.col);
        }
        assert_eq!(rows.len(), 10);
        assert_eq!(cols.len(), 10);
    }

    #[test]
    fn test_spawn_food_on_full_board() {
        let config = GameConfig {
            grid_width: 3,
            grid_height: 1,
            initial_snake_length: 3,
            win_score: 1,
            ..GameConfig::default()
        };
        let mut sim = simulation(config);

        assert_eq!(sim.food(), None);
        assert_eq!(sim.spawn_food(), None);
    }

    #[test]
    fn test_self_collision() {
        let mut sim = simulation(GameConfig::default());
        sim.food = Some(Position::new(20, 0));
        with_snake(
            &mut sim,
            vec![
                seg(5, 5, Direction::Right),
                seg(5, 4, Direction::Right),
                seg(5, 3, Direction::Right),
                seg(5, 2, Direction::Right),
                seg(5, 1, Direction::Right),
            ],
        );

        sim.set_direction(Direction::Up);
        assert_eq!(sim.tick(DT).phase, Phase::Running);
        sim.set_direction(Direction::Left);
        assert_eq!(sim.tick(DT).phase, Phase::Running);
        sim.set_direction(Direction::Down);
        let outcome = sim.tick(DT);

        assert_eq!(outcome.phase, Phase::GameOver);
        assert!(sim.state().is_over());
        assert_eq!(sim.snake().head().position, Position::new(5, 4));
    }

    #[test]
    fn test_running_into_tail_is_safe() {
        let mut sim = simulation(GameConfig::small());
        sim.food = Some(Position::new(8, 8));
        with_snake(
            &mut sim,
            vec![
                seg(0, 0, Direction::Right),
                seg(1, 0, Direction::Down),
                seg(1, 1, Direction::Left),
                seg(0, 1, Direction::Up),
            ],
        );

        let outcome = sim.tick(DT);

        assert_eq!(outcome.phase, Phase::Running);
        let positions: Vec<Position> = sim.snake().positions().collect();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 1),
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut sim = simulation(GameConfig::default());
        sim.state.phase = Phase::GameOver;
        let snake = sim.snake().clone();
        let food = sim.food();
        let state = sim.state().clone();

        let outcome = sim.tick(DT);

        assert_eq!(outcome.phase, Phase::GameOver);
        assert!(!outcome.ate_food);
        assert_eq!(sim.snake(), &snake);
        assert_eq!(sim.food(), food);
        assert_eq!(sim.state(), &state);
    }

    #[test]
    fn test_reaching_win_score() {
        let config = GameConfig {
            win_score: 2,
            ..GameConfig::small()
        };
        let mut sim = simulation(config);

        sim.food = Some(sim.snake().head().position);
        assert_eq!(sim.tick(DT).phase, Phase::Running);

        sim.food = Some(sim.snake().head().position);
        assert_eq!(sim.tick(DT).phase, Phase::Won);
        assert!(sim.state().has_won());
        assert_eq!(sim.state().score, 2);

        let snake = sim.snake().clone();
        let elapsed = sim.state().elapsed;
        sim.tick(DT);
        assert_eq!(sim.snake(), &snake);
        assert_eq!(sim.state().elapsed, elapsed);
        assert_eq!(sim.state().score, 2);
    }

    #[test]
    fn test_filling_the_board_wins() {
        let config = GameConfig {
            grid_width: 3,
            grid_height: 1,
            initial_snake_length: 2,
            win_score: 1,
            ..GameConfig::default()
        };
        let mut sim = simulation(config);
        assert_eq!(sim.food(), Some(Position::new(0, 2)));

        sim.tick(DT);
        assert_eq!(sim.snake().head().position, Position::new(0, 2));

        let outcome = sim.tick(DT);

        assert!(outcome.ate_food);
        assert_eq!(outcome.phase, Phase::Won);
        assert_eq!(sim.snake().len(), 3);
        assert_eq!(sim.food(), None);
        assert_eq!(sim.state().elapsed, DT * 2);
    }

    #[test]
    fn test_restart_tracks_high_score() {
        let mut sim = simulation(GameConfig::default());
        sim.state.score = 12;
        sim.state.phase = Phase::GameOver;
        sim.state.elapsed = Duration::from_secs(30);
        sim.grow();

        sim.restart();

        assert_eq!(sim.state().high_score, 12);
        assert_eq!(sim.state().score, 0);
        assert_eq!(sim.state().elapsed, Duration::ZERO);
        assert!(sim.state().is_running());
        assert_eq!(sim.snake(), &Snake::new(6));
        assert!(!sim.snake().occupies(sim.food().unwrap()));

        sim.state.score = 5;
        sim.restart();
        assert_eq!(sim.state().high_score, 12);
    }

    #[test]
    fn test_restart_while_running() {
        let mut sim = simulation(GameConfig::default());
        sim.food = Some(Position::new(10, 10));
        sim.tick(DT);
        sim.tick(DT);

        sim.restart();

        assert!(sim.state().is_running());
        assert_eq!(sim.snake().head().position, Position::new(0, 5));
        assert_eq!(sim.state().elapsed, Duration::ZERO);
    }
}
