use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the game, fixed once a simulation is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid (columns)
    pub grid_width: usize,
    /// Height of the game grid (rows)
    pub grid_height: usize,
    /// Length of the snake after every (re)start
    pub initial_snake_length: usize,
    /// Score at which the game is won
    pub win_score: u32,
    /// Side of one cell in pixels, only used by the pixel rasterizer
    pub cell_size: usize,
    /// Milliseconds between two simulation ticks
    pub tick_interval_ms: u64,
    /// Fixed seed for food placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(20, 23)
    }
}

impl GameConfig {
    pub const INITIAL_SNAKE_LENGTH: usize = 6;

    /// Create a configuration for the given grid.
    ///
    /// The winning score is the number of foods needed to fill every cell,
    /// which for the reference 20x23 grid is 454.
    pub fn new(width: usize, height: usize) -> Self {
        let capacity = width * height;
        Self {
            grid_width: width,
            grid_height: height,
            initial_snake_length: Self::INITIAL_SNAKE_LENGTH,
            win_score: capacity.saturating_sub(Self::INITIAL_SNAKE_LENGTH) as u32,
            cell_size: 24,
            tick_interval_ms: 100,
            seed: None,
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn capacity(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Parse a TOML document; missing keys fall back to the defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.initial_snake_length == 0 {
            return Err(ConfigError::Invalid(
                "initial snake length must be at least 1".to_string(),
            ));
        }
        if self.initial_snake_length > self.grid_width {
            return Err(ConfigError::Invalid(format!(
                "initial snake length {} does not fit in a row of {} cells",
                self.initial_snake_length, self.grid_width
            )));
        }
        if self.cell_size == 0 {
            return Err(ConfigError::Invalid("cell size must be non-zero".to_string()));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick interval must be non-zero".to_string(),
            ));
        }
        if self.win_score == 0 {
            return Err(ConfigError::Invalid("win score must be non-zero".to_string()));
        }
        // Every point adds a segment, so the final snake must fit on the board.
        let final_length = self.initial_snake_length + self.win_score as usize;
        if final_length > self.capacity() {
            return Err(ConfigError::Invalid(format!(
                "win score {} needs a snake of {} cells but the grid only has {}",
                self.win_score,
                final_length,
                self.capacity()
            )));
        }
        Ok(())
    }
}
