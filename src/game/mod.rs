//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Hosts drive it with ticks and directions and read its state back for drawing.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{ConfigError, GameConfig};
pub use engine::{Simulation, TickOutcome};
pub use state::{GameState, Grid, Phase, Position, Segment, Snake};
