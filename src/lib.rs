//! Snake on a wrap-around grid
//!
//! This library provides:
//! - Core simulation (game module), free of I/O and rendering
//! - Pixel and terminal rendering (render module)
//! - Keyboard mapping (input module)
//! - The interactive terminal host (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
