pub mod raster;
pub mod renderer;

pub use raster::{Raster, rasterize};
pub use renderer::Renderer;

use crate::game::GameState;

/// One-line summary shown above the board
pub fn status_line(state: &GameState) -> String {
    format!(
        "Score: {}    High: {}    Time: {}",
        state.score,
        state.high_score,
        state.elapsed.as_secs()
    )
}
