//! Pixel rasterizer for hosts that draw into an image.
//!
//! Every cell becomes a square tile of `cell_size` pixels. Tiles other than
//! empty space get a one pixel frame. Row `height - 1` is drawn at the top.

use crate::game::{Grid, Position, Snake};

pub type Rgba = [u8; 4];

pub const SPACE: Rgba = [255, 255, 255, 255];
pub const BODY: Rgba = [255, 105, 180, 255];
pub const HEAD: Rgba = [0, 206, 209, 255];
pub const FOOD: Rgba = [255, 127, 80, 255];
pub const FOOD_BORDER: Rgba = [171, 141, 59, 255];

/// What occupies a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Space,
    Body,
    Head,
    Food,
}

impl Tile {
    fn colors(self) -> (Rgba, Rgba) {
        match self {
            Tile::Space => (SPACE, SPACE),
            Tile::Body => (SPACE, BODY),
            Tile::Head => (SPACE, HEAD),
            Tile::Food => (FOOD_BORDER, FOOD),
        }
    }
}

/// Row-major RGBA image
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl Raster {
    fn filled(width: usize, height: usize, color: Rgba) -> Self {
        let pixels = color
            .iter()
            .copied()
            .cycle()
            .take(width * height * 4)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Color at pixel (x, y), x to the right and y downward
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        let offset = (y * self.width + x) * 4;
        let mut color = [0; 4];
        color.copy_from_slice(&self.pixels[offset..offset + 4]);
        color
    }

    fn set(&mut self, x: usize, y: usize, color: Rgba) {
        let offset = (y * self.width + x) * 4;
        self.pixels[offset..offset + 4].copy_from_slice(&color);
    }
}

/// Top-left pixel of the tile for `pos`
pub fn tile_origin(grid: Grid, pos: Position, cell_size: usize) -> (usize, usize) {
    let x = pos.col * cell_size;
    let y = (grid.height - 1 - pos.row) * cell_size;
    (x, y)
}

/// Draw the board. Pure: the same inputs always give the same image.
pub fn rasterize(grid: Grid, snake: &Snake, food: Option<Position>, cell_size: usize) -> Raster {
    let mut raster = Raster::filled(grid.width * cell_size, grid.height * cell_size, SPACE);

    if let Some(food) = food {
        paint(&mut raster, grid, food, cell_size, Tile::Food);
    }
    for pos in snake.positions().skip(1) {
        paint(&mut raster, grid, pos, cell_size, Tile::Body);
    }
    paint(&mut raster, grid, snake.head().position, cell_size, Tile::Head);

    raster
}

fn paint(raster: &mut Raster, grid: Grid, pos: Position, cell_size: usize, tile: Tile) {
    let (x0, y0) = tile_origin(grid, pos, cell_size);
    let (border, fill) = tile.colors();
    for dy in 0..cell_size {
        for dx in 0..cell_size {
            let on_edge = dx == 0 || dy == 0 || dx == cell_size - 1 || dy == cell_size - 1;
            raster.set(x0 + dx, y0 + dy, if on_edge { border } else { fill });
        }
    }
}
