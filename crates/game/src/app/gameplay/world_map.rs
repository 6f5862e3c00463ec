use engine::RenderSurface;
use thiserror::Error;

use super::drawing::{Drawable, FrameContext};
use super::geometry::{Point, Rect};
use super::tile_screen::TileScreen;

#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("tile screen has no tiles")]
    EmptyScreen,
    #[error("tile screen row {row} has {actual} tiles, expected {expected}")]
    RaggedScreen {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("world map has no screens")]
    EmptyWorld,
    #[error("world map row {row} has {actual} screens, expected {expected}")]
    RaggedWorld {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error(
        "screen ({col}, {row}) is {actual_cols}x{actual_rows} tiles, expected {expected_cols}x{expected_rows}"
    )]
    ScreenSizeMismatch {
        col: usize,
        row: usize,
        expected_cols: usize,
        expected_rows: usize,
        actual_cols: usize,
        actual_rows: usize,
    },
    #[error("tile size must be non-zero, got {width}x{height}")]
    ZeroTileSize { width: u32, height: u32 },
    #[error(
        "collision insets {left}/{top}/{right}/{bottom} leave no box inside a {tile_width}x{tile_height} cell"
    )]
    InvalidCollisionInsets {
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
        tile_width: u32,
        tile_height: u32,
    },
    #[error("start screen ({col}, {row}) is outside the {screen_cols}x{screen_rows} screen grid")]
    StartScreenOutOfBounds {
        col: u32,
        row: u32,
        screen_cols: usize,
        screen_rows: usize,
    },
    #[error("player spawn ({x}, {y}) is outside 0..={max_x} x 0..={max_y}")]
    SpawnOutOfBounds { x: f32, y: f32, max_x: f32, max_y: f32 },
}

/// Grid of equally sized tile screens. Anything beyond the grid is solid.
#[derive(Debug, Clone)]
pub struct WorldMap {
    screens: Vec<TileScreen>,
    screen_cols: usize,
    screen_rows: usize,
    tile_width: u32,
    tile_height: u32,
}

impl WorldMap {
    pub fn new(
        screens: Vec<Vec<TileScreen>>,
        tile_width: u32,
        tile_height: u32,
    ) -> Result<Self, WorldError> {
        if tile_width == 0 || tile_height == 0 {
            return Err(WorldError::ZeroTileSize {
                width: tile_width,
                height: tile_height,
            });
        }

        let screen_rows = screens.len();
        let screen_cols = screens.first().map_or(0, Vec::len);
        if screen_rows == 0 || screen_cols == 0 {
            return Err(WorldError::EmptyWorld);
        }

        let mut flat = Vec::with_capacity(screen_rows * screen_cols);
        let mut expected_size: Option<(usize, usize)> = None;
        for (row, line) in screens.into_iter().enumerate() {
            if line.len() != screen_cols {
                return Err(WorldError::RaggedWorld {
                    row,
                    expected: screen_cols,
                    actual: line.len(),
                });
            }
            for (col, screen) in line.into_iter().enumerate() {
                let size = (screen.cols(), screen.rows());
                let (expected_cols, expected_rows) = *expected_size.get_or_insert(size);
                if size != (expected_cols, expected_rows) {
                    return Err(WorldError::ScreenSizeMismatch {
                        col,
                        row,
                        expected_cols,
                        expected_rows,
                        actual_cols: size.0,
                        actual_rows: size.1,
                    });
                }
                flat.push(screen);
            }
        }

        Ok(Self {
            screens: flat,
            screen_cols,
            screen_rows,
            tile_width,
            tile_height,
        })
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn screen_cols(&self) -> usize {
        self.screen_cols
    }

    pub fn screen_rows(&self) -> usize {
        self.screen_rows
    }

    pub fn screen_width_px(&self) -> u32 {
        self.screens[0].cols() as u32 * self.tile_width
    }

    pub fn screen_height_px(&self) -> u32 {
        self.screens[0].rows() as u32 * self.tile_height
    }

    pub fn pixel_width(&self) -> u32 {
        self.screen_width_px() * self.screen_cols as u32
    }

    pub fn pixel_height(&self) -> u32 {
        self.screen_height_px() * self.screen_rows as u32
    }

    pub fn screen(&self, col: i64, row: i64) -> Option<&TileScreen> {
        if col < 0 || row < 0 || col >= self.screen_cols as i64 || row >= self.screen_rows as i64
        {
            return None;
        }
        self.screens
            .get(row as usize * self.screen_cols + col as usize)
    }

    /// True if any tile under `rect` is solid or `rect` reaches past the map.
    pub fn has_collision(&self, rect: Rect) -> bool {
        let screen_w = self.screen_width_px() as f32;
        let screen_h = self.screen_height_px() as f32;
        let first_col = (rect.left / screen_w).floor() as i64;
        let last_col = (rect.right / screen_w).floor() as i64;
        let first_row = (rect.top / screen_h).floor() as i64;
        let last_row = (rect.bottom / screen_h).floor() as i64;

        for screen_row in first_row..=last_row {
            for screen_col in first_col..=last_col {
                let Some(screen) = self.screen(screen_col, screen_row) else {
                    return true;
                };
                let local = Rect {
                    left: rect.left - screen_col as f32 * screen_w,
                    top: rect.top - screen_row as f32 * screen_h,
                    right: rect.right - screen_col as f32 * screen_w,
                    bottom: rect.bottom - screen_row as f32 * screen_h,
                };
                if self.screen_has_solid_tile(screen, local) {
                    return true;
                }
            }
        }
        false
    }

    fn screen_has_solid_tile(&self, screen: &TileScreen, local: Rect) -> bool {
        let tile_w = self.tile_width as f32;
        let tile_h = self.tile_height as f32;
        let last_col = screen.cols() as i64 - 1;
        let last_row = screen.rows() as i64 - 1;
        let first_tile_col = ((local.left / tile_w).floor() as i64).clamp(0, last_col);
        let last_tile_col = ((local.right / tile_w).floor() as i64).clamp(0, last_col);
        let first_tile_row = ((local.top / tile_h).floor() as i64).clamp(0, last_row);
        let last_tile_row = ((local.bottom / tile_h).floor() as i64).clamp(0, last_row);

        (first_tile_row..=last_tile_row).any(|row| {
            (first_tile_col..=last_tile_col)
                .any(|col| screen.is_tile_solid(col as usize, row as usize))
        })
    }
}

impl Drawable for WorldMap {
    fn draw(&self, surface: &mut dyn RenderSurface, frame: &FrameContext<'_>) {
        let (view_w, surface_h) = surface.logical_size();
        let view_h = surface_h.saturating_sub(frame.play_area_top.max(0) as u32);
        if view_w == 0 || view_h == 0 {
            return;
        }
        let screen_w = self.screen_width_px() as i32;
        let screen_h = self.screen_height_px() as i32;
        let origin = frame.view_origin;

        let first_col = origin.x.div_euclid(screen_w);
        let last_col = (origin.x + view_w as i32 - 1).div_euclid(screen_w);
        let first_row = origin.y.div_euclid(screen_h);
        let last_row = (origin.y + view_h as i32 - 1).div_euclid(screen_h);

        for row in first_row..=last_row {
            for col in first_col..=last_col {
                let Some(screen) = self.screen(i64::from(col), i64::from(row)) else {
                    continue;
                };
                let at = frame.to_surface(Point::new(col * screen_w, row * screen_h));
                screen.draw(surface, frame.tiles, self.tile_width, self.tile_height, at);
            }
        }
    }
}
