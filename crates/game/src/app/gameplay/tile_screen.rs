use std::collections::HashSet;
use std::sync::Arc;

use engine::RenderSurface;

use super::drawing::SpriteRenderer;
use super::geometry::Point;
use super::world_map::WorldError;

pub type TileId = u32;

/// Tile ids that block movement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolidTiles(HashSet<TileId>);

impl SolidTiles {
    pub fn contains(&self, id: TileId) -> bool {
        self.0.contains(&id)
    }
}

impl FromIterator<TileId> for SolidTiles {
    fn from_iter<I: IntoIterator<Item = TileId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone)]
pub struct TileScreen {
    cols: usize,
    rows: usize,
    tiles: Vec<TileId>,
    solid: Arc<SolidTiles>,
}

impl TileScreen {
    pub fn new(grid: Vec<Vec<TileId>>, solid: Arc<SolidTiles>) -> Result<Self, WorldError> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(WorldError::EmptyScreen);
        }

        let mut tiles = Vec::with_capacity(rows * cols);
        for (row, line) in grid.into_iter().enumerate() {
            if line.len() != cols {
                return Err(WorldError::RaggedScreen {
                    row,
                    expected: cols,
                    actual: line.len(),
                });
            }
            tiles.extend(line);
        }

        Ok(Self {
            cols,
            rows,
            tiles,
            solid,
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tile(&self, col: usize, row: usize) -> Option<TileId> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.tiles.get(row * self.cols + col).copied()
    }

    /// Tiles outside this screen are not solid here; the world map decides
    /// what lies beyond a screen's edge.
    pub fn is_tile_solid(&self, col: usize, row: usize) -> bool {
        self.tile(col, row)
            .is_some_and(|id| self.solid.contains(id))
    }

    pub fn draw(
        &self,
        surface: &mut dyn RenderSurface,
        tiles: &SpriteRenderer,
        tile_width: u32,
        tile_height: u32,
        origin: Point,
    ) {
        for (index, id) in self.tiles.iter().enumerate() {
            let col = (index % self.cols) as i32;
            let row = (index / self.cols) as i32;
            tiles.draw(
                surface,
                *id,
                origin.x + col * tile_width as i32,
                origin.y + row * tile_height as i32,
                false,
            );
        }
    }
}
