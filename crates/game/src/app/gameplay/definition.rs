use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use super::config::GameConfig;
use super::geometry::{Point, Vec2};
use super::tile_screen::{SolidTiles, TileId, TileScreen};
use super::world_map::{WorldError, WorldMap};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldDefinition {
    #[serde(default)]
    pub config: GameConfig,
    pub sprite_sheets: SpriteSheetPaths,
    pub solid_tiles: Vec<TileId>,
    pub player_spawn: SpawnPoint,
    pub start_screen: ScreenCoord,
    /// Indexed `screens[row][col]`.
    pub screens: Vec<Vec<ScreenDefinition>>,
}

/// Paths relative to the assets directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpriteSheetPaths {
    pub tiles: PathBuf,
    pub player: PathBuf,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScreenCoord {
    pub col: u32,
    pub row: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScreenDefinition {
    pub tiles: Vec<Vec<TileId>>,
}

#[derive(Debug, Error)]
pub enum WorldDefinitionError {
    #[error("failed to read world definition {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse world definition {path} at {field_path}: {source}")]
    Parse {
        path: PathBuf,
        field_path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load_world_definition(path: &Path) -> Result<WorldDefinition, WorldDefinitionError> {
    let raw = fs::read_to_string(path).map_err(|source| WorldDefinitionError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_world_definition(&raw).map_err(|(field_path, source)| WorldDefinitionError::Parse {
        path: path.to_path_buf(),
        field_path,
        source,
    })
}

fn parse_world_definition(raw: &str) -> Result<WorldDefinition, (String, serde_json::Error)> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let field_path = error.path().to_string();
        (field_path, error.into_inner())
    })
}

#[derive(Debug, Clone)]
pub struct BuiltWorld {
    pub world: WorldMap,
    pub spawn: Vec2,
    pub start_origin: Point,
}

impl WorldDefinition {
    pub fn build_world(&self) -> Result<BuiltWorld, WorldError> {
        let solid: Arc<SolidTiles> = Arc::new(self.solid_tiles.iter().copied().collect());
        let screens = self
            .screens
            .iter()
            .map(|row| {
                row.iter()
                    .map(|screen| TileScreen::new(screen.tiles.clone(), Arc::clone(&solid)))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let world = WorldMap::new(screens, self.config.tile_width, self.config.tile_height)?;

        let insets = self.config.collision_insets;
        if !insets.fits(self.config.tile_width, self.config.tile_height) {
            return Err(WorldError::InvalidCollisionInsets {
                left: insets.left,
                top: insets.top,
                right: insets.right,
                bottom: insets.bottom,
                tile_width: self.config.tile_width,
                tile_height: self.config.tile_height,
            });
        }

        let start_origin = start_origin(&world, self.start_screen)?;
        let spawn = Vec2::new(self.player_spawn.x, self.player_spawn.y);
        check_spawn(&world, spawn)?;
        Ok(BuiltWorld {
            world,
            spawn,
            start_origin,
        })
    }
}

fn start_origin(world: &WorldMap, start: ScreenCoord) -> Result<Point, WorldError> {
    let out_of_bounds = WorldError::StartScreenOutOfBounds {
        col: start.col,
        row: start.row,
        screen_cols: world.screen_cols(),
        screen_rows: world.screen_rows(),
    };
    if start.col as usize >= world.screen_cols() || start.row as usize >= world.screen_rows() {
        return Err(out_of_bounds);
    }
    let to_px = |index: u32, size: u32| {
        index
            .checked_mul(size)
            .and_then(|px| i32::try_from(px).ok())
    };
    match (
        to_px(start.col, world.screen_width_px()),
        to_px(start.row, world.screen_height_px()),
    ) {
        (Some(x), Some(y)) => Ok(Point::new(x, y)),
        _ => Err(out_of_bounds),
    }
}

// The sprite cell has to lie fully inside the world.
fn check_spawn(world: &WorldMap, spawn: Vec2) -> Result<(), WorldError> {
    let max_x = world.pixel_width().saturating_sub(world.tile_width()) as f32;
    let max_y = world.pixel_height().saturating_sub(world.tile_height()) as f32;
    if (0.0..=max_x).contains(&spawn.x) && (0.0..=max_y).contains(&spawn.y) {
        Ok(())
    } else {
        Err(WorldError::SpawnOutOfBounds {
            x: spawn.x,
            y: spawn.y,
            max_x,
            max_y,
        })
    }
}
