mod config;
mod definition;
mod drawing;
mod geometry;
mod hud;
mod player;
mod scene;
mod tile_screen;
mod viewport;
mod world_map;

pub use config::{CollisionInsets, GameConfig, ViewportMode};
pub use definition::{
    load_world_definition, BuiltWorld, ScreenCoord, ScreenDefinition, SpawnPoint,
    SpriteSheetPaths, WorldDefinition, WorldDefinitionError,
};
pub use drawing::{Drawable, FrameContext, SpriteRenderer};
pub use geometry::{Point, Rect, Vec2};
pub use hud::FpsDisplay;
pub use player::{sprite_cell, Facing, Player};
pub use scene::LonkScene;
pub use tile_screen::{SolidTiles, TileId, TileScreen};
pub use viewport::{Viewport, ViewportState, TRANSITION_COMPLETE};
pub use world_map::{WorldError, WorldMap};
