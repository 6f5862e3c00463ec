use std::env;
use std::path::{Path, PathBuf};

use engine::{resolve_app_paths, LoopConfig, Scene, SpriteSheet, SpriteSheetError, StartupError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::gameplay::{
    load_world_definition, LonkScene, SpriteRenderer, WorldDefinition, WorldDefinitionError,
    WorldError,
};

const WORLD_ENV_VAR: &str = "LONK_WORLD";
const DEFAULT_WORLD_FILE: &str = "world.json";

pub struct AppWiring {
    pub config: LoopConfig,
    pub scene: Box<dyn Scene>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Definition(#[from] WorldDefinitionError),
    #[error("world definition is invalid: {0}")]
    World(#[from] WorldError),
    #[error("failed to load {role} sprite sheet: {source}")]
    SpriteSheet {
        role: &'static str,
        #[source]
        source: SpriteSheetError,
    },
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

pub fn build_app() -> Result<AppWiring, BootstrapError> {
    let paths = resolve_app_paths()?;
    let world_path = world_definition_path(&paths.assets_dir);
    info!(
        root = %paths.root.display(),
        world = %world_path.display(),
        "startup"
    );

    let definition = load_world_definition(&world_path)?;
    let (scene, config) = build_scene(&definition, &paths.assets_dir)?;
    Ok(AppWiring {
        config,
        scene: Box::new(scene),
    })
}

pub fn build_scene(
    definition: &WorldDefinition,
    assets_dir: &Path,
) -> Result<(LonkScene, LoopConfig), BootstrapError> {
    let built = definition.build_world()?;
    let game_config = definition.config.clone();

    let tiles = load_sheet("tiles", &assets_dir.join(&definition.sprite_sheets.tiles))?;
    let sprites = load_sheet("player", &assets_dir.join(&definition.sprite_sheets.player))?;

    let loop_config = game_config.loop_config(
        built.world.screen_width_px(),
        built.world.screen_height_px(),
    );
    let scene = LonkScene::new(
        game_config.clone(),
        built.world,
        built.spawn,
        built.start_origin,
        SpriteRenderer::new(tiles, game_config.tile_width, game_config.tile_height),
        SpriteRenderer::new(sprites, game_config.tile_width, game_config.tile_height),
    );
    Ok((scene, loop_config))
}

fn load_sheet(role: &'static str, path: &Path) -> Result<SpriteSheet, BootstrapError> {
    SpriteSheet::load(path).map_err(|source| BootstrapError::SpriteSheet { role, source })
}

fn world_definition_path(assets_dir: &Path) -> PathBuf {
    env::var_os(WORLD_ENV_VAR)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| assets_dir.join(DEFAULT_WORLD_FILE))
}
