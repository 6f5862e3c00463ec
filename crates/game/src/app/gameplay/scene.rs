use engine::{InputSnapshot, LoopMetricsSnapshot, RenderSurface, Scene};

use super::config::GameConfig;
use super::drawing::{Drawable, FrameContext, SpriteRenderer};
use super::geometry::{Point, Vec2};
use super::hud::FpsDisplay;
use super::player::Player;
use super::viewport::Viewport;
use super::world_map::WorldMap;

const CLEAR_COLOR: [u8; 4] = [0, 0, 0, 255];

pub struct LonkScene {
    config: GameConfig,
    world: WorldMap,
    player: Player,
    viewport: Viewport,
    hud: FpsDisplay,
    tiles: SpriteRenderer,
    sprites: SpriteRenderer,
}

impl LonkScene {
    pub fn new(
        config: GameConfig,
        world: WorldMap,
        spawn: Vec2,
        start_origin: Point,
        tiles: SpriteRenderer,
        sprites: SpriteRenderer,
    ) -> Self {
        let viewport = Viewport::new(&config, &world, start_origin);
        Self {
            config,
            world,
            player: Player::new(spawn),
            viewport,
            hud: FpsDisplay::default(),
            tiles,
            sprites,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &WorldMap {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn hud(&self) -> &FpsDisplay {
        &self.hud
    }

    fn frame_context(&self, interpolation: f32) -> FrameContext<'_> {
        let actor = self.player.interpolated_position(interpolation);
        FrameContext {
            interpolation,
            view_origin: self.viewport.render_origin(actor),
            play_area_top: self.config.game_bar_height_px() as i32,
            tiles: &self.tiles,
            sprites: &self.sprites,
        }
    }
}

impl Scene for LonkScene {
    fn update(&mut self, input: &InputSnapshot) {
        if self.viewport.is_transitioning() {
            self.player.hold();
        } else {
            self.player.update(input, &self.world, &self.config);
        }
        self.viewport.update(self.player.position());
    }

    fn render(&self, surface: &mut dyn RenderSurface, interpolation: f32) {
        surface.clear(CLEAR_COLOR);
        let frame = self.frame_context(interpolation);
        let layers: [&dyn Drawable; 3] = [&self.world, &self.player, &self.hud];
        for layer in layers {
            layer.draw(surface, &frame);
        }
    }

    fn metrics_updated(&mut self, snapshot: LoopMetricsSnapshot) {
        self.hud.set_fps(snapshot.fps);
    }

    fn debug_title(&self) -> Option<String> {
        Some(format!("Lonk | {}", self.hud.label()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use engine::Direction;

    use super::*;
    use crate::app::gameplay::config::ViewportMode;
    use crate::app::gameplay::drawing::test_support::{blank_sheet, DrawCall, RecordingSurface};
    use crate::app::gameplay::tile_screen::{SolidTiles, TileScreen};

    fn scene(config: GameConfig, spawn: Vec2, start_origin: Point) -> LonkScene {
        let screen = TileScreen::new(vec![vec![0; 10]; 8], Arc::new(SolidTiles::default()))
            .expect("screen");
        let world = WorldMap::new(vec![vec![screen.clone(), screen]], 16, 16).expect("world");
        LonkScene::new(
            config,
            world,
            spawn,
            start_origin,
            SpriteRenderer::new(blank_sheet(256, 160), 16, 16),
            SpriteRenderer::new(blank_sheet(64, 16), 16, 16),
        )
    }

    #[test]
    fn player_freezes_while_viewport_scrolls() {
        let mut scene = scene(GameConfig::default(), Vec2::new(148.0, 60.0), Point::new(0, 0));
        let right = InputSnapshot::from_directions(&[Direction::Right]);

        // Centre moves from 156 to 158: still the left screen.
        scene.update(&right);
        assert!(!scene.viewport().is_transitioning());
        // Centre reaches 160: transition starts.
        scene.update(&right);
        assert!(scene.viewport().is_transitioning());
        let frozen_at = scene.player().position();

        scene.update(&right);
        assert_eq!(scene.player().position(), frozen_at);
        assert_eq!(scene.player().previous_position(), frozen_at);
    }

    #[test]
    fn movement_resumes_after_commit() {
        let mut scene = scene(GameConfig::default(), Vec2::new(148.0, 60.0), Point::new(0, 0));
        let right = InputSnapshot::from_directions(&[Direction::Right]);

        scene.update(&right);
        scene.update(&right);
        let frozen_at = scene.player().position();
        for _ in 0..16 {
            scene.update(&right);
        }
        assert!(!scene.viewport().is_transitioning());
        assert_eq!(scene.viewport().origin(), Point::new(160, 0));
        assert_eq!(scene.player().position(), frozen_at);

        scene.update(&right);
        assert!(scene.player().position().x > frozen_at.x);
    }

    #[test]
    fn centered_mode_never_freezes_player() {
        let config = GameConfig {
            viewport_mode: ViewportMode::Centered,
            ..GameConfig::default()
        };
        let mut scene = scene(config, Vec2::new(146.0, 60.0), Point::new(0, 0));
        let right = InputSnapshot::from_directions(&[Direction::Right]);
        for step in 1..=5 {
            scene.update(&right);
            assert_eq!(scene.player().position().x, 146.0 + 2.0 * step as f32);
        }
    }

    #[test]
    fn metrics_update_the_hud() {
        let mut scene = scene(GameConfig::default(), Vec2::new(20.0, 20.0), Point::new(0, 0));
        scene.metrics_updated(LoopMetricsSnapshot {
            fps: 58,
            tps: 30,
            frame_time_ms: 17.2,
        });
        assert_eq!(scene.hud().fps(), 58);
        assert_eq!(scene.debug_title().as_deref(), Some("Lonk | FPS: 58"));
    }

    #[test]
    fn render_draws_world_then_player_then_hud() {
        let scene = scene(GameConfig::default(), Vec2::new(20.0, 20.0), Point::new(0, 0));
        let mut surface = RecordingSurface::with_size(160, 144);

        scene.render(&mut surface, 0.0);

        assert_eq!(surface.calls.first(), Some(&DrawCall::Clear));
        // 80 tiles of the visible screen, then the player sprite.
        let images = surface.images();
        assert_eq!(images.len(), 81);
        assert!(matches!(
            images[80],
            DrawCall::Image {
                sheet_width: 64,
                x: 20,
                y: 36,
                ..
            }
        ));
        assert!(matches!(
            surface.calls.last(),
            Some(DrawCall::Text { .. })
        ));
    }
}
