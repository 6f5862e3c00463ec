use tracing::info;

use super::config::{GameConfig, ViewportMode};
use super::geometry::{Point, Vec2};
use super::world_map::WorldMap;

pub const TRANSITION_COMPLETE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportState {
    Idle,
    Transitioning { target: Point, progress: u32 },
}

/// Tracks which part of the world is visible.
///
/// In tiled mode the origin snaps to screen boundaries and moving to another
/// screen scrolls there over a fixed number of simulation ticks. In centered
/// mode the origin follows the actor every tick and never transitions.
#[derive(Debug, Clone)]
pub struct Viewport {
    mode: ViewportMode,
    origin: Point,
    state: ViewportState,
    step: u32,
    view_width: u32,
    view_height: u32,
    world_width: u32,
    world_height: u32,
    sprite_width: u32,
    sprite_height: u32,
    clamp_to_world: bool,
}

impl Viewport {
    pub fn new(config: &GameConfig, world: &WorldMap, origin: Point) -> Self {
        Self {
            mode: config.viewport_mode,
            origin,
            state: ViewportState::Idle,
            step: config.transition_step.max(1),
            view_width: world.screen_width_px(),
            view_height: world.screen_height_px(),
            world_width: world.pixel_width(),
            world_height: world.pixel_height(),
            sprite_width: config.tile_width,
            sprite_height: config.tile_height,
            clamp_to_world: config.clamp_centered_viewport,
        }
    }

    pub fn mode(&self) -> ViewportMode {
        self.mode
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn target(&self) -> Option<Point> {
        match self.state {
            ViewportState::Idle => None,
            ViewportState::Transitioning { target, .. } => Some(target),
        }
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, ViewportState::Transitioning { .. })
    }

    pub fn progress(&self) -> u32 {
        match self.state {
            ViewportState::Idle => 0,
            ViewportState::Transitioning { progress, .. } => progress,
        }
    }

    /// Starts scrolling to `target`, counting as the first step. Returns false
    /// and does nothing unless the viewport is tiled and settled elsewhere.
    pub fn begin_transition(&mut self, target: Point) -> bool {
        if self.mode != ViewportMode::Tiled || self.is_transitioning() || target == self.origin {
            return false;
        }
        info!(
            from_x = self.origin.x,
            from_y = self.origin.y,
            to_x = target.x,
            to_y = target.y,
            "viewport_transition_started"
        );
        self.state = ViewportState::Transitioning {
            target,
            progress: 0,
        };
        self.advance();
        true
    }

    pub fn update(&mut self, actor: Vec2) {
        match self.mode {
            ViewportMode::Tiled => {
                if self.is_transitioning() {
                    self.advance();
                } else {
                    let screen_origin = self.tiled_origin(actor);
                    self.begin_transition(screen_origin);
                }
            }
            ViewportMode::Centered => {
                self.origin = self.centered_origin(actor);
            }
        }
    }

    /// Origin to draw with this frame. Tiled mode blends towards the target by
    /// transition progress; centered mode follows the interpolated actor.
    pub fn render_origin(&self, actor: Vec2) -> Point {
        match (self.mode, self.state) {
            (ViewportMode::Centered, _) => self.centered_origin(actor),
            (ViewportMode::Tiled, ViewportState::Idle) => self.origin,
            (ViewportMode::Tiled, ViewportState::Transitioning { target, progress }) => {
                let t = progress as f32 / TRANSITION_COMPLETE as f32;
                Vec2::new(self.origin.x as f32, self.origin.y as f32)
                    .lerp(Vec2::new(target.x as f32, target.y as f32), t)
                    .rounded()
            }
        }
    }

    fn advance(&mut self) {
        let ViewportState::Transitioning { target, progress } = self.state else {
            return;
        };
        let progress = progress.saturating_add(self.step);
        if progress >= TRANSITION_COMPLETE {
            self.origin = target;
            self.state = ViewportState::Idle;
            info!(x = target.x, y = target.y, "viewport_transition_committed");
        } else {
            self.state = ViewportState::Transitioning { target, progress };
        }
    }

    fn tiled_origin(&self, actor: Vec2) -> Point {
        let center_x = actor.x + self.sprite_width as f32 / 2.0;
        let center_y = actor.y + self.sprite_height as f32 / 2.0;
        let view_w = self.view_width as f32;
        let view_h = self.view_height as f32;
        Point::new(
            ((center_x / view_w).floor() * view_w) as i32,
            ((center_y / view_h).floor() * view_h) as i32,
        )
    }

    fn centered_origin(&self, actor: Vec2) -> Point {
        let mut origin = Vec2::new(
            actor.x - self.view_width as f32 / 2.0 + self.sprite_width as f32 / 2.0,
            actor.y - self.view_height as f32 / 2.0 + self.sprite_height as f32 / 2.0,
        )
        .rounded();
        if self.clamp_to_world {
            let max_x = self.world_width.saturating_sub(self.view_width) as i32;
            let max_y = self.world_height.saturating_sub(self.view_height) as i32;
            origin.x = origin.x.clamp(0, max_x);
            origin.y = origin.y.clamp(0, max_y);
        }
        origin
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::app::gameplay::tile_screen::{SolidTiles, TileScreen};

    /// 2x2 world of 10x8 screens with 16px tiles: screens are 160x128.
    fn world() -> WorldMap {
        let screen = TileScreen::new(vec![vec![0; 10]; 8], Arc::new(SolidTiles::default()))
            .expect("screen");
        WorldMap::new(
            vec![
                vec![screen.clone(), screen.clone()],
                vec![screen.clone(), screen],
            ],
            16,
            16,
        )
        .expect("world")
    }

    fn tiled() -> Viewport {
        Viewport::new(&GameConfig::default(), &world(), Point::new(160, 0))
    }

    fn centered(clamp: bool) -> Viewport {
        let config = GameConfig {
            viewport_mode: ViewportMode::Centered,
            clamp_centered_viewport: clamp,
            ..GameConfig::default()
        };
        Viewport::new(&config, &world(), Point::new(0, 0))
    }

    #[test]
    fn actor_inside_current_screen_keeps_viewport_idle() {
        let mut viewport = tiled();
        viewport.update(Vec2::new(200.0, 60.0));

        assert_eq!(viewport.state(), ViewportState::Idle);
        assert_eq!(viewport.origin(), Point::new(160, 0));
        assert_eq!(viewport.progress(), 0);
    }

    #[test]
    fn crossing_an_edge_commits_after_ceil_hundred_over_step_ticks() {
        let mut viewport = tiled();
        // Centre at x = 151 lies in the left screen.
        let actor = Vec2::new(143.0, 60.0);
        let ticks = TRANSITION_COMPLETE.div_ceil(GameConfig::default().transition_step);
        assert_eq!(ticks, 17);

        let mut last_progress = 0;
        for tick in 1..ticks {
            viewport.update(actor);
            assert!(viewport.is_transitioning(), "tick {tick}");
            assert!(viewport.progress() > last_progress, "tick {tick}");
            assert!(viewport.progress() < TRANSITION_COMPLETE, "tick {tick}");
            last_progress = viewport.progress();
        }

        viewport.update(actor);
        assert_eq!(viewport.state(), ViewportState::Idle);
        assert_eq!(viewport.progress(), 0);
        assert_eq!(viewport.origin(), Point::new(0, 0));

        viewport.update(actor);
        assert_eq!(viewport.state(), ViewportState::Idle);
    }

    #[test]
    fn second_trigger_is_ignored_mid_transition() {
        let mut viewport = tiled();
        assert!(viewport.begin_transition(Point::new(0, 0)));
        assert_eq!(viewport.progress(), 6);

        assert!(!viewport.begin_transition(Point::new(160, 128)));
        assert_eq!(viewport.target(), Some(Point::new(0, 0)));
        assert_eq!(viewport.progress(), 6);
    }

    #[test]
    fn trigger_towards_current_origin_is_ignored() {
        let mut viewport = tiled();
        assert!(!viewport.begin_transition(Point::new(160, 0)));
        assert!(!viewport.is_transitioning());
    }

    #[test]
    fn vertical_transition_targets_screen_below() {
        let mut viewport = tiled();
        viewport.update(Vec2::new(200.0, 125.0));
        assert_eq!(viewport.target(), Some(Point::new(160, 128)));
    }

    #[test]
    fn render_origin_blends_by_progress() {
        let mut viewport = tiled();
        viewport.begin_transition(Point::new(0, 0));
        for _ in 0..7 {
            viewport.update(Vec2::new(143.0, 60.0));
        }
        assert_eq!(viewport.progress(), 48);
        // 160 - 160 * 0.48
        assert_eq!(viewport.render_origin(Vec2::new(143.0, 60.0)), Point::new(83, 0));
    }

    #[test]
    fn idle_render_origin_is_the_settled_origin() {
        let viewport = tiled();
        assert_eq!(viewport.render_origin(Vec2::new(0.0, 0.0)), Point::new(160, 0));
    }

    #[test]
    fn centered_mode_follows_actor_and_never_transitions() {
        let mut viewport = centered(true);
        viewport.update(Vec2::new(200.0, 100.0));

        // 200 - 80 + 8, 100 - 64 + 8
        assert_eq!(viewport.origin(), Point::new(128, 44));
        assert!(!viewport.is_transitioning());
        assert!(!viewport.begin_transition(Point::new(160, 0)));
    }

    #[test]
    fn centered_mode_clamps_to_world_when_configured() {
        let cases = [
            (Vec2::new(0.0, 0.0), Point::new(0, 0), Point::new(-72, -56)),
            (Vec2::new(310.0, 250.0), Point::new(160, 128), Point::new(238, 194)),
        ];
        for (actor, clamped, free) in cases {
            let mut viewport = centered(true);
            viewport.update(actor);
            assert_eq!(viewport.origin(), clamped, "clamped {actor:?}");

            let mut viewport = centered(false);
            viewport.update(actor);
            assert_eq!(viewport.origin(), free, "unclamped {actor:?}");
        }
    }

    #[test]
    fn centered_render_origin_uses_interpolated_actor() {
        let viewport = centered(false);
        assert_eq!(
            viewport.render_origin(Vec2::new(100.5, 70.0)),
            Point::new(29, 14)
        );
    }
}
