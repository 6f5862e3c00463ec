use std::time::Duration;

use engine::LoopConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportMode {
    #[default]
    Tiled,
    Centered,
}

/// Pixels trimmed from each side of the player's sprite cell to get the box
/// used for solidity tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CollisionInsets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Default for CollisionInsets {
    fn default() -> Self {
        Self {
            left: 4,
            top: 6,
            right: 4,
            bottom: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub ticks_per_second: u32,
    pub max_frame_delta_ms: u64,
    pub max_updates_per_frame: u32,
    pub display_scale: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub player_speed: f32,
    pub animation_frame_delay: u32,
    pub collision_insets: CollisionInsets,
    /// Percent of a screen covered per tick while scrolling between screens.
    pub transition_step: u32,
    pub game_bar_height_tiles: u32,
    pub viewport_mode: ViewportMode,
    pub clamp_centered_viewport: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 30,
            max_frame_delta_ms: 250,
            max_updates_per_frame: 5,
            display_scale: 6,
            tile_width: 16,
            tile_height: 16,
            player_speed: 2.0,
            animation_frame_delay: 3,
            collision_insets: CollisionInsets::default(),
            transition_step: 6,
            game_bar_height_tiles: 1,
            viewport_mode: ViewportMode::Tiled,
            clamp_centered_viewport: true,
        }
    }
}

impl CollisionInsets {
    /// True if the inset box is non-empty and smaller than a `tile_width` x
    /// `tile_height` cell.
    pub fn fits(&self, tile_width: u32, tile_height: u32) -> bool {
        let trims_something = [self.left, self.top, self.right, self.bottom]
            .iter()
            .any(|&inset| inset > 0);
        trims_something
            && self.left.saturating_add(self.right) < tile_width
            && self.top.saturating_add(self.bottom) < tile_height
    }
}

impl GameConfig {
    pub fn game_bar_height_px(&self) -> u32 {
        self.game_bar_height_tiles * self.tile_height
    }

    pub fn loop_config(&self, screen_width: u32, screen_height: u32) -> LoopConfig {
        LoopConfig {
            window_title: "Lonk".to_string(),
            logical_width: screen_width,
            logical_height: screen_height + self.game_bar_height_px(),
            display_scale: self.display_scale,
            target_tps: self.ticks_per_second,
            max_frame_delta: Duration::from_millis(self.max_frame_delta_ms),
            max_ticks_per_frame: self.max_updates_per_frame,
            ..LoopConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "player_speed": 3.0, "viewport_mode": "centered" }"#)
                .expect("parse");

        assert_eq!(config.player_speed, 3.0);
        assert_eq!(config.viewport_mode, ViewportMode::Centered);
        assert_eq!(config.tile_width, 16);
        assert_eq!(config.collision_insets, CollisionInsets::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<GameConfig>(r#"{ "player_sped": 3.0 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn default_insets_fit_a_sixteen_pixel_cell() {
        assert!(CollisionInsets::default().fits(16, 16));
    }

    #[test]
    fn insets_that_meet_or_cross_are_rejected() {
        let crossed = CollisionInsets {
            left: 10,
            top: 10,
            right: 10,
            bottom: 10,
        };
        assert!(!crossed.fits(16, 16));

        let flush = CollisionInsets {
            left: 8,
            top: 1,
            right: 8,
            bottom: 1,
        };
        assert!(!flush.fits(16, 16));

        let one_pixel_tall = CollisionInsets {
            left: 1,
            top: 8,
            right: 1,
            bottom: 7,
        };
        assert!(one_pixel_tall.fits(16, 16));
    }

    #[test]
    fn zero_insets_are_the_full_cell() {
        let none = CollisionInsets {
            left: 0,
            top: 0,
            right: 0,
            bottom: 0,
        };
        assert!(!none.fits(16, 16));
    }

    #[test]
    fn loop_config_adds_game_bar_to_surface_height() {
        let loop_config = GameConfig::default().loop_config(160, 128);

        assert_eq!(loop_config.logical_width, 160);
        assert_eq!(loop_config.logical_height, 144);
        assert_eq!(loop_config.display_scale, 6);
        assert_eq!(loop_config.target_tps, 30);
        assert_eq!(loop_config.max_ticks_per_frame, 5);
        assert_eq!(loop_config.max_frame_delta, Duration::from_millis(250));
    }
}
