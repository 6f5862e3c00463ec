use std::f32::consts::SQRT_2;

use engine::{Direction, InputSource, RenderSurface};

use super::config::GameConfig;
use super::drawing::{Drawable, FrameContext};
use super::geometry::{Rect, Vec2};
use super::world_map::WorldMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

const CELL_DOWN: u32 = 0;
const CELL_UP: u32 = 1;
const CELL_LEFT_FIRST: u32 = 2;

/// Sprite cell and mirroring for a facing and walk frame. Right reuses the
/// left cells mirrored.
pub fn sprite_cell(facing: Facing, frame: u8) -> (u32, bool) {
    match facing {
        Facing::Down => (CELL_DOWN, frame == 1),
        Facing::Up => (CELL_UP, frame == 1),
        Facing::Left => (CELL_LEFT_FIRST + u32::from(frame), false),
        Facing::Right => (CELL_LEFT_FIRST + u32::from(frame), true),
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    position: Vec2,
    previous: Vec2,
    facing: Facing,
    frame: u8,
    frame_counter: u32,
}

impl Player {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            position: spawn,
            previous: spawn,
            facing: Facing::Down,
            frame: 0,
            frame_counter: 0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn previous_position(&self) -> Vec2 {
        self.previous
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    pub fn update(&mut self, input: &dyn InputSource, world: &WorldMap, config: &GameConfig) {
        self.previous = self.position;

        let up = input.is_action_active(Direction::Up);
        let down = input.is_action_active(Direction::Down);
        let left = input.is_action_active(Direction::Left);
        let right = input.is_action_active(Direction::Right);

        let axis_y = if up {
            -1.0
        } else if down {
            1.0
        } else {
            0.0
        };
        let axis_x = if left {
            -1.0
        } else if right {
            1.0
        } else {
            0.0
        };

        if left {
            self.facing = Facing::Left;
        } else if right {
            self.facing = Facing::Right;
        } else if up {
            self.facing = Facing::Up;
        } else if down {
            self.facing = Facing::Down;
        }

        let mut move_x = axis_x * config.player_speed;
        let mut move_y = axis_y * config.player_speed;
        if move_x != 0.0 && move_y != 0.0 {
            move_x /= SQRT_2;
            move_y /= SQRT_2;
        }

        // Each axis is resolved on its own so a wall on one axis still lets
        // the player slide along the other.
        let mut blocked = false;
        if move_x != 0.0 {
            let candidate = Vec2::new(self.position.x + move_x, self.position.y);
            if world.has_collision(collision_box(candidate, config)) {
                blocked = true;
            } else {
                self.position = candidate;
            }
        }
        if move_y != 0.0 {
            let candidate = Vec2::new(self.position.x, self.position.y + move_y);
            if world.has_collision(collision_box(candidate, config)) {
                blocked = true;
            } else {
                self.position = candidate;
            }
        }
        self.clamp_to_world(world);

        if (axis_x != 0.0 || axis_y != 0.0) && !blocked {
            self.advance_animation(config.animation_frame_delay);
        }
    }

    pub fn hold(&mut self) {
        self.previous = self.position;
    }

    pub fn interpolated_position(&self, interpolation: f32) -> Vec2 {
        self.previous.lerp(self.position, interpolation)
    }

    pub fn collision_box(&self, config: &GameConfig) -> Rect {
        collision_box(self.position, config)
    }

    fn advance_animation(&mut self, frame_delay: u32) {
        self.frame_counter += 1;
        if self.frame_counter >= frame_delay {
            self.frame_counter = 0;
            self.frame ^= 1;
        }
    }

    fn clamp_to_world(&mut self, world: &WorldMap) {
        let max_x = world.pixel_width().saturating_sub(world.tile_width()) as f32;
        let max_y = world.pixel_height().saturating_sub(world.tile_height()) as f32;
        self.position.x = self.position.x.clamp(0.0, max_x);
        self.position.y = self.position.y.clamp(0.0, max_y);
    }
}

/// Inset sprite cell at `position`, with inclusive right and bottom edges.
fn collision_box(position: Vec2, config: &GameConfig) -> Rect {
    let insets = config.collision_insets;
    Rect {
        left: position.x + insets.left as f32,
        top: position.y + insets.top as f32,
        right: position.x + config.tile_width as f32 - insets.right as f32 - 1.0,
        bottom: position.y + config.tile_height as f32 - insets.bottom as f32 - 1.0,
    }
}

impl Drawable for Player {
    fn draw(&self, surface: &mut dyn RenderSurface, frame: &FrameContext<'_>) {
        let (cell, flip) = sprite_cell(self.facing, self.frame);
        let at = frame.to_surface(self.interpolated_position(frame.interpolation).rounded());
        frame.sprites.draw(surface, cell, at.x, at.y, flip);
    }
}
