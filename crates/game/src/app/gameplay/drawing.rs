use engine::{RenderSurface, SpriteSheet};

use super::geometry::Point;

#[derive(Debug, Clone)]
pub struct SpriteRenderer {
    sheet: SpriteSheet,
    cell_width: u32,
    cell_height: u32,
}

impl SpriteRenderer {
    pub fn new(sheet: SpriteSheet, cell_width: u32, cell_height: u32) -> Self {
        Self {
            sheet,
            cell_width,
            cell_height,
        }
    }

    pub fn draw(
        &self,
        surface: &mut dyn RenderSurface,
        cell: u32,
        x: i32,
        y: i32,
        flip_horizontal: bool,
    ) {
        let source = self.sheet.cell(cell, self.cell_width, self.cell_height);
        surface.draw_image(&self.sheet, source, x, y, flip_horizontal);
    }
}

pub struct FrameContext<'a> {
    pub interpolation: f32,
    /// World pixel shown at the top-left corner of the play area.
    pub view_origin: Point,
    /// Surface rows reserved for the game bar above the play area.
    pub play_area_top: i32,
    pub tiles: &'a SpriteRenderer,
    pub sprites: &'a SpriteRenderer,
}

impl FrameContext<'_> {
    pub fn to_surface(&self, world: Point) -> Point {
        Point::new(
            world.x - self.view_origin.x,
            world.y - self.view_origin.y + self.play_area_top,
        )
    }
}

pub trait Drawable {
    fn draw(&self, surface: &mut dyn RenderSurface, frame: &FrameContext<'_>);
}
