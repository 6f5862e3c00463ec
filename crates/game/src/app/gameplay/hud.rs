use engine::{text_width_px, RenderSurface, GLYPH_HEIGHT_PX};

use super::drawing::{Drawable, FrameContext};

const BAR_COLOR: [u8; 4] = [0, 0, 0, 255];
const FPS_COLOR: [u8; 4] = [255, 0, 0, 255];
const FPS_RIGHT_MARGIN: i32 = 5;

#[derive(Debug, Clone, Default)]
pub struct FpsDisplay {
    fps: u32,
}

impl FpsDisplay {
    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps;
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn label(&self) -> String {
        format!("FPS: {}", self.fps)
    }
}

impl Drawable for FpsDisplay {
    fn draw(&self, surface: &mut dyn RenderSurface, frame: &FrameContext<'_>) {
        if frame.play_area_top <= 0 {
            return;
        }
        let (width, _) = surface.logical_size();
        surface.fill_rect(0, 0, width, frame.play_area_top as u32, BAR_COLOR);

        let label = self.label();
        let x = width as i32 - FPS_RIGHT_MARGIN - text_width_px(&label) as i32;
        let y = (frame.play_area_top - GLYPH_HEIGHT_PX as i32).max(0) / 2;
        surface.draw_text(x, y, &label, FPS_COLOR);
    }
}
