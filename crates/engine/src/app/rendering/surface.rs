use super::sprite_sheet::{SourceRect, SpriteSheet};
use super::text::draw_text_clipped;

/// 2D blit target. All positions and sizes are logical pixels; the surface
/// multiplies destinations by its integer scale with nearest-neighbor sampling.
pub trait RenderSurface {
    fn scale(&self) -> u32;
    fn logical_size(&self) -> (u32, u32);
    fn clear(&mut self, color: [u8; 4]);
    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: [u8; 4]);
    fn draw_image(
        &mut self,
        sheet: &SpriteSheet,
        source: SourceRect,
        dest_x: i32,
        dest_y: i32,
        flip_horizontal: bool,
    );
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: [u8; 4]);
}

/// RGBA8 frame buffer sized `logical * scale` in each dimension.
pub struct FrameSurface<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
    scale: u32,
}

impl<'a> FrameSurface<'a> {
    /// `width` and `height` are the physical buffer dimensions.
    pub fn new(frame: &'a mut [u8], width: u32, height: u32, scale: u32) -> Self {
        Self {
            frame,
            width,
            height,
            scale: scale.max(1),
        }
    }

    fn fill_physical_rect(&mut self, left: i64, top: i64, right: i64, bottom: i64, color: [u8; 4]) {
        let left = left.max(0);
        let top = top.max(0);
        let right = right.min(self.width as i64);
        let bottom = bottom.min(self.height as i64);
        if left >= right || top >= bottom {
            return;
        }
        for y in top..bottom {
            for x in left..right {
                write_pixel_rgba(self.frame, self.width as usize, x as usize, y as usize, color);
            }
        }
    }
}

impl RenderSurface for FrameSurface<'_> {
    fn scale(&self) -> u32 {
        self.scale
    }

    fn logical_size(&self) -> (u32, u32) {
        (self.width / self.scale, self.height / self.scale)
    }

    fn clear(&mut self, color: [u8; 4]) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: [u8; 4]) {
        let scale = self.scale as i64;
        let left = x as i64 * scale;
        let top = y as i64 * scale;
        self.fill_physical_rect(
            left,
            top,
            left + width as i64 * scale,
            top + height as i64 * scale,
            color,
        );
    }

    fn draw_image(
        &mut self,
        sheet: &SpriteSheet,
        source: SourceRect,
        dest_x: i32,
        dest_y: i32,
        flip_horizontal: bool,
    ) {
        let scale = self.scale as i64;
        for row in 0..source.height {
            for col in 0..source.width {
                let src_col = if flip_horizontal {
                    source.width - 1 - col
                } else {
                    col
                };
                let Some(color) = sheet.pixel(source.x + src_col, source.y + row) else {
                    continue;
                };
                if color[3] == 0 {
                    continue;
                }
                let left = (dest_x as i64 + col as i64) * scale;
                let top = (dest_y as i64 + row as i64) * scale;
                self.fill_physical_rect(left, top, left + scale, top + scale, color);
            }
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: [u8; 4]) {
        let scale = self.scale as i32;
        draw_text_clipped(
            self.frame,
            self.width,
            self.height,
            x.saturating_mul(scale),
            y.saturating_mul(scale),
            text,
            color,
            scale,
        );
    }
}

pub(crate) fn write_pixel_rgba(frame: &mut [u8], width: usize, x: usize, y: usize, color: [u8; 4]) {
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }

    frame[byte_offset..end].copy_from_slice(&color);
}
