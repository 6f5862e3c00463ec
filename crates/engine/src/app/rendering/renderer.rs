use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::surface::{FrameSurface, RenderSurface};

/// Owns the GPU-backed pixel buffer. The buffer is `logical * scale` pixels so
/// every blit lands on whole scaled pixels; `pixels` stretches it to the window
/// surface without smoothing.
pub(crate) struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    buffer_width: u32,
    buffer_height: u32,
    scale: u32,
}

impl Renderer {
    pub(crate) fn new(
        window: Arc<Window>,
        logical_width: u32,
        logical_height: u32,
        scale: u32,
    ) -> Result<Self, Error> {
        let (buffer_width, buffer_height, scale) =
            buffer_size(logical_width, logical_height, scale);
        let size = window.inner_size();
        let pixels = Self::build_pixels(
            Arc::clone(&window),
            buffer_width,
            buffer_height,
            size.width.max(1),
            size.height.max(1),
        )?;
        Ok(Self {
            window,
            pixels,
            buffer_width,
            buffer_height,
            scale,
        })
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(
            Arc::clone(&self.window),
            self.buffer_width,
            self.buffer_height,
            width,
            height,
        )?;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        buffer_width: u32,
        buffer_height: u32,
        surface_width: u32,
        surface_height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(surface_width, surface_height, window);
        Pixels::new(buffer_width, buffer_height, surface)
    }

    /// Lets `draw` fill the frame, then presents it.
    pub(crate) fn present<F>(&mut self, draw: F) -> Result<(), Error>
    where
        F: FnOnce(&mut dyn RenderSurface),
    {
        let frame = self.pixels.frame_mut();
        let mut surface = FrameSurface::new(frame, self.buffer_width, self.buffer_height, self.scale);
        draw(&mut surface);
        self.pixels.render()
    }
}

fn buffer_size(logical_width: u32, logical_height: u32, scale: u32) -> (u32, u32, u32) {
    let scale = scale.max(1);
    (logical_width * scale, logical_height * scale, scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_is_logical_size_times_scale() {
        assert_eq!(buffer_size(160, 144, 6), (960, 864, 6));
    }

    #[test]
    fn zero_scale_falls_back_to_one() {
        assert_eq!(buffer_size(160, 144, 0), (160, 144, 1));
    }

    #[test]
    fn presented_surface_reports_the_logical_size() {
        let (width, height, scale) = buffer_size(20, 12, 3);
        let mut frame = vec![0; (width * height * 4) as usize];
        let surface = FrameSurface::new(&mut frame, width, height, scale);

        assert_eq!(surface.logical_size(), (20, 12));
        assert_eq!(surface.scale(), 3);
    }
}
