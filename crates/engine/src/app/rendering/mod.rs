mod renderer;
mod sprite_sheet;
mod surface;
mod text;

pub(crate) use renderer::Renderer;
pub use sprite_sheet::{atlas_source_coords, SourceRect, SpriteSheet, SpriteSheetError};
pub use surface::{FrameSurface, RenderSurface};
pub use text::{text_width_px, GLYPH_HEIGHT_PX};
