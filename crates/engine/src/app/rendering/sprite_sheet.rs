use std::io;
use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpriteSheetError {
    #[error("failed to open sprite sheet {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode sprite sheet {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("sprite sheet has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("sprite sheet data has {actual} bytes, expected {expected}")]
    DataLength { expected: usize, actual: usize },
}

/// Source rectangle inside a sprite sheet, in sheet pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Decoded RGBA8 image used as a sprite atlas.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl SpriteSheet {
    pub fn load(path: &Path) -> Result<Self, SpriteSheetError> {
        let reader = ImageReader::open(path).map_err(|source| SpriteSheetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = reader.decode().map_err(|source| SpriteSheetError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let image = decoded.to_rgba8();
        Self::from_rgba(image.width(), image.height(), image.into_raw())
    }

    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, SpriteSheetError> {
        if width == 0 || height == 0 {
            return Err(SpriteSheetError::Empty { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(SpriteSheetError::DataLength {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Source rectangle of cell `id` for cells of `cell_width` x `cell_height`.
    pub fn cell(&self, id: u32, cell_width: u32, cell_height: u32) -> SourceRect {
        let (x, y) = atlas_source_coords(id, cell_width, cell_height, self.width);
        SourceRect {
            x,
            y,
            width: cell_width,
            height: cell_height,
        }
    }

    pub(crate) fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let bytes = self.rgba.get(offset..offset + 4)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// Maps a cell id to its top-left corner in an atlas `atlas_width` pixels wide.
///
/// Cells are laid out left to right, wrapping to the next row of
/// `cell_height` pixels when the row is full.
pub fn atlas_source_coords(
    id: u32,
    cell_width: u32,
    cell_height: u32,
    atlas_width: u32,
) -> (u32, u32) {
    if atlas_width == 0 {
        return (0, 0);
    }
    let linear = id as u64 * cell_width as u64;
    let sx = linear % atlas_width as u64;
    let sy = (linear / atlas_width as u64) * cell_height as u64;
    (sx as u32, sy as u32)
}
