const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;
const GLYPH_SPACING: i32 = 1;

/// Height of one line of HUD text in logical pixels.
pub const GLYPH_HEIGHT_PX: u32 = GLYPH_HEIGHT as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Glyph {
    rows: [u8; GLYPH_HEIGHT as usize],
}

const SPACE_GLYPH: Glyph = Glyph {
    rows: [0, 0, 0, 0, 0],
};

/// Width of `text` in logical pixels, without trailing spacing.
pub fn text_width_px(text: &str) -> u32 {
    let count = text.chars().count() as u32;
    if count == 0 {
        return 0;
    }
    count * (GLYPH_WIDTH + GLYPH_SPACING) as u32 - GLYPH_SPACING as u32
}

/// Draws `text` with its top-left corner at physical pixel (`x`, `y`); each
/// glyph cell becomes a `pixel_scale`-sized block.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_text_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    mut x: i32,
    y: i32,
    text: &str,
    color: [u8; 4],
    pixel_scale: i32,
) {
    let pixel_scale = pixel_scale.max(1);
    for ch in text.chars() {
        let glyph = glyph_for(ch).unwrap_or(SPACE_GLYPH);
        draw_glyph_clipped(frame, width, height, x, y, glyph, color, pixel_scale);
        x += (GLYPH_WIDTH + GLYPH_SPACING) * pixel_scale;
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_glyph_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    glyph: Glyph,
    color: [u8; 4],
    pixel_scale: i32,
) {
    if width == 0 || height == 0 {
        return;
    }

    let height_i32 = height as i32;
    let width_i32 = width as i32;

    for (row_index, row_bits) in glyph.rows.iter().enumerate() {
        let glyph_y = y + row_index as i32 * pixel_scale;

        for col in 0..GLYPH_WIDTH {
            if (row_bits & (1 << (GLYPH_WIDTH - 1 - col))) == 0 {
                continue;
            }

            let glyph_x = x + col * pixel_scale;
            for sy in 0..pixel_scale {
                let pixel_y = glyph_y + sy;
                if pixel_y < 0 || pixel_y >= height_i32 {
                    continue;
                }
                for sx in 0..pixel_scale {
                    let pixel_x = glyph_x + sx;
                    if pixel_x < 0 || pixel_x >= width_i32 {
                        continue;
                    }
                    super::surface::write_pixel_rgba(
                        frame,
                        width as usize,
                        pixel_x as usize,
                        pixel_y as usize,
                        color,
                    );
                }
            }
        }
    }
}

fn glyph_for(ch: char) -> Option<Glyph> {
    let rows = match ch.to_ascii_uppercase() {
        ' ' => return Some(SPACE_GLYPH),
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        _ => return None,
    };
    Some(Glyph { rows })
}
