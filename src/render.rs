use std::fs;
use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::backtracking_search::Assignment;
use crate::errors::RenderError;
use crate::grid_config::GridConfig;

/// How a blocked cell is drawn.
pub const BLOCK: char = '█';

/// Side of one grid square in an exported image, in pixels.
pub const CELL_SIZE: u32 = 100;

/// Width of the black frame around each open square, in pixels.
pub const CELL_BORDER: u32 = 2;

const LETTER_SCALE: f32 = 80.0;
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// The letter placed in each cell by the assignment, row by row.
fn letter_grid(config: &GridConfig, assignment: &Assignment) -> Vec<Vec<Option<char>>> {
    let mut letters: Vec<Vec<Option<char>>> = vec![vec![None; config.width]; config.height];

    for choice in assignment.choices() {
        let slot_config = &config.slot_configs[choice.slot_id];
        let word = &config.words[choice.word_id];

        for ((row, col), &glyph) in slot_config.cell_coords().zip(&word.glyphs) {
            letters[row][col] = Some(glyph);
        }
    }

    letters
}

/// Turn the given grid config and assignment into a rendered string, one line per row. Open cells
/// that no assigned slot covers are left blank.
pub fn render_grid(config: &GridConfig, assignment: &Assignment) -> String {
    letter_grid(config, assignment)
        .iter()
        .enumerate()
        .map(|(row, line)| {
            line.iter()
                .enumerate()
                .map(|(col, letter)| {
                    if config.is_open((row, col)) {
                        letter.unwrap_or(' ')
                    } else {
                        BLOCK
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read a TrueType or OpenType font for drawing letters into grid images.
pub fn load_font<P: AsRef<Path>>(path: P) -> Result<FontVec, RenderError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| RenderError::FontIo {
        path: path.to_path_buf(),
        source,
    })?;

    FontVec::try_from_vec(data).map_err(|source| RenderError::InvalidFont {
        path: path.to_path_buf(),
        source,
    })
}

/// Draw the grid as an image with one `CELL_SIZE` square per cell: blocks are solid black, open
/// cells are white inside a black border and hold their letter, centred. Without a font the open
/// cells are left empty.
pub fn draw_grid_image(
    config: &GridConfig,
    assignment: &Assignment,
    font: Option<&FontVec>,
) -> RgbaImage {
    let interior_size = CELL_SIZE - 2 * CELL_BORDER;
    let scale = PxScale::from(LETTER_SCALE);

    let mut image = RgbaImage::from_pixel(
        config.width as u32 * CELL_SIZE,
        config.height as u32 * CELL_SIZE,
        BLACK,
    );

    for (row, line) in letter_grid(config, assignment).iter().enumerate() {
        for (col, letter) in line.iter().enumerate() {
            if !config.is_open((row, col)) {
                continue;
            }

            let left = (col as u32 * CELL_SIZE + CELL_BORDER) as i32;
            let top = (row as u32 * CELL_SIZE + CELL_BORDER) as i32;
            draw_filled_rect_mut(
                &mut image,
                Rect::at(left, top).of_size(interior_size, interior_size),
                WHITE,
            );

            if let (Some(letter), Some(font)) = (letter, font) {
                let text = letter.to_string();
                let (text_width, text_height) = text_size(scale, font, &text);
                let x = left + (interior_size as i32 - text_width as i32) / 2;
                let y = top + (interior_size as i32 - text_height as i32) / 2;
                draw_text_mut(&mut image, BLACK, x, y, scale, font, &text);
            }
        }
    }

    image
}

/// Draw the grid as in `draw_grid_image` and save it to `path`. The file extension picks the
/// image format.
pub fn render_image<P: AsRef<Path>>(
    config: &GridConfig,
    assignment: &Assignment,
    font: Option<&FontVec>,
    path: P,
) -> Result<(), RenderError> {
    let path = path.as_ref();
    draw_grid_image(config, assignment, font)
        .save(path)
        .map_err(|source| RenderError::Image {
            path: path.to_path_buf(),
            source,
        })?;

    log::debug!("Saved grid image to {}", path.display());
    Ok(())
}
