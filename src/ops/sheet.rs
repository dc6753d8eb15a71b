// ============================================================================
// SPRITE SHEETS — split a decoded image into frames, compose frames into one
// ============================================================================

use image::RgbaImage;
use rayon::prelude::*;

use crate::canvas::{Canvas, TRANSPARENT};
use crate::project::{Project, Sprite};

/// Split `image` into `frame_width × frame_height` tiles in row-major order.
///
/// Tiles with no visible pixel are dropped. Survivors are named
/// "Frame N", counting from `first_number`. Partial tiles on the right and
/// bottom edges are ignored.
pub fn import_sheet(image: &RgbaImage, frame_width: u32, frame_height: u32, first_number: usize) -> Vec<Sprite> {
    if frame_width == 0 || frame_height == 0 {
        return Vec::new();
    }
    let cols = image.width() / frame_width;
    let rows = image.height() / frame_height;

    let tiles: Vec<Canvas> = (0..rows * cols)
        .into_par_iter()
        .filter_map(|i| {
            let ox = (i % cols) * frame_width;
            let oy = (i / cols) * frame_height;
            let mut tile = Canvas::new(frame_width, frame_height);
            let mut any = false;
            for y in 0..frame_height {
                for x in 0..frame_width {
                    let p = *image.get_pixel(ox + x, oy + y);
                    if p[3] > 0 {
                        tile.set(x as i32, y as i32, Some(p));
                        any = true;
                    }
                }
            }
            any.then_some(tile)
        })
        .collect();

    crate::log_info!(
        "Sheet import: {}x{} grid of {}x{} tiles, {} non-empty",
        cols, rows, frame_width, frame_height, tiles.len()
    );

    tiles
        .into_iter()
        .enumerate()
        .map(|(n, tile)| Sprite::from_canvas(format!("Frame {}", first_number + n), tile))
        .collect()
}

/// Compose every sprite of `project` into one sheet, `columns` tiles wide.
///
/// Each cell is one frame; the sheet is `ceil(count / columns)` cells tall.
/// Smaller sprites sit in the top-left corner of their cell; larger ones are
/// cropped to the frame size. Fails when the sheet dimensions overflow.
pub fn export_sheet(project: &Project, columns: u32) -> Result<RgbaImage, String> {
    let fw = project.frame_width();
    let fh = project.frame_height();
    let count = project.len() as u32;
    let columns = columns.max(1);
    let rows = count.div_ceil(columns);

    let too_large = || format!("sheet of {} columns x {} rows of {}x{} frames is too large", columns, rows, fw, fh);
    let width = columns.checked_mul(fw).ok_or_else(too_large)?;
    let height = rows.checked_mul(fh).ok_or_else(too_large)?;
    let bytes = (width as usize).checked_mul(height as usize).and_then(|n| n.checked_mul(4));
    if bytes.is_none() {
        return Err(too_large());
    }

    let mut sheet = RgbaImage::from_pixel(width, height, TRANSPARENT);

    for (i, sprite) in project.sprites().iter().enumerate() {
        let i = i as u32;
        let ox = (i % columns) * fw;
        let oy = (i / columns) * fh;
        let canvas = sprite.canvas();
        let w = canvas.width().min(fw);
        let h = canvas.height().min(fh);
        for y in 0..h {
            for x in 0..w {
                if let Some(p) = canvas.get(x as i32, y as i32) {
                    sheet.put_pixel(ox + x, oy + y, p);
                }
            }
        }
    }

    crate::log_info!(
        "Sheet export: {} sprites into {}x{} cells ({}x{} px)",
        count, columns, rows, width, height
    );
    Ok(sheet)
}
