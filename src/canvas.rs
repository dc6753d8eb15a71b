use image::{Rgba, RgbaImage};

/// Fully transparent RGBA, used wherever "no pixel" has to become bytes.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

// ============================================================================
// CANVAS — fixed-size grid of optional RGBA pixels
// ============================================================================

/// A fixed-size pixel grid. `None` is "no pixel" (fully transparent).
///
/// Reads outside the grid return `None` and writes outside it are ignored,
/// so tools never need to bounds-check before touching a pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Option<Rgba<u8>>>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Rgba<u8>> {
        self.index(x, y).and_then(|i| self.pixels[i])
    }

    pub fn set(&mut self, x: i32, y: i32, color: Option<Rgba<u8>>) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Drop every pixel.
    pub fn clear(&mut self) {
        self.pixels.fill(None);
    }

    /// True when no cell holds a pixel.
    pub fn is_empty(&self) -> bool {
        self.pixels.iter().all(Option::is_none)
    }

    /// Row-major iterator over `(x, y, pixel)`.
    pub fn pixels(&self) -> impl Iterator<Item = (i32, i32, Option<Rgba<u8>>)> + '_ {
        let w = self.width as usize;
        self.pixels
            .iter()
            .enumerate()
            .map(move |(i, p)| ((i % w) as i32, (i / w) as i32, *p))
    }

    /// Copy a `w × h` region starting at `(x, y)` into a new canvas.
    /// Cells that fall outside this canvas come back empty.
    pub fn extract_region(&self, x: i32, y: i32, w: u32, h: u32) -> Canvas {
        let mut out = Canvas::new(w, h);
        for dy in 0..h as i32 {
            for dx in 0..w as i32 {
                out.set(dx, dy, self.get(x + dx, y + dy));
            }
        }
        out
    }

    /// Build a canvas from a decoded image. Alpha 0 becomes "no pixel".
    pub fn from_rgba_image(src: &RgbaImage) -> Self {
        let pixels = src
            .pixels()
            .map(|p| if p[3] == 0 { None } else { Some(*p) })
            .collect();
        Self {
            width: src.width(),
            height: src.height(),
            pixels,
        }
    }

    /// Materialize the canvas for an encoder. "No pixel" becomes all-zero RGBA.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            self.get(x as i32, y as i32).unwrap_or(TRANSPARENT)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn out_of_bounds_reads_are_empty_and_writes_ignored() {
        let mut c = Canvas::new(4, 3);
        c.set(-1, 0, Some(RED));
        c.set(4, 0, Some(RED));
        c.set(0, 3, Some(RED));
        assert!(c.is_empty());
        assert_eq!(c.get(-1, -1), None);
        assert_eq!(c.get(100, 2), None);
        assert!(!c.in_bounds(4, 0));
        assert!(c.in_bounds(3, 2));
    }

    #[test]
    fn set_then_get() {
        let mut c = Canvas::new(2, 2);
        c.set(1, 1, Some(RED));
        assert_eq!(c.get(1, 1), Some(RED));
        c.set(1, 1, None);
        assert_eq!(c.get(1, 1), None);
    }

    #[test]
    fn image_conversion_maps_zero_alpha_to_none() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([10, 20, 30, 0]));
        img.put_pixel(1, 0, Rgba([10, 20, 30, 128]));
        let c = Canvas::from_rgba_image(&img);
        assert_eq!(c.get(0, 0), None);
        assert_eq!(c.get(1, 0), Some(Rgba([10, 20, 30, 128])));

        let back = c.to_rgba_image();
        assert_eq!(*back.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*back.get_pixel(1, 0), Rgba([10, 20, 30, 128]));
    }

    #[test]
    fn extract_region_clips_to_empty() {
        let mut c = Canvas::new(3, 3);
        c.set(2, 2, Some(RED));
        let r = c.extract_region(1, 1, 3, 3);
        assert_eq!(r.width(), 3);
        assert_eq!(r.get(1, 1), Some(RED));
        assert_eq!(r.get(2, 2), None);
    }
}
