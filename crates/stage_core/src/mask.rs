//! Per-pixel collision masks.
//!
//! A mask stores one bit per pixel, set when the source pixel is opaque enough
//! to count for collisions. Rows are packed into `u64` words (bit 0 = leftmost
//! pixel of the word) so an overlap test compares up to 64 pixels per step.

use image::RgbaImage;

/// Pixels with alpha above this value are solid.
pub const ALPHA_THRESHOLD: u8 = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Mask {
    /// Empty mask (no bits set).
    pub fn new(width: u32, height: u32) -> Self {
        let words_per_row = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// Mask with every pixel set.
    pub fn full(width: u32, height: u32) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                mask.set(x, y, true);
            }
        }
        mask
    }

    pub fn from_image(image: &RgbaImage) -> Self {
        let mut mask = Self::new(image.width(), image.height());
        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel.0[3] > ALPHA_THRESHOLD {
                mask.set(x, y, true);
            }
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let word = self.bits[self.word_index(x, y)];
        word & (1u64 << (x % 64)) != 0
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = self.word_index(x, y);
        let bit = 1u64 << (x % 64);
        if value {
            self.bits[index] |= bit;
        } else {
            self.bits[index] &= !bit;
        }
    }

    /// Number of set pixels.
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Returns the first pixel (in this mask's coordinates) where both masks
    /// are set, with `other`'s top-left corner placed at `offset` relative to
    /// this mask's top-left corner. Scans rows top to bottom.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(u32, u32)> {
        let (dx, dy) = (offset.0 as i64, offset.1 as i64);
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (self.width as i64).min(dx + other.width as i64);
        let y1 = (self.height as i64).min(dy + other.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        for y in y0..y1 {
            let other_y = (y - dy) as u32;
            let mut x = x0;
            while x < x1 {
                let n = (x1 - x).min(64) as u32;
                let a = self.row_bits(y as u32, x as u32, n);
                let b = other.row_bits(other_y, (x - dx) as u32, n);
                let hit = a & b;
                if hit != 0 {
                    return Some((x as u32 + hit.trailing_zeros(), y as u32));
                }
                x += n as i64;
            }
        }
        None
    }

    fn word_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.words_per_row + (x / 64) as usize
    }

    /// `n` (<= 64) consecutive bits of row `y` starting at column `start`.
    fn row_bits(&self, y: u32, start: u32, n: u32) -> u64 {
        let row = y as usize * self.words_per_row;
        let word = (start / 64) as usize;
        let shift = start % 64;
        let mut bits = self.bits[row + word] >> shift;
        if shift != 0 && word + 1 < self.words_per_row {
            bits |= self.bits[row + word + 1] << (64 - shift);
        }
        if n < 64 {
            bits &= (1u64 << n) - 1;
        }
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn from_image_uses_alpha_threshold() {
        let mut image = RgbaImage::new(3, 1);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 127]));
        image.put_pixel(1, 0, Rgba([255, 0, 0, 128]));
        image.put_pixel(2, 0, Rgba([255, 0, 0, 255]));
        let mask = Mask::from_image(&image);
        assert!(!mask.get(0, 0));
        assert!(mask.get(1, 0));
        assert!(mask.get(2, 0));
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn full_masks_overlap_at_offset_origin() {
        let a = Mask::full(10, 10);
        let b = Mask::full(10, 10);
        assert_eq!(a.overlap(&b, (0, 0)), Some((0, 0)));
        assert_eq!(a.overlap(&b, (4, 6)), Some((4, 6)));
        assert_eq!(a.overlap(&b, (-3, -2)), Some((0, 0)));
    }

    #[test]
    fn disjoint_placement_has_no_overlap() {
        let a = Mask::full(10, 10);
        let b = Mask::full(10, 10);
        assert_eq!(a.overlap(&b, (10, 0)), None);
        assert_eq!(a.overlap(&b, (0, -10)), None);
    }

    #[test]
    fn transparent_regions_do_not_collide() {
        // Two 8x8 masks with a single solid pixel each, in different corners.
        let mut a = Mask::new(8, 8);
        a.set(0, 0, true);
        let mut b = Mask::new(8, 8);
        b.set(7, 7, true);
        assert_eq!(a.overlap(&b, (0, 0)), None);
        // Shift b so its solid pixel lands on a's solid pixel.
        assert_eq!(a.overlap(&b, (-7, -7)), Some((0, 0)));
    }

    #[test]
    fn overlap_across_word_boundaries() {
        let mut a = Mask::new(150, 2);
        a.set(130, 1, true);
        let mut b = Mask::new(100, 2);
        b.set(67, 1, true);
        // b placed at x=63: its pixel 67 lands on column 130.
        assert_eq!(a.overlap(&b, (63, 0)), Some((130, 1)));
        assert_eq!(a.overlap(&b, (62, 0)), None);
    }

    #[test]
    fn wide_full_masks_count_every_pixel() {
        let mask = Mask::full(130, 3);
        assert_eq!(mask.count(), 390);
        assert!(mask.get(129, 2));
        assert!(!mask.get(130, 2));
    }
}
