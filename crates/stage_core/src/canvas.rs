//! CPU compositing target.
//!
//! The canvas is always opaque: fills and opaque blits overwrite pixels,
//! alpha blits blend source-over with straight alpha.

use image::{Rgba, RgbaImage};

use crate::geometry::{Rect, ScreenSize};
use crate::palette::Rgb;

#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    pub fn new(size: ScreenSize) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(size.width, size.height, Rgba([0, 0, 0, 255])),
        }
    }

    pub fn size(&self) -> ScreenSize {
        ScreenSize::new(self.pixels.width(), self.pixels.height())
    }

    /// Reallocates the canvas when the screen size changed.
    pub fn resize(&mut self, size: ScreenSize) {
        if self.size() != size {
            *self = Self::new(size);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.pixels.width() && y < self.pixels.height() {
            Some(self.pixels.get_pixel(x, y).0)
        } else {
            None
        }
    }

    /// Tightly packed RGBA8 rows, top row first.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn fill(&mut self, color: Rgb) {
        let px = Rgba(color.to_rgba());
        for pixel in self.pixels.pixels_mut() {
            *pixel = px;
        }
    }

    /// Source-over blit of a straight-alpha image with its top-left at (x, y).
    pub fn blit(&mut self, source: &RgbaImage, x: i32, y: i32) {
        self.blit_with(source, x, y, |dst, src| {
            let a = src[3] as u32;
            match a {
                0 => *dst,
                255 => [src[0], src[1], src[2], 255],
                _ => [
                    blend_channel(src[0], dst[0], a),
                    blend_channel(src[1], dst[1], a),
                    blend_channel(src[2], dst[2], a),
                    255,
                ],
            }
        });
    }

    /// Blit that ignores source alpha.
    pub fn blit_opaque(&mut self, source: &RgbaImage, x: i32, y: i32) {
        self.blit_with(source, x, y, |_, src| [src[0], src[1], src[2], 255]);
    }

    fn blit_with(
        &mut self,
        source: &RgbaImage,
        x: i32,
        y: i32,
        mut combine: impl FnMut(&[u8; 4], &[u8; 4]) -> [u8; 4],
    ) {
        let target = Rect::new(x, y, source.width(), source.height());
        let Some(area) = self.clip(target) else {
            return;
        };
        for dy in area.y..area.y + area.h as i32 {
            for dx in area.x..area.x + area.w as i32 {
                let src = source.get_pixel((dx - x) as u32, (dy - y) as u32).0;
                let dst = self.pixels.get_pixel_mut(dx as u32, dy as u32);
                dst.0 = combine(&dst.0, &src);
            }
        }
    }

    fn clip(&self, rect: Rect) -> Option<Rect> {
        let bounds = Rect::new(0, 0, self.pixels.width(), self.pixels.height());
        bounds.intersection(&rect)
    }
}

fn blend_channel(src: u8, dst: u8, alpha: u32) -> u8 {
    ((src as u32 * alpha + dst as u32 * (255 - alpha) + 127) / 255) as u8
}
