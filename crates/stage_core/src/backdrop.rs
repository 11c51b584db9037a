use std::path::Path;

use image::RgbaImage;

use crate::canvas::Canvas;
use crate::costume::load_rgba;
use crate::error::StageResult;
use crate::palette::{Rgb, BLACK};

/// Full-screen background. An image, when present, wins over the color.
#[derive(Debug, Clone)]
pub struct Backdrop {
    color: Rgb,
    image: Option<RgbaImage>,
}

impl Backdrop {
    pub fn new() -> Self {
        Self {
            color: BLACK,
            image: None,
        }
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, path: impl AsRef<Path>) -> StageResult<()> {
        let image = load_rgba(path.as_ref())?;
        self.set_image_data(image);
        Ok(())
    }

    pub fn set_image_data(&mut self, image: RgbaImage) {
        self.image = Some(image);
    }

    pub fn set_color(&mut self, color: impl Into<Rgb>) {
        self.image = None;
        self.color = color.into();
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        match &self.image {
            Some(image) => canvas.blit_opaque(image, 0, 0),
            None => canvas.fill(self.color),
        }
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new()
    }
}
