use std::path::Path;

use image::RgbaImage;

use crate::error::{StageError, StageResult};
use crate::mask::Mask;

/// One selectable frame of a sprite. The mask is computed once on
/// construction; costumes are immutable afterwards.
#[derive(Debug, Clone)]
pub struct Costume {
    image: RgbaImage,
    mask: Mask,
}

impl Costume {
    pub fn from_image(image: RgbaImage) -> Self {
        let mask = Mask::from_image(&image);
        Self { image, mask }
    }

    pub fn load(path: impl AsRef<Path>) -> StageResult<Self> {
        load_rgba(path.as_ref()).map(Self::from_image)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Decodes an image file into straight-alpha RGBA8.
pub fn load_rgba(path: &Path) -> StageResult<RgbaImage> {
    let image = image::open(path).map_err(|source| StageError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "Loaded image {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image.to_rgba8())
}
