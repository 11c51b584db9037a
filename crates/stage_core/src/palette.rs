//! Named colors used for backdrops and text.

use serde::Deserialize;

/// Opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// RGBA pixel with full alpha.
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

pub const RED: Rgb = Rgb::new(255, 0, 0);
pub const GREEN: Rgb = Rgb::new(0, 255, 0);
pub const BLUE: Rgb = Rgb::new(0, 0, 255);
pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
pub const PURPLE: Rgb = Rgb::new(128, 0, 128);
pub const PINK: Rgb = Rgb::new(255, 192, 203);
pub const ORANGE: Rgb = Rgb::new(255, 165, 0);
pub const GRAY: Rgb = Rgb::new(128, 128, 128);
pub const AQUA: Rgb = Rgb::new(0, 255, 255);
pub const MAGENTA: Rgb = Rgb::new(255, 0, 255);
pub const BROWN: Rgb = Rgb::new(139, 69, 19);
pub const BLACK: Rgb = Rgb::new(0, 0, 0);
pub const WHITE: Rgb = Rgb::new(255, 255, 255);
pub const BEIGE: Rgb = Rgb::new(255, 228, 196);
pub const DARK_BLUE: Rgb = Rgb::new(0, 0, 139);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_black() {
        assert_eq!(Rgb::default(), BLACK);
    }

    #[test]
    fn to_rgba_is_opaque() {
        assert_eq!(ORANGE.to_rgba(), [255, 165, 0, 255]);
    }

    #[test]
    fn deserializes_from_triple() {
        let color: Rgb = serde_json::from_str("[139, 69, 19]").expect("valid triple");
        assert_eq!(color, BROWN);
    }

    #[test]
    fn converts_from_tuple() {
        assert_eq!(Rgb::from((0, 0, 139)), DARK_BLUE);
    }
}
