//! On-screen text labels.
//!
//! A label's font face, size and style flags are baked into a [`TextRenderer`]
//! when the label is created. Editing those fields afterwards has no visible
//! effect until [`TextLabel::update`] rebuilds the renderer. Content, position,
//! color and background are read every time the label is drawn.
//!
//! Glyphs are rasterized with fontdue on a single line. Bold, italic and
//! underline are synthesized on the glyph coverage:
//!   - bold smears coverage one pixel to the right,
//!   - italic shears rows right by `ITALIC_SLANT` pixels per row above the bottom,
//!   - underline is a solid run one pixel below the baseline.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::canvas::Canvas;
use crate::error::{StageError, StageResult};
use crate::geometry::Rect;
use crate::palette::{Rgb, WHITE};

const ITALIC_SLANT: f32 = 0.2;

/// Fonts probed, in order, when no default font is configured.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Loaded font faces, keyed by path.
pub struct FontLibrary {
    default_font: Option<PathBuf>,
    faces: HashMap<PathBuf, Arc<fontdue::Font>>,
}

impl FontLibrary {
    pub fn new(default_font: Option<PathBuf>) -> Self {
        Self {
            default_font,
            faces: HashMap::new(),
        }
    }

    pub fn default_font(&self) -> Option<&Path> {
        self.default_font.as_deref()
    }

    /// Face for `path`, or the default face when `path` is `None`.
    pub fn face(&mut self, path: Option<&Path>) -> StageResult<Arc<fontdue::Font>> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => self.resolve_default()?,
        };
        if let Some(face) = self.faces.get(&path) {
            return Ok(face.clone());
        }

        let bytes = std::fs::read(&path).map_err(|e| StageError::FontLoad {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let face = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()).map_err(
            |e| StageError::FontLoad {
                path: path.clone(),
                message: e.to_string(),
            },
        )?;
        log::debug!("Loaded font {}", path.display());
        let face = Arc::new(face);
        self.faces.insert(path, face.clone());
        Ok(face)
    }

    fn resolve_default(&mut self) -> StageResult<PathBuf> {
        if let Some(path) = &self.default_font {
            return Ok(path.clone());
        }
        let found = SYSTEM_FONT_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file())
            .ok_or(StageError::NoDefaultFont)?;
        log::info!("Using system font {} as default", found.display());
        self.default_font = Some(found.clone());
        Ok(found)
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Baked font face, pixel size and style flags.
#[derive(Clone)]
pub struct TextRenderer {
    face: Arc<fontdue::Font>,
    size: u32,
    bold: bool,
    italic: bool,
    underline: bool,
}

impl TextRenderer {
    pub fn new(
        face: Arc<fontdue::Font>,
        size: u32,
        bold: bool,
        italic: bool,
        underline: bool,
    ) -> StageResult<Self> {
        if size == 0 {
            return Err(StageError::InvalidTextSize);
        }
        Ok(Self {
            face,
            size,
            bold,
            italic,
            underline,
        })
    }

    /// Renders `content` to a standalone image. Without a background the
    /// image is transparent outside the glyphs.
    pub fn render(&self, content: &str, color: Rgb, background: Option<Rgb>) -> RgbaImage {
        let px = self.size as f32;
        let (ascent, descent) = match self.face.horizontal_line_metrics(px) {
            Some(m) => (m.ascent, m.descent),
            None => (px * 0.8, -px * 0.2),
        };

        // Glyph boxes relative to the pen origin on the baseline, y down.
        let mut glyphs = Vec::new();
        let mut pen_x = 0.0f32;
        let mut previous: Option<char> = None;
        for ch in content.chars() {
            if let Some(prev) = previous {
                pen_x += self.face.horizontal_kern(prev, ch, px).unwrap_or(0.0);
            }
            let (metrics, bitmap) = self.face.rasterize(ch, px);
            let rect = Rect::new(
                (pen_x + metrics.xmin as f32).round() as i32,
                -(metrics.ymin + metrics.height as i32),
                metrics.width as u32,
                metrics.height as u32,
            );
            glyphs.push((rect, bitmap));
            pen_x += metrics.advance_width;
            previous = Some(ch);
        }

        let underline = self.underline.then(|| (self.size / 14).max(1));
        let boxes: Vec<Rect> = glyphs.iter().map(|(rect, _)| *rect).collect();
        let layout = LineLayout::measure(ascent, descent, pen_x, &boxes, underline);

        let slant = if self.italic {
            (layout.height as f32 * ITALIC_SLANT).ceil() as u32
        } else {
            0
        };
        let width = layout.width + u32::from(self.bold) + slant;

        let mut coverage = CoverageMap::new(width, layout.height);
        for (rect, bitmap) in &glyphs {
            coverage.stamp(
                bitmap,
                rect.x + layout.origin_x,
                rect.y + layout.baseline,
                rect.w,
                rect.h,
            );
        }
        if self.bold {
            coverage.embolden();
        }
        if self.italic {
            coverage.shear(ITALIC_SLANT);
        }
        if let Some(thickness) = underline {
            coverage.underline(layout.baseline + 1, thickness);
        }
        coverage.colorize(color, background)
    }
}

/// Where a line sits inside its coverage map. The map covers the font's
/// ascent and descent plus every glyph box and the underline, so nothing
/// that overhangs the line metrics is clipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineLayout {
    origin_x: i32,
    baseline: i32,
    width: u32,
    height: u32,
}

impl LineLayout {
    /// `boxes` are relative to the pen origin on the baseline, y down.
    fn measure(
        ascent: f32,
        descent: f32,
        advance: f32,
        boxes: &[Rect],
        underline: Option<u32>,
    ) -> Self {
        let mut left = 0i64;
        let mut right = advance.ceil().max(0.0) as i64;
        let mut top = -(ascent.ceil() as i64);
        let mut bottom = -(descent.floor() as i64);
        for rect in boxes.iter().filter(|r| !r.is_empty()) {
            left = left.min(rect.x as i64);
            right = right.max(rect.right());
            top = top.min(rect.y as i64);
            bottom = bottom.max(rect.bottom());
        }
        if let Some(thickness) = underline {
            bottom = bottom.max(1 + thickness as i64);
        }
        Self {
            origin_x: -left as i32,
            baseline: -top as i32,
            width: (right - left).max(0) as u32,
            height: (bottom - top).max(1) as u32,
        }
    }
}

/// 8-bit glyph coverage for one rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl CoverageMap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[(y * self.width + x) as usize]
    }

    /// Max-combines a `w` x `h` glyph bitmap with its top-left at (x, y).
    pub fn stamp(&mut self, bitmap: &[u8], x: i32, y: i32, w: u32, h: u32) {
        for row in 0..h {
            for col in 0..w {
                let tx = x + col as i32;
                let ty = y + row as i32;
                if tx < 0 || ty < 0 || tx as u32 >= self.width || ty as u32 >= self.height {
                    continue;
                }
                let value = bitmap[(row * w + col) as usize];
                let cell = &mut self.data[(ty as u32 * self.width + tx as u32) as usize];
                *cell = (*cell).max(value);
            }
        }
    }

    pub fn embolden(&mut self) {
        for y in 0..self.height {
            for x in (1..self.width).rev() {
                let left = self.get(x - 1, y);
                let cell = &mut self.data[(y * self.width + x) as usize];
                *cell = (*cell).max(left);
            }
        }
    }

    /// Shifts each row right by `slant` pixels per row above the bottom row.
    pub fn shear(&mut self, slant: f32) {
        for y in 0..self.height {
            let shift = ((self.height - 1 - y) as f32 * slant).round() as u32;
            if shift == 0 {
                continue;
            }
            let start = (y * self.width) as usize;
            let row = &mut self.data[start..start + self.width as usize];
            let shift = (shift as usize).min(row.len());
            row.rotate_right(shift);
            row[..shift].fill(0);
        }
    }

    pub fn underline(&mut self, top: i32, thickness: u32) {
        for y in top..top + thickness as i32 {
            if y < 0 || y as u32 >= self.height {
                continue;
            }
            let start = (y as u32 * self.width) as usize;
            self.data[start..start + self.width as usize].fill(255);
        }
    }

    pub fn colorize(&self, color: Rgb, background: Option<Rgb>) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let a = self.get(x, y) as u32;
            match background {
                None => Rgba([color.r, color.g, color.b, a as u8]),
                Some(bg) => {
                    let mix = |fg: u8, bg: u8| {
                        ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
                    };
                    Rgba([mix(color.r, bg.r), mix(color.g, bg.g), mix(color.b, bg.b), 255])
                }
            }
        })
    }
}

/// Construction parameters for a [`TextLabel`].
#[derive(Debug, Clone)]
pub struct TextSpec {
    pub content: String,
    pub x: i32,
    pub y: i32,
    pub size: u32,
    pub color: Rgb,
    pub background: Option<Rgb>,
    pub font: Option<PathBuf>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextSpec {
    pub fn new(content: impl Into<String>, x: i32, y: i32, size: u32) -> Self {
        Self {
            content: content.into(),
            x,
            y,
            size,
            color: WHITE,
            background: None,
            font: None,
            bold: false,
            italic: false,
            underline: false,
        }
    }

    pub fn color(mut self, color: impl Into<Rgb>) -> Self {
        self.color = color.into();
        self
    }

    pub fn background(mut self, color: impl Into<Rgb>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn font(mut self, path: impl Into<PathBuf>) -> Self {
        self.font = Some(path.into());
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }
}

pub struct TextLabel {
    pub content: String,
    pub x: i32,
    pub y: i32,
    pub size: u32,
    pub color: Rgb,
    pub background: Option<Rgb>,
    pub font: Option<PathBuf>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    renderer: TextRenderer,
}

impl TextLabel {
    pub fn new(spec: TextSpec, fonts: &mut FontLibrary) -> StageResult<Self> {
        let renderer = bake(
            fonts,
            spec.font.as_deref(),
            spec.size,
            spec.bold,
            spec.italic,
            spec.underline,
        )?;
        Ok(Self {
            content: spec.content,
            x: spec.x,
            y: spec.y,
            size: spec.size,
            color: spec.color,
            background: spec.background,
            font: spec.font,
            bold: spec.bold,
            italic: spec.italic,
            underline: spec.underline,
            renderer,
        })
    }

    /// Rebuilds the renderer from the current font, size and style fields.
    pub fn update(&mut self, fonts: &mut FontLibrary) -> StageResult<()> {
        self.renderer = bake(
            fonts,
            self.font.as_deref(),
            self.size,
            self.bold,
            self.italic,
            self.underline,
        )?;
        Ok(())
    }

    pub fn render(&self) -> RgbaImage {
        self.renderer
            .render(&self.content, self.color, self.background)
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        canvas.blit(&self.render(), self.x, self.y);
    }
}

fn bake(
    fonts: &mut FontLibrary,
    font: Option<&Path>,
    size: u32,
    bold: bool,
    italic: bool,
    underline: bool,
) -> StageResult<TextRenderer> {
    if size == 0 {
        return Err(StageError::InvalidTextSize);
    }
    let face = fonts.face(font)?;
    TextRenderer::new(face, size, bold, italic, underline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{BLACK, RED};

    /// Fonts resolved from the system list, or `None` (test skipped) on
    /// machines without any of them.
    fn system_fonts() -> Option<FontLibrary> {
        let mut fonts = FontLibrary::default();
        match fonts.face(None) {
            Ok(_) => Some(fonts),
            Err(err) => {
                eprintln!("skipping font test: {err}");
                None
            }
        }
    }

    fn alpha_sum(image: &RgbaImage) -> u64 {
        image.pixels().map(|p| p.0[3] as u64).sum()
    }

    fn glyph_block() -> CoverageMap {
        // 4x4 map with a single opaque column at x = 1.
        let mut map = CoverageMap::new(4, 4);
        map.stamp(&[255, 255, 255, 255], 1, 0, 1, 4);
        map
    }

    #[test]
    fn stamp_clips_and_keeps_max() {
        let mut map = CoverageMap::new(2, 2);
        map.stamp(&[10, 200, 30, 40], -1, 0, 2, 2);
        assert_eq!(map.get(0, 0), 200);
        assert_eq!(map.get(0, 1), 40);
        map.stamp(&[100], 0, 0, 1, 1);
        assert_eq!(map.get(0, 0), 200);
    }

    #[test]
    fn embolden_widens_strokes() {
        let mut map = glyph_block();
        map.embolden();
        assert_eq!(map.get(1, 2), 255);
        assert_eq!(map.get(2, 2), 255);
        assert_eq!(map.get(3, 2), 0);
        assert_eq!(map.get(0, 2), 0);
    }

    #[test]
    fn shear_slants_upper_rows_right() {
        let mut map = glyph_block();
        map.shear(0.5);
        // Bottom row stays, top row (3 rows above) moves by round(1.5) = 2.
        assert_eq!(map.get(1, 3), 255);
        assert_eq!(map.get(3, 0), 255);
        assert_eq!(map.get(1, 0), 0);
    }

    #[test]
    fn underline_fills_rows_and_clips() {
        let mut map = CoverageMap::new(3, 3);
        map.underline(2, 5);
        assert_eq!(map.get(0, 2), 255);
        assert_eq!(map.get(2, 2), 255);
        assert_eq!(map.get(0, 1), 0);
    }

    #[test]
    fn colorize_without_background_uses_alpha() {
        let map = glyph_block();
        let image = map.colorize(RED, None);
        assert_eq!(image.get_pixel(1, 0).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0, 0]);
    }

    #[test]
    fn colorize_with_background_is_opaque() {
        let map = glyph_block();
        let image = map.colorize(RED, Some(BLACK));
        assert_eq!(image.get_pixel(1, 0).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn spec_builder_defaults() {
        let spec = TextSpec::new("score", 4, 8, 24).bold(true).background(BLACK);
        assert_eq!(spec.color, WHITE);
        assert_eq!(spec.background, Some(BLACK));
        assert!(spec.bold && !spec.italic && !spec.underline);
        assert!(spec.font.is_none());
    }

    #[test]
    fn zero_size_is_rejected_before_font_lookup() {
        let mut fonts = FontLibrary::new(Some(PathBuf::from("/nonexistent/font.ttf")));
        let err = TextLabel::new(TextSpec::new("x", 0, 0, 0), &mut fonts)
            .err()
            .expect("size 0 should fail");
        assert!(matches!(err, StageError::InvalidTextSize));
    }

    #[test]
    fn missing_font_file_is_font_load_error() {
        let mut fonts = FontLibrary::new(None);
        let spec = TextSpec::new("x", 0, 0, 12).font("/nonexistent/font.ttf");
        let err = TextLabel::new(spec, &mut fonts)
            .err()
            .expect("missing font should fail");
        assert!(matches!(err, StageError::FontLoad { .. }));
    }

    #[test]
    fn layout_grows_to_fit_overhanging_glyphs() {
        // A descender reaching 4 rows below the baseline and an accent
        // 12 rows above it, on a line with ascent 9.2 and descent -2.3.
        let boxes = [Rect::new(-1, -12, 6, 16)];
        let layout = LineLayout::measure(9.2, -2.3, 5.0, &boxes, None);
        assert_eq!(layout.baseline, 12);
        assert_eq!(layout.height, 16);
        assert_eq!(layout.origin_x, 1);
        assert_eq!(layout.width, 6);
    }

    #[test]
    fn layout_keeps_line_metrics_for_small_glyphs() {
        let boxes = [Rect::new(0, -3, 2, 3)];
        let layout = LineLayout::measure(9.2, -2.3, 4.0, &boxes, None);
        assert_eq!(layout.baseline, 10);
        assert_eq!(layout.height, 13);
        assert_eq!((layout.origin_x, layout.width), (0, 4));
    }

    #[test]
    fn layout_makes_room_for_underline() {
        let layout = LineLayout::measure(9.0, -1.0, 4.0, &[], Some(3));
        assert_eq!(layout.baseline, 9);
        // Underline occupies baseline + 1 ..= baseline + 3.
        assert_eq!(layout.height, 13);
    }

    #[test]
    fn rendered_glyphs_keep_all_coverage() {
        let Some(mut fonts) = system_fonts() else {
            return;
        };
        let face = fonts.face(None).expect("default face");
        for size in [12u32, 24, 48] {
            let renderer =
                TextRenderer::new(face.clone(), size, false, false, false).expect("renderer");
            for ch in ['g', 'j', 'y', 'p', '_', 'Q'] {
                let (_, bitmap) = face.rasterize(ch, size as f32);
                let expected: u64 = bitmap.iter().map(|v| *v as u64).sum();
                let image = renderer.render(&ch.to_string(), WHITE, None);
                assert_eq!(alpha_sum(&image), expected, "{ch:?} at {size}px");
            }
        }
    }

    #[test]
    fn underline_is_drawn_inside_the_image() {
        let Some(mut fonts) = system_fonts() else {
            return;
        };
        let face = fonts.face(None).expect("default face");
        let plain = TextRenderer::new(face.clone(), 28, false, false, false).expect("renderer");
        let underlined = TextRenderer::new(face, 28, false, false, true).expect("renderer");
        let plain = plain.render("_", WHITE, None);
        let underlined = underlined.render("_", WHITE, None);
        assert!(underlined.height() >= plain.height());
        let full_rows = (0..underlined.height())
            .filter(|&y| (0..underlined.width()).all(|x| underlined.get_pixel(x, y).0[3] == 255))
            .count();
        assert!(full_rows >= 2, "underline rows: {full_rows}");
    }

    #[test]
    fn style_changes_wait_for_update() {
        let Some(mut fonts) = system_fonts() else {
            return;
        };
        let mut label = TextLabel::new(TextSpec::new("Hi", 0, 0, 24), &mut fonts).expect("label");
        let before = label.render();

        label.bold = true;
        assert_eq!(label.render(), before);

        label.update(&mut fonts).expect("update");
        let after = label.render();
        assert_ne!(after, before);
        assert_eq!(after.width(), before.width() + 1);
    }

    #[test]
    fn content_and_color_are_read_on_every_render() {
        let Some(mut fonts) = system_fonts() else {
            return;
        };
        let mut label = TextLabel::new(TextSpec::new("Hi", 0, 0, 24), &mut fonts).expect("label");
        let short = label.render();

        label.content = "Hi there".to_string();
        label.color = RED;
        let long = label.render();
        assert!(long.width() > short.width());
        assert!(long
            .pixels()
            .filter(|p| p.0[3] > 0)
            .all(|p| p.0[..3] == [255, 0, 0]));
    }
}
