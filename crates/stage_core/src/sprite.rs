//! Sprites: costume frames, position, visibility and collision.
//!
//! Width, height and the active mask are derived from the current costume.
//! The costume index is private and only changes through [`Sprite::set_costume`],
//! which refreshes the derived fields immediately, so collision and edge
//! checks always see the geometry of the costume being drawn.

use std::path::Path;

use crate::costume::Costume;
use crate::error::{StageError, StageResult};
use crate::geometry::{Rect, ScreenSize};
use crate::mask::Mask;

#[derive(Debug, Clone)]
pub struct Sprite {
    costumes: Vec<Costume>,
    costume_id: usize,
    pub x: f32,
    pub y: f32,
    pub hidden: bool,
    width: u32,
    height: u32,
    bounds: ScreenSize,
}

impl Sprite {
    /// Builds a sprite centered on a screen of size `bounds`.
    pub fn new(
        costumes: Vec<Costume>,
        costume_id: usize,
        hidden: bool,
        bounds: ScreenSize,
    ) -> StageResult<Self> {
        if costumes.is_empty() {
            return Err(StageError::EmptyCostumes);
        }
        if costume_id >= costumes.len() {
            return Err(StageError::CostumeOutOfRange {
                index: costume_id,
                count: costumes.len(),
            });
        }

        let mut sprite = Self {
            costumes,
            costume_id,
            x: 0.0,
            y: 0.0,
            hidden,
            width: 0,
            height: 0,
            bounds,
        };
        sprite.update();
        sprite.x = centered(bounds.width, sprite.width);
        sprite.y = centered(bounds.height, sprite.height);
        Ok(sprite)
    }

    /// Loads every costume from disk, then behaves like [`Sprite::new`].
    pub fn load<P: AsRef<Path>>(
        paths: &[P],
        costume_id: usize,
        hidden: bool,
        bounds: ScreenSize,
    ) -> StageResult<Self> {
        let costumes = paths
            .iter()
            .map(Costume::load)
            .collect::<StageResult<Vec<_>>>()?;
        Self::new(costumes, costume_id, hidden, bounds)
    }

    pub fn costume_id(&self) -> usize {
        self.costume_id
    }

    pub fn costume_count(&self) -> usize {
        self.costumes.len()
    }

    pub fn costume(&self) -> &Costume {
        &self.costumes[self.costume_id]
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mask(&self) -> &Mask {
        self.costume().mask()
    }

    pub fn bounds(&self) -> ScreenSize {
        self.bounds
    }

    pub fn set_costume(&mut self, index: usize) -> StageResult<()> {
        if index >= self.costumes.len() {
            return Err(StageError::CostumeOutOfRange {
                index,
                count: self.costumes.len(),
            });
        }
        self.costume_id = index;
        self.update();
        Ok(())
    }

    /// Advances to the next costume, wrapping to the first.
    pub fn next_costume(&mut self) {
        self.costume_id = (self.costume_id + 1) % self.costumes.len();
        self.update();
    }

    /// Recomputes width, height and mask from the current costume.
    pub fn update(&mut self) {
        let costume = &self.costumes[self.costume_id];
        self.width = costume.width();
        self.height = costume.height();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// True when the top-left corner is off screen. Comparisons are strict:
    /// a sprite at exactly `(width, height)` is not at the edge.
    pub fn edge(&self) -> bool {
        self.x < 0.0
            || self.y < 0.0
            || self.x > self.bounds.width as f32
            || self.y > self.bounds.height as f32
    }

    /// True when any part of the current costume lies outside the screen.
    pub fn crosses_edge(&self) -> bool {
        self.x < 0.0
            || self.y < 0.0
            || self.x + self.width as f32 > self.bounds.width as f32
            || self.y + self.height as f32 > self.bounds.height as f32
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.x, self.y, self.width, self.height)
    }

    /// Pixel-accurate collision: bounding boxes first, then mask overlap.
    pub fn touched(&self, other: &Sprite) -> bool {
        if self.hidden || other.hidden {
            return false;
        }
        let ours = self.rect();
        let theirs = other.rect();
        if !ours.intersects(&theirs) {
            return false;
        }
        let offset = (theirs.x - ours.x, theirs.y - ours.y);
        self.mask().overlap(other.mask(), offset).is_some()
    }
}

fn centered(screen: u32, size: u32) -> f32 {
    (screen as i64 - size as i64).div_euclid(2) as f32
}
