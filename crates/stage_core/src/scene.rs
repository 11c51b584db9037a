//! Scene context: the entity registries plus backdrop and cursor.
//!
//! A `Scene` owns everything the frame loop composites. Registries are flat
//! `Vec`s in insertion order, which is also draw order: later entities are
//! painted over earlier ones. Entities are addressed by ids that are never
//! reused, so a deleted id stays invalid and every lookup on it reports
//! `SpriteNotFound` / `TextNotFound`.

use std::fmt;
use std::path::Path;

use crate::backdrop::Backdrop;
use crate::canvas::Canvas;
use crate::costume::Costume;
use crate::cursor::Cursor;
use crate::error::{StageError, StageResult};
use crate::geometry::ScreenSize;
use crate::sprite::Sprite;
use crate::text::{FontLibrary, TextLabel, TextSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextId(u64);

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for TextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub struct Scene {
    screen: ScreenSize,
    backdrop: Backdrop,
    cursor: Cursor,
    fonts: FontLibrary,
    sprites: Vec<(SpriteId, Sprite)>,
    texts: Vec<(TextId, TextLabel)>,
    next_id: u64,
}

impl Scene {
    pub fn new(screen: ScreenSize, fonts: FontLibrary) -> Self {
        Self {
            screen,
            backdrop: Backdrop::new(),
            cursor: Cursor::new(),
            fonts,
            sprites: Vec::new(),
            texts: Vec::new(),
            next_id: 1,
        }
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Sets the screen size used to center newly spawned sprites.
    /// Existing sprites keep the bounds they were created with.
    pub fn set_screen(&mut self, screen: ScreenSize) {
        self.screen = screen;
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    pub fn backdrop_mut(&mut self) -> &mut Backdrop {
        &mut self.backdrop
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    pub fn fonts_mut(&mut self) -> &mut FontLibrary {
        &mut self.fonts
    }

    // --- Sprites ------------------------------------------------------------

    /// Loads costumes from disk and registers a centered sprite.
    pub fn spawn_sprite<P: AsRef<Path>>(
        &mut self,
        costumes: &[P],
        costume_id: usize,
        hidden: bool,
    ) -> StageResult<SpriteId> {
        let bounds = self.configured_screen()?;
        let sprite = Sprite::load(costumes, costume_id, hidden, bounds)?;
        Ok(self.add_sprite(sprite))
    }

    /// Registers a centered sprite built from in-memory costumes.
    pub fn spawn_sprite_from(
        &mut self,
        costumes: Vec<Costume>,
        costume_id: usize,
        hidden: bool,
    ) -> StageResult<SpriteId> {
        let bounds = self.configured_screen()?;
        let sprite = Sprite::new(costumes, costume_id, hidden, bounds)?;
        Ok(self.add_sprite(sprite))
    }

    pub fn add_sprite(&mut self, sprite: Sprite) -> SpriteId {
        let id = SpriteId(self.allocate_id());
        log::debug!(
            "Sprite {} registered ({}x{}, {} costumes)",
            id,
            sprite.width(),
            sprite.height(),
            sprite.costume_count()
        );
        self.sprites.push((id, sprite));
        id
    }

    pub fn sprite(&self, id: SpriteId) -> StageResult<&Sprite> {
        self.sprites
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, s)| s)
            .ok_or(StageError::SpriteNotFound(id))
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> StageResult<&mut Sprite> {
        self.sprites
            .iter_mut()
            .find(|(sid, _)| *sid == id)
            .map(|(_, s)| s)
            .ok_or(StageError::SpriteNotFound(id))
    }

    /// Removes a sprite from the registry and hands it back.
    pub fn delete_sprite(&mut self, id: SpriteId) -> StageResult<Sprite> {
        let index = self
            .sprites
            .iter()
            .position(|(sid, _)| *sid == id)
            .ok_or(StageError::SpriteNotFound(id))?;
        log::debug!("Sprite {} deleted", id);
        Ok(self.sprites.remove(index).1)
    }

    /// Collision test between two registered sprites.
    pub fn touched(&self, a: SpriteId, b: SpriteId) -> StageResult<bool> {
        Ok(self.sprite(a)?.touched(self.sprite(b)?))
    }

    /// Sprites in draw order.
    pub fn sprites(&self) -> impl Iterator<Item = (SpriteId, &Sprite)> {
        self.sprites.iter().map(|(id, s)| (*id, s))
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    // --- Text ---------------------------------------------------------------

    pub fn spawn_text(&mut self, spec: TextSpec) -> StageResult<TextId> {
        let label = TextLabel::new(spec, &mut self.fonts)?;
        Ok(self.add_text(label))
    }

    pub fn add_text(&mut self, label: TextLabel) -> TextId {
        let id = TextId(self.allocate_id());
        log::debug!("Text {} registered ({:?})", id, label.content);
        self.texts.push((id, label));
        id
    }

    pub fn text(&self, id: TextId) -> StageResult<&TextLabel> {
        self.texts
            .iter()
            .find(|(tid, _)| *tid == id)
            .map(|(_, t)| t)
            .ok_or(StageError::TextNotFound(id))
    }

    pub fn text_mut(&mut self, id: TextId) -> StageResult<&mut TextLabel> {
        self.texts
            .iter_mut()
            .find(|(tid, _)| *tid == id)
            .map(|(_, t)| t)
            .ok_or(StageError::TextNotFound(id))
    }

    /// Rebuilds a label's renderer after its font, size or style changed.
    pub fn update_text(&mut self, id: TextId) -> StageResult<()> {
        let label = self
            .texts
            .iter_mut()
            .find(|(tid, _)| *tid == id)
            .map(|(_, t)| t)
            .ok_or(StageError::TextNotFound(id))?;
        label.update(&mut self.fonts)
    }

    pub fn delete_text(&mut self, id: TextId) -> StageResult<TextLabel> {
        let index = self
            .texts
            .iter()
            .position(|(tid, _)| *tid == id)
            .ok_or(StageError::TextNotFound(id))?;
        log::debug!("Text {} deleted", id);
        Ok(self.texts.remove(index).1)
    }

    pub fn texts(&self) -> impl Iterator<Item = (TextId, &TextLabel)> {
        self.texts.iter().map(|(id, t)| (*id, t))
    }

    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    // --- Compositing --------------------------------------------------------

    /// Draws backdrop, visible sprites, then text, each in registry order.
    pub fn composite(&self, canvas: &mut Canvas) {
        canvas.resize(self.screen);
        self.backdrop.draw(canvas);
        for (_, sprite) in &self.sprites {
            if sprite.hidden {
                continue;
            }
            let rect = sprite.rect();
            canvas.blit(sprite.costume().image(), rect.x, rect.y);
        }
        for (_, label) in &self.texts {
            label.draw(canvas);
        }
    }

    fn configured_screen(&self) -> StageResult<ScreenSize> {
        if self.screen.is_zero() {
            return Err(StageError::ScreenNotConfigured);
        }
        Ok(self.screen)
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
