use std::path::PathBuf;
use uuid::Uuid;

use crate::canvas::Canvas;
use crate::components::history::{ActionHistory, PixelAction};

/// Default number of undo steps kept per sprite.
pub const DEFAULT_HISTORY_STEPS: usize = 50;

/// One frame: a canvas with its own undo history.
///
/// The canvas is never swapped out; edits only mutate it.
#[derive(Debug)]
pub struct Sprite {
    pub id: Uuid,
    pub name: String,
    canvas: Canvas,
    history: ActionHistory,
}

impl Sprite {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self::from_canvas(name, Canvas::new(width, height))
    }

    pub fn from_canvas(name: impl Into<String>, canvas: Canvas) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            canvas,
            history: ActionHistory::new(DEFAULT_HISTORY_STEPS),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ActionHistory {
        &mut self.history
    }

    /// Both halves at once, for tools that edit the canvas and then record.
    pub fn parts_mut(&mut self) -> (&mut Canvas, &mut ActionHistory) {
        (&mut self.canvas, &mut self.history)
    }

    /// Record a finished action. Returns true if it was kept.
    pub fn commit(&mut self, action: PixelAction) -> bool {
        if action.is_empty() {
            return false;
        }
        self.history.push(action);
        true
    }

    pub fn undo(&mut self) -> Option<String> {
        self.history.undo(&mut self.canvas)
    }

    pub fn redo(&mut self) -> Option<String> {
        self.history.redo(&mut self.canvas)
    }
}

/// An ordered set of sprites sharing one frame size.
///
/// There is always at least one sprite and `active_index` always points at
/// one of them.
#[derive(Debug)]
pub struct Project {
    frame_width: u32,
    frame_height: u32,
    sprites: Vec<Sprite>,
    active_index: usize,

    /// `None` for projects that were never saved.
    pub path: Option<PathBuf>,
    pub is_dirty: bool,
}

impl Project {
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            sprites: vec![Sprite::new("Sprite 1", frame_width, frame_height)],
            active_index: 0,
            path: None,
            is_dirty: false,
        }
    }

    /// Build a project from existing sprites. `None` if the list is empty.
    pub fn from_sprites(frame_width: u32, frame_height: u32, sprites: Vec<Sprite>) -> Option<Self> {
        if sprites.is_empty() {
            return None;
        }
        Some(Self {
            frame_width,
            frame_height,
            sprites,
            active_index: 0,
            path: None,
            is_dirty: false,
        })
    }

    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Always false: a project holds at least one sprite.
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn sprite(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }

    pub fn sprite_mut(&mut self, index: usize) -> Option<&mut Sprite> {
        self.sprites.get_mut(index)
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_sprite(&self) -> &Sprite {
        &self.sprites[self.active_index]
    }

    pub fn active_sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprites[self.active_index]
    }

    /// Select a sprite. Out-of-range indices are ignored.
    pub fn set_active(&mut self, index: usize) {
        if index < self.sprites.len() {
            self.active_index = index;
        }
    }

    /// Append a blank frame-sized sprite and make it active.
    pub fn add_sprite(&mut self, name: impl Into<String>) {
        let sprite = Sprite::new(name, self.frame_width, self.frame_height);
        self.push_sprite(sprite);
    }

    /// Append an existing sprite and make it active.
    pub fn push_sprite(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
        self.active_index = self.sprites.len() - 1;
        self.mark_dirty();
    }

    /// Remove a sprite. The last remaining sprite can't be removed.
    pub fn remove_sprite(&mut self, index: usize) {
        if self.sprites.len() <= 1 || index >= self.sprites.len() {
            return;
        }
        self.sprites.remove(index);
        if self.active_index >= self.sprites.len() {
            self.active_index = self.sprites.len() - 1;
        }
        self.mark_dirty();
    }

    pub fn rename_sprite(&mut self, index: usize, name: impl Into<String>) {
        if let Some(sprite) = self.sprites.get_mut(index) {
            sprite.name = name.into();
            self.is_dirty = true;
        }
    }

    pub fn replace_sprite(&mut self, index: usize, sprite: Sprite) {
        if let Some(slot) = self.sprites.get_mut(index) {
            *slot = sprite;
            self.is_dirty = true;
        }
    }

    /// "Sprite N" for the next sprite to be added.
    pub fn next_default_name(&self) -> String {
        format!("Sprite {}", self.sprites.len() + 1)
    }

    /// Apply `max_steps` to every sprite's history.
    pub fn set_history_limit(&mut self, max_steps: usize) {
        for sprite in &mut self.sprites {
            sprite.history.set_max_steps(max_steps);
        }
    }

    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
    }

    /// File name (or "Untitled") with a `*` when there are unsaved edits.
    pub fn display_title(&self) -> String {
        let name = self
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string());
        if self.is_dirty {
            format!("{}*", name)
        } else {
            name
        }
    }
}
