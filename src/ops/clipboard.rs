// ============================================================================
// CLIPBOARD OPERATIONS — cut, copy, paste through the selection float
// ============================================================================

use crate::canvas::Canvas;
use crate::components::history::{PixelAction, write_pixel};
use crate::components::selection::SelectionTool;
use crate::project::Sprite;

/// In-app clipboard. Holds a detached pixel grid, transparency included.
#[derive(Debug, Default)]
pub struct Clipboard {
    content: Option<Canvas>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    pub fn content(&self) -> Option<&Canvas> {
        self.content.as_ref()
    }

    /// Store externally decoded pixels (e.g. an image from the OS).
    pub fn set_content(&mut self, pixels: Canvas) {
        self.content = Some(pixels);
    }

    /// Copy the float, or the settled selection's region, into the clipboard.
    /// Returns true if anything was copied.
    pub fn copy(&mut self, selection: &SelectionTool, canvas: &Canvas) -> bool {
        if let Some(pixels) = selection.clone_floating_pixels() {
            self.content = Some(pixels);
            return true;
        }
        match selection.selection_rect() {
            Some(r) => {
                self.content = Some(canvas.extract_region(r.x, r.y, r.width, r.height));
                true
            }
            None => false,
        }
    }

    /// Copy, then remove the selected pixels from the sprite as one history step.
    ///
    /// A float is dropped and its lift action recorded; a settled selection is
    /// erased in place.
    pub fn cut(&mut self, selection: &mut SelectionTool, sprite: &mut Sprite) -> bool {
        if !self.copy(selection, sprite.canvas()) {
            return false;
        }

        let action = if selection.has_float() {
            selection.discard_float()
        } else {
            let mut action = PixelAction::with_label("Cut");
            if let Some(r) = selection.selection_rect() {
                let canvas = sprite.canvas_mut();
                for dy in 0..r.height as i32 {
                    for dx in 0..r.width as i32 {
                        write_pixel(canvas, &mut action, r.x + dx, r.y + dy, None);
                    }
                }
            }
            selection.clear_selection();
            action
        };

        sprite.commit(action);
        true
    }

    /// Drop the clipboard content at `(x, y)` as a new float.
    ///
    /// A float already in place is committed first so its edit is kept in
    /// history. Returns false when the clipboard is empty.
    pub fn paste(&self, selection: &mut SelectionTool, sprite: &mut Sprite, x: i32, y: i32) -> bool {
        let Some(pixels) = &self.content else { return false };
        let committed = selection.commit_float(sprite.canvas_mut());
        sprite.commit(committed);
        selection.set_float(pixels.clone(), x, y);
        true
    }
}
