use image::Rgba;
use std::collections::VecDeque;

use crate::canvas::Canvas;

// ============================================================================
// PIXEL CHANGE / PIXEL ACTION - the unit of undo
// ============================================================================

/// One coordinate's before/after pair. Enough to apply or invert without
/// looking at the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelChange {
    pub x: i32,
    pub y: i32,
    pub old_color: Option<Rgba<u8>>,
    pub new_color: Option<Rgba<u8>>,
}

impl PixelChange {
    pub fn new(x: i32, y: i32, old_color: Option<Rgba<u8>>, new_color: Option<Rgba<u8>>) -> Self {
        Self { x, y, old_color, new_color }
    }
}

/// An ordered batch of pixel changes making up one user gesture.
///
/// Revert walks the changes backwards: a coordinate touched twice must end
/// on the first change's `old_color`, not the second's.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelAction {
    label: String,
    changes: Vec<PixelChange>,
}

impl PixelAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(label: &str) -> Self {
        Self {
            label: label.to_string(),
            changes: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    pub fn push(&mut self, change: PixelChange) {
        self.changes.push(change);
    }

    /// Move every change of `other` onto the end of this action.
    pub fn append(&mut self, mut other: PixelAction) {
        self.changes.append(&mut other.changes);
    }

    pub fn changes(&self) -> &[PixelChange] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn apply(&self, canvas: &mut Canvas) {
        for c in &self.changes {
            canvas.set(c.x, c.y, c.new_color);
        }
    }

    pub fn revert(&self, canvas: &mut Canvas) {
        for c in self.changes.iter().rev() {
            canvas.set(c.x, c.y, c.old_color);
        }
    }
}

/// Write `color` at `(x, y)` and record the change, unless the cell is out of
/// bounds or already holds exactly that value.
///
/// Returns true when a change was recorded.
pub fn write_pixel(
    canvas: &mut Canvas,
    action: &mut PixelAction,
    x: i32,
    y: i32,
    color: Option<Rgba<u8>>,
) -> bool {
    if !canvas.in_bounds(x, y) {
        return false;
    }
    let old = canvas.get(x, y);
    if old == color {
        return false;
    }
    action.push(PixelChange::new(x, y, old, color));
    canvas.set(x, y, color);
    true
}

// ============================================================================
// ACTION HISTORY - two-stack undo/redo log with a step cap
// ============================================================================

/// Undo/redo log for one sprite's canvas.
///
/// `max_steps` caps the undo stack; the oldest action is dropped once it
/// is exceeded. `0` means unbounded.
#[derive(Debug)]
pub struct ActionHistory {
    undo_stack: VecDeque<PixelAction>,
    redo_stack: Vec<PixelAction>,
    max_steps: usize,
}

impl Default for ActionHistory {
    fn default() -> Self {
        Self::new(50)
    }
}

impl ActionHistory {
    pub fn new(max_steps: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_steps,
        }
    }

    /// Record a finished action. Empty actions are ignored; anything else
    /// discards the redo branch.
    pub fn push(&mut self, action: PixelAction) {
        if action.is_empty() {
            return;
        }
        self.undo_stack.push_back(action);
        self.redo_stack.clear();
        self.prune();
    }

    /// Revert the most recent action. Returns its label.
    pub fn undo(&mut self, canvas: &mut Canvas) -> Option<String> {
        let action = self.undo_stack.pop_back()?;
        action.revert(canvas);
        let label = action.label().to_string();
        self.redo_stack.push(action);
        Some(label)
    }

    /// Re-apply the most recently undone action. Returns its label.
    pub fn redo(&mut self, canvas: &mut Canvas) -> Option<String> {
        let action = self.redo_stack.pop()?;
        action.apply(canvas);
        let label = action.label().to_string();
        self.undo_stack.push_back(action);
        self.prune();
        Some(label)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|a| a.label())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|a| a.label())
    }

    /// Labels of every undoable action, most recent first.
    pub fn undo_history(&self) -> Vec<String> {
        self.undo_stack.iter().rev().map(|a| a.label().to_string()).collect()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn set_max_steps(&mut self, max_steps: usize) {
        self.max_steps = max_steps;
        self.prune();
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn prune(&mut self) {
        if self.max_steps == 0 {
            return;
        }
        while self.undo_stack.len() > self.max_steps {
            self.undo_stack.pop_front();
        }
    }
}
