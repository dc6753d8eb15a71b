use crate::canvas::Canvas;
use crate::components::history::{PixelAction, PixelChange};

// ============================================================================
// SELECTION RECT
// ============================================================================

/// Axis-aligned selection in canvas cells. `width`/`height` are inclusive
/// extents, so a single-cell selection is 1×1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl SelectionRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Normalized bounding box of two corner cells, both included.
    pub fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let min_x = x0.min(x1);
        let min_y = y0.min(y1);
        Self {
            x: min_x,
            y: min_y,
            width: (x0.max(x1) - min_x + 1) as u32,
            height: (y0.max(y1) - min_y + 1) as u32,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && ((x - self.x) as u32) < self.width
            && ((y - self.y) as u32) < self.height
    }

    pub fn is_degenerate(&self) -> bool {
        self.width < 1 || self.height < 1
    }
}

// ============================================================================
// FLOATING BUFFER
// ============================================================================

/// Pixels lifted off the canvas, plus the transparent-writes made when they
/// were lifted. Committing appends the stamp diffs to `lift`.
#[derive(Clone, Debug)]
struct FloatingBuffer {
    pixels: Canvas,
    x: i32,
    y: i32,
    lift: PixelAction,
}

impl FloatingBuffer {
    fn rect(&self) -> SelectionRect {
        SelectionRect::new(self.x, self.y, self.pixels.width(), self.pixels.height())
    }

    /// Copy every cell of `rect` into a new buffer and clear the non-empty
    /// ones on the canvas, recording each clear.
    fn lift(canvas: &mut Canvas, rect: SelectionRect) -> Self {
        let mut pixels = Canvas::new(rect.width, rect.height);
        let mut lift = PixelAction::with_label("Move Selection");

        for dy in 0..rect.height as i32 {
            for dx in 0..rect.width as i32 {
                let cx = rect.x + dx;
                let cy = rect.y + dy;
                if !canvas.in_bounds(cx, cy) {
                    continue;
                }
                let pixel = canvas.get(cx, cy);
                pixels.set(dx, dy, pixel);
                if pixel.is_some() {
                    lift.push(PixelChange::new(cx, cy, pixel, None));
                    canvas.set(cx, cy, None);
                }
            }
        }

        Self {
            pixels,
            x: rect.x,
            y: rect.y,
            lift,
        }
    }

    /// Write the non-empty cells back at the current anchor. Cells already
    /// holding the same color and cells off the canvas are skipped.
    fn stamp(self, canvas: &mut Canvas) -> PixelAction {
        let mut action = self.lift;
        for (dx, dy, pixel) in self.pixels.pixels() {
            let Some(pixel) = pixel else { continue };
            let cx = self.x + dx;
            let cy = self.y + dy;
            if !canvas.in_bounds(cx, cy) {
                continue;
            }
            let old = canvas.get(cx, cy);
            if old == Some(pixel) {
                continue;
            }
            action.push(PixelChange::new(cx, cy, old, Some(pixel)));
            canvas.set(cx, cy, Some(pixel));
        }
        action
    }
}

// ============================================================================
// SELECTION TOOL — None / Selecting / Moving state machine
// ============================================================================

/// Gesture mode of the selection tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMode {
    None,
    Selecting,
    Moving,
}

#[derive(Debug, Default)]
enum SelectionState {
    #[default]
    Idle,
    /// Dragging out a new rectangle. `rect` stays `None` until the first drag.
    Selecting {
        start: (i32, i32),
        rect: Option<SelectionRect>,
    },
    /// Settled rectangle, pixels still on the canvas.
    Selected { rect: SelectionRect },
    /// Settled float waiting to be moved or committed.
    Floating { float: FloatingBuffer },
    /// Float being dragged; `offset` is the press point relative to its anchor.
    Moving {
        float: FloatingBuffer,
        offset: (i32, i32),
    },
}

/// Rectangular selection with a movable floating buffer.
///
/// A press inside a settled selection lifts its pixels into a float; the
/// float is only written back (stamped) on commit, and the lift and stamp
/// diffs are recorded as one action.
#[derive(Debug, Default)]
pub struct SelectionTool {
    state: SelectionState,
}

impl SelectionTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectionMode {
        match self.state {
            SelectionState::Selecting { .. } => SelectionMode::Selecting,
            SelectionState::Moving { .. } => SelectionMode::Moving,
            _ => SelectionMode::None,
        }
    }

    pub fn selection_rect(&self) -> Option<SelectionRect> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Selecting { rect, .. } => *rect,
            SelectionState::Selected { rect } => Some(*rect),
            SelectionState::Floating { float } | SelectionState::Moving { float, .. } => {
                Some(float.rect())
            }
        }
    }

    pub fn has_selection(&self) -> bool {
        self.selection_rect().is_some()
    }

    pub fn has_float(&self) -> bool {
        self.float().is_some()
    }

    /// Floating pixels and their anchor, for preview rendering.
    pub fn floating_pixels(&self) -> Option<(&Canvas, i32, i32)> {
        self.float().map(|f| (&f.pixels, f.x, f.y))
    }

    fn float(&self) -> Option<&FloatingBuffer> {
        match &self.state {
            SelectionState::Floating { float } | SelectionState::Moving { float, .. } => {
                Some(float)
            }
            _ => None,
        }
    }

    /// Begin a gesture. Usually returns an empty action; when a float is
    /// committed by clicking outside it, the commit action is returned so the
    /// caller records it.
    pub fn on_press(&mut self, canvas: &mut Canvas, x: i32, y: i32) -> PixelAction {
        let mut action = PixelAction::new();

        let state = match std::mem::take(&mut self.state) {
            SelectionState::Moving { float, .. } => SelectionState::Floating { float },
            SelectionState::Selecting { .. } => SelectionState::Idle,
            other => other,
        };

        self.state = match state {
            SelectionState::Floating { float } if float.rect().contains(x, y) => {
                let offset = (x - float.x, y - float.y);
                SelectionState::Moving { float, offset }
            }
            SelectionState::Floating { float } => {
                action = float.stamp(canvas);
                SelectionState::Selecting { start: (x, y), rect: None }
            }
            SelectionState::Selected { rect } if rect.contains(x, y) => {
                let float = FloatingBuffer::lift(canvas, rect);
                let offset = (x - float.x, y - float.y);
                SelectionState::Moving { float, offset }
            }
            _ => SelectionState::Selecting { start: (x, y), rect: None },
        };

        action
    }

    pub fn on_drag(&mut self, x: i32, y: i32) {
        match &mut self.state {
            SelectionState::Selecting { start, rect } => {
                *rect = Some(SelectionRect::from_corners(start.0, start.1, x, y));
            }
            SelectionState::Moving { float, offset } => {
                float.x = x - offset.0;
                float.y = y - offset.1;
            }
            _ => {}
        }
    }

    pub fn on_release(&mut self) {
        self.state = match std::mem::take(&mut self.state) {
            SelectionState::Selecting { rect: Some(rect), .. } if !rect.is_degenerate() => {
                SelectionState::Selected { rect }
            }
            SelectionState::Selecting { .. } => SelectionState::Idle,
            SelectionState::Moving { float, .. } => SelectionState::Floating { float },
            other => other,
        };
    }

    /// Stamp the float and return lift + stamp as one action. Without a
    /// float, just drops the selection and returns an empty action.
    pub fn commit_float(&mut self, canvas: &mut Canvas) -> PixelAction {
        match std::mem::take(&mut self.state) {
            SelectionState::Floating { float } | SelectionState::Moving { float, .. } => {
                float.stamp(canvas)
            }
            _ => PixelAction::new(),
        }
    }

    /// Deep copy of the floating pixels.
    pub fn clone_floating_pixels(&self) -> Option<Canvas> {
        self.float().map(|f| f.pixels.clone())
    }

    /// Install external pixels as a new float at `(x, y)`. The lift action is
    /// empty: nothing was removed from the canvas.
    pub fn set_float(&mut self, pixels: Canvas, x: i32, y: i32) {
        self.state = SelectionState::Floating {
            float: FloatingBuffer {
                pixels,
                x,
                y,
                lift: PixelAction::with_label("Paste"),
            },
        };
    }

    /// Drop all selection state without touching the canvas.
    pub fn clear_selection(&mut self) {
        self.state = SelectionState::Idle;
    }

    /// Drop the float without stamping. The lift action is returned so the
    /// cleared cells still land in history.
    pub fn discard_float(&mut self) -> PixelAction {
        match std::mem::take(&mut self.state) {
            SelectionState::Floating { float } | SelectionState::Moving { float, .. } => {
                let mut lift = float.lift;
                lift.set_label("Delete Selection");
                lift
            }
            _ => PixelAction::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::history::ActionHistory;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

    fn select(tool: &mut SelectionTool, canvas: &mut Canvas, from: (i32, i32), to: (i32, i32)) -> PixelAction {
        let action = tool.on_press(canvas, from.0, from.1);
        tool.on_drag(to.0, to.1);
        tool.on_release();
        action
    }

    #[test]
    fn drag_builds_normalized_rect() {
        let mut canvas = Canvas::new(8, 8);
        let mut tool = SelectionTool::new();
        tool.on_press(&mut canvas, 5, 6);
        assert_eq!(tool.mode(), SelectionMode::Selecting);
        tool.on_drag(2, 1);
        assert_eq!(tool.selection_rect(), Some(SelectionRect::new(2, 1, 4, 6)));
        tool.on_release();
        assert_eq!(tool.mode(), SelectionMode::None);
        assert!(tool.has_selection());
        assert!(!tool.has_float());
    }

    #[test]
    fn click_without_drag_leaves_no_selection() {
        let mut canvas = Canvas::new(4, 4);
        let mut tool = SelectionTool::new();
        tool.on_press(&mut canvas, 1, 1);
        tool.on_release();
        assert!(!tool.has_selection());
    }

    #[test]
    fn press_inside_lifts_pixels() {
        let mut canvas = Canvas::new(4, 4);
        canvas.set(1, 1, Some(RED));
        let mut tool = SelectionTool::new();
        select(&mut tool, &mut canvas, (0, 0), (2, 2));

        let action = tool.on_press(&mut canvas, 1, 1);
        assert!(action.is_empty());
        assert_eq!(tool.mode(), SelectionMode::Moving);
        assert_eq!(canvas.get(1, 1), None);

        let (pixels, x, y) = tool.floating_pixels().unwrap();
        assert_eq!((x, y), (0, 0));
        assert_eq!(pixels.get(1, 1), Some(RED));
        assert_eq!(pixels.get(0, 0), None);
    }

    #[test]
    fn move_tracks_rect_and_commit_stamps() {
        let mut canvas = Canvas::new(6, 6);
        canvas.set(0, 0, Some(RED));
        let mut tool = SelectionTool::new();
        select(&mut tool, &mut canvas, (0, 0), (1, 1));

        tool.on_press(&mut canvas, 0, 0);
        tool.on_drag(3, 2);
        assert_eq!(tool.selection_rect(), Some(SelectionRect::new(3, 2, 2, 2)));
        tool.on_release();
        assert!(tool.has_float());

        let action = tool.commit_float(&mut canvas);
        assert_eq!(canvas.get(0, 0), None);
        assert_eq!(canvas.get(3, 2), Some(RED));
        assert_eq!(action.len(), 2);
        assert!(!tool.has_selection());
    }

    #[test]
    fn press_outside_float_commits_and_starts_new_selection() {
        let mut canvas = Canvas::new(8, 8);
        canvas.set(0, 0, Some(RED));
        let mut history = ActionHistory::default();
        let mut tool = SelectionTool::new();
        select(&mut tool, &mut canvas, (0, 0), (0, 0));
        tool.on_press(&mut canvas, 0, 0);
        tool.on_drag(2, 2);
        tool.on_release();

        let action = tool.on_press(&mut canvas, 7, 7);
        assert_eq!(tool.mode(), SelectionMode::Selecting);
        assert!(!tool.has_float());
        assert_eq!(canvas.get(2, 2), Some(RED));
        assert_eq!(action.len(), 2);

        history.push(action);
        history.undo(&mut canvas);
        assert_eq!(canvas.get(0, 0), Some(RED));
        assert_eq!(canvas.get(2, 2), None);
    }

    #[test]
    fn commit_without_float_clears_selection() {
        let mut canvas = Canvas::new(4, 4);
        let mut tool = SelectionTool::new();
        select(&mut tool, &mut canvas, (0, 0), (1, 1));
        let action = tool.commit_float(&mut canvas);
        assert!(action.is_empty());
        assert!(!tool.has_selection());
    }

    #[test]
    fn stamp_clips_out_of_bounds_and_skips_identical() {
        let mut canvas = Canvas::new(3, 3);
        canvas.set(2, 2, Some(GREEN));
        let mut float = Canvas::new(2, 2);
        float.set(0, 0, Some(GREEN));
        float.set(1, 1, Some(RED));

        let mut tool = SelectionTool::new();
        tool.set_float(float, 2, 2);
        let action = tool.commit_float(&mut canvas);
        assert!(action.is_empty());
        assert_eq!(canvas.get(2, 2), Some(GREEN));
    }

    #[test]
    fn paste_float_has_no_lift_diffs() {
        let canvas = Canvas::new(4, 4);
        let mut float = Canvas::new(1, 1);
        float.set(0, 0, Some(RED));
        let mut tool = SelectionTool::new();
        tool.set_float(float, 1, 1);
        assert_eq!(tool.selection_rect(), Some(SelectionRect::new(1, 1, 1, 1)));
        assert!(tool.discard_float().is_empty());
        assert_eq!(canvas.get(1, 1), None);
        assert!(!tool.has_selection());
    }

    #[test]
    fn clone_floating_pixels_is_deep() {
        let mut canvas = Canvas::new(2, 2);
        canvas.set(0, 0, Some(RED));
        let mut tool = SelectionTool::new();
        select(&mut tool, &mut canvas, (0, 0), (1, 1));
        tool.on_press(&mut canvas, 0, 0);
        tool.on_release();

        let mut copy = tool.clone_floating_pixels().unwrap();
        copy.set(0, 0, Some(GREEN));
        let (pixels, _, _) = tool.floating_pixels().unwrap();
        assert_eq!(pixels.get(0, 0), Some(RED));
    }

    #[test]
    fn discard_returns_lift_for_history() {
        let mut canvas = Canvas::new(3, 3);
        canvas.set(1, 1, Some(RED));
        canvas.set(2, 2, Some(GREEN));
        let original = canvas.clone();
        let mut history = ActionHistory::default();
        let mut tool = SelectionTool::new();

        select(&mut tool, &mut canvas, (0, 0), (2, 2));
        tool.on_press(&mut canvas, 1, 1);
        tool.on_release();
        history.push(tool.discard_float());
        assert!(canvas.is_empty());

        history.undo(&mut canvas);
        assert_eq!(canvas, original);
    }

    #[test]
    fn clear_selection_leaves_canvas() {
        let mut canvas = Canvas::new(3, 3);
        canvas.set(1, 1, Some(RED));
        let mut tool = SelectionTool::new();
        select(&mut tool, &mut canvas, (0, 0), (2, 2));
        tool.on_press(&mut canvas, 1, 1);
        tool.clear_selection();
        assert!(!tool.has_selection());
        assert_eq!(tool.mode(), SelectionMode::None);
        assert_eq!(canvas.get(1, 1), None);
    }
}
