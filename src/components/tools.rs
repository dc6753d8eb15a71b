use image::Rgba;
use std::collections::VecDeque;

use crate::canvas::Canvas;
use crate::components::history::{PixelAction, PixelChange, write_pixel};
use crate::components::selection::{SelectionRect, SelectionTool};
use crate::ops::shapes::{bresenham_line, rect_points};
use crate::settings::EditorSettings;

/// Which tool is selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ToolKind {
    #[default]
    Pencil,
    Eraser,
    Fill,
    Line,
    Rectangle,
    Selection,
    Eyedropper,
}

impl ToolKind {
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::Pencil,
            ToolKind::Eraser,
            ToolKind::Fill,
            ToolKind::Line,
            ToolKind::Rectangle,
            ToolKind::Selection,
            ToolKind::Eyedropper,
        ]
    }
}

// ============================================================================
// PENCIL / ERASER
// ============================================================================

#[derive(Debug, Default)]
pub struct PencilTool;

impl PencilTool {
    fn on_press(&mut self, canvas: &mut Canvas, x: i32, y: i32, color: Rgba<u8>) -> PixelAction {
        let mut action = PixelAction::with_label("Pencil");
        write_pixel(canvas, &mut action, x, y, Some(color));
        action
    }

    fn on_drag(&mut self, canvas: &mut Canvas, x: i32, y: i32, color: Rgba<u8>, action: &mut PixelAction) {
        write_pixel(canvas, action, x, y, Some(color));
    }
}

#[derive(Debug, Default)]
pub struct EraserTool;

impl EraserTool {
    fn on_press(&mut self, canvas: &mut Canvas, x: i32, y: i32) -> PixelAction {
        let mut action = PixelAction::with_label("Eraser");
        write_pixel(canvas, &mut action, x, y, None);
        action
    }

    fn on_drag(&mut self, canvas: &mut Canvas, x: i32, y: i32, action: &mut PixelAction) {
        write_pixel(canvas, action, x, y, None);
    }
}

// ============================================================================
// FILL — 4-connected exact-match flood fill
// ============================================================================

#[derive(Debug, Default)]
pub struct FillTool;

impl FillTool {
    fn on_press(&mut self, canvas: &mut Canvas, x: i32, y: i32, color: Rgba<u8>) -> PixelAction {
        let mut action = PixelAction::with_label("Fill");
        if !canvas.in_bounds(x, y) {
            return action;
        }

        let target = canvas.get(x, y);
        let fill = Some(color);
        if target == fill {
            return action;
        }

        let w = canvas.width() as usize;
        let mut visited = vec![false; w * canvas.height() as usize];
        let mut queue = VecDeque::new();
        visited[y as usize * w + x as usize] = true;
        queue.push_back((x, y));

        while let Some((cx, cy)) = queue.pop_front() {
            if canvas.get(cx, cy) != target {
                continue;
            }
            action.push(PixelChange::new(cx, cy, target, fill));
            canvas.set(cx, cy, fill);

            for (nx, ny) in [(cx - 1, cy), (cx + 1, cy), (cx, cy - 1), (cx, cy + 1)] {
                if !canvas.in_bounds(nx, ny) {
                    continue;
                }
                let vi = ny as usize * w + nx as usize;
                if visited[vi] {
                    continue;
                }
                visited[vi] = true;
                queue.push_back((nx, ny));
            }
        }

        action
    }
}

// ============================================================================
// LINE / RECTANGLE — endpoints tracked while dragging, pixels written on release
// ============================================================================

/// Endpoints and color of a shape gesture in progress.
#[derive(Clone, Copy, Debug)]
struct ShapeDrag {
    start: (i32, i32),
    end: (i32, i32),
    color: Rgba<u8>,
}

#[derive(Debug, Default)]
pub struct LineTool {
    active: Option<ShapeDrag>,
}

impl LineTool {
    fn points(&self) -> Option<(Vec<(i32, i32)>, Rgba<u8>)> {
        self.active.map(|d| {
            (bresenham_line(d.start.0, d.start.1, d.end.0, d.end.1), d.color)
        })
    }
}

#[derive(Debug, Default)]
pub struct RectangleTool {
    pub filled: bool,
    active: Option<ShapeDrag>,
}

impl RectangleTool {
    pub fn new(filled: bool) -> Self {
        Self { filled, active: None }
    }

    fn points(&self) -> Option<(Vec<(i32, i32)>, Rgba<u8>)> {
        self.active.map(|d| {
            (rect_points(d.start.0, d.start.1, d.end.0, d.end.1, self.filled), d.color)
        })
    }
}

fn commit_points(canvas: &mut Canvas, action: &mut PixelAction, points: &[(i32, i32)], color: Rgba<u8>) {
    for &(x, y) in points {
        write_pixel(canvas, action, x, y, Some(color));
    }
}

// ============================================================================
// EYEDROPPER
// ============================================================================

#[derive(Debug, Default)]
pub struct EyedropperTool {
    picked: Option<Rgba<u8>>,
}

impl EyedropperTool {
    /// Last non-transparent color sampled.
    pub fn picked_color(&self) -> Option<Rgba<u8>> {
        self.picked
    }

    /// Take the sampled color, leaving none behind.
    pub fn take_picked_color(&mut self) -> Option<Rgba<u8>> {
        self.picked.take()
    }

    fn pick(&mut self, canvas: &Canvas, x: i32, y: i32) {
        if let Some(pixel) = canvas.get(x, y) {
            self.picked = Some(pixel);
        }
    }
}

// ============================================================================
// TOOL — dispatch over the concrete tools
// ============================================================================

/// Uncommitted overlay a renderer may draw on top of the canvas.
#[derive(Debug)]
pub enum ToolPreview<'a> {
    None,
    /// Cells a shape tool will write on release.
    Cells { points: Vec<(i32, i32)>, color: Rgba<u8> },
    /// Selection outline and the float, if any.
    Selection {
        rect: SelectionRect,
        float: Option<(&'a Canvas, i32, i32)>,
    },
}

/// A drawing tool. Each tool only ever changes the canvas through the
/// [`PixelAction`] it is handed, so every stroke can be undone.
#[derive(Debug)]
pub enum Tool {
    Pencil(PencilTool),
    Eraser(EraserTool),
    Fill(FillTool),
    Line(LineTool),
    Rectangle(RectangleTool),
    Selection(SelectionTool),
    Eyedropper(EyedropperTool),
}

impl Tool {
    pub fn new(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Pencil => Tool::Pencil(PencilTool),
            ToolKind::Eraser => Tool::Eraser(EraserTool),
            ToolKind::Fill => Tool::Fill(FillTool),
            ToolKind::Line => Tool::Line(LineTool::default()),
            ToolKind::Rectangle => Tool::Rectangle(RectangleTool::default()),
            ToolKind::Selection => Tool::Selection(SelectionTool::new()),
            ToolKind::Eyedropper => Tool::Eyedropper(EyedropperTool::default()),
        }
    }

    /// Build a tool with the user's preferences applied.
    pub fn with_settings(kind: ToolKind, settings: &EditorSettings) -> Self {
        match kind {
            ToolKind::Rectangle => Tool::Rectangle(RectangleTool::new(settings.rect_filled)),
            other => Tool::new(other),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Tool::Pencil(_) => ToolKind::Pencil,
            Tool::Eraser(_) => ToolKind::Eraser,
            Tool::Fill(_) => ToolKind::Fill,
            Tool::Line(_) => ToolKind::Line,
            Tool::Rectangle(_) => ToolKind::Rectangle,
            Tool::Selection(_) => ToolKind::Selection,
            Tool::Eyedropper(_) => ToolKind::Eyedropper,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Pencil(_) => "Pencil",
            Tool::Eraser(_) => "Eraser",
            Tool::Fill(_) => "Fill",
            Tool::Line(_) => "Line",
            Tool::Rectangle(r) if r.filled => "Rect Fill",
            Tool::Rectangle(_) => "Rect",
            Tool::Selection(_) => "Select",
            Tool::Eyedropper(_) => "Eyedropper",
        }
    }

    /// Whether the caller should fill in the cells between two drag samples.
    /// Tools that only care about the endpoints say no.
    pub fn interpolate_drag(&self) -> bool {
        !matches!(self, Tool::Line(_) | Tool::Rectangle(_) | Tool::Selection(_))
    }

    pub fn as_selection(&self) -> Option<&SelectionTool> {
        match self {
            Tool::Selection(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_selection_mut(&mut self) -> Option<&mut SelectionTool> {
        match self {
            Tool::Selection(s) => Some(s),
            _ => None,
        }
    }

    /// Begin a stroke and return the action that will collect its changes.
    pub fn on_press(&mut self, canvas: &mut Canvas, x: i32, y: i32, color: Rgba<u8>) -> PixelAction {
        match self {
            Tool::Pencil(t) => t.on_press(canvas, x, y, color),
            Tool::Eraser(t) => t.on_press(canvas, x, y),
            Tool::Fill(t) => t.on_press(canvas, x, y, color),
            Tool::Line(t) => {
                t.active = Some(ShapeDrag { start: (x, y), end: (x, y), color });
                PixelAction::with_label("Line")
            }
            Tool::Rectangle(t) => {
                t.active = Some(ShapeDrag { start: (x, y), end: (x, y), color });
                PixelAction::with_label("Rectangle")
            }
            Tool::Selection(t) => t.on_press(canvas, x, y),
            Tool::Eyedropper(t) => {
                t.pick(canvas, x, y);
                PixelAction::new()
            }
        }
    }

    pub fn on_drag(&mut self, canvas: &mut Canvas, x: i32, y: i32, color: Rgba<u8>, action: &mut PixelAction) {
        match self {
            Tool::Pencil(t) => t.on_drag(canvas, x, y, color, action),
            Tool::Eraser(t) => t.on_drag(canvas, x, y, action),
            Tool::Fill(_) => {}
            Tool::Line(LineTool { active: Some(d) })
            | Tool::Rectangle(RectangleTool { active: Some(d), .. }) => {
                d.end = (x, y);
                d.color = color;
            }
            Tool::Line(_) | Tool::Rectangle(_) => {}
            Tool::Selection(t) => t.on_drag(x, y),
            Tool::Eyedropper(t) => t.pick(canvas, x, y),
        }
    }

    /// Finish the stroke. Shape tools write all their pixels here.
    pub fn on_release(&mut self, canvas: &mut Canvas, action: &mut PixelAction) {
        match self {
            Tool::Line(t) => {
                if let Some((points, color)) = t.points() {
                    commit_points(canvas, action, &points, color);
                }
                t.active = None;
            }
            Tool::Rectangle(t) => {
                if let Some((points, color)) = t.points() {
                    commit_points(canvas, action, &points, color);
                }
                t.active = None;
            }
            Tool::Selection(t) => t.on_release(),
            _ => {}
        }
    }

    /// Current uncommitted overlay.
    pub fn preview(&self) -> ToolPreview<'_> {
        let cells = match self {
            Tool::Line(t) => t.points(),
            Tool::Rectangle(t) => t.points(),
            Tool::Selection(t) => {
                return match t.selection_rect() {
                    Some(rect) => ToolPreview::Selection { rect, float: t.floating_pixels() },
                    None => ToolPreview::None,
                };
            }
            _ => None,
        };
        match cells {
            Some((points, color)) => ToolPreview::Cells { points, color },
            None => ToolPreview::None,
        }
    }
}

// ============================================================================
// STROKE — press / drag... / release driver
// ============================================================================

/// One press→drag→release gesture against a canvas.
///
/// Drag samples are joined with Bresenham cells when the tool asks for it,
/// so fast mouse movement still leaves a connected stroke.
#[derive(Debug)]
pub struct Stroke {
    action: PixelAction,
    last: (i32, i32),
}

impl Stroke {
    pub fn begin(tool: &mut Tool, canvas: &mut Canvas, x: i32, y: i32, color: Rgba<u8>) -> Self {
        Self {
            action: tool.on_press(canvas, x, y, color),
            last: (x, y),
        }
    }

    pub fn drag_to(&mut self, tool: &mut Tool, canvas: &mut Canvas, x: i32, y: i32, color: Rgba<u8>) {
        if (x, y) == self.last {
            return;
        }
        if tool.interpolate_drag() {
            for (px, py) in bresenham_line(self.last.0, self.last.1, x, y).into_iter().skip(1) {
                tool.on_drag(canvas, px, py, color, &mut self.action);
            }
        } else {
            tool.on_drag(canvas, x, y, color, &mut self.action);
        }
        self.last = (x, y);
    }

    /// Changes recorded so far.
    pub fn action(&self) -> &PixelAction {
        &self.action
    }

    pub fn finish(mut self, tool: &mut Tool, canvas: &mut Canvas) -> PixelAction {
        tool.on_release(canvas, &mut self.action);
        self.action
    }
}
