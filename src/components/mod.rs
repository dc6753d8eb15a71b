// ============================================================================
// COMPONENTS — editing state that lives alongside a sprite
// ============================================================================
//
//   history.rs   — PixelChange / PixelAction records and the undo/redo stacks
//   selection.rs — rectangle selection and the floating pixel buffer
//   tools.rs     — pencil, eraser, fill, line, rectangle, eyedropper + strokes
// ============================================================================

pub mod history;
pub mod selection;
pub mod tools;

pub use history::{ActionHistory, PixelAction, PixelChange};
pub use selection::{SelectionMode, SelectionRect, SelectionTool};
pub use tools::{Stroke, Tool, ToolKind, ToolPreview};
