// ============================================================================
// OPS — operations that work across canvases, selections and projects
// ============================================================================
//
//   shapes.rs    — Bresenham lines and rectangle rasterisation
//   clipboard.rs — copy / cut / paste through the selection float
//   sheet.rs     — sprite-sheet import and export
// ============================================================================

pub mod clipboard;
pub mod shapes;
pub mod sheet;
