use image::Rgba;
use pretty_assertions::assert_eq;

use pixelforge::components::history::ActionHistory;
use pixelforge::components::selection::SelectionTool;
use pixelforge::components::tools::{Stroke, Tool, ToolKind};
use pixelforge::ops::clipboard::Clipboard;
use pixelforge::{Canvas, PixelAction, Project, Sprite};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 128]);

fn gesture(tool: &mut Tool, canvas: &mut Canvas, points: &[(i32, i32)], color: Rgba<u8>) -> PixelAction {
    let mut stroke = Stroke::begin(tool, canvas, points[0].0, points[0].1, color);
    for &(x, y) in &points[1..] {
        stroke.drag_to(tool, canvas, x, y, color);
    }
    stroke.finish(tool, canvas)
}

fn mixed_canvas() -> Canvas {
    let mut canvas = Canvas::new(6, 6);
    canvas.set(0, 0, Some(RED));
    canvas.set(1, 0, Some(GREEN));
    canvas.set(2, 1, Some(BLUE));
    canvas.set(1, 2, Some(RED));
    // Outside the 3x3 block, inside where it gets moved to.
    canvas.set(4, 4, Some(GREEN));
    canvas
}

#[test]
fn stroke_undo_redo_restores_exact_states() {
    let mut sprite = Sprite::new("s", 8, 8);
    let before = sprite.canvas().clone();

    let mut tool = Tool::new(ToolKind::Pencil);
    let action = gesture(&mut tool, sprite.canvas_mut(), &[(0, 0), (5, 3), (7, 7)], RED);
    let after = sprite.canvas().clone();
    assert!(sprite.commit(action));

    assert_eq!(sprite.undo().as_deref(), Some("Pencil"));
    assert_eq!(sprite.canvas(), &before);
    assert_eq!(sprite.redo().as_deref(), Some("Pencil"));
    assert_eq!(sprite.canvas(), &after);
}

#[test]
fn mixed_pencil_and_eraser_strokes_undo_and_redo_exactly() {
    let mut sprite = Sprite::new("s", 6, 6);
    let mut pencil = Tool::new(ToolKind::Pencil);
    let mut eraser = Tool::new(ToolKind::Eraser);

    let plan: Vec<(bool, Vec<(i32, i32)>, Rgba<u8>)> = vec![
        (true, vec![(0, 0), (5, 0), (5, 5)], RED),
        (false, vec![(3, 0), (5, 2)], RED),
        (true, vec![(0, 5), (5, 0)], GREEN),
        (true, vec![(2, 0), (4, 0)], BLUE),
        (false, vec![(0, 0), (5, 5)], RED),
        (true, vec![(0, 0), (0, 5), (5, 5)], GREEN),
    ];

    let mut snapshots = vec![sprite.canvas().clone()];
    for (use_pencil, points, color) in &plan {
        let tool = if *use_pencil { &mut pencil } else { &mut eraser };
        let action = gesture(tool, sprite.canvas_mut(), points, *color);
        assert!(sprite.commit(action));
        snapshots.push(sprite.canvas().clone());
    }

    for expected in snapshots.iter().rev().skip(1) {
        assert!(sprite.undo().is_some());
        assert_eq!(sprite.canvas(), expected);
    }
    assert!(!sprite.history().can_undo());

    for expected in snapshots.iter().skip(1) {
        assert!(sprite.redo().is_some());
        assert_eq!(sprite.canvas(), expected);
    }
    assert!(!sprite.history().can_redo());
}

#[test]
fn new_action_clears_redo() {
    let mut sprite = Sprite::new("s", 4, 4);
    let mut tool = Tool::new(ToolKind::Pencil);

    let a = gesture(&mut tool, sprite.canvas_mut(), &[(0, 0)], RED);
    sprite.commit(a);
    sprite.undo();
    assert!(sprite.history().can_redo());

    let b = gesture(&mut tool, sprite.canvas_mut(), &[(1, 1)], GREEN);
    sprite.commit(b);
    assert!(!sprite.history().can_redo());
    assert_eq!(sprite.redo(), None);
}

#[test]
fn no_op_stroke_is_not_recorded() {
    let mut sprite = Sprite::new("s", 4, 4);
    sprite.canvas_mut().set(2, 2, Some(RED));
    sprite.canvas_mut().set(3, 3, Some(RED));

    let mut tool = Tool::new(ToolKind::Pencil);
    let action = gesture(&mut tool, sprite.canvas_mut(), &[(2, 2), (9, 9)], RED);
    assert!(action.is_empty());
    assert!(!sprite.commit(action));
    assert!(!sprite.history().can_undo());
}

#[test]
fn fill_changes_only_the_matching_region_and_is_idempotent() {
    let mut canvas = Canvas::new(3, 3);
    for y in 0..3 {
        for x in 0..3 {
            canvas.set(x, y, Some(RED));
        }
    }
    canvas.set(1, 1, None);

    let mut tool = Tool::new(ToolKind::Fill);
    let action = gesture(&mut tool, &mut canvas, &[(1, 1)], RED);
    assert_eq!(action.len(), 1);
    assert_eq!(canvas.get(1, 1), Some(RED));

    let again = gesture(&mut tool, &mut canvas, &[(1, 1)], RED);
    assert!(again.is_empty());
}

#[test]
fn rectangle_outline_writes_perimeter_once() {
    let mut canvas = Canvas::new(6, 6);
    let mut tool = Tool::new(ToolKind::Rectangle);
    let action = gesture(&mut tool, &mut canvas, &[(0, 0), (2, 1), (3, 3)], GREEN);

    assert_eq!(action.len(), 12);
    assert_eq!(canvas.get(1, 1), None);
    assert_eq!(canvas.get(3, 0), Some(GREEN));
    assert_eq!(canvas.get(0, 3), Some(GREEN));
}

#[test]
fn selection_move_commit_and_undo_round_trip() {
    let mut canvas = mixed_canvas();
    let original = canvas.clone();
    let mut history = ActionHistory::default();
    let mut sel = SelectionTool::new();

    // Select the 3x3 block.
    sel.on_press(&mut canvas, 0, 0);
    sel.on_drag(2, 2);
    sel.on_release();
    assert!(sel.has_selection());

    // Grab it and move by (+2, +2).
    let lift_press = sel.on_press(&mut canvas, 1, 1);
    assert!(lift_press.is_empty());
    assert!(sel.has_float());
    sel.on_drag(3, 3);
    sel.on_release();

    let action = sel.commit_float(&mut canvas);
    assert_eq!(canvas.get(0, 0), None);
    assert_eq!(canvas.get(2, 2), Some(RED));
    assert_eq!(canvas.get(3, 2), Some(GREEN));
    assert_eq!(canvas.get(4, 3), Some(BLUE));
    assert_eq!(canvas.get(3, 4), Some(RED));
    assert_eq!(canvas.get(4, 4), Some(GREEN));
    history.push(action);

    assert_eq!(history.undo(&mut canvas).as_deref(), Some("Move Selection"));
    assert_eq!(canvas, original);
}

#[test]
fn cut_then_undo_restores_pixels() {
    let mut sprite = Sprite::from_canvas("s", mixed_canvas());
    let original = sprite.canvas().clone();
    let mut sel = SelectionTool::new();
    let mut clipboard = Clipboard::new();

    sel.on_press(sprite.canvas_mut(), 0, 0);
    sel.on_drag(2, 2);
    sel.on_release();

    assert!(clipboard.cut(&mut sel, &mut sprite));
    assert!(sprite.canvas().extract_region(0, 0, 3, 3).is_empty());
    assert_eq!(clipboard.content().map(|c| c.get(2, 1)), Some(Some(BLUE)));

    assert_eq!(sprite.undo().as_deref(), Some("Cut"));
    assert_eq!(sprite.canvas(), &original);
}

#[test]
fn paste_then_commit_is_one_undo_step() {
    let mut sprite = Sprite::new("s", 4, 4);
    let mut sel = SelectionTool::new();
    let mut clipboard = Clipboard::new();
    let mut block = Canvas::new(2, 1);
    block.set(0, 0, Some(RED));
    clipboard.set_content(block);

    assert!(clipboard.paste(&mut sel, &mut sprite, 2, 3));
    // Nothing lands on the canvas until the float is committed.
    assert!(sprite.canvas().is_empty());
    let action = sel.commit_float(sprite.canvas_mut());
    assert!(sprite.commit(action));
    assert_eq!(sprite.canvas().get(2, 3), Some(RED));

    assert_eq!(sprite.undo().as_deref(), Some("Paste"));
    assert!(sprite.canvas().is_empty());
}

#[test]
fn removing_the_only_sprite_is_a_no_op() {
    let mut project = Project::new(8, 8);
    let id = project.active_sprite().id;
    project.remove_sprite(0);
    assert_eq!(project.len(), 1);
    assert_eq!(project.active_index(), 0);
    assert_eq!(project.active_sprite().id, id);
}
