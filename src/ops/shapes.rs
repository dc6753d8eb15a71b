// ============================================================================
// SHAPE RASTERIZATION — integer grid paths for line and rectangle tools
// ============================================================================

/// Cells on the straight path from `(x0, y0)` to `(x1, y1)`, both ends
/// included, using integer Bresenham stepping. All octants are handled the
/// same way; the path is one cell wide.
pub fn bresenham_line(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;
    let mut points = Vec::with_capacity((dx.max(-dy) + 1) as usize);

    loop {
        points.push((x, y));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > dy {
            err += dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }

    points
}

/// Cells of the axis-aligned rectangle spanned by two corners (inclusive).
///
/// Outline order: top row, bottom row (if distinct), then the left and right
/// columns without the corners already emitted.
pub fn rect_points(x0: i32, y0: i32, x1: i32, y1: i32, filled: bool) -> Vec<(i32, i32)> {
    let (min_x, max_x) = (x0.min(x1), x0.max(x1));
    let (min_y, max_y) = (y0.min(y1), y0.max(y1));
    let mut points = Vec::new();

    if filled {
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                points.push((x, y));
            }
        }
        return points;
    }

    for x in min_x..=max_x {
        points.push((x, min_y));
        if max_y != min_y {
            points.push((x, max_y));
        }
    }
    for y in (min_y + 1)..max_y {
        points.push((min_x, y));
        if max_x != min_x {
            points.push((max_x, y));
        }
    }

    points
}
