//! Raster painting primitives.
//!
//! All primitives clip to the canvas and return whether any pixel was
//! written, so callers can tell a real edit from a stroke that landed
//! entirely off-canvas.

use crate::buffer::CanvasBuffer;
use crate::color::Color;
use crate::geometry::{Point, Rect};

/// Fill `rect` with `color`.
pub fn fill_rect(buffer: &mut CanvasBuffer, rect: Rect, color: Color) -> bool {
    let Some(rect) = rect.clip_to(buffer.size()) else {
        return false;
    };
    for y in rect.y..rect.bottom() {
        buffer.fill_span(y, rect.x, rect.right(), color);
    }
    log::trace!("PAINT fill_rect {rect:?} {color}");
    true
}

/// Outline `rect` with a border `thickness` pixels wide, drawn inside it.
pub fn stroke_rect(buffer: &mut CanvasBuffer, rect: Rect, thickness: u32, color: Color) -> bool {
    let t = thickness.max(1);
    if t.saturating_mul(2) >= rect.width || t.saturating_mul(2) >= rect.height {
        return fill_rect(buffer, rect, color);
    }
    let top = Rect::new(rect.x, rect.y, rect.width, t);
    let bottom = Rect::new(rect.x, rect.bottom() - t, rect.width, t);
    let left = Rect::new(rect.x, rect.y + t, t, rect.height - 2 * t);
    let right = Rect::new(rect.right() - t, rect.y + t, t, rect.height - 2 * t);

    let mut drawn = false;
    for side in [top, bottom, left, right] {
        drawn |= fill_rect(buffer, side, color);
    }
    drawn
}

/// Square brush dab of side `size` centered on `center`.
pub fn stamp(buffer: &mut CanvasBuffer, center: Point, size: u32, color: Color) -> bool {
    dab(buffer, i64::from(center.x), i64::from(center.y), size, color)
}

fn dab(buffer: &mut CanvasBuffer, cx: i64, cy: i64, size: u32, color: Color) -> bool {
    let size = i64::from(size.max(1));
    let half = (size - 1) / 2;
    let corner = |x: i64, y: i64| Point::new(saturate(x), saturate(y));
    let a = corner(cx - half, cy - half);
    let b = corner(cx - half + size - 1, cy - half + size - 1);
    match Rect::from_corners(a, b, buffer.size()) {
        Some(rect) => fill_rect(buffer, rect, color),
        None => false,
    }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Bresenham line from `from` to `to`, stamping the brush at every step.
///
/// The segment is first clipped to the canvas grown by the brush size, so
/// far off-canvas endpoints cost no more than an on-canvas line.
pub fn draw_line(
    buffer: &mut CanvasBuffer,
    from: Point,
    to: Point,
    size: u32,
    color: Color,
) -> bool {
    let margin = i64::from(size.max(1));
    let lo = -margin;
    let hi_x = i64::from(buffer.width()) - 1 + margin;
    let hi_y = i64::from(buffer.height()) - 1 + margin;
    let Some(((x0, y0), (x1, y1))) = clip_segment(from, to, (lo, lo), (hi_x, hi_y)) else {
        return false;
    };

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    let mut drawn = false;

    loop {
        drawn |= dab(buffer, x, y, size, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    drawn
}

/// Liang-Barsky clip of `from..to` against the box `min..=max`. An endpoint
/// already inside the box is returned unchanged.
fn clip_segment(
    from: Point,
    to: Point,
    min: (i64, i64),
    max: (i64, i64),
) -> Option<((i64, i64), (i64, i64))> {
    let (x0, y0) = (f64::from(from.x), f64::from(from.y));
    let (dx, dy) = (f64::from(to.x) - x0, f64::from(to.y) - y0);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let edges = [
        (-dx, x0 - min.0 as f64),
        (dx, max.0 as f64 - x0),
        (-dy, y0 - min.1 as f64),
        (dy, max.1 as f64 - y0),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    let at = |t: f64| ((x0 + t * dx).round() as i64, (y0 + t * dy).round() as i64);
    Some((at(t0), at(t1)))
}

/// 4-connected scanline flood fill replacing the seed pixel's exact color.
///
/// No-op when the seed is off-canvas or already has `color`.
pub fn flood_fill(buffer: &mut CanvasBuffer, seed: Point, color: Color) -> bool {
    if !seed.is_inside(buffer.size()) {
        return false;
    }
    let (width, height) = (buffer.width(), buffer.height());
    let Some(target) = buffer.pixel(seed.x as u32, seed.y as u32) else {
        return false;
    };
    if target == color {
        return false;
    }

    let mut stack = vec![(seed.x as u32, seed.y as u32)];
    let mut spans = 0usize;
    while let Some((x, y)) = stack.pop() {
        if buffer.pixel(x, y) != Some(target) {
            continue;
        }
        let mut x0 = x;
        while x0 > 0 && buffer.pixel(x0 - 1, y) == Some(target) {
            x0 -= 1;
        }
        let mut x1 = x + 1;
        while x1 < width && buffer.pixel(x1, y) == Some(target) {
            x1 += 1;
        }
        buffer.fill_span(y, x0, x1, color);
        spans += 1;

        let neighbours = [y.checked_sub(1), (y + 1 < height).then_some(y + 1)];
        for ny in neighbours.into_iter().flatten() {
            let mut in_run = false;
            for nx in x0..x1 {
                let matches = buffer.pixel(nx, ny) == Some(target);
                if matches && !in_run {
                    stack.push((nx, ny));
                }
                in_run = matches;
            }
        }
    }
    log::trace!("PAINT flood_fill at {seed:?} filled {spans} spans");
    true
}
