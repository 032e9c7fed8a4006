//! Draw-surface abstraction.
//!
//! The engine never touches pixels. Parts emit primitive draw calls
//! through [`Surface`]; hosts rasterize them however they like. The
//! in-memory [`DisplayList`] implementation records the calls as data,
//! which is also how the test suite compares rendered frames.
//!
//! Coordinates are screen-style: x grows right, y grows down, so "up"
//! is negative y. Images are referenced by path and decoded by the host.

use serde::{Deserialize, Serialize};

/// A position in machine coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An opaque RGB color.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Primitive draw calls the engine renders through.
///
/// `push_state` / `pop_state` bracket transform and clip changes; the
/// transform methods compose onto the current state.
pub trait Surface {
    fn push_state(&mut self);
    fn pop_state(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    fn clip_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color);
    fn fill_ellipse(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color);
    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color);
    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: Color);
    fn draw_image(&mut self, path: &str, x: f64, y: f64, w: f64, h: f64);
}

/// One recorded [`Surface`] call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    PushState,
    PopState,
    Translate { dx: f64, dy: f64 },
    Scale { sx: f64, sy: f64 },
    ClipRect { x: f64, y: f64, w: f64, h: f64 },
    FillRect { x: f64, y: f64, w: f64, h: f64, color: Color },
    FillEllipse { x: f64, y: f64, w: f64, h: f64, color: Color },
    StrokeLine { from: Point, to: Point, width: f64, color: Color },
    StrokePolyline { points: Vec<Point>, width: f64, color: Color },
    DrawImage { path: String, x: f64, y: f64, w: f64, h: f64 },
}

/// Records draw calls as data.
///
/// Two display lists compare equal exactly when the same calls were made
/// with the same arguments, which makes recorded frames directly
/// comparable for determinism checks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayList {
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Drop all recorded calls, keeping the allocation.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for DisplayList {
    fn push_state(&mut self) {
        self.ops.push(DrawOp::PushState);
    }

    fn pop_state(&mut self) {
        self.ops.push(DrawOp::PopState);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.ops.push(DrawOp::Translate { dx, dy });
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.ops.push(DrawOp::Scale { sx, sy });
    }

    fn clip_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(DrawOp::ClipRect { x, y, w, h });
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.ops.push(DrawOp::FillRect { x, y, w, h, color });
    }

    fn fill_ellipse(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.ops.push(DrawOp::FillEllipse { x, y, w, h, color });
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        self.ops.push(DrawOp::StrokeLine {
            from,
            to,
            width,
            color,
        });
    }

    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: Color) {
        self.ops.push(DrawOp::StrokePolyline {
            points: points.to_vec(),
            width,
            color,
        });
    }

    fn draw_image(&mut self, path: &str, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(DrawOp::DrawImage {
            path: path.to_string(),
            x,
            y,
            w,
            h,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let mut list = DisplayList::new();
        list.push_state();
        list.translate(3.0, -4.0);
        list.fill_rect(0.0, 0.0, 10.0, 20.0, Color::rgb(1, 2, 3));
        list.pop_state();

        assert_eq!(
            list.ops(),
            &[
                DrawOp::PushState,
                DrawOp::Translate { dx: 3.0, dy: -4.0 },
                DrawOp::FillRect {
                    x: 0.0,
                    y: 0.0,
                    w: 10.0,
                    h: 20.0,
                    color: Color::rgb(1, 2, 3),
                },
                DrawOp::PopState,
            ]
        );
    }

    #[test]
    fn clear_keeps_nothing() {
        let mut list = DisplayList::new();
        list.push_state();
        list.clear();
        assert!(list.is_empty());
    }
}
