//! Shared drawing helpers for rotating machinery.

use std::f64::consts::TAU;

use crate::surface::{Color, Point, Surface};

/// Default body color for machinery.
const BODY_COLOR: Color = Color::rgb(220, 220, 220);

/// Default color for rotation lines.
const LINE_COLOR: Color = Color::rgb(100, 100, 100);

/// A horizontal cylinder with rotation lines riding its curved face.
///
/// Anchored at the left end with the axis at the anchor's y, so
/// `draw(x, y, ..)` spans `x ..= x + length`. Lines are spaced evenly
/// around the circumference and drawn only while on the front half of
/// the face, which makes the rotation phase visible: a line at phase `p`
/// (in turns, measured from top dead centre) sits at
/// `y - radius * cos(TAU * p)`.
#[derive(Clone, Debug)]
pub struct Cylinder {
    diameter: f64,
    length: f64,
    color: Color,
    line_color: Color,
    line_width: f64,
    line_count: u32,
    offset: f64,
}

impl Cylinder {
    pub fn new(diameter: f64, length: f64) -> Self {
        Self {
            diameter,
            length,
            color: BODY_COLOR,
            line_color: LINE_COLOR,
            line_width: 1.0,
            line_count: 4,
            offset: 0.0,
        }
    }

    pub fn set_size(&mut self, diameter: f64, length: f64) {
        self.diameter = diameter;
        self.length = length;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Configure the rotation lines. A count of zero draws none.
    pub fn set_lines(&mut self, color: Color, width: f64, count: u32) {
        self.line_color = color;
        self.line_width = width;
        self.line_count = count;
    }

    /// Constant phase offset in turns, added to the drawn rotation so
    /// cylinders on the same axis do not all line up.
    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Draw the body at `(x, y)` with the face lines phased by `rotation`
    /// turns.
    pub fn draw(&self, surface: &mut dyn Surface, x: f64, y: f64, rotation: f64) {
        let radius = self.diameter / 2.0;
        surface.fill_rect(x, y - radius, self.length, self.diameter, self.color);

        if self.line_count == 0 || self.line_width <= 0.0 {
            return;
        }
        for line in 0..self.line_count {
            let spacing = f64::from(line) / f64::from(self.line_count);
            let angle = TAU * (rotation + self.offset + spacing).rem_euclid(1.0);
            // Only the front half of the face is visible.
            if angle.sin() <= 0.0 {
                continue;
            }
            let line_y = y - radius * angle.cos();
            surface.stroke_line(
                Point::new(x, line_y),
                Point::new(x + self.length, line_y),
                self.line_width,
                self.line_color,
            );
        }
    }
}

/// An image drawn into a fixed rectangle relative to a draw anchor.
///
/// The rectangle's `(x, y)` is its top-left corner relative to the
/// anchor passed to [`draw`](Sprite::draw). The host decodes the image
/// by path.
#[derive(Clone, Debug)]
pub struct Sprite {
    path: String,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Sprite {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
        }
    }

    /// Set the rectangle, top-left corner relative to the draw anchor.
    pub fn set_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.x = x;
        self.y = y;
        self.w = w;
        self.h = h;
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn draw(&self, surface: &mut dyn Surface, x: f64, y: f64) {
        surface.draw_image(&self.path, x + self.x, y + self.y, self.w, self.h);
    }
}

/// Join an images directory and a file name into a sprite path.
pub fn image_path(images_dir: &str, file: &str) -> String {
    if images_dir.is_empty() {
        file.to_string()
    } else {
        format!("{images_dir}/{file}")
    }
}
