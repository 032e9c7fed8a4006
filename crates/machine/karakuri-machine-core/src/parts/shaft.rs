//! Drive shaft: carries rotation along an axis.

use std::any::Any;

use crate::machine::MachineView;
use crate::part::{Capability, Outbox, Part};
use crate::render::Cylinder;
use crate::rotation::{wrap_turns, RotationSink, RotationSource};
use crate::surface::{Color, Point, Surface};

/// The color to draw the shaft
const SHAFT_COLOR: Color = Color::rgb(220, 220, 220);

/// The color to draw the lines on the shaft
const SHAFT_LINE_COLOR: Color = Color::rgb(100, 100, 100);

/// The width to draw the lines on the shaft
const SHAFT_LINE_WIDTH: f64 = 1.0;

/// The number of lines to draw on the shaft
const SHAFT_LINE_COUNT: u32 = 4;

/// A sink and driver in one: whatever rotation it receives is stored and
/// re-broadcast to its own sinks, so chains settle transitively.
///
/// The line offset is visual only. It phases the drawn face lines so
/// shafts on the same axis do not all line up; the propagated value is
/// never altered by it.
pub struct Shaft {
    position: Point,
    turns: f64,
    source: RotationSource,
    cylinder: Cylinder,
}

impl Shaft {
    /// A shaft anchored at its left end with the given diameter and
    /// length in pixels.
    pub fn new(position: Point, diameter: f64, length: f64) -> Self {
        let mut cylinder = Cylinder::new(diameter, length);
        cylinder.set_color(SHAFT_COLOR);
        cylinder.set_lines(SHAFT_LINE_COLOR, SHAFT_LINE_WIDTH, SHAFT_LINE_COUNT);
        Self {
            position,
            turns: 0.0,
            source: RotationSource::new(),
            cylinder,
        }
    }

    /// Phase offset for the drawn lines, in turns.
    pub fn set_line_offset(&mut self, offset: f64) {
        self.cylinder.set_offset(offset);
    }

    pub fn line_offset(&self) -> f64 {
        self.cylinder.offset()
    }

    /// Cumulative rotation received, in turns.
    pub fn turns(&self) -> f64 {
        self.turns
    }

    /// Observable rotation, wrapped to `[0, 1)` turns.
    pub fn rotation(&self) -> f64 {
        wrap_turns(self.turns)
    }
}

impl RotationSink for Shaft {
    fn set_rotation(&mut self, turns: f64, outbox: &mut Outbox) {
        self.turns = turns;
        self.source.rotate(turns, outbox);
    }
}

impl Part for Shaft {
    fn position(&self) -> Point {
        self.position
    }

    fn advance(&mut self, _dt: f64, _outbox: &mut Outbox) {
        // Driven only; motion arrives through set_rotation.
    }

    fn reset(&mut self) {
        self.turns = 0.0;
    }

    fn draw(&self, _view: &MachineView<'_>, surface: &mut dyn Surface) {
        self.cylinder
            .draw(surface, self.position.x, self.position.y, self.rotation());
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::RotationSink, Capability::RotationDriver]
    }

    fn as_rotation_source_mut(&mut self) -> Option<&mut RotationSource> {
        Some(&mut self.source)
    }

    fn as_rotation_sink(&mut self) -> Option<&mut dyn RotationSink> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PartId;
    use crate::part::Signal;

    #[test]
    fn stores_and_rebroadcasts_received_rotation() {
        let mut shaft = Shaft::new(Point::new(90.0, -180.0), 10.0, 70.0);
        if let Some(source) = shaft.as_rotation_source_mut() {
            source.add_sink(PartId(9));
        }

        let mut outbox = Outbox::new();
        shaft.set_rotation(2.25, &mut outbox);
        assert_eq!(shaft.turns(), 2.25);
        assert_eq!(shaft.rotation(), 0.25);
        assert_eq!(
            outbox.take(),
            vec![Signal::Rotation {
                to: PartId(9),
                turns: 2.25
            }]
        );
    }

    #[test]
    fn line_offset_never_alters_the_propagated_value() {
        let mut shaft = Shaft::new(Point::new(0.0, 0.0), 10.0, 50.0);
        shaft.set_line_offset(0.3);
        let mut outbox = Outbox::new();
        shaft.set_rotation(0.5, &mut outbox);
        assert_eq!(shaft.rotation(), 0.5);
        assert_eq!(shaft.line_offset(), 0.3);
    }

    #[test]
    fn reset_clears_rotation() {
        let mut shaft = Shaft::new(Point::new(0.0, 0.0), 10.0, 50.0);
        let mut outbox = Outbox::new();
        shaft.set_rotation(0.7, &mut outbox);
        shaft.reset();
        assert_eq!(shaft.turns(), 0.0);
    }
}
