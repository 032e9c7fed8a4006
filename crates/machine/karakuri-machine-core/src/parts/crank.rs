//! Hand crank, the rotation driver at the root of a machine's chain.

use std::any::Any;
use std::f64::consts::TAU;

use crate::machine::MachineView;
use crate::part::{Capability, Outbox, Part};
use crate::render::Cylinder;
use crate::rotation::{wrap_turns, RotationSource};
use crate::surface::{Color, Point, Surface};

/// The width of the crank arm on the screen in pixels
const CRANK_WIDTH: f64 = 10.0;

/// The length of the crank arm in pixels
const CRANK_LENGTH: f64 = 50.0;

/// The diameter to draw the crank handle
const HANDLE_DIAMETER: f64 = 7.0;

/// How long the handle is in pixels
const HANDLE_LENGTH: f64 = 40.0;

/// How far to the left of the crank position the arm sits
const ARM_OFFSET_X: f64 = -10.0;

/// Crank color
const CRANK_COLOR: Color = Color::rgb(220, 220, 220);

/// Line color for the handle
const HANDLE_LINE_COLOR: Color = Color::rgb(100, 100, 100);

/// Integrates rotation at a configured speed and drives its sinks.
///
/// Speed is literal turns per second: a crank at 0.5 completes a full
/// turn every two seconds of advanced time.
pub struct Crank {
    position: Point,
    speed: f64,
    turns: f64,
    source: RotationSource,
    handle: Cylinder,
}

impl Crank {
    pub fn new(position: Point) -> Self {
        let mut handle = Cylinder::new(HANDLE_DIAMETER, HANDLE_LENGTH);
        handle.set_color(CRANK_COLOR);
        handle.set_lines(HANDLE_LINE_COLOR, 1.0, 4);
        Self {
            position,
            speed: 0.0,
            turns: 0.0,
            source: RotationSource::new(),
            handle,
        }
    }

    /// Set the crank speed in turns per second.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Cumulative rotation since the last reset, in turns.
    pub fn turns(&self) -> f64 {
        self.turns
    }

    /// Observable rotation, wrapped to `[0, 1)` turns.
    pub fn rotation(&self) -> f64 {
        wrap_turns(self.turns)
    }
}

impl Part for Crank {
    fn position(&self) -> Point {
        self.position
    }

    fn advance(&mut self, dt: f64, outbox: &mut Outbox) {
        self.turns += dt * self.speed;
        self.source.rotate(self.turns, outbox);
    }

    fn reset(&mut self) {
        self.turns = 0.0;
    }

    fn draw(&self, _view: &MachineView<'_>, surface: &mut dyn Surface) {
        let angle = TAU * self.rotation();
        let arm_x = self.position.x + ARM_OFFSET_X;
        let handle_y = self.position.y + angle.cos() * CRANK_LENGTH;

        // Handle sticks out to the left of the arm.
        self.handle
            .draw(surface, arm_x - HANDLE_LENGTH, handle_y, self.rotation());

        // Arm between the shaft anchor and the handle.
        let top = self.position.y.min(handle_y);
        let height = (handle_y - self.position.y).abs().max(CRANK_WIDTH);
        surface.fill_rect(arm_x, top, CRANK_WIDTH, height, CRANK_COLOR);
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::RotationDriver]
    }

    fn as_rotation_source_mut(&mut self) -> Option<&mut RotationSource> {
        Some(&mut self.source)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
