//! Box with a hinged lid that swings open when triggered.

use std::any::Any;
use std::f64::consts::FRAC_PI_2;

use crate::machine::MachineView;
use crate::part::{Capability, Outbox, Part};
use crate::render::{image_path, Sprite};
use crate::surface::{Point, Surface};
use crate::trigger::TriggerListener;

/// The box background image
const BACKGROUND_IMAGE: &str = "box-background.png";

/// The lid image
const LID_IMAGE: &str = "box-lid.png";

/// The foreground image, drawn over the machinery inside the box
const FOREGROUND_IMAGE: &str = "box-foreground.png";

/// Vertical scale of the lid when fully closed
const LID_CLOSED_SCALE: f64 = 0.02;

/// Seconds for the lid to swing from closed to fully open
const LID_OPEN_TIME: f64 = 0.25;

/// Lid lifecycle. Trigger notifications only move `Closed` to
/// `Opening`; anything later ignores them.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LidState {
    Closed,
    Opening,
    Open,
}

/// The box the figure jumps out of. Its foreground face is drawn in the
/// overlay pass so the machinery inside sits behind it.
pub struct LidBox {
    position: Point,
    box_size: f64,
    lid_size: f64,
    state: LidState,
    lid_angle: f64,
    background: Sprite,
    lid: Sprite,
    foreground: Sprite,
}

impl LidBox {
    /// A box anchored at its bottom centre. `box_size` is the square
    /// body; `lid_size` is the lid height when fully open.
    pub fn new(images_dir: &str, position: Point, box_size: f64, lid_size: f64) -> Self {
        let mut background = Sprite::new(image_path(images_dir, BACKGROUND_IMAGE));
        background.set_rect(-box_size / 2.0, -box_size, box_size, box_size);

        // Hinged at the box top; drawn relative to the hinge.
        let mut lid = Sprite::new(image_path(images_dir, LID_IMAGE));
        lid.set_rect(-box_size / 2.0, -lid_size, box_size, lid_size);

        let mut foreground = Sprite::new(image_path(images_dir, FOREGROUND_IMAGE));
        foreground.set_rect(-box_size / 2.0, -box_size, box_size, box_size);

        Self {
            position,
            box_size,
            lid_size,
            state: LidState::Closed,
            lid_angle: 0.0,
            background,
            lid,
            foreground,
        }
    }

    pub fn state(&self) -> LidState {
        self.state
    }

    /// Lid angle in radians, zero closed up to a quarter turn open.
    pub fn lid_angle(&self) -> f64 {
        self.lid_angle
    }
}

impl TriggerListener for LidBox {
    fn on_trigger(&mut self, _drop_y: f64) {
        if self.state == LidState::Closed {
            self.state = LidState::Opening;
        }
    }
}

impl Part for LidBox {
    fn position(&self) -> Point {
        self.position
    }

    fn advance(&mut self, dt: f64, _outbox: &mut Outbox) {
        if self.state == LidState::Opening {
            self.lid_angle += FRAC_PI_2 * dt / LID_OPEN_TIME;
            if self.lid_angle >= FRAC_PI_2 {
                self.lid_angle = FRAC_PI_2;
                self.state = LidState::Open;
            }
        }
    }

    fn reset(&mut self) {
        self.state = LidState::Closed;
        self.lid_angle = 0.0;
    }

    fn draw(&self, _view: &MachineView<'_>, surface: &mut dyn Surface) {
        let x = self.position.x;
        let y = self.position.y;
        self.background.draw(surface, x, y);

        // The lid pivots away from the viewer; its projection shrinks to
        // a sliver when closed and grows to full height when open.
        let scale = LID_CLOSED_SCALE + (1.0 - LID_CLOSED_SCALE) * self.lid_angle.sin();
        surface.push_state();
        surface.translate(x, y - self.box_size);
        surface.scale(1.0, scale);
        self.lid.draw(surface, 0.0, 0.0);
        surface.pop_state();
    }

    fn draw_overlay(&self, _view: &MachineView<'_>, surface: &mut dyn Surface) {
        self.foreground
            .draw(surface, self.position.x, self.position.y);
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::TriggerListener]
    }

    fn as_trigger_listener(&mut self) -> Option<&mut dyn TriggerListener> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
