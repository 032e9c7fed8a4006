//! Cam with a key resting above it. When the hole in the cam face
//! sweeps under the key, the key drops in and the cam's listeners are
//! notified exactly once.

use std::any::Any;
use std::f64::consts::TAU;

use crate::machine::MachineView;
use crate::part::{Capability, Outbox, Part};
use crate::render::{image_path, Cylinder, Sprite};
use crate::rotation::{wrap_turns, RotationSink, RotationSource};
use crate::surface::{Color, Point, Surface};
use crate::trigger::{TriggerSource, TriggerState};

/// Width of the cam on the screen in pixels
const CAM_WIDTH: f64 = 17.0;

/// Cam diameter
const CAM_DIAMETER: f64 = 60.0;

/// How big the hole in the cam is
const HOLE_SIZE: f64 = 8.0;

/// Color of the hole
const HOLE_COLOR: Color = Color::rgb(0, 0, 0);

/// The key image
const KEY_IMAGE: &str = "key.png";

/// The key image size
const KEY_IMAGE_SIZE: f64 = 20.0;

/// How far the key bottom rests above the cam centre while armed
const KEY_REST_LIFT: f64 = 35.0;

/// How far the key drops once the hole opens under it
const KEY_DROP: f64 = 10.0;

/// Signed y offset of the hole from the cam centre at phase `p` turns.
/// Phase zero puts the hole at bottom dead centre (`+radius`, y grows
/// down); half a turn later it is at top dead centre under the key.
fn hole_scalar(phase: f64) -> f64 {
    (CAM_DIAMETER / 2.0) * (TAU * phase).cos()
}

/// Does the hole pass the key-drop point somewhere in `(theta0, theta1]`?
///
/// The drop point is where the hole scalar first descends to the key
/// bottom. Working on the whole rotation interval rather than its
/// endpoints keeps the detection exact for arbitrarily large steps: a
/// delta that sweeps the drop point and lands back above it still
/// crosses. Backward motion never fires.
fn crossed_drop_point(theta0: f64, theta1: f64, offset: f64) -> bool {
    if theta1 <= theta0 {
        return false;
    }
    let threshold = KEY_DROP - KEY_REST_LIFT;
    let ratio = threshold / (CAM_DIAMETER / 2.0);
    let drop_phase = ratio.clamp(-1.0, 1.0).acos() / TAU;
    // Smallest rotation past theta0 whose phase lands on the drop point.
    let base = drop_phase - offset;
    let mut candidate = base + (theta0 - base).floor();
    if candidate <= theta0 {
        candidate += 1.0;
    }
    candidate <= theta1
}

/// Rotation sink that watches its own face for the drop crossing.
///
/// Detection happens while the rotation is being delivered, inside the
/// advance step that moved the upstream driver, so container order never
/// delays the firing to a later step. Once fired the cam stays latched
/// until reset.
pub struct Cam {
    position: Point,
    hole_offset: f64,
    turns: f64,
    state: TriggerState,
    source: RotationSource,
    trigger: TriggerSource,
    body: Cylinder,
    key: Sprite,
}

impl Cam {
    pub fn new(images_dir: &str, position: Point) -> Self {
        let mut body = Cylinder::new(CAM_DIAMETER, CAM_WIDTH);
        body.set_lines(HOLE_COLOR, 0.0, 0);
        let mut key = Sprite::new(image_path(images_dir, KEY_IMAGE));
        key.set_rect(
            -KEY_IMAGE_SIZE / 2.0,
            -KEY_IMAGE_SIZE,
            KEY_IMAGE_SIZE,
            KEY_IMAGE_SIZE,
        );
        Self {
            position,
            hole_offset: 0.0,
            turns: 0.0,
            state: TriggerState::Armed,
            source: RotationSource::new(),
            trigger: TriggerSource::new(),
            body,
            key,
        }
    }

    /// How far the hole starts from bottom dead centre, in turns.
    pub fn set_hole_offset(&mut self, offset: f64) {
        self.hole_offset = offset;
    }

    pub fn hole_offset(&self) -> f64 {
        self.hole_offset
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Cumulative rotation received, in turns.
    pub fn turns(&self) -> f64 {
        self.turns
    }

    /// Observable rotation, wrapped to `[0, 1)` turns.
    pub fn rotation(&self) -> f64 {
        wrap_turns(self.turns)
    }

    /// The y coordinate of the key bottom once dropped, the payload
    /// listeners receive.
    fn key_drop_y(&self) -> f64 {
        self.position.y - KEY_REST_LIFT + KEY_DROP
    }
}

impl RotationSink for Cam {
    fn set_rotation(&mut self, turns: f64, outbox: &mut Outbox) {
        let previous = self.turns;
        self.turns = turns;
        self.source.rotate(turns, outbox);

        if self.state == TriggerState::Armed
            && crossed_drop_point(previous, turns, self.hole_offset)
        {
            self.state = TriggerState::Fired;
            self.trigger.fire(self.key_drop_y(), outbox);
        }
    }
}

impl Part for Cam {
    fn position(&self) -> Point {
        self.position
    }

    fn advance(&mut self, _dt: f64, _outbox: &mut Outbox) {
        // Driven only; motion arrives through set_rotation.
    }

    fn reset(&mut self) {
        self.turns = 0.0;
        self.state = TriggerState::Armed;
    }

    fn draw(&self, _view: &MachineView<'_>, surface: &mut dyn Surface) {
        let x = self.position.x;
        let y = self.position.y;

        self.body
            .draw(surface, x - CAM_WIDTH / 2.0, y, self.rotation());

        // The hole rides the face until the key drops in and covers it.
        if self.state == TriggerState::Armed {
            let scalar = hole_scalar(self.rotation() + self.hole_offset);
            let foreshorten = 1.0 - (scalar / (CAM_DIAMETER / 2.0)).abs();
            let height = HOLE_SIZE * foreshorten;
            if height > 0.0 {
                surface.fill_ellipse(
                    x - HOLE_SIZE / 2.0,
                    y + scalar - height / 2.0,
                    HOLE_SIZE,
                    height,
                    HOLE_COLOR,
                );
            }
        }

        let key_bottom = match self.state {
            TriggerState::Armed => y - KEY_REST_LIFT,
            TriggerState::Fired => self.key_drop_y(),
        };
        self.key.draw(surface, x, key_bottom);
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[
            Capability::RotationSink,
            Capability::RotationDriver,
            Capability::TriggerSource,
        ]
    }

    fn as_rotation_source_mut(&mut self) -> Option<&mut RotationSource> {
        Some(&mut self.source)
    }

    fn as_rotation_sink(&mut self) -> Option<&mut dyn RotationSink> {
        Some(self)
    }

    fn as_trigger_source_mut(&mut self) -> Option<&mut TriggerSource> {
        Some(&mut self.trigger)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
