//! The part contract: lifecycle, capabilities, and peer signalling.

use std::any::Any;

use crate::ids::PartId;
use crate::machine::MachineView;
use crate::rotation::{RotationSink, RotationSource};
use crate::surface::{Point, Surface};
use crate::trigger::{TriggerListener, TriggerSource};

/// A facet a part can advertise.
///
/// Wiring operations validate against the part's accessors and name the
/// missing facet in their error, so misconfigured edges fail at
/// construction time instead of silently doing nothing.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Capability {
    /// Broadcasts rotation to registered sinks.
    RotationDriver,
    /// Accepts rotation from a driving part.
    RotationSink,
    /// Fires a one-shot notification on a threshold crossing.
    TriggerSource,
    /// Reacts to a trigger notification.
    TriggerListener,
    /// Can anchor one end of a belt.
    BeltTerminal,
}

/// A pending peer-to-peer delivery produced while a part updates.
///
/// Parts never hold references to each other. They address signals by
/// handle and the owning machine performs the delivery, draining
/// depth-first so a whole downstream chain settles before the next
/// queued signal is served.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Signal {
    /// The driver's cumulative rotation, in turns.
    Rotation { to: PartId, turns: f64 },
    /// One-shot trigger notification carrying the drop y coordinate.
    Trigger { to: PartId, drop_y: f64 },
}

/// Collects signals during a part update for the machine to deliver.
#[derive(Debug, Default)]
pub struct Outbox {
    signals: Vec<Signal>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, signal: Signal) {
        self.signals.push(signal);
    }

    /// Take everything queued so far, leaving the outbox empty.
    pub fn take(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }
}

/// Rim geometry a belt stretches between.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rim {
    pub center: Point,
    pub diameter: f64,
}

/// A part a belt can anchor to.
pub trait BeltTerminal {
    /// The rim the belt wraps.
    fn rim(&self) -> Rim;

    /// Record the partner this terminal runs a belt to. The partner is
    /// held as a handle and resolved lazily at draw time, never owned.
    fn attach_belt(&mut self, partner: PartId);

    /// Partner this terminal runs a belt to, if any.
    fn belt_partner(&self) -> Option<PartId>;
}

/// An animated machine part.
///
/// Parts are owned by a [`Machine`](crate::machine::Machine) and
/// addressed by [`PartId`] handles. All simulation state lives on the
/// part itself and is restored by [`reset`](Part::reset) to the values
/// captured at construction, so observable state stays a pure function
/// of the total time advanced since the last reset.
pub trait Part {
    /// Anchor position, fixed at construction.
    fn position(&self) -> Point;

    /// Integrate local state by `dt` seconds. A `dt` of zero must leave
    /// observable state unchanged. Deliveries to other parts go through
    /// `outbox`.
    fn advance(&mut self, dt: f64, outbox: &mut Outbox);

    /// Restore the state captured at construction. Idempotent.
    fn reset(&mut self);

    /// Primary draw pass. Simulation state is not mutated; anything the
    /// drawing needs is computed during `advance`.
    fn draw(&self, view: &MachineView<'_>, surface: &mut dyn Surface);

    /// Overlay pass, run after every part's primary pass.
    fn draw_overlay(&self, _view: &MachineView<'_>, _surface: &mut dyn Surface) {}

    /// Facets this part advertises.
    fn capabilities(&self) -> &'static [Capability] {
        &[]
    }

    fn as_rotation_source_mut(&mut self) -> Option<&mut RotationSource> {
        None
    }

    fn as_rotation_sink(&mut self) -> Option<&mut dyn RotationSink> {
        None
    }

    fn as_trigger_source_mut(&mut self) -> Option<&mut TriggerSource> {
        None
    }

    fn as_trigger_listener(&mut self) -> Option<&mut dyn TriggerListener> {
        None
    }

    fn as_belt_terminal(&self) -> Option<&dyn BeltTerminal> {
        None
    }

    fn as_belt_terminal_mut(&mut self) -> Option<&mut dyn BeltTerminal> {
        None
    }

    /// Concrete-type escape hatch for hosts and tests.
    fn as_any(&self) -> &dyn Any;
}
