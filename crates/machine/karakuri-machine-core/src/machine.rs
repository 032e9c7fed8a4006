//! The machine: an ordered, owning container of parts and the signal
//! plumbing that wires them together.

use crate::error::MachineError;
use crate::ids::PartId;
use crate::part::{Capability, Outbox, Part, Signal};
use crate::surface::Surface;

/// Read-only access to a machine's parts during drawing.
///
/// Parts hold handles, not references, so anything that needs a peer at
/// draw time (a pulley locating its belt partner's rim) resolves it
/// here, lazily.
pub struct MachineView<'a> {
    parts: &'a [Box<dyn Part>],
}

impl<'a> MachineView<'a> {
    pub(crate) fn new(parts: &'a [Box<dyn Part>]) -> Self {
        Self { parts }
    }

    /// The part behind `id`, or `None` when the handle is out of range
    /// for this machine.
    pub fn get(&self, id: PartId) -> Option<&dyn Part> {
        self.parts.get(id.index()).map(|part| part.as_ref())
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// An assembly of parts.
///
/// Parts are owned by the machine and addressed by the [`PartId`]
/// returned from [`add_part`](Machine::add_part). Container order is
/// insertion order and is what [`advance`](Machine::advance) and
/// [`draw`](Machine::draw) sweep in; signal delivery order between
/// parts follows the per-source registration order instead.
#[derive(Default)]
pub struct Machine {
    parts: Vec<Box<dyn Part>>,
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("parts", &self.parts.len())
            .finish()
    }
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `part` and return its handle. Handles are
    /// dense indices; parts are never removed, so a handle stays valid
    /// for the life of the machine.
    pub fn add_part(&mut self, part: Box<dyn Part>) -> PartId {
        let id = PartId(self.parts.len() as u32);
        self.parts.push(part);
        id
    }

    pub fn part(&self, id: PartId) -> Result<&dyn Part, MachineError> {
        let len = self.parts.len();
        self.parts
            .get(id.index())
            .map(|part| part.as_ref())
            .ok_or(MachineError::UnknownPart { id, len })
    }

    pub fn part_mut(&mut self, id: PartId) -> Result<&mut dyn Part, MachineError> {
        let len = self.parts.len();
        match self.parts.get_mut(id.index()) {
            Some(part) => Ok(part.as_mut()),
            None => Err(MachineError::UnknownPart { id, len }),
        }
    }

    pub fn view(&self) -> MachineView<'_> {
        MachineView::new(&self.parts)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Register `sink` to receive `driver`'s rotation, appended after
    /// any sinks already registered on `driver`.
    ///
    /// Rotation wiring must stay acyclic; a loop would recurse without
    /// bound once a signal enters it. The builder in the recipes crate
    /// checks for cycles when assembling from a recipe.
    pub fn connect_rotation(&mut self, driver: PartId, sink: PartId) -> Result<(), MachineError> {
        self.require_capability(sink, Capability::RotationSink)?;
        let source = self
            .part_mut(driver)?
            .as_rotation_source_mut()
            .ok_or(MachineError::MissingCapability {
                id: driver,
                capability: Capability::RotationDriver,
            })?;
        source.add_sink(sink);
        Ok(())
    }

    /// Register `listener` to be notified when `emitter` fires.
    pub fn connect_trigger(&mut self, emitter: PartId, listener: PartId) -> Result<(), MachineError> {
        self.require_capability(listener, Capability::TriggerListener)?;
        let source = self
            .part_mut(emitter)?
            .as_trigger_source_mut()
            .ok_or(MachineError::MissingCapability {
                id: emitter,
                capability: Capability::TriggerSource,
            })?;
        source.add_listener(listener);
        Ok(())
    }

    /// Run a belt from `driving` to `driven`. The belt carries rotation
    /// verbatim, exactly like a rotation edge, and additionally records
    /// the partner on the driving terminal so the band can be drawn
    /// between the two rims.
    pub fn connect_belt(&mut self, driving: PartId, driven: PartId) -> Result<(), MachineError> {
        self.require_capability(driven, Capability::BeltTerminal)?;
        self.require_capability(driven, Capability::RotationSink)?;

        let terminal = self
            .part_mut(driving)?
            .as_belt_terminal_mut()
            .ok_or(MachineError::MissingCapability {
                id: driving,
                capability: Capability::BeltTerminal,
            })?;
        terminal.attach_belt(driven);

        let source = self
            .part_mut(driving)?
            .as_rotation_source_mut()
            .ok_or(MachineError::MissingCapability {
                id: driving,
                capability: Capability::RotationDriver,
            })?;
        source.add_sink(driven);
        Ok(())
    }

    /// Advance every part by `dt` seconds in container order. Each
    /// part's outgoing signals are fully settled, downstream chains
    /// included, before the next part advances.
    pub fn advance(&mut self, dt: f64) -> Result<(), MachineError> {
        let mut outbox = Outbox::new();
        for index in 0..self.parts.len() {
            self.parts[index].advance(dt, &mut outbox);
            self.drain(&mut outbox)?;
        }
        Ok(())
    }

    /// Drive a rotation sink directly, outside any wiring, and settle
    /// everything downstream of it.
    pub fn set_rotation(&mut self, id: PartId, turns: f64) -> Result<(), MachineError> {
        let mut outbox = Outbox::new();
        let sink = self
            .part_mut(id)?
            .as_rotation_sink()
            .ok_or(MachineError::MissingCapability {
                id,
                capability: Capability::RotationSink,
            })?;
        sink.set_rotation(turns, &mut outbox);
        self.drain(&mut outbox)
    }

    /// Restore every part to its construction-time state.
    pub fn reset(&mut self) {
        for part in &mut self.parts {
            part.reset();
        }
    }

    /// Draw the whole machine: a primary pass over every part in
    /// container order, then an overlay pass in the same order.
    pub fn draw(&self, surface: &mut dyn Surface) {
        let view = MachineView::new(&self.parts);
        for part in &self.parts {
            part.draw(&view, surface);
        }
        for part in &self.parts {
            part.draw_overlay(&view, surface);
        }
    }

    /// Deliver queued signals depth-first: each delivery's own output
    /// is drained before the next queued signal is served, so a chain
    /// settles end to end in one call.
    fn drain(&mut self, outbox: &mut Outbox) -> Result<(), MachineError> {
        let pending = outbox.take();
        for signal in pending {
            match signal {
                Signal::Rotation { to, turns } => {
                    let sink = self
                        .part_mut(to)?
                        .as_rotation_sink()
                        .ok_or(MachineError::MissingCapability {
                            id: to,
                            capability: Capability::RotationSink,
                        })?;
                    sink.set_rotation(turns, outbox);
                }
                Signal::Trigger { to, drop_y } => {
                    let listener = self
                        .part_mut(to)?
                        .as_trigger_listener()
                        .ok_or(MachineError::MissingCapability {
                            id: to,
                            capability: Capability::TriggerListener,
                        })?;
                    listener.on_trigger(drop_y);
                }
            }
            self.drain(outbox)?;
        }
        Ok(())
    }

    fn require_capability(&self, id: PartId, capability: Capability) -> Result<(), MachineError> {
        if self.part(id)?.capabilities().contains(&capability) {
            Ok(())
        } else {
            Err(MachineError::MissingCapability { id, capability })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::parts::{Crank, LidBox, Shaft};
    use crate::rotation::{RotationSink, RotationSource};
    use crate::surface::{DisplayList, DrawOp, Point};

    type Log = Rc<RefCell<Vec<(&'static str, f64)>>>;

    /// Sink that records every rotation it receives and passes it on.
    struct Recorder {
        name: &'static str,
        log: Log,
        source: RotationSource,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: Rc::clone(log),
                source: RotationSource::new(),
            }
        }
    }

    impl RotationSink for Recorder {
        fn set_rotation(&mut self, turns: f64, outbox: &mut Outbox) {
            self.log.borrow_mut().push((self.name, turns));
            self.source.rotate(turns, outbox);
        }
    }

    impl Part for Recorder {
        fn position(&self) -> Point {
            Point::new(0.0, 0.0)
        }

        fn advance(&mut self, _dt: f64, _outbox: &mut Outbox) {}

        fn reset(&mut self) {}

        fn draw(&self, _view: &MachineView<'_>, _surface: &mut dyn Surface) {}

        fn capabilities(&self) -> &'static [Capability] {
            &[Capability::RotationSink, Capability::RotationDriver]
        }

        fn as_rotation_sink(&mut self) -> Option<&mut dyn RotationSink> {
            Some(self)
        }

        fn as_rotation_source_mut(&mut self) -> Option<&mut RotationSource> {
            Some(&mut self.source)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn advance_moves_rotation_through_the_wiring() {
        let mut machine = Machine::new();
        let mut crank = Crank::new(Point::new(0.0, 0.0));
        crank.set_speed(2.0);
        let crank = machine.add_part(Box::new(crank));
        let shaft_id = machine.add_part(Box::new(Shaft::new(Point::new(0.0, 40.0), 10.0, 70.0)));
        machine.connect_rotation(crank, shaft_id).expect("wire");

        machine.advance(0.25).expect("advance");

        let shaft = machine
            .part(shaft_id)
            .expect("shaft")
            .as_any()
            .downcast_ref::<Shaft>()
            .expect("downcast");
        assert!((shaft.turns() - 0.5).abs() < 1e-9);

        machine.reset();
        let shaft = machine
            .part(shaft_id)
            .expect("shaft")
            .as_any()
            .downcast_ref::<Shaft>()
            .expect("downcast");
        assert_eq!(shaft.turns(), 0.0);
    }

    #[test]
    fn delivery_follows_registration_order_not_container_order() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut machine = Machine::new();
        let late = machine.add_part(Box::new(Recorder::new("late", &log)));
        let early = machine.add_part(Box::new(Recorder::new("early", &log)));
        let driver = machine.add_part(Box::new(Recorder::new("driver", &log)));
        machine.connect_rotation(driver, early).expect("wire");
        machine.connect_rotation(driver, late).expect("wire");

        machine.set_rotation(driver, 0.5).expect("rotate");

        assert_eq!(
            *log.borrow(),
            vec![("driver", 0.5), ("early", 0.5), ("late", 0.5)]
        );
    }

    #[test]
    fn downstream_chains_settle_before_the_next_queued_signal() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut machine = Machine::new();
        let driver = machine.add_part(Box::new(Recorder::new("driver", &log)));
        let a = machine.add_part(Box::new(Recorder::new("a", &log)));
        let b = machine.add_part(Box::new(Recorder::new("b", &log)));
        let a_child = machine.add_part(Box::new(Recorder::new("a-child", &log)));
        machine.connect_rotation(driver, a).expect("wire");
        machine.connect_rotation(driver, b).expect("wire");
        machine.connect_rotation(a, a_child).expect("wire");

        machine.set_rotation(driver, 1.0).expect("rotate");

        assert_eq!(
            *log.borrow(),
            vec![("driver", 1.0), ("a", 1.0), ("a-child", 1.0), ("b", 1.0)]
        );
    }

    #[test]
    fn wiring_validates_handles_and_capabilities() {
        let mut machine = Machine::new();
        let crank = machine.add_part(Box::new(Crank::new(Point::new(0.0, 0.0))));
        let lid_box = machine.add_part(Box::new(LidBox::new(
            "images",
            Point::new(0.0, 0.0),
            250.0,
            240.0,
        )));

        assert!(matches!(
            machine.part(PartId(9)),
            Err(MachineError::UnknownPart { len: 2, .. })
        ));
        assert!(matches!(
            machine.connect_rotation(crank, lid_box),
            Err(MachineError::MissingCapability {
                capability: Capability::RotationSink,
                ..
            })
        ));
        assert!(matches!(
            machine.connect_trigger(crank, lid_box),
            Err(MachineError::MissingCapability {
                capability: Capability::TriggerSource,
                ..
            })
        ));
        assert!(matches!(
            machine.connect_belt(crank, lid_box),
            Err(MachineError::MissingCapability {
                capability: Capability::BeltTerminal,
                ..
            })
        ));
        assert!(matches!(
            machine.set_rotation(lid_box, 1.0),
            Err(MachineError::MissingCapability {
                capability: Capability::RotationSink,
                ..
            })
        ));
    }

    #[test]
    fn overlay_pass_runs_after_every_primary_pass() {
        let mut machine = Machine::new();
        machine.add_part(Box::new(LidBox::new(
            "images",
            Point::new(0.0, 0.0),
            250.0,
            240.0,
        )));
        machine.add_part(Box::new(Crank::new(Point::new(150.0, -180.0))));

        let mut list = DisplayList::new();
        machine.draw(&mut list);

        // The box foreground is the overlay; it lands after the crank's
        // primary ops even though the box sits first in the container.
        let last = list.ops().last().expect("draw ops");
        assert!(
            matches!(last, DrawOp::DrawImage { path, .. } if path.ends_with("box-foreground.png"))
        );
    }
}
