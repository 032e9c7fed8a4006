//! Timeline control: a frame number in, the machine state for that
//! instant out.

use crate::error::MachineError;
use crate::ids::MachineId;
use crate::machine::Machine;
use crate::surface::{Point, Surface};

/// Frames per second assumed until the host sets one.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Builds machines by number.
///
/// The system rebuilds through the factory whenever it needs a machine
/// in its initial state, so `create` must return a freshly constructed
/// machine every call.
pub trait MachineFactory {
    fn create(&self, id: MachineId) -> Machine;
}

/// Owns a machine and maps timeline frames onto it.
///
/// The machine itself only moves forward. A seek to an earlier frame
/// resets the machine and replays every fixed step from zero, which
/// keeps the state at frame `n` identical no matter how the timeline
/// got there.
pub struct MachineSystem {
    factory: Box<dyn MachineFactory>,
    machine: Machine,
    machine_id: MachineId,
    frame: u64,
    frame_rate: f64,
    location: Point,
}

impl MachineSystem {
    pub fn new(factory: Box<dyn MachineFactory>) -> Self {
        let machine_id = MachineId(1);
        let machine = factory.create(machine_id);
        Self {
            factory,
            machine,
            machine_id,
            frame: 0,
            frame_rate: DEFAULT_FRAME_RATE,
            location: Point::new(0.0, 0.0),
        }
    }

    /// Bring the machine to `frame`. Forward seeks advance the missing
    /// steps; backward seeks reset and replay from frame zero. Seeking
    /// to the current frame does nothing.
    pub fn seek_to_frame(&mut self, frame: u64) -> Result<(), MachineError> {
        if frame < self.frame {
            self.machine.reset();
            self.frame = 0;
        }
        while self.frame < frame {
            self.frame += 1;
            self.machine.advance(1.0 / self.frame_rate)?;
        }
        Ok(())
    }

    /// Swap in the machine numbered `id`, rebuilt in its initial state,
    /// and rewind the timeline to frame zero.
    pub fn choose_machine(&mut self, id: MachineId) {
        self.machine_id = id;
        self.machine = self.factory.create(id);
        self.frame = 0;
    }

    /// Set the frame rate used to convert frames to seconds. Applies to
    /// steps taken after the call; frames already advanced keep the
    /// step size they were advanced with. Non-positive rates are
    /// ignored.
    pub fn set_frame_rate(&mut self, frame_rate: f64) {
        if frame_rate > 0.0 {
            self.frame_rate = frame_rate;
        } else {
            log::warn!("ignoring non-positive frame rate {frame_rate}");
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    pub fn machine_id(&self) -> MachineId {
        self.machine_id
    }

    /// Seconds of machine time at the current frame and rate.
    pub fn elapsed_time(&self) -> f64 {
        self.frame as f64 / self.frame_rate
    }

    /// Where the machine's origin lands on the surface.
    pub fn set_location(&mut self, location: Point) {
        self.location = location;
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    /// Draw the machine translated to its location.
    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.push_state();
        surface.translate(self.location.x, self.location.y);
        self.machine.draw(surface);
        surface.pop_state();
    }
}
