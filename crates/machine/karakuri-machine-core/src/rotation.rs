//! Rotation fan-out: one driving part broadcasts its rotation to many
//! driven parts.

use crate::ids::PartId;
use crate::part::{Outbox, Signal};

/// Broadcast list for a rotation driver.
///
/// Sinks receive the driver's cumulative rotation in registration order.
/// Delivery is synchronous: the owning machine drains the queued signals
/// before the update that produced them returns, so transitive chains
/// settle within the same advance step.
#[derive(Clone, Debug, Default)]
pub struct RotationSource {
    sinks: Vec<PartId>,
}

impl RotationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink. Registration order is delivery order.
    pub fn add_sink(&mut self, sink: PartId) {
        self.sinks.push(sink);
    }

    pub fn sinks(&self) -> &[PartId] {
        &self.sinks
    }

    /// Queue delivery of `turns` to every registered sink.
    pub fn rotate(&self, turns: f64, outbox: &mut Outbox) {
        for &to in &self.sinks {
            outbox.push(Signal::Rotation { to, turns });
        }
    }
}

/// Receives rotation from a driving part.
pub trait RotationSink {
    /// Accept the driver's cumulative rotation in turns. Parts that also
    /// drive re-broadcast the value through `outbox`.
    fn set_rotation(&mut self, turns: f64, outbox: &mut Outbox);
}

/// Wrap cumulative turns to the observable `[0, 1)` range.
#[inline]
pub fn wrap_turns(turns: f64) -> f64 {
    let wrapped = turns.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs.
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PartId;

    #[test]
    fn wrap_covers_whole_and_negative_turns() {
        assert_eq!(wrap_turns(0.0), 0.0);
        assert_eq!(wrap_turns(0.25), 0.25);
        assert_eq!(wrap_turns(1.0), 0.0);
        assert_eq!(wrap_turns(2.75), 0.75);
        assert_eq!(wrap_turns(-0.25), 0.75);
        assert_eq!(wrap_turns(-3.0), 0.0);
    }

    #[test]
    fn wrap_never_returns_one() {
        let wrapped = wrap_turns(-1e-18);
        assert!((0.0..1.0).contains(&wrapped), "got {wrapped}");
    }

    #[test]
    fn rotate_queues_sinks_in_registration_order() {
        let mut source = RotationSource::new();
        source.add_sink(PartId(4));
        source.add_sink(PartId(2));

        let mut outbox = Outbox::new();
        source.rotate(1.5, &mut outbox);
        assert_eq!(
            outbox.take(),
            vec![
                Signal::Rotation {
                    to: PartId(4),
                    turns: 1.5
                },
                Signal::Rotation {
                    to: PartId(2),
                    turns: 1.5
                },
            ]
        );
    }
}
