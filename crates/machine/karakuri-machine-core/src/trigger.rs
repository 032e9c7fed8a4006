//! One-shot trigger fan-out from a threshold-crossing part.

use crate::ids::PartId;
use crate::part::{Outbox, Signal};

/// Whether a trigger source may still fire.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TriggerState {
    /// Watching for a threshold crossing.
    Armed,
    /// Crossing seen and listeners notified. Latched until reset.
    Fired,
}

/// Broadcast list for a trigger source.
#[derive(Clone, Debug, Default)]
pub struct TriggerSource {
    listeners: Vec<PartId>,
}

impl TriggerSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Registration order is delivery order.
    pub fn add_listener(&mut self, listener: PartId) {
        self.listeners.push(listener);
    }

    pub fn listeners(&self) -> &[PartId] {
        &self.listeners
    }

    /// Queue a notification to every registered listener.
    ///
    /// The caller is responsible for the at-most-once guarantee: it fires
    /// on the transition to [`TriggerState::Fired`] and never again until
    /// reset.
    pub fn fire(&self, drop_y: f64, outbox: &mut Outbox) {
        for &to in &self.listeners {
            outbox.push(Signal::Trigger { to, drop_y });
        }
    }
}

/// Reacts to a trigger notification.
///
/// Implementations are idempotent: a notification received while not in
/// the initial state is a no-op, never a restart.
pub trait TriggerListener {
    fn on_trigger(&mut self, drop_y: f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_queues_listeners_in_registration_order() {
        let mut source = TriggerSource::new();
        source.add_listener(PartId(7));
        source.add_listener(PartId(1));

        let mut outbox = Outbox::new();
        source.fire(-25.0, &mut outbox);
        assert_eq!(
            outbox.take(),
            vec![
                Signal::Trigger {
                    to: PartId(7),
                    drop_y: -25.0
                },
                Signal::Trigger {
                    to: PartId(1),
                    drop_y: -25.0
                },
            ]
        );
    }
}
