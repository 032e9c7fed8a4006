//! Error types for machine wiring and signal delivery.

use thiserror::Error;

use crate::ids::PartId;
use crate::part::Capability;

/// Errors surfaced when resolving handles or wiring edges.
///
/// Out-of-range physical values are not errors: rotation wraps and
/// one-shot progress values clamp instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MachineError {
    /// A handle did not resolve to a part of this machine.
    #[error("Unknown part handle {id:?}: machine holds {len} parts")]
    UnknownPart { id: PartId, len: usize },

    /// An operation needed a facet the part does not provide.
    #[error("Part {id:?} does not provide {capability:?}")]
    MissingCapability { id: PartId, capability: Capability },
}
