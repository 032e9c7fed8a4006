//! Identifiers for machine entities.

use serde::{Deserialize, Serialize};

/// Handle to a part inside its owning machine.
///
/// Handles are indices into the machine's part list. Parts are never
/// removed, so a handle issued by a machine stays valid for that
/// machine's lifetime. Resolving a handle against the wrong machine is
/// caught as [`MachineError::UnknownPart`](crate::MachineError) when it
/// is out of range.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PartId(pub u32);

impl PartId {
    /// Index into the owning machine's part list.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Selects which machine a factory should build.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MachineId(pub u32);
