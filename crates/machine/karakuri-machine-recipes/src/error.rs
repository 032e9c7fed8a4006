//! Error types for recipe parsing and machine assembly.

use thiserror::Error;

use karakuri_machine_core::MachineError;

/// Errors surfaced while parsing a recipe or assembling a machine from
/// one.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RecipeError {
    /// The recipe text was not valid JSON for the recipe schema.
    #[error("Invalid recipe JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two parts were declared under the same name.
    #[error("Duplicate part name {name:?}")]
    DuplicateName { name: String },

    /// An edge referenced a part name that was never declared.
    #[error("Unknown part name {name:?}")]
    UnknownName { name: String },

    /// The rotation wiring loops back on itself.
    #[error("Rotation wiring contains a cycle through {name:?}")]
    RotationCycle { name: String },

    /// The underlying machine rejected a handle or an edge.
    #[error(transparent)]
    Machine(#[from] MachineError),
}
