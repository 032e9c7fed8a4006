//! Karakuri Machine Recipes
//!
//! Machine assembly on top of `karakuri-machine-core`: a builder that
//! addresses parts by name and validates the wiring, a JSON recipe
//! format for declaring machines as data, and the stock machines a
//! host selects by number. A recipe and a hand-written factory that
//! describe the same machine produce identical pictures.

pub mod builder;
pub mod error;
pub mod recipe;
pub mod standard;

// Re-exports for consumers (hosts embedding machines)
pub use builder::MachineBuilder;
pub use error::RecipeError;
pub use recipe::{parse_recipe_json, MachineRecipe, PartKind, PartRecipe};
pub use standard::StandardMachines;
