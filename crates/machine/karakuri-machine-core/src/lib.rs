//! Karakuri Machine Core (host-agnostic)
//!
//! A deterministic animation engine for crank-driven automata: parts
//! with per-instance state, rotation and trigger wiring between them,
//! and a frame timeline on top. Machines only step forward; the
//! timeline reaches earlier frames by resetting and replaying from
//! zero, so the picture at frame `n` never depends on seek history.
//! Drawing goes through the [`Surface`] trait; hosts rasterize the
//! recorded ops however they like.

pub mod error;
pub mod ids;
pub mod machine;
pub mod part;
pub mod parts;
pub mod render;
pub mod rotation;
pub mod surface;
pub mod system;
pub mod trigger;

// Re-exports for consumers (hosts and recipe builders)
pub use error::MachineError;
pub use ids::{MachineId, PartId};
pub use machine::{Machine, MachineView};
pub use part::{BeltTerminal, Capability, Outbox, Part, Rim, Signal};
pub use parts::{
    Banner, BannerState, BounceParams, Cam, Crank, Jack, JackState, LidBox, LidState, Pulley,
    Shaft,
};
pub use render::{image_path, Cylinder, Sprite};
pub use rotation::{wrap_turns, RotationSink, RotationSource};
pub use surface::{Color, DisplayList, DrawOp, Point, Surface};
pub use system::{MachineFactory, MachineSystem, DEFAULT_FRAME_RATE};
pub use trigger::{TriggerListener, TriggerSource, TriggerState};
