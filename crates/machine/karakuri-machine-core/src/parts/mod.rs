//! Concrete machine parts.

mod banner;
mod cam;
mod crank;
mod jack;
mod lid_box;
mod pulley;
mod shaft;

pub use banner::{Banner, BannerState};
pub use cam::Cam;
pub use crank::Crank;
pub use jack::{BounceParams, Jack, JackState};
pub use lid_box::{LidBox, LidState};
pub use pulley::Pulley;
pub use shaft::Shaft;
