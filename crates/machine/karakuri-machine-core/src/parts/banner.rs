//! Congratulations banner that unrolls sideways from a hanging roll.

use std::any::Any;

use crate::machine::MachineView;
use crate::part::{Capability, Outbox, Part};
use crate::render::{image_path, Sprite};
use crate::surface::{Point, Surface};
use crate::trigger::TriggerListener;

const BANNER_IMAGE: &str = "banner.png";
const ROLL_IMAGE: &str = "banner-roll.png";

/// Source art is 1024x150; everything below is pre-scaled by this.
const BANNER_SCALE: f64 = 0.42;

/// Unrolled banner size in pixels
const BANNER_WIDTH: f64 = 1024.0 * BANNER_SCALE;
const BANNER_HEIGHT: f64 = 150.0 * BANNER_SCALE;

/// Width of the roll the banner hangs from
const ROLL_WIDTH: f64 = 16.0 * BANNER_SCALE;

/// Unroll speed in pixels per second
const UNFURL_RATE: f64 = 41.65;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BannerState {
    Furled,
    Unfurling,
    Unfurled,
}

/// The banner part. The roll hangs at the right edge of the banner's
/// span and the cloth is revealed leftward from it, `progress` pixels
/// at a time.
pub struct Banner {
    position: Point,
    state: BannerState,
    progress: f64,
    banner: Sprite,
    roll: Sprite,
}

impl Banner {
    pub fn new(images_dir: &str, position: Point) -> Self {
        let mut banner = Sprite::new(image_path(images_dir, BANNER_IMAGE));
        banner.set_rect(0.0, -BANNER_HEIGHT, BANNER_WIDTH, BANNER_HEIGHT);
        let mut roll = Sprite::new(image_path(images_dir, ROLL_IMAGE));
        roll.set_rect(-ROLL_WIDTH / 2.0, -BANNER_HEIGHT, ROLL_WIDTH, BANNER_HEIGHT);
        Self {
            position,
            state: BannerState::Furled,
            progress: 0.0,
            banner,
            roll,
        }
    }

    pub fn state(&self) -> BannerState {
        self.state
    }

    /// Revealed width in pixels, `0.0` to the full banner width.
    pub fn progress(&self) -> f64 {
        self.progress
    }
}

impl TriggerListener for Banner {
    fn on_trigger(&mut self, _drop_y: f64) {
        if self.state == BannerState::Furled {
            self.state = BannerState::Unfurling;
        }
    }
}

impl Part for Banner {
    fn position(&self) -> Point {
        self.position
    }

    fn advance(&mut self, dt: f64, _outbox: &mut Outbox) {
        if self.state == BannerState::Unfurling {
            self.progress += UNFURL_RATE * dt;
            if self.progress >= BANNER_WIDTH {
                self.progress = BANNER_WIDTH;
                self.state = BannerState::Unfurled;
            }
        }
    }

    fn reset(&mut self) {
        self.state = BannerState::Furled;
        self.progress = 0.0;
    }

    fn draw(&self, _view: &MachineView<'_>, surface: &mut dyn Surface) {
        let roll_x = self.position.x + BANNER_WIDTH / 2.0;
        let y = self.position.y;
        if self.progress > 0.0 {
            // Reveal only the rightmost `progress` pixels of the cloth.
            surface.push_state();
            surface.clip_rect(
                roll_x - self.progress,
                y - BANNER_HEIGHT,
                self.progress,
                BANNER_HEIGHT,
            );
            self.banner.draw(surface, roll_x - BANNER_WIDTH, y);
            surface.pop_state();
        }
        self.roll.draw(surface, roll_x, y);
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::TriggerListener]
    }

    fn as_trigger_listener(&mut self) -> Option<&mut dyn TriggerListener> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
