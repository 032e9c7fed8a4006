//! Spring-mounted figure that pops out of the box and settles into a
//! damped bounce.

use std::any::Any;

use crate::machine::MachineView;
use crate::part::{Capability, Outbox, Part};
use crate::render::Sprite;
use crate::surface::{Color, Point, Surface};
use crate::trigger::TriggerListener;

/// Spring length before the trigger, in pixels
const COMPRESSED_LENGTH: f64 = 40.0;

/// How fast the spring extends once triggered, in pixels per second
const EXTEND_RATE: f64 = 750.0;

/// Pen width for the spring wire
const SPRING_WIRE_WIDTH: f64 = 2.0;

/// Spring color
const SPRING_COLOR: Color = Color::rgb(220, 220, 220);

/// Gap between the spring top and the figure's seat
const FIGURE_SEAT: f64 = 20.0;

/// Jack lifecycle. Trigger notifications only move `Compressed` to
/// `Extending`; later states ignore them.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum JackState {
    Compressed,
    Extending,
    Bouncing,
    Settled,
}

/// Damped oscillation settings for one axis of the bounce.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BounceParams {
    /// Peak offset in pixels when the bounce starts.
    pub amplitude: f64,
    /// Oscillation rate in radians per second.
    pub frequency: f64,
    /// Amplitude lost per second of bouncing.
    pub decay: f64,
}

impl BounceParams {
    /// Vertical bob of the standard figures.
    pub fn vertical() -> Self {
        Self {
            amplitude: 15.0,
            frequency: 2.0,
            decay: 1.5,
        }
    }

    /// Side-to-side sway of the standard figures.
    pub fn horizontal() -> Self {
        Self {
            amplitude: 30.0,
            frequency: 1.0,
            decay: 1.5,
        }
    }
}

/// The figure on the spring.
///
/// Phase transitions happen on advance-step boundaries: a step that
/// reaches full extension switches to bouncing on the next step's time,
/// and the bounce offsets are pinned back to rest when both amplitudes
/// have decayed to zero.
pub struct Jack {
    position: Point,
    spring_length: f64,
    spring_width: f64,
    num_links: u32,
    vertical: BounceParams,
    horizontal: BounceParams,
    state: JackState,
    extension: f64,
    bounce_time: f64,
    vertical_amplitude: f64,
    horizontal_amplitude: f64,
    figure: Sprite,
}

impl Jack {
    /// A figure anchored at the spring's bottom. `image` is the figure
    /// sprite path; `size` its square draw size; the spring reaches
    /// `spring_length` pixels when fully extended and zig-zags
    /// `num_links` times over `spring_width` pixels.
    pub fn new(
        image: &str,
        position: Point,
        size: f64,
        spring_length: f64,
        spring_width: f64,
        num_links: u32,
    ) -> Self {
        let mut figure = Sprite::new(image);
        figure.set_rect(-size / 2.0, -size, size, size);
        let vertical = BounceParams::vertical();
        let horizontal = BounceParams::horizontal();
        Self {
            position,
            spring_length,
            spring_width,
            num_links,
            vertical,
            horizontal,
            state: JackState::Compressed,
            extension: COMPRESSED_LENGTH,
            bounce_time: 0.0,
            vertical_amplitude: vertical.amplitude,
            horizontal_amplitude: horizontal.amplitude,
            figure,
        }
    }

    /// Replace the bounce settings. The new values are what reset
    /// restores.
    pub fn set_bounce(&mut self, vertical: BounceParams, horizontal: BounceParams) {
        self.vertical = vertical;
        self.horizontal = horizontal;
        self.vertical_amplitude = vertical.amplitude;
        self.horizontal_amplitude = horizontal.amplitude;
    }

    pub fn state(&self) -> JackState {
        self.state
    }

    /// Current spring length in pixels.
    pub fn extension(&self) -> f64 {
        self.extension
    }

    /// Current `(horizontal, vertical)` bounce offsets in pixels. Zero
    /// outside the bouncing state.
    pub fn bounce_offsets(&self) -> (f64, f64) {
        if self.state != JackState::Bouncing {
            return (0.0, 0.0);
        }
        (
            self.horizontal_amplitude * (self.horizontal.frequency * self.bounce_time).sin(),
            self.vertical_amplitude * (self.vertical.frequency * self.bounce_time).sin(),
        )
    }

    fn draw_spring(&self, surface: &mut dyn Surface, x: f64, y: f64) {
        // Zig-zag coil, anchored at the bottom.
        let links = self.num_links.max(1);
        let link_length = self.extension / f64::from(links);
        let mut points = Vec::with_capacity(links as usize * 2 + 1);
        points.push(Point::new(x, y));
        let mut bottom = y;
        for link in 0..links {
            let side = if link % 2 == 0 {
                x + self.spring_width / 2.0
            } else {
                x - self.spring_width / 2.0
            };
            points.push(Point::new(side, bottom - link_length / 2.0));
            points.push(Point::new(x, bottom - link_length));
            bottom -= link_length;
        }
        surface.stroke_polyline(&points, SPRING_WIRE_WIDTH, SPRING_COLOR);
    }
}

impl TriggerListener for Jack {
    fn on_trigger(&mut self, _drop_y: f64) {
        if self.state == JackState::Compressed {
            self.state = JackState::Extending;
        }
    }
}

impl Part for Jack {
    fn position(&self) -> Point {
        self.position
    }

    fn advance(&mut self, dt: f64, _outbox: &mut Outbox) {
        match self.state {
            JackState::Compressed | JackState::Settled => {}
            JackState::Extending => {
                self.extension += EXTEND_RATE * dt;
                if self.extension >= self.spring_length {
                    self.extension = self.spring_length;
                    self.state = JackState::Bouncing;
                }
            }
            JackState::Bouncing => {
                self.bounce_time += dt;
                self.vertical_amplitude =
                    (self.vertical_amplitude - self.vertical.decay * dt).max(0.0);
                self.horizontal_amplitude =
                    (self.horizontal_amplitude - self.horizontal.decay * dt).max(0.0);
                if self.vertical_amplitude == 0.0 && self.horizontal_amplitude == 0.0 {
                    self.state = JackState::Settled;
                }
            }
        }
    }

    fn reset(&mut self) {
        self.state = JackState::Compressed;
        self.extension = COMPRESSED_LENGTH;
        self.bounce_time = 0.0;
        self.vertical_amplitude = self.vertical.amplitude;
        self.horizontal_amplitude = self.horizontal.amplitude;
    }

    fn draw(&self, _view: &MachineView<'_>, surface: &mut dyn Surface) {
        let (sway, bob) = self.bounce_offsets();
        let x = self.position.x + sway;
        let y = self.position.y;
        self.draw_spring(surface, x, y);
        self.figure
            .draw(surface, x, y - self.extension + FIGURE_SEAT + bob);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn advance(jack: &mut Jack, dt: f64) {
        let mut outbox = Outbox::new();
        jack.advance(dt, &mut outbox);
    }

    fn sparty() -> Jack {
        Jack::new(
            "images/sparty.png",
            Point::new(0.0, 0.0),
            212.0,
            260.0,
            80.0,
            15,
        )
    }

    #[test]
    fn compressed_until_triggered() {
        let mut jack = sparty();
        advance(&mut jack, 5.0);
        assert_eq!(jack.state(), JackState::Compressed);
        assert_eq!(jack.extension(), COMPRESSED_LENGTH);
    }

    #[test]
    fn extends_at_rate_then_clamps_at_full_length() {
        let mut jack = sparty();
        jack.on_trigger(0.0);

        advance(&mut jack, 0.1);
        assert_eq!(jack.state(), JackState::Extending);
        assert!((jack.extension() - 115.0).abs() < 1e-9); // 40 + 75

        advance(&mut jack, 1.0);
        assert_eq!(jack.extension(), 260.0);
        assert_eq!(jack.state(), JackState::Bouncing);
    }

    #[test]
    fn bounce_decays_to_settled_with_offsets_at_rest() {
        let mut jack = sparty();
        jack.on_trigger(0.0);
        advance(&mut jack, 1.0); // fully extended, bouncing

        // Horizontal amplitude 30 at decay 1.5/s is the slower axis:
        // both are gone after 20 seconds of bouncing.
        for _ in 0..200 {
            advance(&mut jack, 0.1);
        }
        assert_eq!(jack.state(), JackState::Settled);
        assert_eq!(jack.bounce_offsets(), (0.0, 0.0));

        advance(&mut jack, 1.0);
        assert_eq!(jack.state(), JackState::Settled);
    }

    #[test]
    fn bounce_offsets_follow_the_damped_sines() {
        let mut jack = sparty();
        jack.on_trigger(0.0);
        advance(&mut jack, 1.0);
        advance(&mut jack, 0.25);

        let (sway, bob) = jack.bounce_offsets();
        let expected_sway = (30.0 - 1.5 * 0.25) * (1.0 * 0.25f64).sin();
        let expected_bob = (15.0 - 1.5 * 0.25) * (2.0 * 0.25f64).sin();
        assert!((sway - expected_sway).abs() < 1e-9);
        assert!((bob - expected_bob).abs() < 1e-9);
    }

    #[test]
    fn repeated_triggers_are_ignored_once_moving() {
        let mut jack = sparty();
        jack.on_trigger(0.0);
        advance(&mut jack, 0.1);
        let extension = jack.extension();
        jack.on_trigger(0.0);
        assert_eq!(jack.extension(), extension);
        assert_eq!(jack.state(), JackState::Extending);
    }

    #[test]
    fn reset_restores_captured_bounce_params() {
        let mut jack = sparty();
        jack.set_bounce(
            BounceParams {
                amplitude: 8.0,
                frequency: 3.0,
                decay: 2.0,
            },
            BounceParams::horizontal(),
        );
        jack.on_trigger(0.0);
        advance(&mut jack, 1.0);
        advance(&mut jack, 2.0);
        jack.reset();

        assert_eq!(jack.state(), JackState::Compressed);
        assert_eq!(jack.extension(), COMPRESSED_LENGTH);
        jack.on_trigger(0.0);
        advance(&mut jack, 1.0);
        advance(&mut jack, 0.5);
        let (_, bob) = jack.bounce_offsets();
        let expected = (8.0 - 2.0 * 0.5) * (3.0 * 0.5f64).sin();
        assert!((bob - expected).abs() < 1e-9);
    }
}
