//! Belted pulley: a rotation sink and driver whose belt link is drawn
//! lazily against the partner's rim.

use std::any::Any;

use crate::ids::PartId;
use crate::machine::MachineView;
use crate::part::{BeltTerminal, Capability, Outbox, Part, Rim};
use crate::render::Cylinder;
use crate::rotation::{wrap_turns, RotationSink, RotationSource};
use crate::surface::{Color, Point, Surface};

/// How wide the hub is on each side of the pulley
const HUB_WIDTH: f64 = 3.0;

/// The color to use for pulleys
const PULLEY_COLOR: Color = Color::rgb(205, 250, 5);

/// The line color to use for the hub
const HUB_LINE_COLOR: Color = Color::rgb(139, 168, 7);

/// The width to draw the lines on the hub
const HUB_LINE_WIDTH: f64 = 4.0;

/// The number of lines on a hub is int(diameter / 6)
const HUB_LINE_DIVISOR: f64 = 6.0;

/// Color of the pulley body and the belt
const BELT_COLOR: Color = Color::rgb(0, 0, 0);

/// Axial width of the drawn belt band
const BELT_BAND_WIDTH: f64 = 13.0;

/// A pulley on a shaft. Belting two pulleys together carries the driving
/// pulley's rotation to the driven one verbatim and draws the belt
/// between their rims.
///
/// The partner is held as a handle and resolved through the machine view
/// at draw time; a partner that cannot be resolved simply skips the
/// belt, it is never an error during drawing.
pub struct Pulley {
    position: Point,
    diameter: f64,
    width: f64,
    turns: f64,
    belt_partner: Option<PartId>,
    source: RotationSource,
    body: Cylinder,
    hub: Cylinder,
}

impl Pulley {
    /// A pulley centred on `position` with the given rim diameter and
    /// axial width in pixels.
    pub fn new(position: Point, diameter: f64, width: f64) -> Self {
        let mut body = Cylinder::new(diameter - HUB_WIDTH, width);
        body.set_color(BELT_COLOR);
        body.set_lines(BELT_COLOR, 0.0, 0);

        let mut hub = Cylinder::new(diameter, HUB_WIDTH);
        hub.set_color(PULLEY_COLOR);
        let line_count = (diameter / HUB_LINE_DIVISOR) as u32;
        hub.set_lines(HUB_LINE_COLOR, HUB_LINE_WIDTH, line_count);

        Self {
            position,
            diameter,
            width,
            turns: 0.0,
            belt_partner: None,
            source: RotationSource::new(),
            body,
            hub,
        }
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Cumulative rotation received, in turns.
    pub fn turns(&self) -> f64 {
        self.turns
    }

    /// Observable rotation, wrapped to `[0, 1)` turns.
    pub fn rotation(&self) -> f64 {
        wrap_turns(self.turns)
    }

    fn draw_belt(&self, view: &MachineView<'_>, surface: &mut dyn Surface, partner: PartId) {
        let Some(rim) = view
            .get(partner)
            .and_then(|part| part.as_belt_terminal())
            .map(|terminal| terminal.rim())
        else {
            return;
        };

        let own_radius = self.diameter / 2.0;
        let partner_radius = rim.diameter / 2.0;
        // Vertical run between the facing edges of the two rims.
        let (near, far) = if rim.center.y >= self.position.y {
            (self.position.y + own_radius, rim.center.y - partner_radius)
        } else {
            (self.position.y - own_radius, rim.center.y + partner_radius)
        };
        surface.fill_rect(
            self.position.x - BELT_BAND_WIDTH / 2.0,
            near.min(far),
            BELT_BAND_WIDTH,
            (far - near).abs(),
            BELT_COLOR,
        );
    }
}

impl RotationSink for Pulley {
    fn set_rotation(&mut self, turns: f64, outbox: &mut Outbox) {
        self.turns = turns;
        self.source.rotate(turns, outbox);
    }
}

impl BeltTerminal for Pulley {
    fn rim(&self) -> Rim {
        Rim {
            center: self.position,
            diameter: self.diameter,
        }
    }

    fn attach_belt(&mut self, partner: PartId) {
        self.belt_partner = Some(partner);
    }

    fn belt_partner(&self) -> Option<PartId> {
        self.belt_partner
    }
}

impl Part for Pulley {
    fn position(&self) -> Point {
        self.position
    }

    fn advance(&mut self, _dt: f64, _outbox: &mut Outbox) {
        // Driven only; motion arrives through set_rotation.
    }

    fn reset(&mut self) {
        self.turns = 0.0;
    }

    fn draw(&self, view: &MachineView<'_>, surface: &mut dyn Surface) {
        let rotation = self.rotation();
        let x = self.position.x;
        let y = self.position.y;
        let half_width = self.width / 2.0;

        self.body.draw(surface, x - half_width, y, rotation);
        self.hub.draw(surface, x - half_width - HUB_WIDTH, y, rotation);
        self.hub.draw(surface, x + half_width, y, rotation);

        if let Some(partner) = self.belt_partner {
            self.draw_belt(view, surface, partner);
        }
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[
            Capability::RotationSink,
            Capability::RotationDriver,
            Capability::BeltTerminal,
        ]
    }

    fn as_rotation_source_mut(&mut self) -> Option<&mut RotationSource> {
        Some(&mut self.source)
    }

    fn as_rotation_sink(&mut self) -> Option<&mut dyn RotationSink> {
        Some(self)
    }

    fn as_belt_terminal(&self) -> Option<&dyn BeltTerminal> {
        Some(self)
    }

    fn as_belt_terminal_mut(&mut self) -> Option<&mut dyn BeltTerminal> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::Signal;

    #[test]
    fn carries_rotation_verbatim() {
        let mut pulley = Pulley::new(Point::new(103.0, -180.0), 30.0, 15.0);
        if let Some(source) = pulley.as_rotation_source_mut() {
            source.add_sink(PartId(5));
        }
        let mut outbox = Outbox::new();
        pulley.set_rotation(1.75, &mut outbox);
        assert_eq!(pulley.turns(), 1.75);
        assert_eq!(
            outbox.take(),
            vec![Signal::Rotation {
                to: PartId(5),
                turns: 1.75
            }]
        );
    }

    #[test]
    fn rim_reports_centre_and_diameter() {
        let pulley = Pulley::new(Point::new(103.0, -70.0), 80.0, 15.0);
        let rim = pulley.rim();
        assert_eq!(rim.center, Point::new(103.0, -70.0));
        assert_eq!(rim.diameter, 80.0);
    }

    #[test]
    fn belt_partner_is_recorded() {
        let mut pulley = Pulley::new(Point::new(0.0, 0.0), 30.0, 15.0);
        assert_eq!(pulley.belt_partner(), None);
        pulley.attach_belt(PartId(2));
        assert_eq!(pulley.belt_partner(), Some(PartId(2)));
    }
}
