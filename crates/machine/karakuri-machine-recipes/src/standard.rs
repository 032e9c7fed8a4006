//! The standard machines, built in code.
//!
//! These are the two stock assemblies a host can select by number.
//! Machine 1 is a single-shaft layout: a crank spins a shaft, a cam on
//! the shaft drops its key, and the key opens the box and launches the
//! figure. Machine 2 adds a two-belt transmission that carries the
//! motion across the scene before the cam, and a banner that unfurls
//! on the same key drop.

use karakuri_machine_core::{
    image_path, Banner, Cam, Crank, Jack, LidBox, Machine, MachineFactory, MachineId, Point,
    Pulley, Shaft,
};

use crate::builder::MachineBuilder;
use crate::error::RecipeError;

/// Figure image for machine 1.
const MACHINE_1_FIGURE: &str = "sparty.png";
/// Figure image for machine 2.
const MACHINE_2_FIGURE: &str = "sparty2.png";

/// Factory for the stock machines.
///
/// Machine 1 answers id 1; any other id gets machine 2.
pub struct StandardMachines {
    images_dir: String,
}

impl StandardMachines {
    /// `images_dir` is prefixed onto every image the parts load.
    pub fn new(images_dir: impl Into<String>) -> Self {
        Self {
            images_dir: images_dir.into(),
        }
    }

    /// Machine #1: crank, shaft, cam, box, and figure.
    pub fn machine_1(&self) -> Result<Machine, RecipeError> {
        let mut builder = MachineBuilder::new();

        builder.add_part(
            "box",
            Box::new(LidBox::new(
                &self.images_dir,
                Point::new(0.0, 0.0),
                250.0,
                240.0,
            )),
        )?;

        builder.add_part(
            "sparty",
            Box::new(Jack::new(
                &image_path(&self.images_dir, MACHINE_1_FIGURE),
                Point::new(0.0, 0.0),
                212.0,
                260.0,
                80.0,
                15,
            )),
        )?;

        let shaft_y = -180.0;

        let mut shaft = Shaft::new(Point::new(90.0, shaft_y), 10.0, 70.0);
        shaft.set_line_offset(0.3);
        builder.add_part("shaft", Box::new(shaft))?;

        // Crank after the shaft so it draws on top.
        let mut crank = Crank::new(Point::new(150.0, shaft_y));
        crank.set_speed(0.5);
        builder.add_part("crank", Box::new(crank))?;

        let mut cam = Cam::new(&self.images_dir, Point::new(110.0, shaft_y));
        cam.set_hole_offset(0.25);
        builder.add_part("cam", Box::new(cam))?;

        builder.connect_rotation("crank", "shaft")?;
        builder.connect_rotation("shaft", "cam")?;
        builder.connect_trigger("cam", "box")?;
        builder.connect_trigger("cam", "sparty")?;

        builder.finish()
    }

    /// Machine #2: the full two-belt transmission with a banner.
    pub fn machine_2(&self) -> Result<Machine, RecipeError> {
        let mut builder = MachineBuilder::new();

        let shaft1_y = -180.0;
        let shaft2_y = -70.0;
        let shaft3_y = -180.0;

        builder.add_part(
            "box",
            Box::new(LidBox::new(
                &self.images_dir,
                Point::new(0.0, 0.0),
                250.0,
                240.0,
            )),
        )?;

        builder.add_part(
            "sparty",
            Box::new(Jack::new(
                &image_path(&self.images_dir, MACHINE_2_FIGURE),
                Point::new(0.0, 0.0),
                212.0,
                260.0,
                80.0,
                15,
            )),
        )?;

        let mut shaft1 = Shaft::new(Point::new(90.0, shaft1_y), 10.0, 70.0);
        // Offset the lines so the shafts don't all line up.
        shaft1.set_line_offset(0.3);
        builder.add_part("shaft1", Box::new(shaft1))?;

        // Crank after the shaft so it draws on top.
        let mut crank = Crank::new(Point::new(150.0, shaft1_y));
        crank.set_speed(0.5);
        builder.add_part("crank", Box::new(crank))?;

        let mut shaft2 = Shaft::new(Point::new(-115.0, shaft2_y), 10.0, 230.0);
        shaft2.set_line_offset(0.1);
        builder.add_part("shaft2", Box::new(shaft2))?;

        // Driven pulley before the driving pulley so the belt draws on
        // top of both.
        builder.add_part(
            "pulley2",
            Box::new(Pulley::new(Point::new(103.0, shaft2_y), 80.0, 15.0)),
        )?;
        builder.add_part(
            "pulley1",
            Box::new(Pulley::new(Point::new(103.0, shaft1_y), 30.0, 15.0)),
        )?;

        let mut shaft3 = Shaft::new(Point::new(-115.0, shaft3_y), 10.0, 50.0);
        shaft3.set_line_offset(0.1);
        builder.add_part("shaft3", Box::new(shaft3))?;

        builder.add_part(
            "pulley4",
            Box::new(Pulley::new(Point::new(-103.0, shaft3_y), 90.0, 15.0)),
        )?;
        builder.add_part(
            "pulley3",
            Box::new(Pulley::new(Point::new(-103.0, shaft2_y), 15.0, 15.0)),
        )?;

        // Hole starts at bottom dead centre, so the key drops about
        // 0.41 turns in.
        let cam = Cam::new(&self.images_dir, Point::new(-80.0, shaft3_y));
        builder.add_part("cam", Box::new(cam))?;

        builder.add_part(
            "banner",
            Box::new(Banner::new(&self.images_dir, Point::new(0.0, -500.0))),
        )?;

        builder.connect_rotation("crank", "shaft1")?;
        builder.connect_rotation("shaft1", "pulley1")?;
        builder.connect_belt("pulley1", "pulley2")?;
        builder.connect_rotation("pulley2", "shaft2")?;
        builder.connect_rotation("shaft2", "pulley3")?;
        builder.connect_belt("pulley3", "pulley4")?;
        builder.connect_rotation("pulley4", "shaft3")?;
        builder.connect_rotation("shaft3", "cam")?;

        builder.connect_trigger("cam", "box")?;
        builder.connect_trigger("cam", "sparty")?;
        builder.connect_trigger("cam", "banner")?;

        builder.finish()
    }
}

impl MachineFactory for StandardMachines {
    fn create(&self, id: MachineId) -> Machine {
        let built = match id.0 {
            1 => self.machine_1(),
            2 => self.machine_2(),
            other => {
                log::warn!("no standard machine {other}; using machine 2");
                self.machine_2()
            }
        };
        match built {
            Ok(machine) => machine,
            Err(err) => {
                log::error!("standard machine {id:?} failed to build: {err}");
                Machine::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_1_has_five_parts() {
        let machine = StandardMachines::new("images").machine_1().expect("build");
        assert_eq!(machine.len(), 5);
    }

    #[test]
    fn machine_2_has_twelve_parts() {
        let machine = StandardMachines::new("images").machine_2().expect("build");
        assert_eq!(machine.len(), 12);
    }

    #[test]
    fn unknown_ids_fall_back_to_machine_2() {
        let factory = StandardMachines::new("images");
        let machine = factory.create(MachineId(99));
        assert_eq!(machine.len(), 12);
    }
}
