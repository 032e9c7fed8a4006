//! JSON recipe format for describing a machine declaratively.
//!
//! A recipe lists parts by name with their placement parameters, then
//! wires them with named edges. [`MachineRecipe::build`] turns the
//! description into a runnable [`Machine`] through the same builder
//! the hand-written factories use, so a recipe and a factory that
//! describe the same machine produce identical pictures.

use serde::{Deserialize, Serialize};

use karakuri_machine_core::{
    image_path, Banner, Cam, Crank, Jack, LidBox, Machine, Part, Point, Pulley, Shaft,
};

use crate::builder::MachineBuilder;
use crate::error::RecipeError;

/// A complete machine description.
///
/// Edge lists are pairs of part names. Rotation and belt edges run
/// driver to driven; trigger edges run emitter to listener. Edge lists
/// may be omitted for a machine with no wiring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineRecipe {
    /// Directory prefixed onto every image file named by the parts.
    #[serde(default)]
    pub images_dir: String,
    /// Parts in container order, which is also draw order.
    pub parts: Vec<PartRecipe>,
    #[serde(default)]
    pub rotations: Vec<(String, String)>,
    #[serde(default)]
    pub belts: Vec<(String, String)>,
    #[serde(default)]
    pub triggers: Vec<(String, String)>,
}

/// One named part and where it sits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartRecipe {
    pub name: String,
    /// Anchor point as `[x, y]` in machine coordinates.
    pub position: (f64, f64),
    #[serde(flatten)]
    pub kind: PartKind,
}

/// Which part to instantiate, tagged by `"type"` in the JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartKind {
    Crank {
        /// Turning rate in turns per second.
        speed: f64,
    },
    Shaft {
        diameter: f64,
        length: f64,
        #[serde(default)]
        line_offset: f64,
    },
    Pulley {
        diameter: f64,
        width: f64,
    },
    Cam {
        /// Hole placement in turns from bottom dead centre.
        #[serde(default)]
        hole_offset: f64,
    },
    LidBox {
        box_size: f64,
        lid_size: f64,
    },
    Jack {
        /// Figure image file, resolved against `images_dir`.
        image: String,
        size: f64,
        spring_length: f64,
        spring_width: f64,
        links: u32,
    },
    Banner,
}

/// Parse a recipe from its JSON text.
pub fn parse_recipe_json(json: &str) -> Result<MachineRecipe, RecipeError> {
    Ok(serde_json::from_str(json)?)
}

impl MachineRecipe {
    /// Instantiate the parts, wire the edges, and validate the result.
    pub fn build(&self) -> Result<Machine, RecipeError> {
        let mut builder = MachineBuilder::new();
        for part in &self.parts {
            builder.add_part(part.name.clone(), self.instantiate(part))?;
        }
        for (driver, sink) in &self.rotations {
            builder.connect_rotation(driver, sink)?;
        }
        for (driving, driven) in &self.belts {
            builder.connect_belt(driving, driven)?;
        }
        for (emitter, listener) in &self.triggers {
            builder.connect_trigger(emitter, listener)?;
        }
        builder.finish()
    }

    fn instantiate(&self, part: &PartRecipe) -> Box<dyn Part> {
        let position = Point::new(part.position.0, part.position.1);
        match &part.kind {
            PartKind::Crank { speed } => {
                let mut crank = Crank::new(position);
                crank.set_speed(*speed);
                Box::new(crank)
            }
            PartKind::Shaft {
                diameter,
                length,
                line_offset,
            } => {
                let mut shaft = Shaft::new(position, *diameter, *length);
                shaft.set_line_offset(*line_offset);
                Box::new(shaft)
            }
            PartKind::Pulley { diameter, width } => {
                Box::new(Pulley::new(position, *diameter, *width))
            }
            PartKind::Cam { hole_offset } => {
                let mut cam = Cam::new(&self.images_dir, position);
                cam.set_hole_offset(*hole_offset);
                Box::new(cam)
            }
            PartKind::LidBox { box_size, lid_size } => Box::new(LidBox::new(
                &self.images_dir,
                position,
                *box_size,
                *lid_size,
            )),
            PartKind::Jack {
                image,
                size,
                spring_length,
                spring_width,
                links,
            } => Box::new(Jack::new(
                &image_path(&self.images_dir, image),
                position,
                *size,
                *spring_length,
                *spring_width,
                *links,
            )),
            PartKind::Banner => Box::new(Banner::new(&self.images_dir, position)),
        }
    }
}
