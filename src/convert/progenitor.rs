use super::error::Error;
use crate::io::{self, MesaModel, mesa};
use crate::model::composition::Composition;
use crate::model::constants::{FLOOR_VALUE, G, M_SUN};
use crate::model::zone::{Field, ZoneTable};
use std::f64::consts::PI;
use std::path::Path;
use tracing::{debug, warn};

/// Profile columns pulled into the zone table, with the field they fill.
const PROFILE_COLUMNS: [(&str, Field); 10] = [
    ("mass", Field::EnclosedMass),
    ("logRho", Field::Density),
    ("temperature", Field::Temperature),
    ("radius_cm", Field::Radius),
    ("luminosity", Field::Luminosity),
    ("logdq", Field::Dq),
    ("velocity", Field::Velocity),
    ("conv_vel", Field::ConvVelocity),
    ("energy", Field::SpecificEnergy),
    ("pressure", Field::Pressure),
];

/// A MESA progenitor: the `.mod` file's metadata plus the companion
/// profile's zones, innermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct Progenitor {
    pub model: MesaModel,
    pub zones: ZoneTable,
}

impl Progenitor {
    pub fn network(&self) -> &[String] {
        self.model.network()
    }

    /// Luminosity of the outermost zone.
    pub fn surface_luminosity(&self) -> Option<f64> {
        self.zones.column(Field::Luminosity)?.last().copied()
    }
}

pub fn load(model_path: &Path, profile_path: &Path) -> Result<Progenitor, Error> {
    let model = mesa::read_model(io::open(model_path)?)?;
    let profile = mesa::read_profile(io::open(profile_path)?)?;
    debug!(
        model = %model_path.display(),
        zones = profile.data.len(),
        species = model.network().len(),
        "loaded progenitor"
    );
    from_parts(model, &profile)
}

/// Builds the zone table from a profile, using the network of `model`.
///
/// Columns the profile lacks are filled with a tiny floor value. Density and
/// `dq` are converted from log10, zones are reversed to run from the center
/// outward, and cell volume and gravitational potential are derived.
pub fn from_parts(model: MesaModel, profile: &mesa::MesaProfile) -> Result<Progenitor, Error> {
    let data = &profile.data;
    let n = data.len();

    let mut surface_first = ZoneTable::new(n);
    for (name, field) in PROFILE_COLUMNS {
        let values = column_or_floor(data, name);
        let values = match field {
            Field::Density | Field::Dq => values.into_iter().map(|v| 10f64.powf(v)).collect(),
            _ => values,
        };
        surface_first.insert(field, values)?;
    }

    let mut composition = Composition::new(n);
    for isotope in model.network() {
        composition.insert(isotope.clone(), column_or_floor(data, isotope))?;
    }
    surface_first.set_composition(composition)?;

    let mut zones = surface_first.reversed();
    let radius = zones.require(Field::Radius)?.to_vec();
    let mass = zones.require(Field::EnclosedMass)?.to_vec();
    zones.insert(Field::CellVolume, shell_volumes(&radius))?;
    let gpot = mass
        .iter()
        .zip(&radius)
        .map(|(m, r)| -G * m * M_SUN / r)
        .collect();
    zones.insert(Field::GravPotential, gpot)?;

    Ok(Progenitor { model, zones })
}

/// Volumes of spherical shells bounded by successive outer radii.
pub fn shell_volumes(outer_radius: &[f64]) -> Vec<f64> {
    let mut inner = 0.0;
    outer_radius
        .iter()
        .map(|r| {
            let outer = r.powi(3);
            let volume = 4.0 / 3.0 * PI * (outer - inner);
            inner = outer;
            volume
        })
        .collect()
}

fn column_or_floor(data: &io::ColumnTable, name: &str) -> Vec<f64> {
    match data.column(name) {
        Some(values) => values.to_vec(),
        None => {
            warn!(
                column = name,
                "column missing from progenitor profile; filling every zone with {FLOOR_VALUE:e}"
            );
            vec![FLOOR_VALUE; data.len()]
        }
    }
}
