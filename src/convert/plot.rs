//! Diagnostic data for the stitched star.
//!
//! Instead of drawing, the pipeline writes one tab-separated table per run
//! with every plotted profile against zone index and enclosed mass, each
//! zone tagged with its region and whether it falls in the zoom window
//! around the stitch point.

use super::error::Error;
use super::stitch::Stitched;
use crate::io::numfmt;
use crate::model::zone::Field;
use std::fmt;
use std::io::Write;
use std::ops::Range;
use tracing::warn;

/// A quantity that can be plotted against the stitched zones.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Field(Field),
    Isotope(String),
}

impl Profile {
    fn is_log_scaled(&self) -> bool {
        matches!(self, Profile::Field(field) if field.is_log_scaled())
    }

    fn values<'a>(&self, stitched: &'a Stitched) -> Option<&'a [f64]> {
        match self {
            Profile::Field(field) => stitched.zones.column(*field),
            Profile::Isotope(name) => stitched.zones.composition().get(name),
        }
    }

    fn label(&self, velocity_column: &str) -> String {
        let name = match self {
            Profile::Field(Field::Velocity) => velocity_column,
            Profile::Field(field) => field.name(),
            Profile::Isotope(name) => name,
        };
        if self.is_log_scaled() {
            format!("log({name})")
        } else {
            name.to_string()
        }
    }
}

pub fn default_profiles() -> Vec<Profile> {
    [
        Field::EnclosedMass,
        Field::Radius,
        Field::Density,
        Field::Temperature,
        Field::Velocity,
        Field::TotalSpecificEnergy,
        Field::Pressure,
    ]
    .into_iter()
    .map(Profile::Field)
    .collect()
}

pub fn composition_profiles(network: &[String]) -> Vec<Profile> {
    network.iter().cloned().map(Profile::Isotope).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Excised by the mass cut.
    Core,
    /// Taken from the simulation checkpoint.
    Simulation,
    /// Taken from the progenitor.
    Progenitor,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Core => write!(f, "core"),
            Region::Simulation => write!(f, "simulation"),
            Region::Progenitor => write!(f, "progenitor"),
        }
    }
}

/// Zone ranges of each region and of the zoom window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regions {
    pub core: Range<usize>,
    pub simulation: Range<usize>,
    pub progenitor: Range<usize>,
    pub zoom: Range<usize>,
}

impl Regions {
    pub fn new(stitched: &Stitched, zoom_width: usize) -> Self {
        let n = stitched.zones.len();
        let excised = stitched.excised().min(n);
        let boundary = (stitched.domain_end + 1).clamp(excised, n);
        let half = zoom_width / 2;
        Self {
            core: 0..excised,
            simulation: excised..boundary,
            progenitor: boundary..n,
            zoom: stitched.domain_end.saturating_sub(half)..(stitched.domain_end + half).min(n),
        }
    }

    pub fn region_of(&self, zone: usize) -> Region {
        if self.core.contains(&zone) {
            Region::Core
        } else if self.simulation.contains(&zone) {
            Region::Simulation
        } else {
            Region::Progenitor
        }
    }
}

/// Writes the plot table for `profiles`; log-scaled quantities are stored
/// as log10 values. Profiles the stitched star lacks are skipped.
pub fn write<W: Write>(
    mut writer: W,
    stitched: &Stitched,
    profiles: &[Profile],
    zoom_width: usize,
    velocity_column: &str,
) -> Result<Regions, Error> {
    let regions = Regions::new(stitched, zoom_width);
    let mass = stitched.zones.require(Field::EnclosedMass)?;

    let mut labels = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();
    for profile in profiles {
        let label = profile.label(velocity_column);
        let Some(values) = profile.values(stitched) else {
            warn!(profile = %label, "profile not present in the stitched star; not plotted");
            continue;
        };
        let values = if profile.is_log_scaled() {
            values.iter().map(|v| v.log10()).collect()
        } else {
            values.to_vec()
        };
        labels.push(label);
        columns.push(values);
    }

    write!(writer, "zone\tenclosed_mass")?;
    for label in &labels {
        write!(writer, "\t{label}")?;
    }
    writeln!(writer, "\tregion\tzoom")?;

    for (zone, m) in mass.iter().enumerate() {
        write!(writer, "{zone}\t{}", numfmt::scientific(*m, 8, 'e'))?;
        for column in &columns {
            write!(writer, "\t{}", numfmt::scientific(column[zone], 8, 'e'))?;
        }
        writeln!(
            writer,
            "\t{}\t{}",
            regions.region_of(zone),
            u8::from(regions.zoom.contains(&zone))
        )?;
    }
    Ok(regions)
}
