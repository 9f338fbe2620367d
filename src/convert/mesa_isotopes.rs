use super::error::Error;
use crate::io::mesa::{self, MesaProfile};
use crate::io::snec::{IsoProfile, iso};
use crate::io::{self, Format};
use crate::model::composition::{Composition, ISOTOPE_GROUPS};
use crate::model::constants::{SNEC_M_SUN, SNEC_R_SUN};
use std::path::Path;
use tracing::{debug, warn};

/// Lower bound on the hydrogen fraction written for stripped stars.
pub const H1_FLOOR: f64 = 1e-40;

/// Lumps a MESA profile's network into the SNEC isotope groups.
///
/// Only the first `num_zones` rows are used; zones are emitted from the
/// center outward with mass in grams and radius in centimeters.
pub fn lump(profile: &MesaProfile) -> Result<IsoProfile, Error> {
    let zones = profile.num_zones()?;
    let data = &profile.data;
    if zones > data.len() {
        return Err(Error::ColumnLength {
            field: "num_zones".to_string(),
            expected: zones,
            found: data.len(),
        });
    }
    let center_first = |name: &str| -> Result<Vec<f64>, Error> {
        let values = data.require(Format::MesaProfile, name)?;
        Ok(values[..zones].iter().rev().copied().collect())
    };

    let mass = center_first("mass")?;
    let radius = center_first("radius")?;
    let neut = center_first("neut")?;
    let h1: Vec<f64> = center_first("h1")?
        .into_iter()
        .map(|x| x.max(H1_FLOOR))
        .collect();

    let mut composition = Composition::new(zones);
    for group in &ISOTOPE_GROUPS {
        for member in group.members {
            if data.contains(member) && !composition.contains(member) {
                composition.insert(*member, center_first(member)?)?;
            }
        }
    }

    let mut species = vec![(1, 0), (1, 1)];
    let mut fractions = vec![neut, h1];
    for group in &ISOTOPE_GROUPS {
        species.push((group.mass_number, group.atomic_number));
        let lumped = composition.lump(group).unwrap_or_else(|| {
            warn!(
                a = group.mass_number,
                z = group.atomic_number,
                "no isotope of the group is tracked; writing zeros"
            );
            vec![0.0; zones]
        });
        fractions.push(lumped);
    }
    debug!(zones, tracked = composition.species_count(), "lumped isotopes");

    Ok(IsoProfile {
        species,
        mass: mass.into_iter().map(|m| m * SNEC_M_SUN).collect(),
        radius: radius.into_iter().map(|r| r * SNEC_R_SUN).collect(),
        fractions,
    })
}

/// Reads `profile_path` and writes its SNEC composition to `output_path`.
pub fn run(profile_path: &Path, output_path: &Path) -> Result<IsoProfile, Error> {
    let profile = mesa::read_profile(io::open(profile_path)?)?;
    let lumped = lump(&profile)?;
    io::write_file(output_path, |buf| iso::write(buf, &lumped))?;
    Ok(lumped)
}
