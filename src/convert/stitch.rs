use super::error::Error;
use crate::model::composition::Composition;
use crate::model::constants::M_SUN;
use crate::model::zone::{Field, ZoneTable};
use tracing::{debug, warn};

/// Result of joining a checkpoint to its progenitor and placing the mass cut.
#[derive(Debug, Clone, PartialEq)]
pub struct Stitched {
    /// Every stitched zone, innermost first, before excision.
    pub zones: ZoneTable,
    /// Zones kept outside the mass cut, with the MESA structure columns.
    pub retained: ZoneTable,
    /// Number of checkpoint zones at the bottom of `zones`.
    pub domain_end: usize,
    /// Index of the outermost excised zone, `None` when nothing is excised.
    pub cut: Option<usize>,
    /// Mass inside the cut (M☉).
    pub core_mass: f64,
    /// Radius of the cut (cm).
    pub core_radius: f64,
    /// Σ ρV over every stitched zone (g).
    pub total_mass: f64,
    /// Mass above the cut (g).
    pub xmstar: f64,
    /// Σ e_tot ρV over the retained zones (erg).
    pub total_energy: f64,
}

impl Stitched {
    pub fn excised(&self) -> usize {
        self.cut.map_or(0, |cut| cut + 1)
    }
}

/// Joins the inner `portion` of the checkpoint's radial extent to the
/// progenitor zones lying above it in mass, then excises the bound core.
pub fn stitch(profile: &ZoneTable, progenitor: &ZoneTable, portion: f64) -> Result<Stitched, Error> {
    let domain_end = domain_end(profile.require(Field::Radius)?, portion)
        .ok_or(Error::EmptyDomain { portion })?;

    let profile_mass = profile.require(Field::EnclosedMass)?;
    let top = profile_mass[..domain_end]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let progenitor_mass = progenitor.require(Field::EnclosedMass)?;
    let outer = progenitor_mass.iter().filter(|&&m| m > top).count();
    let outer_start = progenitor.len() - outer;
    debug!(domain_end, outer, "stitching domains");

    let n = domain_end + outer;
    let mut zones = ZoneTable::new(n);
    for field in profile.fields() {
        let Some(above) = progenitor.column(field) else {
            warn!(column = %field, "column missing from progenitor data; skipped");
            continue;
        };
        let below = profile.require(field)?;
        zones.insert(field, join(&below[..domain_end], &above[outer_start..]))?;
    }
    let mut composition = Composition::new(n);
    for (isotope, below) in profile.composition().iter() {
        let Some(above) = progenitor.composition().get(isotope) else {
            warn!(isotope, "isotope missing from progenitor data; skipped");
            continue;
        };
        composition.insert(isotope, join(&below[..domain_end], &above[outer_start..]))?;
    }
    zones.set_composition(composition)?;

    let total_specific: Vec<f64> = zones
        .require(Field::SpecificEnergy)?
        .iter()
        .zip(zones.require(Field::GravPotential)?)
        .map(|(e, phi)| e + phi)
        .collect();
    let cut = mass_cut(&total_specific)?;
    zones.insert(Field::TotalSpecificEnergy, total_specific)?;

    let (core_mass, core_radius) = match cut {
        Some(cut) => (
            zones.require(Field::EnclosedMass)?[cut],
            zones.require(Field::Radius)?[cut],
        ),
        None => (0.0, 0.0),
    };

    let zone_mass = zone_masses(&zones)?;
    let total_mass: f64 = zone_mass.iter().sum();
    let xmstar = total_mass - core_mass * M_SUN;
    zones.insert(Field::Dq, zone_mass.iter().map(|m| m / xmstar).collect())?;

    let excised = cut.map_or(0, |cut| cut + 1);
    let mut retained = zones.slice(excised..n);
    let total_energy = retained
        .require(Field::TotalSpecificEnergy)?
        .iter()
        .zip(&zone_mass[excised..])
        .map(|(e, m)| e * m)
        .sum();

    let ln = |field: Field, table: &ZoneTable| -> Result<Vec<f64>, Error> {
        Ok(table.require(field)?.iter().map(|v| v.ln()).collect())
    };
    let ln_r = ln(Field::Radius, &retained)?;
    let ln_d = ln(Field::Density, &retained)?;
    let ln_t = ln(Field::Temperature, &retained)?;
    retained.insert(Field::LnR, ln_r)?;
    retained.insert(Field::LnD, ln_d)?;
    retained.insert(Field::LnT, ln_t)?;
    retained.fill(Field::ConvVelocity, 0.0);
    let surface_luminosity = progenitor
        .require(Field::Luminosity)?
        .last()
        .copied()
        .ok_or_else(|| Error::MissingColumn(Field::Luminosity.name().to_string()))?;
    retained.fill(Field::Luminosity, surface_luminosity);

    debug!(
        excised,
        retained = retained.len(),
        core_mass,
        "placed mass cut"
    );
    Ok(Stitched {
        zones,
        retained,
        domain_end,
        cut,
        core_mass,
        core_radius,
        total_mass,
        xmstar,
        total_energy,
    })
}

/// Index of the largest radius not exceeding `portion` of the outer radius.
///
/// `None` when that index is zero, which would leave no checkpoint zones.
pub fn domain_end(radius: &[f64], portion: f64) -> Option<usize> {
    let outer = radius.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let limit = outer * portion;
    let mut best: Option<(usize, f64)> = None;
    for (idx, &r) in radius.iter().enumerate() {
        if r <= limit && best.is_none_or(|(_, b)| r > b) {
            best = Some((idx, r));
        }
    }
    best.map(|(idx, _)| idx).filter(|&idx| idx > 0)
}

/// Places the mass cut below the first zone, counting from the center, whose
/// total specific energy is non-negative.
///
/// Returns `Ok(None)` when the central zone is already unbound.
pub fn mass_cut(total_specific_energy: &[f64]) -> Result<Option<usize>, Error> {
    let first_unbound = total_specific_energy
        .iter()
        .position(|&e| e >= 0.0)
        .ok_or(Error::NoUnboundZone)?;
    Ok(first_unbound.checked_sub(1))
}

fn zone_masses(zones: &ZoneTable) -> Result<Vec<f64>, Error> {
    Ok(zones
        .require(Field::Density)?
        .iter()
        .zip(zones.require(Field::CellVolume)?)
        .map(|(rho, v)| rho * v)
        .collect())
}

fn join(below: &[f64], above: &[f64]) -> Vec<f64> {
    below.iter().chain(above).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table(columns: &[(Field, &[f64])], isotopes: &[(&str, &[f64])]) -> ZoneTable {
        let n = columns[0].1.len();
        let mut zones = ZoneTable::new(n);
        for (field, values) in columns {
            zones.insert(*field, values.to_vec()).unwrap();
        }
        let mut composition = Composition::new(n);
        for (name, values) in isotopes {
            composition.insert(*name, values.to_vec()).unwrap();
        }
        zones.set_composition(composition).unwrap();
        zones
    }

    fn profile() -> ZoneTable {
        table(
            &[
                (Field::Radius, &[1.0, 2.0, 3.0, 4.0, 5.0]),
                (Field::EnclosedMass, &[0.5, 1.0, 1.5, 2.0, 2.5]),
                (Field::Density, &[4.0, 3.0, 2.0, 1.0, 1.0]),
                (Field::Temperature, &[10.0, 9.0, 8.0, 7.0, 6.0]),
                (Field::Velocity, &[0.0, 1.0, 2.0, 3.0, 4.0]),
                (Field::CellVolume, &[1.0, 1.0, 2.0, 2.0, 2.0]),
                (Field::SpecificEnergy, &[1.0, 1.0, 5.0, 5.0, 5.0]),
                (Field::GravPotential, &[-3.0, -2.0, -1.0, -1.0, -1.0]),
                (Field::Pressure, &[5.0, 4.0, 3.0, 2.0, 1.0]),
            ],
            &[("h1", &[0.0; 5]), ("he4", &[1.0; 5]), ("ni56", &[0.0; 5])],
        )
    }

    fn progenitor() -> ZoneTable {
        table(
            &[
                (Field::Radius, &[1.0, 3.0, 6.0, 9.0]),
                (Field::EnclosedMass, &[0.8, 1.2, 3.0, 4.0]),
                (Field::Density, &[5.0, 2.0, 0.5, 0.25]),
                (Field::Temperature, &[12.0, 8.0, 4.0, 2.0]),
                (Field::Velocity, &[0.0, 0.0, 0.0, 0.0]),
                (Field::CellVolume, &[1.0, 2.0, 4.0, 8.0]),
                (Field::SpecificEnergy, &[1.0, 1.0, 1.0, 1.0]),
                (Field::GravPotential, &[-2.0, -2.0, -0.5, -0.25]),
                (Field::Luminosity, &[1.0, 2.0, 3.0, 7.0]),
                (Field::Dq, &[0.1, 0.2, 0.3, 0.4]),
            ],
            &[("h1", &[0.0, 0.0, 0.5, 0.7]), ("he4", &[1.0, 1.0, 0.5, 0.3])],
        )
    }

    #[test]
    fn domain_end_uses_the_portion_of_the_outer_radius() {
        assert_eq!(domain_end(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.8), Some(3));
        assert_eq!(domain_end(&[1.0, 2.0, 3.0, 4.0, 5.0], 1.0), Some(4));
        assert_eq!(domain_end(&[1.0, 2.0], 0.1), None);
        assert_eq!(domain_end(&[1.0, 2.0], 0.5), None);
    }

    #[test]
    fn mass_cut_sits_below_the_first_unbound_zone() {
        assert_eq!(mass_cut(&[-5.0, -2.0, 1.0, 3.0]).unwrap(), Some(1));
        assert_eq!(mass_cut(&[0.0, -1.0]).unwrap(), None);
        assert!(matches!(mass_cut(&[-1.0, -2.0]), Err(Error::NoUnboundZone)));
    }

    #[test]
    fn mass_cut_is_idempotent() {
        let energies = [-4.0, -1.0, 2.0, -1.0, 6.0];
        let first = mass_cut(&energies).unwrap();
        let second = mass_cut(&energies).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Some(1));
    }

    #[test]
    fn joins_checkpoint_below_progenitor_above() {
        let stitched = stitch(&profile(), &progenitor(), 0.8).unwrap();
        assert_eq!(stitched.domain_end, 3);
        assert_eq!(stitched.zones.len(), 5);
        assert_eq!(
            stitched.zones.column(Field::EnclosedMass).unwrap(),
            &[0.5, 1.0, 1.5, 3.0, 4.0]
        );
        assert!(
            stitched
                .zones
                .column(Field::EnclosedMass)
                .unwrap()
                .windows(2)
                .all(|w| w[1] >= w[0])
        );
        assert_eq!(
            stitched.zones.composition().get("h1").unwrap(),
            &[0.0, 0.0, 0.0, 0.5, 0.7]
        );
        assert!(!stitched.zones.composition().contains("ni56"));
    }

    #[test]
    fn excises_bound_core_and_rescales_dq() {
        let stitched = stitch(&profile(), &progenitor(), 0.8).unwrap();
        // e_tot = [-2, -1, 4, 0.5, 0.75]
        assert_eq!(stitched.cut, Some(1));
        assert_eq!(stitched.excised(), 2);
        assert_relative_eq!(stitched.core_mass, 1.0);
        assert_relative_eq!(stitched.core_radius, 2.0);

        // zone masses = [4, 3, 4, 2, 2]
        assert_relative_eq!(stitched.total_mass, 15.0);
        assert_relative_eq!(stitched.xmstar, 15.0 - M_SUN);
        let dq = stitched.zones.column(Field::Dq).unwrap();
        assert_relative_eq!(dq[2], 4.0 / stitched.xmstar);

        assert_eq!(stitched.retained.len(), 3);
        assert_relative_eq!(stitched.total_energy, 4.0 * 4.0 + 0.5 * 2.0 + 0.75 * 2.0);
    }

    #[test]
    fn retained_zones_carry_structure_columns() {
        let stitched = stitch(&profile(), &progenitor(), 0.8).unwrap();
        let retained = &stitched.retained;
        assert_relative_eq!(retained.column(Field::LnR).unwrap()[0], 3.0f64.ln());
        assert_relative_eq!(retained.column(Field::LnD).unwrap()[1], 0.5f64.ln());
        assert_relative_eq!(retained.column(Field::LnT).unwrap()[2], 2.0f64.ln());
        assert_eq!(retained.column(Field::ConvVelocity).unwrap(), &[0.0; 3]);
        assert_eq!(retained.column(Field::Luminosity).unwrap(), &[7.0; 3]);
    }

    #[test]
    fn fully_bound_star_is_rejected() {
        let mut progenitor = progenitor();
        progenitor
            .insert(Field::GravPotential, vec![-9.0; 4])
            .unwrap();
        let mut profile = profile();
        profile.insert(Field::GravPotential, vec![-9.0; 5]).unwrap();
        let err = stitch(&profile, &progenitor, 0.8).unwrap_err();
        assert!(matches!(err, Error::NoUnboundZone));
    }

    #[test]
    fn empty_domain_is_rejected() {
        let err = stitch(&profile(), &progenitor(), 0.1).unwrap_err();
        assert!(matches!(err, Error::EmptyDomain { .. }));
    }
}
