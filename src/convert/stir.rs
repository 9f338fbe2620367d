use super::error::Error;
use super::interp::{cumulative_sum, shift_to_cell_edge};
use crate::io::eos::EosTable;
use crate::io::flash::Checkpoint;
use crate::model::composition::Composition;
use crate::model::constants::{FLOOR_VALUE, K_B_MEV, M_SUN};
use crate::model::zone::{Field, ZoneTable};
use tracing::{debug, warn};

/// log10 of the temperature (MeV) of the cold reference state.
pub const COLD_LOG_TEMP: f64 = -2.0;

/// Converts a STIR checkpoint into a zone table, innermost first.
///
/// Network isotopes the checkpoint lacks are filled with a floor value and
/// every zone is renormalized. Radius, and velocity when
/// `cell_edge_velocity` is set, are moved to cell edges. Specific energy is
/// the kinetic energy plus the thermal energy above the cold EOS state.
pub fn load(
    checkpoint: &dyn Checkpoint,
    eos: &EosTable,
    network: &[String],
    cell_edge_velocity: bool,
) -> Result<ZoneTable, Error> {
    let n = checkpoint.len();
    let density = checkpoint.require("dens")?;
    let temperature = checkpoint.require("temp")?;
    let velx = checkpoint.require("velx")?;
    let pressure = checkpoint.require("pres")?;
    let gpot = checkpoint.require("gpot")?;
    let ye = checkpoint.require("ye")?;
    let volume = checkpoint.cell_volume()?;
    let radius = checkpoint.radius()?;

    let mut composition = Composition::new(n);
    for isotope in network {
        let values = match checkpoint.field(isotope)? {
            Some(values) => values,
            None => {
                warn!(
                    isotope = %isotope,
                    "isotope missing from the checkpoint; filling with {FLOOR_VALUE:e}"
                );
                vec![FLOOR_VALUE; n]
            }
        };
        composition.insert(isotope.clone(), values)?;
    }
    composition.renormalize();

    let velocity = if cell_edge_velocity {
        shift_to_cell_edge(&velx)
    } else {
        velx.clone()
    };
    let enclosed_mass: Vec<f64> = cumulative_sum(volume.iter().zip(&density).map(|(v, d)| v * d))
        .into_iter()
        .map(|m| m / M_SUN)
        .collect();
    let energy = specific_energy(eos, &ye, &temperature, &density, &velx);

    let mut zones = ZoneTable::new(n);
    zones.insert(Field::Density, density)?;
    zones.insert(Field::Temperature, temperature)?;
    zones.insert(Field::Radius, shift_to_cell_edge(&radius))?;
    zones.insert(Field::Velocity, velocity)?;
    zones.insert(Field::Pressure, pressure)?;
    zones.insert(Field::CellVolume, volume)?;
    zones.insert(Field::SpecificEnergy, energy)?;
    zones.insert(Field::GravPotential, gpot)?;
    zones.insert(Field::EnclosedMass, enclosed_mass)?;
    zones.set_composition(composition)?;

    debug!(zones = n, format = %checkpoint.format(), "loaded checkpoint");
    Ok(zones)
}

/// `0.5·v² + e(T) − e(T_cold)` per zone, NaN where the EOS has no data.
pub fn specific_energy(
    eos: &EosTable,
    ye: &[f64],
    temperature: &[f64],
    density: &[f64],
    velocity: &[f64],
) -> Vec<f64> {
    let mut outside = 0usize;
    let energy = ye
        .iter()
        .zip(temperature)
        .zip(density)
        .zip(velocity)
        .map(|(((&ye, &temp), &dens), &vel)| {
            let logrho = dens.log10();
            let hot = eos.log_energy(ye, (temp * K_B_MEV).log10(), logrho);
            let cold = eos.log_energy(ye, COLD_LOG_TEMP, logrho);
            match (hot, cold) {
                (Some(hot), Some(cold)) => 0.5 * vel * vel + (10f64.powf(hot) - 10f64.powf(cold)),
                _ => {
                    outside += 1;
                    f64::NAN
                }
            }
        })
        .collect();
    if outside > 0 {
        warn!(zones = outside, "zones fall outside the EOS table; their energy is NaN");
    }
    energy
}


#[cfg(test)]
mod tests {
    use super::fixtures::{DUMP, eos};
    use super::*;
    use crate::io::flash::dump;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    fn network() -> Vec<String> {
        ["h1", "he4", "ni56"].map(String::from).to_vec()
    }

    fn zones(cell_edge_velocity: bool) -> ZoneTable {
        let dump = dump::read(Cursor::new(DUMP)).unwrap();
        load(&dump, &eos(), &network(), cell_edge_velocity).unwrap()
    }

    #[test]
    fn composition_is_renormalized_with_floor_fill() {
        let zones = zones(true);
        let composition = zones.composition();
        assert_eq!(composition.species_count(), 3);
        for zone in 0..zones.len() {
            assert_relative_eq!(composition.zone_sum(zone), 1.0, epsilon = 1e-15);
        }
        assert_relative_eq!(composition.get("he4").unwrap()[0], 1.0, epsilon = 1e-15);
        assert!(composition.get("ni56").unwrap()[0] < 1e-98);
    }

    #[test]
    fn radius_moves_to_cell_edges() {
        let centered = zones(false);
        let r = centered.column(Field::Radius).unwrap();
        assert_relative_eq!(r[0], 1.5e7);
        assert_relative_eq!(r[5], 6.5e7);
        assert_eq!(centered.column(Field::Velocity).unwrap()[1], 1.0e7);

        let edged = zones(true);
        assert_relative_eq!(edged.column(Field::Velocity).unwrap()[0], 5.0e6);
    }

    #[test]
    fn enclosed_mass_accumulates_in_solar_units() {
        let zones = zones(true);
        let m = zones.column(Field::EnclosedMass).unwrap();
        assert_relative_eq!(m[0], 4.0e31 / M_SUN, max_relative = 1e-12);
        assert_relative_eq!(m[1], (4.0e31 + 2.8e31) / M_SUN, max_relative = 1e-12);
        assert!(m.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn energy_is_kinetic_plus_thermal_above_cold_state() {
        let zones = zones(true);
        let e = zones.column(Field::SpecificEnergy).unwrap();
        let logt = (1.0e9 * K_B_MEV).log10();
        let expected = 0.5 * 3.0e8 * 3.0e8 + 10f64.powf(18.0 + 0.5 * logt) - 10f64.powf(17.0);
        assert_relative_eq!(e[3], expected, max_relative = 1e-9);
    }

    #[test]
    fn zones_outside_the_table_get_nan_energy() {
        let table = eos();
        let e = specific_energy(&table, &[0.9], &[1e10], &[1e5], &[0.0]);
        assert!(e[0].is_nan());
    }

    #[test]
    fn missing_required_field_fails() {
        let text = DUMP.replace(" gpot", " phi");
        let dump = dump::read(Cursor::new(text)).unwrap();
        let err = load(&dump, &eos(), &network(), true).unwrap_err();
        assert!(err.to_string().contains("'gpot'"));
    }
}
