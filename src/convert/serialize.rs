use super::error::Error;
use super::progenitor::Progenitor;
use super::stitch::Stitched;
use crate::io::mesa::layout;
use crate::io::{self, ColumnTable, Format, MesaModel, numfmt};
use crate::model::constants::{M_SUN, R_SUN};
use crate::model::header::{HeaderLine, HeaderValue, ModelHeader};
use crate::model::zone::Field;
use std::f64::consts::PI;

/// Structure columns of a `.mod` zone record, before the network.
const STRUCTURE: [Field; layout::STRUCTURE_COLUMNS] = [
    Field::LnD,
    Field::LnT,
    Field::LnR,
    Field::Luminosity,
    Field::Dq,
    Field::Velocity,
    Field::ConvVelocity,
];

/// Builds the output model: the progenitor's preamble and column row, a
/// header recomputed for the stitched star, zones surface first, and a
/// footer describing the progenitor.
pub fn to_model(stitched: &Stitched, progenitor: &Progenitor) -> Result<MesaModel, Error> {
    let source = &progenitor.model;
    let header = header(stitched, &source.header)?;
    let footer = footer(progenitor)?;

    let retained = stitched.retained.reversed();
    let mut columns = Vec::with_capacity(source.columns().len());
    for field in STRUCTURE {
        columns.push(retained.require(field)?.to_vec());
    }
    for isotope in source.network() {
        let values = retained
            .composition()
            .get(isotope)
            .ok_or_else(|| Error::MissingColumn(isotope.clone()))?;
        columns.push(values.to_vec());
    }

    Ok(MesaModel {
        preamble: source.preamble.clone(),
        header,
        column_row: source.column_row.clone(),
        zones: ColumnTable::from_columns(source.columns().to_vec(), columns),
        footer,
    })
}

/// Mean density inside the mass cut (g/cm³), zero for a point core.
pub fn core_density(core_mass: f64, core_radius: f64) -> f64 {
    if core_radius == 0.0 {
        return 0.0;
    }
    core_mass * M_SUN / (4.0 / 3.0 * PI * core_radius.powi(3))
}

fn header(stitched: &Stitched, source: &ModelHeader) -> Result<ModelHeader, Error> {
    let float = |key: &str| -> Result<f64, Error> {
        source
            .float(key)
            .ok_or_else(|| io::Error::missing_field(Format::MesaModel, key).into())
    };
    let int = |key: &str| -> Result<i64, Error> {
        source
            .get(key)
            .and_then(|value| value.as_int().or_else(|| value.as_f64().map(|v| v as i64)))
            .ok_or_else(|| io::Error::missing_field(Format::MesaModel, key).into())
    };
    let verbatim = |key: &str| -> Result<HeaderValue, Error> {
        source
            .get(key)
            .cloned()
            .ok_or_else(|| io::Error::missing_field(Format::MesaModel, key).into())
    };

    let core_mass_comment = format!(
        "! above core (g).  core mass: Msun, grams:      {}    {}",
        numfmt::fortran_d(stitched.core_mass),
        numfmt::fortran_d(stitched.core_mass * M_SUN)
    );
    let core_radius_comment = format!(
        "! radius of core (cm).  R/Rsun, avg core density (g/cm^3):      {}    {}",
        numfmt::fortran_d(stitched.core_radius / R_SUN),
        numfmt::fortran_d(core_density(stitched.core_mass, stitched.core_radius))
    );

    let mut lines = vec![
        HeaderLine::new("version_number", verbatim("version_number")?),
        HeaderLine::new("M/Msun", stitched.total_mass / M_SUN),
        HeaderLine::new("model_number", int("model_number")?),
        HeaderLine::new("star_age", float("star_age")?),
        HeaderLine::new("initial_z", float("initial_z")?),
        HeaderLine::new("n_shells", stitched.retained.len() as i64),
        HeaderLine::new("net_name", verbatim("net_name")?),
        HeaderLine::new("species", int("species")?),
        HeaderLine::new("xmstar", stitched.xmstar).with_comment(core_mass_comment),
        HeaderLine::new("R_center", stitched.core_radius).with_comment(core_radius_comment),
    ];
    for key in [
        "Teff",
        "power_nuc_burn",
        "power_h_burn",
        "power_he_burn",
        "power_z_burn",
        "power_photo",
    ] {
        lines.push(HeaderLine::new(key, float(key)?));
    }
    lines.push(HeaderLine::new("total_energy", stitched.total_energy));
    lines.push(HeaderLine::new(
        "cumulative_energy_error",
        float("cumulative_energy_error")?,
    ));
    lines.push(
        HeaderLine::new(
            "cumulative_error/total_energy",
            float("cumulative_error/total_energy")?,
        )
        .and("log_rel_run_E_err", float("log_rel_run_E_err")?),
    );
    lines.push(HeaderLine::new("num_retries", 0_i64));
    Ok(lines.into_iter().collect())
}

fn footer(progenitor: &Progenitor) -> Result<ModelHeader, Error> {
    let source = &progenitor.model;
    let float = |header: &ModelHeader, key: &str| -> Result<f64, Error> {
        header
            .float(key)
            .ok_or_else(|| io::Error::missing_field(Format::MesaModel, key).into())
    };
    Ok([
        HeaderLine::new(layout::PREVIOUS_SHELLS, progenitor.zones.len() as i64),
        HeaderLine::new(
            layout::PREVIOUS_MASS,
            float(&source.header, "M/Msun")? * M_SUN,
        ),
        HeaderLine::new(layout::TIMESTEP, float(&source.footer, layout::TIMESTEP)?),
        HeaderLine::new(layout::DT_NEXT, float(&source.footer, layout::DT_NEXT)?),
    ]
    .into_iter()
    .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::progenitor;
    use crate::io::mesa::{self, fixtures};
    use crate::model::composition::Composition;
    use crate::model::zone::ZoneTable;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    fn progenitor() -> Progenitor {
        let model = mesa::read_model(Cursor::new(fixtures::MODEL)).unwrap();
        let profile = mesa::read_profile(Cursor::new(fixtures::PROFILE)).unwrap();
        progenitor::from_parts(model, &profile).unwrap()
    }

    fn stitched() -> Stitched {
        let mut retained = ZoneTable::new(2);
        for (field, values) in [
            (Field::LnD, [-2.0, -8.0]),
            (Field::LnT, [14.0, 9.0]),
            (Field::LnR, [27.5, 30.0]),
            (Field::Luminosity, [2e38, 2e38]),
            (Field::Dq, [0.75, 0.25]),
            (Field::Velocity, [-1.0, 3.0]),
            (Field::ConvVelocity, [0.0, 0.0]),
        ] {
            retained.insert(field, values.to_vec()).unwrap();
        }
        let mut composition = Composition::new(2);
        composition.insert("neut", vec![0.0, 0.0]).unwrap();
        composition.insert("h1", vec![0.25, 0.5]).unwrap();
        composition.insert("he4", vec![0.75, 0.5]).unwrap();
        retained.set_composition(composition).unwrap();

        Stitched {
            zones: retained.clone(),
            retained,
            domain_end: 1,
            cut: Some(0),
            core_mass: 1.5,
            core_radius: 2.0e6,
            total_mass: 4.0 * M_SUN,
            xmstar: 2.5 * M_SUN,
            total_energy: 1.0e51,
        }
    }

    #[test]
    fn header_is_recomputed_for_the_stitched_star() {
        let model = to_model(&stitched(), &progenitor()).unwrap();
        assert_relative_eq!(model.header.float("M/Msun").unwrap(), 4.0);
        assert_eq!(model.header.int("n_shells"), Some(2));
        assert_eq!(model.header.int("model_number"), Some(1234));
        assert_eq!(model.header.int("num_retries"), Some(0));
        assert_eq!(
            model.header.get("net_name").and_then(HeaderValue::as_text),
            Some("'approx21.net'")
        );
        assert_relative_eq!(model.header.float("total_energy").unwrap(), 1.0e51);
        assert_eq!(model.footer.int(layout::PREVIOUS_SHELLS), Some(3));
        assert_relative_eq!(
            model.footer.float(layout::PREVIOUS_MASS).unwrap(),
            15.0 * M_SUN
        );
    }

    #[test]
    fn zones_are_written_surface_first() {
        let model = to_model(&stitched(), &progenitor()).unwrap();
        assert_eq!(model.zones.column("lnd").unwrap(), &[-8.0, -2.0]);
        assert_eq!(model.zones.column("v").unwrap(), &[3.0, -1.0]);
        assert_eq!(model.zones.column("he4").unwrap(), &[0.5, 0.75]);
    }

    #[test]
    fn written_model_parses_back() {
        let model = to_model(&stitched(), &progenitor()).unwrap();
        let mut out = Vec::new();
        mesa::write_model(&mut out, &model).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(
            "                          xmstar      4.9725000000000004D+33  \
             ! above core (g).  core mass: Msun, grams:      \
             1.5000000000000000D+00    2.9835000000000000D+33"
        ));

        let back = mesa::read_model(Cursor::new(text)).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn core_density_handles_a_point_core() {
        assert_eq!(core_density(1.4, 0.0), 0.0);
        assert_relative_eq!(
            core_density(1.0, 1.0e6),
            M_SUN / (4.0 / 3.0 * PI * 1.0e18)
        );
    }
}
