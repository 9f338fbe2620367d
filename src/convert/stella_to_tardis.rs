//! STELLA snapshots → TARDIS CSVY models and configurations.

use super::config::StellaTardisOptions;
use super::error::Error;
use super::interp::{self, Linear};
use super::open_input;
use super::shells;
use super::tardis::{self, Export, TardisModel, Templates};
use crate::io::mesa::{self, MesaProfile};
use crate::io::stella::{self, LuminosityLog, StellaModel};
use crate::io::tardis::{ConfigOverrides, EXAMPLE_CONFIG_TEMPLATE, ShellTable};
use crate::io::{Format, numfmt};
use crate::model::constants::IAU_M_SUN;
use serde_yaml::Mapping;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const SNAPSHOT_PREFIX: &str = "mesa.day";
pub const LUMINOSITY_LOG: &str = "mesa.lbol_lnuc.txt";
pub const PROFILE_FILE: &str = "profile1.data";

const CSVY_NAME: &str = "mesa_stella_model.csvy";
const CSVY_DESCRIPTION: &str = "mesa stella model converted to csvy format for tardis simulation";

/// Network species columns never treated as isotopes.
const NOT_ISOTOPES: [&str; 2] = ["gamma1", "pnhe4"];

/// STELLA columns carried into the TARDIS model, with their new names.
const MATTER_COLUMNS: [(&str, &str); 3] = [
    ("cell_center_v", "velocity"),
    ("avg_density", "density"),
    ("radiation_temperature", "t_rad"),
];

/// Day encoded in a snapshot file name such as `mesa.day12.5_extra`.
pub fn snapshot_day(path: &Path) -> Option<f64> {
    let name = path.file_name()?.to_str()?;
    let stem = name.split('_').next()?;
    let (_, day) = stem.split_once("day")?;
    day.parse().ok()
}

/// Every `res/mesa.day*` snapshot paired with its day, earliest first.
pub fn list_snapshots(res_dir: &Path) -> Result<Vec<(f64, PathBuf)>, Error> {
    if !res_dir.is_dir() {
        return Err(Error::MissingInput(res_dir.to_path_buf()));
    }
    let mut snapshots = Vec::new();
    for entry in fs::read_dir(res_dir)? {
        let path = entry?.path();
        let is_snapshot = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(SNAPSHOT_PREFIX));
        if !is_snapshot {
            continue;
        }
        match snapshot_day(&path) {
            Some(day) => snapshots.push((day, path)),
            None => warn!(path = %path.display(), "cannot read the day from snapshot name; skipped"),
        }
    }
    snapshots.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(snapshots)
}

/// Last logged time at which `L_nuc / L_bol` is at most `ratio_limit`.
pub fn photospheric_limit(log: &LuminosityLog, ratio_limit: f64) -> Option<f64> {
    log.nuclear_ratio()
        .iter()
        .zip(&log.time)
        .filter(|&(&ratio, _)| ratio <= ratio_limit)
        .map(|(_, &time)| time)
        .last()
}

/// Rows whose outer neighbour moves slower than they do.
pub fn nonhomologous_shells(velocity: &[f64]) -> Vec<usize> {
    velocity
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[1] - w[0] < 0.0)
        .map(|(i, _)| i)
        .collect()
}

fn is_isotope_column(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_alphabetic())
        && name.chars().last().is_some_and(|c| c.is_ascii_digit())
}

fn is_profile_isotope(name: &str) -> bool {
    is_isotope_column(name) && !name.contains('_') && !NOT_ISOTOPES.contains(&name)
}

/// `he4` → `He4`.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Isotope mass fractions of a MESA profile against enclosed mass, center
/// first.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileComposition {
    /// Enclosed mass (M_sun).
    pub mass: Vec<f64>,
    pub isotopes: Vec<(String, Vec<f64>)>,
}

impl ProfileComposition {
    pub fn from_profile(profile: &MesaProfile) -> Result<Self, Error> {
        let reversed = |values: &[f64]| values.iter().rev().copied().collect::<Vec<f64>>();
        let mass = reversed(profile.data.require(Format::MesaProfile, "mass")?);
        let isotopes = profile
            .data
            .names()
            .iter()
            .filter(|name| is_profile_isotope(name))
            .filter_map(|name| {
                profile
                    .data
                    .column(name)
                    .map(|values| (name.clone(), reversed(values)))
            })
            .collect();
        Ok(Self { mass, isotopes })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.isotopes.iter().any(|(isotope, _)| isotope == name)
    }

    /// Interpolates every isotope onto `mass` (M_sun), clamping to the end
    /// fractions outside the profile.
    pub fn sample(&self, mass: &[f64]) -> Vec<(String, Vec<f64>)> {
        self.isotopes
            .iter()
            .filter_map(|(name, fractions)| {
                Linear::new(&self.mass, fractions).map(|curve| (name.clone(), curve.sample(mass)))
            })
            .collect()
    }
}

/// Shells of one snapshot ready for TARDIS, plus the inner temperature
/// guess taken at the shell with optical depth closest to one.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSnapshot {
    pub shells: ShellTable,
    pub t_inner: f64,
}

/// Filters one snapshot and maps its columns to TARDIS names.
///
/// Returns `None` when the snapshot holds more non-homologous shells than
/// allowed, or when no shell survives the filters.
pub fn prepare_snapshot(
    model: &StellaModel,
    composition: Option<&ProfileComposition>,
    options: &StellaTardisOptions,
) -> Result<Option<PreparedSnapshot>, Error> {
    let mut table: ShellTable = model
        .data
        .names()
        .iter()
        .filter_map(|name| {
            model
                .data
                .column(name)
                .map(|values| (name.clone(), values.to_vec()))
        })
        .collect();
    for required in ["cell_center_v", "avg_density", "radiation_temperature", "tau"] {
        if !table.contains_key(required) {
            return Err(Error::MissingColumn(required.to_string()));
        }
    }

    if let Some(upper) = options.tau_upper_limit {
        shells::retain_by(&mut table, "tau", |tau| tau <= upper);
    }

    if options.skip_nonhomologous_models {
        let slow = nonhomologous_shells(&table["cell_center_v"]);
        if slow.len() > options.max_nonhomologous_shells {
            debug!(shells = slow.len(), "too many non-homologous shells");
            return Ok(None);
        }
        let keep: Vec<bool> = (0..shells::len(&table)).map(|i| !slow.contains(&i)).collect();
        shells::retain(&mut table, &keep);
    }

    if let Some(target) = options.shrink_shell_number {
        let gap = shells::gap_for(shells::len(&table), target);
        shells::stride(&mut table, gap);
    }

    let Some(photosphere) = interp::nearest_index(&table["tau"], 1.0) else {
        return Ok(None);
    };
    let t_inner = table["radiation_temperature"][photosphere];

    let mut shells_out = ShellTable::new();
    for (column, name) in MATTER_COLUMNS {
        shells_out.insert(name.to_string(), table[column].clone());
    }
    let stella_isotopes = table.keys().filter(|name| is_isotope_column(name));
    match composition {
        Some(composition) => {
            let mass: Vec<f64> = table
                .get("cell_center_m")
                .ok_or_else(|| Error::MissingColumn("cell_center_m".to_string()))?
                .iter()
                .map(|m| m / IAU_M_SUN)
                .collect();
            for (name, fractions) in composition.sample(&mass) {
                shells_out.insert(capitalize(&name), fractions);
            }
            for name in stella_isotopes.filter(|name| !composition.contains(name)) {
                shells_out.insert(capitalize(name), table[name.as_str()].clone());
            }
        }
        None => {
            for name in stella_isotopes {
                shells_out.insert(capitalize(name), table[name.as_str()].clone());
            }
        }
    }

    Ok(Some(PreparedSnapshot {
        shells: shells_out,
        t_inner,
    }))
}

fn model_for(
    day: f64,
    prepared: PreparedSnapshot,
    luminosity: f64,
    explosion_day: f64,
) -> TardisModel {
    let day_text = numfmt::python_repr(day);
    let csvy_name = format!("Day_{day_text}_mesa_stella_model.csvy");
    let config_name = format!("Day_{day_text}_mesa_stella_tardis.yml");
    let v_inner = prepared
        .shells
        .get("velocity")
        .and_then(|v| v.iter().copied().reduce(f64::min))
        .unwrap_or(f64::NAN);

    let mut csvy_header = Mapping::new();
    tardis::header_entry(&mut csvy_header, "name", CSVY_NAME);
    tardis::header_entry(
        &mut csvy_header,
        "model_density_time_0",
        format!("{explosion_day:.4} day"),
    );
    tardis::header_entry(&mut csvy_header, "model_isotope_time_0", "0.0 s");
    tardis::header_entry(&mut csvy_header, "description", CSVY_DESCRIPTION);
    tardis::header_entry(
        &mut csvy_header,
        "v_inner_boundary",
        tardis::velocity_text(v_inner, 5),
    );

    let mut config = ConfigOverrides::new();
    config
        .set(
            "supernova",
            "luminosity_requested",
            tardis::with_unit(luminosity, "erg/s"),
        )
        .set("supernova", "time_explosion", format!("{explosion_day:.4} day"))
        .set("plasma", "initial_t_inner", tardis::with_unit(prepared.t_inner, "K"));

    TardisModel {
        csvy_name,
        config_name,
        csvy_header,
        config,
        shells: prepared.shells,
    }
}

/// Bolometric luminosity (erg/s) logged closest to `day`.
pub fn luminosity_at(log: &LuminosityLog, day: f64) -> Option<f64> {
    interp::nearest_index(&log.time, day).map(|i| 10f64.powf(log.log_lbol[i]))
}

/// Converts the STELLA run in `stella_dir` into TARDIS inputs.
///
/// Files go to `output_dir`, or `{stella_dir}/tardis_configs` when `None`.
pub fn run(
    stella_dir: &Path,
    template_dir: &Path,
    output_dir: Option<&Path>,
    options: &StellaTardisOptions,
) -> Result<Export, Error> {
    let res_dir = stella_dir.join("res");
    let snapshots = list_snapshots(&res_dir)?;
    if snapshots.is_empty() {
        return Err(Error::MissingInput(res_dir.join(format!("{SNAPSHOT_PREFIX}*"))));
    }
    let log = stella::read_luminosity(open_input(&res_dir.join(LUMINOSITY_LOG))?)?;
    let composition = if options.interpolate_mass_fractions {
        let profile = mesa::profile::read(open_input(&stella_dir.join(PROFILE_FILE))?)?;
        Some(ProfileComposition::from_profile(&profile)?)
    } else {
        None
    };
    let templates = Templates::load(template_dir, EXAMPLE_CONFIG_TEMPLATE)?;

    let output_dir = output_dir.map_or_else(
        || stella_dir.join(tardis::DEFAULT_OUTPUT_DIR),
        Path::to_path_buf,
    );
    fs::create_dir_all(&output_dir)?;

    let mut export = Export::default();
    let Some(limit) = photospheric_limit(&log, options.l_nuc_ratio_upper_limit) else {
        warn!("the luminosity log never satisfies the photospheric criterion; nothing written");
        return Ok(export);
    };
    let first_logged = log.time.iter().copied().reduce(f64::min).unwrap_or(0.0);
    info!(
        snapshots = snapshots.len(),
        photospheric_limit = limit,
        "STELLA run loaded"
    );

    for (day, path) in snapshots.into_iter().filter(|&(day, _)| day <= limit) {
        let label = numfmt::python_repr(day);
        let model = stella::read(open_input(&path)?)?;
        let Some(prepared) = prepare_snapshot(&model, composition.as_ref(), options)? else {
            export.skip(label, "non-homologous or empty after filtering");
            continue;
        };
        let t_max = model
            .metadata
            .get("t_max")
            .map(|q| q.value)
            .ok_or_else(|| {
                crate::io::Error::missing_field(Format::StellaModel, "t_max")
            })?;
        let luminosity = luminosity_at(&log, day).unwrap_or(f64::NAN);
        let tardis_model = model_for(day, prepared, luminosity, first_logged + t_max);
        let written = tardis::write(&output_dir, label, &templates, &tardis_model)?;
        info!(
            csvy = %written.csvy.display(),
            shells = written.shells,
            "TARDIS model written"
        );
        export.written.push(written);
    }
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::tardis::fixtures;
    use crate::io::mesa::fixtures::PROFILE;
    use crate::io::stella::fixtures::SNAPSHOT;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    const LOG: &str = "time  logL_bol  logL_nuc
1.0  42.0  40.0
2.0  42.0  40.5
3.0  42.0  42.0
";

    fn snapshot() -> StellaModel {
        stella::read(Cursor::new(SNAPSHOT)).unwrap()
    }

    fn profile_composition() -> ProfileComposition {
        let profile = mesa::profile::read(Cursor::new(PROFILE)).unwrap();
        ProfileComposition::from_profile(&profile).unwrap()
    }

    fn write_run(root: &Path) -> PathBuf {
        let stella_dir = root.join("stella");
        let res = stella_dir.join("res");
        fs::create_dir_all(&res).unwrap();
        fs::write(res.join("mesa.day1.75_snapshot"), SNAPSHOT).unwrap();
        fs::write(res.join("mesa.day2.5_snapshot"), SNAPSHOT).unwrap();
        fs::write(res.join(LUMINOSITY_LOG), LOG).unwrap();
        fs::write(stella_dir.join(PROFILE_FILE), PROFILE).unwrap();
        stella_dir
    }

    #[test]
    fn day_is_read_from_snapshot_name() {
        assert_eq!(snapshot_day(Path::new("res/mesa.day12.5_abc")), Some(12.5));
        assert_eq!(snapshot_day(Path::new("mesa.day3")), Some(3.0));
        assert_eq!(snapshot_day(Path::new("mesa.lbol_lnuc.txt")), None);
    }

    #[test]
    fn snapshots_are_sorted_by_day() {
        let dir = tempfile::tempdir().unwrap();
        let res = dir.path();
        for name in ["mesa.day10.0", "mesa.day2.0", "mesa.day1.0_x", "mesa.lbol_lnuc.txt"] {
            fs::write(res.join(name), "").unwrap();
        }
        let days: Vec<f64> = list_snapshots(res).unwrap().into_iter().map(|(d, _)| d).collect();
        assert_eq!(days, vec![1.0, 2.0, 10.0]);
    }

    #[test]
    fn photospheric_limit_is_a_logged_time() {
        let log = stella::read_luminosity(Cursor::new(LOG)).unwrap();
        assert_eq!(photospheric_limit(&log, 0.8), Some(2.0));
        assert_eq!(photospheric_limit(&log, 1e-3), None);
        assert_relative_eq!(luminosity_at(&log, 1.75).unwrap(), 1e42, max_relative = 1e-12);
    }

    #[test]
    fn nonhomologous_shells_point_at_the_faster_inner_row() {
        assert_eq!(nonhomologous_shells(&[1.0, 3.0, 2.0, 4.0, 1.0]), vec![1, 3]);
        assert!(nonhomologous_shells(&[1.0, 2.0]).is_empty());
    }

    #[test]
    fn profile_isotopes_exclude_helper_columns() {
        let composition = profile_composition();
        let names: Vec<&str> = composition.isotopes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["h1", "he4"]);
        assert_eq!(composition.mass, vec![2.0, 10.0, 15.0]);
        assert!(!is_profile_isotope("gamma1"));
        assert!(!is_profile_isotope("radius_cm"));
        assert_eq!(capitalize("na23"), "Na23");
    }

    #[test]
    fn prepare_filters_and_interpolates() {
        let composition = profile_composition();
        let options = StellaTardisOptions::default();
        let prepared = prepare_snapshot(&snapshot(), Some(&composition), &options)
            .unwrap()
            .unwrap();

        let names: Vec<&str> = prepared.shells.keys().map(String::as_str).collect();
        assert_eq!(names, ["velocity", "density", "t_rad", "H1", "He4", "Na23"]);
        assert_eq!(prepared.shells["velocity"], vec![1.5e8, 4.0e8]);
        assert_eq!(prepared.t_inner, 7000.0);

        let mass = 5.0e33 / IAU_M_SUN;
        assert_relative_eq!(prepared.shells["H1"][0], 0.5 * (mass - 2.0) / 8.0, max_relative = 1e-12);
        assert_eq!(prepared.shells["Na23"], vec![0.1, 0.1]);
    }

    #[test]
    fn too_many_nonhomologous_shells_skip_the_snapshot() {
        let options = StellaTardisOptions {
            max_nonhomologous_shells: 0,
            ..StellaTardisOptions::default()
        };
        assert!(prepare_snapshot(&snapshot(), None, &options).unwrap().is_none());
    }

    #[test]
    fn stella_composition_is_kept_without_profile() {
        let options = StellaTardisOptions {
            interpolate_mass_fractions: false,
            tau_upper_limit: None,
            skip_nonhomologous_models: false,
            ..StellaTardisOptions::default()
        };
        let prepared = prepare_snapshot(&snapshot(), None, &options).unwrap().unwrap();
        assert_eq!(prepared.shells["He4"], vec![0.9, 0.8, 0.7, 0.6]);
        assert_eq!(prepared.shells["velocity"].len(), 4);
    }

    #[test]
    fn run_writes_photospheric_snapshots_only() {
        let dir = tempfile::tempdir().unwrap();
        let stella_dir = write_run(dir.path());
        fixtures::write_templates(dir.path(), EXAMPLE_CONFIG_TEMPLATE);

        let export = run(&stella_dir, dir.path(), None, &StellaTardisOptions::default()).unwrap();
        assert_eq!(export.written.len(), 1);
        let written = &export.written[0];
        assert!(written.csvy.ends_with("tardis_configs/Day_1.75_mesa_stella_model.csvy"));
        assert!(written.config.ends_with("Day_1.75_mesa_stella_tardis.yml"));

        let csvy = fs::read_to_string(&written.csvy).unwrap();
        assert!(csvy.contains("name: mesa_stella_model.csvy"));
        assert!(csvy.contains("model_density_time_0: 3.5000 day"));
        assert!(csvy.contains("v_inner_boundary: 1.50000e+08 cm/s"));

        let config = fs::read_to_string(&written.config).unwrap();
        assert!(config.contains("time_explosion: 3.5000 day"));
        assert!(config.contains("initial_t_inner: 7000.0 K"));
        assert!(config.contains("csvy_model: Day_1.75_mesa_stella_model.csvy"));
    }

    #[test]
    fn missing_profile_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let stella_dir = write_run(dir.path());
        fs::remove_file(stella_dir.join(PROFILE_FILE)).unwrap();
        fixtures::write_templates(dir.path(), EXAMPLE_CONFIG_TEMPLATE);
        let err = run(&stella_dir, dir.path(), None, &StellaTardisOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MissingInput(ref p) if p.ends_with(PROFILE_FILE)));
    }
}
