//! SNEC run → TARDIS CSVY models and configurations.

use super::config::{CompositionSource, SnecTardisOptions};
use super::error::Error;
use super::interp::{self, Linear};
use super::open_input;
use super::shells;
use super::tardis::{self, Export, TardisModel, Templates};
use crate::io::snec::{self, IsoProfile, TimeSeries};
use crate::io::tardis::{CONFIG_TEMPLATE, ConfigOverrides, ShellTable};
use crate::io::{self, Format, numfmt};
use crate::model::constants::DAY;
use crate::model::types::{Element, Nuclide};
use serde_yaml::Mapping;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Profile series read from `output/{name}.xg`.
pub const XG_FILES: [&str; 4] = ["vel", "rho", "temp", "tau"];
/// Scalar series read from `output/{name}.dat`.
pub const DAT_FILES: [&str; 5] = ["lum_observed", "T_eff", "vel_photo", "lum_photo", "index_photo"];

/// Days around a requested time within which a snapshot is accepted.
const DAY_TOLERANCE: f64 = 1.0;

/// The post-explosion part of a SNEC run, one entry per snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnecRun {
    /// Folder name of the run; prefixes every written file.
    pub name: String,
    /// Snapshot times (s), the t = 0 snapshot excluded.
    pub time: Vec<f64>,
    /// Mass grid shared by every profile (g).
    pub mass: Vec<f64>,
    pub velocity: Vec<Vec<f64>>,
    pub density: Vec<Vec<f64>>,
    pub temperature: Vec<Vec<f64>>,
    pub tau: Vec<Vec<f64>>,
    /// Observed luminosity at each snapshot (erg/s).
    pub luminosity: Vec<f64>,
    pub t_eff: Vec<f64>,
    pub vel_photo: Vec<f64>,
    pub lum_photo: Vec<f64>,
    pub index_photo: Vec<i64>,
    /// Photospheric velocity as written by SNEC, before resampling.
    pub vel_photo_series: TimeSeries,
}

impl SnecRun {
    /// Reads the `.xg` and `.dat` outputs under `{run_dir}/output`.
    pub fn load(run_dir: &Path) -> Result<Self, Error> {
        let output = run_dir.join("output");
        let mut profiles: Vec<Vec<snec::Snapshot>> = Vec::with_capacity(XG_FILES.len());
        for name in XG_FILES {
            let path = output.join(format!("{name}.xg"));
            profiles.push(snec::xg::read(open_input(&path)?)?);
        }

        let reference = &profiles[0];
        let first = reference
            .first()
            .ok_or_else(|| Error::snapshot("vel.xg holds no snapshots"))?;
        let mass = first.mass.clone();
        let time: Vec<f64> = reference[1..].iter().map(|s| s.time).collect();

        let mut series: Vec<Vec<Vec<f64>>> = Vec::with_capacity(XG_FILES.len());
        for (name, snapshots) in XG_FILES.iter().zip(profiles) {
            let times: Vec<f64> = snapshots.iter().skip(1).map(|s| s.time).collect();
            if times != time {
                return Err(Error::snapshot(format!(
                    "{name}.xg snapshot times differ from vel.xg"
                )));
            }
            let mut values = Vec::with_capacity(time.len());
            for snapshot in snapshots.into_iter().skip(1) {
                if snapshot.mass != mass {
                    return Err(Error::snapshot(format!(
                        "{name}.xg mass grid at t = {} s differs from vel.xg",
                        snapshot.time
                    )));
                }
                values.push(snapshot.values);
            }
            series.push(values);
        }
        let mut series = series.into_iter();
        let (velocity, density, temperature, tau) = match (
            series.next(),
            series.next(),
            series.next(),
            series.next(),
        ) {
            (Some(v), Some(d), Some(t), Some(tau)) => (v, d, t, tau),
            _ => return Err(Error::snapshot("missing profile series")),
        };

        let mut sampled: Vec<Vec<f64>> = Vec::with_capacity(DAT_FILES.len());
        let mut vel_photo_series = TimeSeries::default();
        for name in DAT_FILES {
            let path = output.join(format!("{name}.dat"));
            let data = snec::dat::read(open_input(&path)?)?;
            let curve = Linear::new(&data.time, &data.values).ok_or_else(|| {
                io::Error::parse(Format::SnecDat, 0, format!("{name}.dat holds no samples"))
            })?;
            sampled.push(curve.sample(&time));
            if name == "vel_photo" {
                vel_photo_series = data;
            }
        }
        let mut sampled = sampled.into_iter();
        let mut next = || sampled.next().unwrap_or_default();
        let (luminosity, t_eff, vel_photo, lum_photo) = (next(), next(), next(), next());
        let index_photo = next().into_iter().map(|v| v as i64).collect();

        let name = run_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!(run = %name, snapshots = time.len(), zones = mass.len(), "SNEC run loaded");

        Ok(Self {
            name,
            time,
            mass,
            velocity,
            density,
            temperature,
            tau,
            luminosity,
            t_eff,
            vel_photo,
            lum_photo,
            index_photo,
            vel_photo_series,
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Keeps the snapshots whose `mask` entry is set.
    pub fn select(&mut self, mask: &[bool]) {
        fn keep<T>(values: &mut Vec<T>, mask: &[bool]) {
            let mut flags = mask.iter();
            values.retain(|_| flags.next().copied().unwrap_or(false));
        }
        keep(&mut self.time, mask);
        keep(&mut self.velocity, mask);
        keep(&mut self.density, mask);
        keep(&mut self.temperature, mask);
        keep(&mut self.tau, mask);
        keep(&mut self.luminosity, mask);
        keep(&mut self.t_eff, mask);
        keep(&mut self.vel_photo, mask);
        keep(&mut self.lum_photo, mask);
        keep(&mut self.index_photo, mask);
    }

    /// Time of snapshot `index` in days.
    pub fn day(&self, index: usize) -> f64 {
        self.time[index] / DAY
    }
}

/// Snapshots in homologous expansion and still in the photospheric phase.
///
/// Homologous means every velocity step is non-negative when
/// `use_vel_diff` is set, and simply `t > 0` otherwise. The photospheric
/// phase ends at the last time SNEC reports a positive photospheric
/// velocity.
pub fn time_mask(run: &SnecRun, use_vel_diff: bool) -> Vec<bool> {
    let series = &run.vel_photo_series;
    let limit = series
        .time
        .iter()
        .zip(&series.values)
        .filter(|&(_, &v)| v > 0.0)
        .map(|(&t, _)| t)
        .last();
    let Some(limit) = limit else {
        return vec![false; run.len()];
    };

    run.time
        .iter()
        .zip(&run.velocity)
        .map(|(&t, velocity)| {
            let homologous = if use_vel_diff {
                velocity.windows(2).all(|w| w[1] - w[0] >= 0.0)
            } else {
                t > 0.0
            };
            homologous && t <= limit
        })
        .collect()
}

/// Column names for the species of a composition profile, free neutrons
/// excluded. Species without a known element map to `None`.
fn species_names(profile: &IsoProfile) -> Vec<Option<String>> {
    profile
        .species
        .iter()
        .skip(1)
        .map(|&(a, z)| match Element::from_atomic_number(z) {
            Some(element) => Some(Nuclide::new(element, a).to_string()),
            None => {
                warn!(mass_number = a, charge = z, "species has no element symbol; skipped");
                None
            }
        })
        .collect()
}

fn discover_profile(run_dir: &Path) -> Result<PathBuf, Error> {
    let input = run_dir.join("input");
    if !input.is_dir() {
        return Err(Error::MissingInput(input));
    }
    let mut candidates: Vec<PathBuf> = fs::read_dir(&input)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".iso.dat"))
        })
        .collect();
    candidates.sort();
    if candidates.len() > 1 {
        warn!(
            found = candidates.len(),
            "more than one composition profile found; using the first"
        );
    }
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::MissingInput(input.join("*.iso.dat")))
}

/// Mass fractions of every species on the run's mass grid.
pub fn composition(
    run_dir: &Path,
    source: &CompositionSource,
    mass: &[f64],
) -> Result<ShellTable, Error> {
    let profile_path = match source {
        CompositionSource::Profile(path) => path.clone(),
        CompositionSource::Discover | CompositionSource::Boxcar(_) => discover_profile(run_dir)?,
    };
    debug!(path = %profile_path.display(), "reading composition profile");
    let profile = snec::iso::read(open_input(&profile_path)?)?;
    let names = species_names(&profile);

    let mut table = ShellTable::new();
    match source {
        CompositionSource::Boxcar(dir) => {
            let dir = dir.clone().unwrap_or_else(|| run_dir.join("output"));
            for (i, name) in names.into_iter().enumerate() {
                let Some(name) = name else { continue };
                let path = dir.join(format!("iso_id_{}_init_frac.dat", i + 2));
                let fractions = snec::dat::read(open_input(&path)?)?.values;
                if fractions.len() != mass.len() {
                    return Err(Error::ColumnLength {
                        field: name,
                        expected: mass.len(),
                        found: fractions.len(),
                    });
                }
                table.insert(name, fractions);
            }
        }
        CompositionSource::Discover | CompositionSource::Profile(_) => {
            for (name, fractions) in names.into_iter().zip(profile.fractions.iter().skip(1)) {
                let Some(name) = name else { continue };
                let curve = Linear::new(&profile.mass, fractions).ok_or_else(|| {
                    io::Error::parse(Format::SnecComposition, 0, "profile holds no zones")
                })?;
                table.insert(name, curve.sample(mass));
            }
        }
    }
    Ok(table)
}

/// Shell table of one snapshot after filtering, with the inner boundary
/// velocity taken before averaging. `None` when no shell survives.
pub fn snapshot_shells(
    run: &SnecRun,
    index: usize,
    composition: &ShellTable,
    options: &SnecTardisOptions,
) -> Option<(ShellTable, f64)> {
    let mut table = ShellTable::new();
    table.insert("velocity".into(), run.velocity[index].clone());
    table.insert("density".into(), run.density[index].clone());
    table.insert("t_rad".into(), run.temperature[index].clone());
    table.insert("tau".into(), run.tau[index].clone());
    for (name, fractions) in composition {
        table.insert(name.clone(), fractions.clone());
    }

    if let Some(upper) = options.tau_upper_limit {
        shells::retain_by(&mut table, "tau", |tau| tau <= upper);
    }
    if let Some(lower) = options.tau_lower_limit {
        shells::retain_by(&mut table, "tau", |tau| tau >= lower);
    }
    table.shift_remove("tau");

    let keep: Vec<bool> = table["density"]
        .iter()
        .zip(&table["velocity"])
        .map(|(&rho, &v)| rho > 0.0 && v > 0.0)
        .collect();
    shells::retain(&mut table, &keep);
    shells::retain_by(&mut table, "t_rad", |t| t > 0.0);
    shells::remove_non_increasing(&mut table, "velocity");
    shells::drop_zero_columns(&mut table);

    let v_inner = table
        .get("velocity")?
        .iter()
        .copied()
        .reduce(f64::min)?;
    let table = match options.num_keep_shells {
        Some(target) => shells::group_mean(&table, shells::gap_for(shells::len(&table), target)),
        None => table,
    };
    Some((table, v_inner))
}

fn model_for(
    run: &SnecRun,
    index: usize,
    shells: ShellTable,
    v_inner: f64,
    label: &str,
) -> TardisModel {
    let day = run.day(index);
    let csvy_name = format!("{}_tardis_csvy_{label}.csvy", run.name);
    let config_name = format!("{}_tardis_config_{label}.yml", run.name);

    let mut csvy_header = Mapping::new();
    tardis::header_entry(&mut csvy_header, "name", csvy_name.as_str());
    tardis::header_entry(&mut csvy_header, "model_density_time_0", format!("{day:.3} day"));
    tardis::header_entry(&mut csvy_header, "model_isotope_time_0", "0.0 s");
    tardis::header_entry(
        &mut csvy_header,
        "v_inner_boundary",
        tardis::velocity_text(v_inner, 6),
    );

    let mut config = ConfigOverrides::new();
    config
        .set(
            "supernova",
            "luminosity_requested",
            tardis::with_unit(run.luminosity[index], "erg/s"),
        )
        .set("supernova", "time_explosion", format!("{day:.3} day"))
        .set("plasma", "initial_t_inner", tardis::with_unit(run.t_eff[index], "K"));

    TardisModel {
        csvy_name,
        config_name,
        csvy_header,
        config,
        shells,
    }
}

/// Converts the SNEC run in `run_dir` into TARDIS inputs.
///
/// Files go to `output_dir`, or `{run_dir}/tardis_configs` when `None`.
pub fn run(
    run_dir: &Path,
    template_dir: &Path,
    output_dir: Option<&Path>,
    options: &SnecTardisOptions,
) -> Result<Export, Error> {
    let templates = Templates::load(template_dir, CONFIG_TEMPLATE)?;
    let mut snec_run = SnecRun::load(run_dir)?;
    let composition = composition(run_dir, &options.composition, &snec_run.mass)?;

    let mask = time_mask(&snec_run, options.use_vel_diff);
    snec_run.select(&mask);
    let mut export = Export::default();
    if snec_run.is_empty() {
        warn!(run = %snec_run.name, "no snapshot is both homologous and photospheric; nothing written");
        return Ok(export);
    }
    info!(selected = snec_run.len(), "snapshots selected");

    let output_dir = output_dir.map_or_else(|| run_dir.join(tardis::DEFAULT_OUTPUT_DIR), Path::to_path_buf);
    fs::create_dir_all(&output_dir)?;

    let targets: Vec<(usize, String)> = match &options.time_in_days {
        None => (0..snec_run.len()).map(|i| (i, i.to_string())).collect(),
        Some(days) => {
            let mut targets = Vec::with_capacity(days.len());
            for &day in days {
                let label = format!("{}_day", numfmt::python_repr(day));
                match interp::nearest_index(&snec_run.time, day * DAY) {
                    Some(i) if (snec_run.day(i) - day).abs() <= DAY_TOLERANCE => {
                        targets.push((i, label));
                    }
                    _ => {
                        warn!(day, "no snapshot within one day of the requested time");
                        export.skip(label, "no snapshot within one day");
                    }
                }
            }
            targets
        }
    };

    for (index, label) in targets {
        let Some((shells, v_inner)) = snapshot_shells(&snec_run, index, &composition, options)
        else {
            warn!(snapshot = %label, "no shell survives the filters");
            export.skip(label, "no shell survives the filters");
            continue;
        };
        let model = model_for(&snec_run, index, shells, v_inner, &label);
        let written = tardis::write(&output_dir, label, &templates, &model)?;
        info!(
            csvy = %written.csvy.display(),
            shells = written.shells,
            "TARDIS model written"
        );
        export.written.push(written);
    }
    Ok(export)
}
