//! Output side shared by the SNEC and STELLA → TARDIS pipelines.

use super::error::Error;
use crate::io::tardis::{self, ConfigOverrides, ShellTable, config, csvy};
use crate::io::{self, numfmt};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Folder created inside the run directory when no output folder is given.
pub const DEFAULT_OUTPUT_DIR: &str = "tardis_configs";

/// The CSVY and configuration templates every written model starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct Templates {
    pub csvy: String,
    pub config: String,
}

impl Templates {
    pub fn load(dir: &Path, config_name: &str) -> Result<Self, Error> {
        Ok(Self {
            csvy: read_template(&dir.join(tardis::CSVY_TEMPLATE))?,
            config: read_template(&dir.join(config_name))?,
        })
    }
}

fn read_template(path: &Path) -> Result<String, Error> {
    if !path.is_file() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

/// One TARDIS model ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct TardisModel {
    pub csvy_name: String,
    pub config_name: String,
    pub csvy_header: Mapping,
    pub config: ConfigOverrides,
    pub shells: ShellTable,
}

/// Files written for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Written {
    /// Snapshot label, e.g. its index or day.
    pub label: String,
    pub shells: usize,
    pub csvy: PathBuf,
    pub config: PathBuf,
}

/// Summary of a TARDIS export run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Export {
    pub written: Vec<Written>,
    /// Snapshots that were selected but not written, with the reason.
    pub skipped: Vec<(String, String)>,
}

impl Export {
    pub(crate) fn skip(&mut self, label: impl Into<String>, reason: impl Into<String>) {
        let (label, reason) = (label.into(), reason.into());
        info!(snapshot = %label, %reason, "snapshot skipped");
        self.skipped.push((label, reason));
    }
}

pub fn write(
    dir: &Path,
    label: impl Into<String>,
    templates: &Templates,
    model: &TardisModel,
) -> Result<Written, Error> {
    let csvy_path = dir.join(&model.csvy_name);
    let config_path = dir.join(&model.config_name);
    io::write_file(&csvy_path, |buf| {
        csvy::write(buf, &templates.csvy, &model.csvy_header, &model.shells)
    })?;
    io::write_file(&config_path, |buf| {
        config::write(buf, &templates.config, &model.config, &model.csvy_name)
    })?;
    Ok(Written {
        label: label.into(),
        shells: super::shells::len(&model.shells),
        csvy: csvy_path,
        config: config_path,
    })
}

pub(crate) fn header_entry(header: &mut Mapping, key: &str, value: impl Into<String>) {
    header.insert(Value::from(key), Value::String(value.into()));
}

/// `"{value} {unit}"` with the value in shortest round-trip notation.
pub(crate) fn with_unit(value: f64, unit: &str) -> String {
    format!("{} {unit}", numfmt::python_repr(value))
}

/// `"{value:.precision e} cm/s"`.
pub(crate) fn velocity_text(value: f64, precision: usize) -> String {
    format!("{} cm/s", numfmt::scientific(value, precision, 'e'))
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const CSVY_TEMPLATE: &str = "\
---
name: example.csvy
model_density_time_0: 1 day
model_isotope_time_0: 0 day
description: example model
tardis_model_config_version: v1.0
datatype:
  fields:
  - name: velocity
---
velocity,density
";

    pub const CONFIG_TEMPLATE: &str = "\
tardis_config_version: v1.0
supernova:
  luminosity_requested: 1.0e+42 erg/s
  time_explosion: 10 day
atom_data: kurucz_cd23_chianti_H_He.h5
plasma:
  initial_t_inner: 10000 K
";

    pub fn write_templates(dir: &std::path::Path, config_name: &str) {
        std::fs::write(dir.join(crate::io::tardis::CSVY_TEMPLATE), CSVY_TEMPLATE).unwrap();
        std::fs::write(dir.join(config_name), CONFIG_TEMPLATE).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_template_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let err = Templates::load(dir.path(), tardis::CONFIG_TEMPLATE).unwrap_err();
        assert!(matches!(err, Error::MissingInput(ref p) if p.ends_with(tardis::CSVY_TEMPLATE)));
    }

    #[test]
    fn writes_both_files_with_cross_reference() {
        let dir = tempfile::tempdir().unwrap();
        fixtures::write_templates(dir.path(), tardis::CONFIG_TEMPLATE);
        let templates = Templates::load(dir.path(), tardis::CONFIG_TEMPLATE).unwrap();

        let mut shells = ShellTable::new();
        shells.insert("velocity".into(), vec![1e8, 2e8]);
        shells.insert("density".into(), vec![1e-12, 1e-13]);
        let mut csvy_header = Mapping::new();
        header_entry(&mut csvy_header, "name", "run_0.csvy");
        let mut overrides = ConfigOverrides::new();
        overrides.set("supernova", "time_explosion", "2.000 day");
        let model = TardisModel {
            csvy_name: "run_0.csvy".into(),
            config_name: "run_0.yml".into(),
            csvy_header,
            config: overrides,
            shells,
        };

        let written = write(dir.path(), "0", &templates, &model).unwrap();
        assert_eq!(written.shells, 2);
        let config = fs::read_to_string(&written.config).unwrap();
        assert!(config.contains("csvy_model: run_0.csvy"));
        let csvy = fs::read_to_string(&written.csvy).unwrap();
        assert!(csvy.ends_with("1.00000e+08,1.00000e-12\n2.00000e+08,1.00000e-13\n"));
    }

    #[test]
    fn unit_strings_follow_python_formatting() {
        assert_eq!(with_unit(1.5e42, "erg/s"), "1.5e+42 erg/s");
        assert_eq!(with_unit(8000.0, "K"), "8000.0 K");
        assert_eq!(velocity_text(123456.0, 6), "1.234560e+05 cm/s");
    }
}
