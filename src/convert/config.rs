use super::error::Error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Locations and conventions for one STIR → MESA campaign.
///
/// Loaded once from a YAML (`.yaml`/`.yml`, the default) or TOML (`.toml`)
/// file and passed explicitly into the pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StirConfig {
    pub progenitor_directory: PathBuf,
    pub progenitor_suffix: String,
    pub stir_profiles_directory: PathBuf,
    pub stir_profiles_suffix: String,
    pub output_directory: PathBuf,
    pub output_suffix: String,
    /// Report velocities at cell edges (`v`) rather than centers (`u`).
    pub cell_edge_velocity: bool,
    pub eos_file_path: PathBuf,
}

impl StirConfig {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", path.display())))?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml(&text)
        } else {
            Self::from_yaml(&text)
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self, Error> {
        serde_yaml::from_str(text).map_err(|e| Error::config(e.to_string()))
    }

    pub fn from_toml(text: &str) -> Result<Self, Error> {
        toml::from_str(text).map_err(|e| Error::config(e.to_string()))
    }

    /// Column name of the velocity in MESA models: `v` or `u`.
    pub fn velocity_column(&self) -> &'static str {
        if self.cell_edge_velocity { "v" } else { "u" }
    }

    pub fn progenitor_model_path(&self, model: &str) -> PathBuf {
        self.progenitor_directory
            .join(format!("{model}{}.mod", self.progenitor_suffix))
    }

    pub fn progenitor_profile_path(&self, model: &str) -> PathBuf {
        self.progenitor_directory
            .join(format!("{model}{}.data", self.progenitor_suffix))
    }

    pub fn checkpoint_path(&self, model: &str, alpha: &str) -> PathBuf {
        self.stir_profiles_directory
            .join(format!("{model}_a{alpha}{}", self.stir_profiles_suffix))
    }

    pub fn output_path(&self, model: &str, alpha: &str) -> PathBuf {
        self.output_directory
            .join(format!("{model}_a{alpha}{}.mod", self.output_suffix))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StirOptions {
    /// Fraction of the checkpoint's outer radius taken from the simulation.
    pub stir_portion: f64,
    /// Zones shown around the stitch point in the zoomed plot.
    pub zoom_width: usize,
}

impl Default for StirOptions {
    fn default() -> Self {
        Self {
            stir_portion: 0.8,
            zoom_width: 80,
        }
    }
}

/// Source of the initial composition for SNEC → TARDIS runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CompositionSource {
    /// The first `input/*.iso.dat` profile of the SNEC run.
    #[default]
    Discover,
    /// An explicit composition profile.
    Profile(PathBuf),
    /// Boxcar-smoothed `iso_id_{k}_init_frac.dat` files in the given
    /// directory (the run's `output/` when `None`), named after the species
    /// of the discovered profile.
    Boxcar(Option<PathBuf>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnecTardisOptions {
    /// Only write snapshots within one day of these times (days).
    pub time_in_days: Option<Vec<f64>>,
    pub tau_upper_limit: Option<f64>,
    pub tau_lower_limit: Option<f64>,
    pub composition: CompositionSource,
    /// Require non-decreasing velocity profiles instead of only `t > 0`.
    pub use_vel_diff: bool,
    /// Rough number of shells in each written model.
    pub num_keep_shells: Option<usize>,
}

impl Default for SnecTardisOptions {
    fn default() -> Self {
        Self {
            time_in_days: None,
            tau_upper_limit: Some(1e3),
            tau_lower_limit: Some(1e-10),
            composition: CompositionSource::Discover,
            use_vel_diff: false,
            num_keep_shells: Some(45),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StellaTardisOptions {
    /// Replace STELLA compositions with those of `profile1.data`.
    pub interpolate_mass_fractions: bool,
    /// Skip snapshots with more than `max_nonhomologous_shells` shells
    /// moving slower than their inner neighbour.
    pub skip_nonhomologous_models: bool,
    pub max_nonhomologous_shells: usize,
    pub tau_upper_limit: Option<f64>,
    /// Keep roughly this many shells by striding.
    pub shrink_shell_number: Option<usize>,
    /// Photospheric phase holds while `L_nuc / L_bol` stays at or below this.
    pub l_nuc_ratio_upper_limit: f64,
}

impl Default for StellaTardisOptions {
    fn default() -> Self {
        Self {
            interpolate_mass_fractions: true,
            skip_nonhomologous_models: true,
            max_nonhomologous_shells: 5,
            tau_upper_limit: Some(1e3),
            shrink_shell_number: None,
            l_nuc_ratio_upper_limit: 0.8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const YAML: &str = "\
progenitor_directory: progenitors
progenitor_suffix: _pre
stir_profiles_directory: stir
stir_profiles_suffix: _hdf5_chk_0100
output_directory: out
output_suffix: _stitched
cell_edge_velocity: true
eos_file_path: eos/SFHo.h5
";

    #[test]
    fn yaml_config_builds_every_path() {
        let config = StirConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.velocity_column(), "v");
        assert_eq!(
            config.progenitor_model_path("s12"),
            Path::new("progenitors/s12_pre.mod")
        );
        assert_eq!(
            config.progenitor_profile_path("s12"),
            Path::new("progenitors/s12_pre.data")
        );
        assert_eq!(
            config.checkpoint_path("s12", "1.25"),
            Path::new("stir/s12_a1.25_hdf5_chk_0100")
        );
        assert_eq!(
            config.output_path("s12", "1.25"),
            Path::new("out/s12_a1.25_stitched.mod")
        );
    }

    #[test]
    fn toml_is_chosen_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"progenitor_directory = "p"
progenitor_suffix = ""
stir_profiles_directory = "s"
stir_profiles_suffix = "_chk"
output_directory = "o"
output_suffix = ""
cell_edge_velocity = false
eos_file_path = "eos.h5""#
        )
        .unwrap();

        let config = StirConfig::load(&path).unwrap();
        assert_eq!(config.velocity_column(), "u");
        assert_eq!(config.eos_file_path, PathBuf::from("eos.h5"));
    }

    #[test]
    fn missing_key_is_named() {
        let text = YAML.replace("eos_file_path: eos/SFHo.h5\n", "");
        let err = StirConfig::from_yaml(&text).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("eos_file_path"));
    }

    #[test]
    fn defaults_match_the_documented_values() {
        let stir = StirOptions::default();
        assert_eq!(stir.stir_portion, 0.8);
        assert_eq!(stir.zoom_width, 80);

        let snec = SnecTardisOptions::default();
        assert_eq!(snec.num_keep_shells, Some(45));
        assert_eq!(snec.tau_lower_limit, Some(1e-10));

        let stella = StellaTardisOptions::default();
        assert_eq!(stella.max_nonhomologous_shells, 5);
        assert!(stella.shrink_shell_number.is_none());
    }
}
