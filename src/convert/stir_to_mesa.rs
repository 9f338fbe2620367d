//! STIR checkpoint + MESA progenitor → MESA starting model.

use super::config::{StirConfig, StirOptions};
use super::error::Error;
use super::plot::{self, Regions};
use super::progenitor::{self, Progenitor};
use super::require_file;
use super::serialize;
use super::stir;
use super::stitch::{self, Stitched};
use crate::io::eos::{self, EosTable};
use crate::io::flash::{self, Checkpoint};
use crate::io::{self, mesa};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of one STIR → MESA conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct StirReport {
    /// The written `.mod` file.
    pub model: PathBuf,
    /// Tab-separated plot data written next to the model.
    pub plot: PathBuf,
    pub stitched: Stitched,
    pub regions: Regions,
}

/// Plot data path belonging to a model output path.
pub fn plot_path(model_path: &Path) -> PathBuf {
    model_path.with_extension("plot.tsv")
}

/// Converts `{model}` at STIR alpha `alpha` with the files named by `config`.
pub fn run(
    config: &StirConfig,
    model: &str,
    alpha: &str,
    options: &StirOptions,
) -> Result<StirReport, Error> {
    let model_path = config.progenitor_model_path(model);
    let profile_path = config.progenitor_profile_path(model);
    let checkpoint_path = config.checkpoint_path(model, alpha);
    for path in [&model_path, &profile_path, &checkpoint_path, &config.eos_file_path] {
        require_file(path)?;
    }

    let progenitor = progenitor::load(&model_path, &profile_path)?;
    let checkpoint = flash::open(&checkpoint_path)?;
    let eos = eos::open(&config.eos_file_path)?;
    info!(
        model,
        alpha,
        checkpoint = %checkpoint_path.display(),
        "inputs loaded"
    );
    convert(
        &progenitor,
        checkpoint.as_ref(),
        &eos,
        config,
        &config.output_path(model, alpha),
        options,
    )
}

/// Runs the conversion on already-loaded inputs and writes the model and
/// its plot data.
pub fn convert(
    progenitor: &Progenitor,
    checkpoint: &dyn Checkpoint,
    eos: &EosTable,
    config: &StirConfig,
    output: &Path,
    options: &StirOptions,
) -> Result<StirReport, Error> {
    let profile = stir::load(checkpoint, eos, progenitor.network(), config.cell_edge_velocity)?;
    let stitched = stitch::stitch(&profile, &progenitor.zones, options.stir_portion)?;
    let model = serialize::to_model(&stitched, progenitor)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    io::write_file(output, |buf| mesa::write_model(buf, &model))?;
    info!(
        path = %output.display(),
        zones = stitched.retained.len(),
        excised = stitched.excised(),
        core_mass = stitched.core_mass,
        "MESA model written"
    );

    let plot_output = plot_path(output);
    let mut profiles = plot::default_profiles();
    profiles.extend(plot::composition_profiles(progenitor.network()));
    let mut buffer = Vec::new();
    let regions = plot::write(
        &mut buffer,
        &stitched,
        &profiles,
        options.zoom_width,
        config.velocity_column(),
    )?;
    fs::write(&plot_output, buffer)?;

    Ok(StirReport {
        model: output.to_path_buf(),
        plot: plot_output,
        stitched,
        regions,
    })
}
