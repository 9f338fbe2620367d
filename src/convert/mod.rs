//! Conversion pipelines between the stellar-model formats.
//!
//! Each pipeline module exposes a `run` entry point taking paths and an
//! options struct; the pieces they are built from (checkpoint loading,
//! stitching, serialization, plot data) are public for callers that already
//! hold parsed inputs.

mod config;
mod error;
mod interp;
mod shells;
mod tardis;

pub mod mesa_isotopes;
pub mod plot;
pub mod progenitor;
pub mod serialize;
pub mod snec_grid;
pub mod snec_to_tardis;
pub mod stella_to_tardis;
pub mod stir;
pub mod stir_to_mesa;
pub mod stitch;

pub use config::{
    CompositionSource, SnecTardisOptions, StellaTardisOptions, StirConfig, StirOptions,
};
pub use error::Error;
pub use interp::Linear;
pub use tardis::{DEFAULT_OUTPUT_DIR, Export, TardisModel, Templates, Written};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Fails with [`Error::MissingInput`] unless `path` is an existing file.
pub(crate) fn require_file(path: &Path) -> Result<(), Error> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::MissingInput(path.to_path_buf()))
    }
}

pub(crate) fn open_input(path: &Path) -> Result<BufReader<File>, Error> {
    require_file(path)?;
    Ok(crate::io::open(path)?)
}
