//! Readers and writers for the stellar-model file families.
//!
//! Every sub-module exposes `read`/`write` free functions over
//! [`BufRead`](std::io::BufRead) and [`Write`](std::io::Write), so the same
//! code paths serve files, in-memory buffers and tests.

use std::fmt;
use std::path::Path;

pub mod eos;
pub mod error;
pub mod flash;
pub mod mesa;
pub mod numfmt;
pub mod snec;
pub mod stella;
pub mod table;
pub mod tardis;

mod util;

pub use error::Error;
pub use mesa::{MesaModel, MesaProfile};
pub use table::ColumnTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    MesaModel,
    MesaProfile,
    FlashCheckpoint,
    ColumnDump,
    EosTable,
    SnecXg,
    SnecDat,
    SnecComposition,
    SnecGrid,
    StellaModel,
    StellaLuminosity,
    Csvy,
    TardisConfig,
    PlotData,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::MesaModel => write!(f, "MESA model"),
            Format::MesaProfile => write!(f, "MESA profile"),
            Format::FlashCheckpoint => write!(f, "FLASH checkpoint"),
            Format::ColumnDump => write!(f, "column dump"),
            Format::EosTable => write!(f, "EOS table"),
            Format::SnecXg => write!(f, "SNEC xg"),
            Format::SnecDat => write!(f, "SNEC dat"),
            Format::SnecComposition => write!(f, "SNEC composition"),
            Format::SnecGrid => write!(f, "SNEC grid"),
            Format::StellaModel => write!(f, "STELLA model"),
            Format::StellaLuminosity => write!(f, "STELLA luminosity"),
            Format::Csvy => write!(f, "CSVY"),
            Format::TardisConfig => write!(f, "TARDIS config"),
            Format::PlotData => write!(f, "plot data"),
        }
    }
}

/// Renders into memory and writes `path` only once rendering succeeded.
///
/// A failing `render` leaves no file behind.
pub fn write_file<F>(path: &Path, render: F) -> Result<(), Error>
where
    F: FnOnce(&mut Vec<u8>) -> Result<(), Error>,
{
    let mut buffer = Vec::new();
    render(&mut buffer)?;
    std::fs::write(path, buffer)?;
    Ok(())
}

/// Opens `path` for buffered reading.
pub fn open(path: &Path) -> Result<std::io::BufReader<std::fs::File>, Error> {
    Ok(std::io::BufReader::new(std::fs::File::open(path)?))
}
