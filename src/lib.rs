//! Converters between the file formats of stellar-evolution and supernova
//! codes: MESA, STIR, SNEC, STELLA and TARDIS.
//!
//! Every converter is a batch transform: parse the inputs, re-map columns
//! and units, interpolate where grids differ, and write the target format.
//!
//! # Features
//!
//! - **STIR → MESA**: Stitch a STIR core-collapse checkpoint onto its MESA
//!   progenitor, excise the bound core and write a MESA starting model plus
//!   tab-separated plot data
//! - **MESA → SNEC**: Lump a MESA profile's isotopes into SNEC's 13 groups
//!   and write SNEC's grid pattern
//! - **SNEC / STELLA → TARDIS**: Turn light-curve snapshots into TARDIS
//!   CSVY models and YAML configurations
//!
//! # Quick Start
//!
//! ```
//! use stellar_connect::convert::snec_grid;
//! use stellar_connect::io::snec;
//!
//! let pattern = snec_grid::pattern(1000)?;
//! assert_eq!(pattern.len(), 1000);
//! assert_eq!(pattern[0], 0.0);
//! assert!((pattern[999] - 1.0).abs() < 1e-12);
//!
//! let mut out = Vec::new();
//! snec::grid::write(&mut out, &pattern)?;
//! assert_eq!(String::from_utf8(out)?.lines().count(), 1000);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`]: Readers and writers for MESA, FLASH/STIR, SNEC, STELLA and
//!   TARDIS files
//! - [`convert`]: The conversion pipelines and their options
//! - [`model`]: Zone tables, compositions, headers, nuclides and constants
//!
//! # Optional Features
//!
//! - `hdf5`: Read FLASH checkpoints and EOS tables stored as HDF5. Without
//!   it, checkpoints must be plain column dumps.

pub mod convert;
pub mod io;
pub mod model;

pub use convert::{
    CompositionSource, Export, SnecTardisOptions, StellaTardisOptions, StirConfig, StirOptions,
};
pub use model::types::{Element, Nuclide, ParseElementError, ParseNuclideError};
pub use model::zone::{Field, ZoneTable};

pub use convert::Error as ConvertError;
pub use io::Error as IoError;
