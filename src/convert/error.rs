//! Error types for the conversion pipelines.
//!
//! File-level failures arrive wrapped from [`io::Error`](crate::io::Error);
//! the remaining variants describe inputs that parse cleanly but cannot be
//! stitched, lumped or mapped.

use crate::io;
use crate::model::zone::TableError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running a conversion pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing one of the files failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The run configuration is missing a key or holds an unusable value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The profile domain selected for stitching contains no zones.
    #[error("the checkpoint domain below {portion} of the outer radius is empty")]
    EmptyDomain { portion: f64 },

    /// No zone of the stitched star has non-negative total specific energy,
    /// so no mass cut can be placed.
    #[error("no zone has non-negative total specific energy; cannot place the mass cut")]
    NoUnboundZone,

    /// A column does not have one value per zone.
    #[error("column '{field}' has {found} values but {expected} were expected")]
    ColumnLength {
        field: String,
        expected: usize,
        found: usize,
    },

    /// A column needed by the pipeline is absent.
    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    /// An expected input file or directory does not exist.
    #[error("missing input: {}", .0.display())]
    MissingInput(PathBuf),

    /// A time series is inconsistent across the snapshot files.
    #[error("inconsistent snapshots: {0}")]
    Snapshot(String),
}

impl From<TableError> for Error {
    fn from(e: TableError) -> Self {
        match e {
            TableError::ColumnLength {
                field,
                expected,
                found,
            } => Error::ColumnLength {
                field,
                expected,
                found,
            },
            TableError::MissingColumn(name) => Error::MissingColumn(name),
        }
    }
}

impl Error {
    pub(crate) fn config(details: impl Into<String>) -> Self {
        Self::Config(details.into())
    }

    pub(crate) fn snapshot(details: impl Into<String>) -> Self {
        Self::Snapshot(details.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(io::Error::from(e))
    }
}
