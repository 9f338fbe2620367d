use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line ~{line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("{format} data has no line containing the marker '{marker}'")]
    MissingMarker { format: Format, marker: String },

    #[error("{format} data is missing the required field '{field}'")]
    MissingField { format: Format, field: String },

    #[error("{format} data is missing the required column '{column}'")]
    MissingColumn { format: Format, column: String },

    #[error("invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML document: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "hdf5")]
    #[error("HDF5 access failed: {0}")]
    Hdf5(#[from] hdf5::Error),

    #[error("unsupported {format} source: {reason}")]
    UnsupportedSource { format: Format, reason: String },
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    pub fn missing_field(format: Format, field: impl Into<String>) -> Self {
        Self::MissingField {
            format,
            field: field.into(),
        }
    }

    pub fn missing_column(format: Format, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            format,
            column: column.into(),
        }
    }

    pub fn unsupported(format: Format, reason: impl Into<String>) -> Self {
        Self::UnsupportedSource {
            format,
            reason: reason.into(),
        }
    }
}
