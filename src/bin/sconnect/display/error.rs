use std::io::{self, Write};

use anyhow::Error;
use stellar_connect::io::Format;
use stellar_connect::{ConvertError, IoError};

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    let hints = hints(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

/// Hints for the first library error found in the chain.
fn hints(err: &Error) -> Vec<String> {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ConvertError>() {
            return convert_hints(e);
        }
        if let Some(e) = cause.downcast_ref::<IoError>() {
            return io_hints(e);
        }
        if let Some(e) = cause.downcast_ref::<std::io::Error>() {
            return std_io_hints(e);
        }
    }
    Vec::new()
}

fn convert_hints(err: &ConvertError) -> Vec<String> {
    match err {
        ConvertError::Io(e) => io_hints(e),
        ConvertError::Config(_) => vec![
            "Configuration files are YAML unless the name ends in .toml".into(),
            "Every path key and cell_edge_velocity must be present".into(),
        ],
        ConvertError::EmptyDomain { portion } => vec![
            format!("No checkpoint zone lies inside {portion} of the outer radius"),
            "Pass a larger PORTION to stir-mesa".into(),
        ],
        ConvertError::NoUnboundZone => vec![
            "The stitched star is bound everywhere; the shock has not broken out".into(),
            "Use a later checkpoint or a larger PORTION".into(),
        ],
        ConvertError::ColumnLength { field, .. } => vec![
            format!("Column '{field}' does not have one value per zone"),
            "Check the input for truncated or merged lines".into(),
        ],
        ConvertError::MissingColumn(name) => vec![
            format!("The input has no '{name}' column"),
            "Make sure the file was written by a compatible code version".into(),
        ],
        ConvertError::MissingInput(path) => vec![
            format!("Expected {} to exist", path.display()),
            "Check the directories and suffixes in the configuration".into(),
        ],
        ConvertError::Snapshot(_) => vec![
            "The snapshot files of this run disagree with each other".into(),
            "Make sure every output file belongs to the same run".into(),
        ],
    }
}

fn io_hints(err: &IoError) -> Vec<String> {
    match err {
        IoError::Io { source } => std_io_hints(source),
        IoError::Parse { format, line, .. } => {
            let mut hints = vec![format!("Inspect the {format} file around line {line}")];
            hints.extend(format_hints(*format));
            hints
        }
        IoError::MissingMarker { format, marker } => vec![format!(
            "{format} files carry a line containing '{marker}'; the file may be truncated"
        )],
        IoError::MissingField { field, .. } => {
            vec![format!("Add '{field}' to the file header or regenerate the file")]
        }
        IoError::MissingColumn { format, column } => {
            let mut hints = vec![format!("The {format} file has no '{column}' column")];
            hints.extend(format_hints(*format));
            hints
        }
        IoError::Yaml(_) => vec!["Check the YAML template for indentation errors".into()],
        IoError::Toml(_) => vec!["Check the TOML file for unquoted strings or missing keys".into()],
        IoError::UnsupportedSource { format, .. } => match format {
            Format::FlashCheckpoint | Format::EosTable => vec![
                "HDF5 inputs need a build with the `hdf5` feature".into(),
                "Or export the checkpoint as a plain column dump".into(),
            ],
            _ => Vec::new(),
        },
        #[cfg(feature = "hdf5")]
        IoError::Hdf5(_) => vec!["The HDF5 file could not be read; check that it is complete".into()],
    }
}

fn format_hints(format: Format) -> Vec<String> {
    let hint = match format {
        Format::MesaModel => "MESA models need a header, a column-name line and numbered zone rows",
        Format::MesaProfile => "MESA profiles need the header block followed by a column-name row",
        Format::SnecXg => "Each .xg block starts with a '\"Time = ...' line",
        Format::StellaModel => "STELLA snapshots need a '#' column-header line above the data",
        Format::StellaLuminosity => "Each luminosity log row needs time, log L_bol and log L_nuc",
        _ => return Vec::new(),
    };
    vec![hint.to_string()]
}

fn std_io_hints(err: &std::io::Error) -> Vec<String> {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::NotFound => vec![
            "File or directory not found".into(),
            "Check the path spelling and ensure the file exists".into(),
        ],
        ErrorKind::PermissionDenied => vec![
            "Permission denied accessing the file".into(),
            "Check file permissions with `ls -la`".into(),
        ],
        ErrorKind::WriteZero => vec!["Failed to write data; check available disk space".into()],
        ErrorKind::InvalidData | ErrorKind::UnexpectedEof => {
            vec!["The file may be truncated or corrupted".into()]
        }
        _ => Vec::new(),
    }
}
