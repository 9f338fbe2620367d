use super::layout;
use crate::io::{ColumnTable, Error, Format, util};
use crate::model::header::{HeaderLine, ModelHeader};
use std::io::BufRead;

const HEADER_NAMES_LINE: usize = 1;
const HEADER_VALUES_LINE: usize = 2;
const COLUMN_NAMES_LINE: usize = 5;

/// A MESA `profile*.data` file: a scalar header and a named-column table,
/// surface zone first.
#[derive(Debug, Clone, PartialEq)]
pub struct MesaProfile {
    pub header: ModelHeader,
    pub data: ColumnTable,
}

impl MesaProfile {
    pub fn num_zones(&self) -> Result<usize, Error> {
        let zones = self
            .header
            .int("num_zones")
            .ok_or_else(|| Error::missing_field(Format::MesaProfile, "num_zones"))?;
        usize::try_from(zones).map_err(|_| {
            Error::parse(
                Format::MesaProfile,
                HEADER_VALUES_LINE + 1,
                format!("num_zones must be non-negative, found {zones}"),
            )
        })
    }

    /// Total stellar mass in solar masses.
    pub fn star_mass(&self) -> Result<f64, Error> {
        self.header
            .float("star_mass")
            .ok_or_else(|| Error::missing_field(Format::MesaProfile, "star_mass"))
    }
}

pub fn read<R: BufRead>(reader: R) -> Result<MesaProfile, Error> {
    let lines = util::collect_lines(reader)?;
    if lines.len() <= COLUMN_NAMES_LINE {
        return Err(Error::parse(
            Format::MesaProfile,
            lines.len(),
            "file ends before the column-name row",
        ));
    }

    let names = lines[HEADER_NAMES_LINE].split_whitespace();
    let values = lines[HEADER_VALUES_LINE].split_whitespace();
    let header = names
        .zip(values)
        .map(|(name, value)| HeaderLine::new(name, layout::parse_header_value(value)))
        .collect();

    let columns: Vec<String> = lines[COLUMN_NAMES_LINE]
        .split_whitespace()
        .map(String::from)
        .collect();
    let data = ColumnTable::parse(
        Format::MesaProfile,
        columns,
        &lines[COLUMN_NAMES_LINE + 1..],
        COLUMN_NAMES_LINE + 2,
    )?;

    Ok(MesaProfile { header, data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::mesa::fixtures::PROFILE;
    use std::io::Cursor;

    #[test]
    fn reads_header_and_columns() {
        let profile = read(Cursor::new(PROFILE)).unwrap();
        assert_eq!(profile.num_zones().unwrap(), 3);
        assert_eq!(profile.star_mass().unwrap(), 15.0);
        assert_eq!(profile.data.len(), 3);
        assert_eq!(profile.data.column("mass").unwrap(), &[15.0, 10.0, 2.0]);
        assert_eq!(profile.data.column("he4").unwrap(), &[0.3, 0.5, 1.0]);
        assert_eq!(
            profile.header.get("version_number").and_then(|v| v.as_text()),
            Some("\"r24.03.1\"")
        );
    }

    #[test]
    fn missing_header_field_is_reported() {
        let text = PROFILE.replacen("num_zones", "num_zonez", 1);
        let profile = read(Cursor::new(text)).unwrap();
        let err = profile.num_zones().unwrap_err();
        assert!(matches!(err, Error::MissingField { .. }));
    }

    #[test]
    fn truncated_file_is_rejected() {
        let err = read(Cursor::new("a\nb\nc\n")).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
