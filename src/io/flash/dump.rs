use super::Checkpoint;
use crate::io::{ColumnTable, Error, Format, util};
use std::io::BufRead;

pub const RADIUS: &str = "r";
pub const CELL_VOLUME: &str = "cell_volume";

/// A checkpoint exported as whitespace-delimited text.
///
/// The first non-blank line names the fields (an optional leading `#` is
/// ignored); every following line is one cell, innermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDump {
    table: ColumnTable,
}

impl ColumnDump {
    pub fn table(&self) -> &ColumnTable {
        &self.table
    }
}

pub fn read<R: BufRead>(reader: R) -> Result<ColumnDump, Error> {
    let lines = util::collect_lines(reader)?;
    let header_idx = lines
        .iter()
        .position(|line| !util::is_blank(line))
        .ok_or_else(|| Error::parse(Format::ColumnDump, 1, "file is empty"))?;

    let names: Vec<String> = lines[header_idx]
        .trim_start()
        .trim_start_matches('#')
        .split_whitespace()
        .map(String::from)
        .collect();
    let table = ColumnTable::parse(
        Format::ColumnDump,
        names,
        &lines[header_idx + 1..],
        header_idx + 2,
    )?;

    for required in [RADIUS, CELL_VOLUME] {
        table.require(Format::ColumnDump, required)?;
    }
    Ok(ColumnDump { table })
}

impl Checkpoint for ColumnDump {
    fn format(&self) -> Format {
        Format::ColumnDump
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn radius(&self) -> Result<Vec<f64>, Error> {
        Ok(self.table.require(Format::ColumnDump, RADIUS)?.to_vec())
    }

    fn cell_volume(&self) -> Result<Vec<f64>, Error> {
        Ok(self.table.require(Format::ColumnDump, CELL_VOLUME)?.to_vec())
    }

    fn field(&self, name: &str) -> Result<Option<Vec<f64>>, Error> {
        Ok(self.table.column(name.trim()).map(<[f64]>::to_vec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_commented_header() {
        let text = "\n# r cell_volume dens he4\n1.0 4.0 10.0 1.0\n2.0 28.0 5.0 1.0\n";
        let dump = read(Cursor::new(text)).unwrap();
        assert_eq!(dump.len(), 2);
        assert_eq!(dump.radius().unwrap(), vec![1.0, 2.0]);
        assert_eq!(dump.cell_volume().unwrap(), vec![4.0, 28.0]);
        assert_eq!(dump.field("he4  ").unwrap(), Some(vec![1.0, 1.0]));
        assert_eq!(dump.field("ni56").unwrap(), None);
    }

    #[test]
    fn requires_radius_and_volume() {
        let err = read(Cursor::new("r dens\n1 2\n")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "column dump data is missing the required column 'cell_volume'"
        );
    }

    #[test]
    fn require_reports_absent_field() {
        let dump = read(Cursor::new("r cell_volume\n1 2\n")).unwrap();
        let err = dump.require("velx").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { .. }));
    }
}
