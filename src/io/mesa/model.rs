use super::layout::{self, LAYOUT};
use crate::io::{ColumnTable, Error, Format, util};
use crate::model::header::{HeaderLine, ModelHeader};
use std::io::{BufRead, Write};

/// A MESA stellar model as stored in a `.mod` file.
///
/// Zones are kept in file order, surface first.
#[derive(Debug, Clone, PartialEq)]
pub struct MesaModel {
    /// The first lines of the file, reproduced byte for byte on output.
    pub preamble: Vec<String>,
    pub header: ModelHeader,
    /// The column-name row exactly as read.
    pub column_row: String,
    pub zones: ColumnTable,
    pub footer: ModelHeader,
}

impl MesaModel {
    pub fn columns(&self) -> &[String] {
        self.zones.names()
    }

    /// Isotopes tracked by the model, in column order.
    pub fn network(&self) -> &[String] {
        self.columns()
            .get(layout::STRUCTURE_COLUMNS..)
            .unwrap_or_default()
    }

    /// Name of the velocity column, `v` (cell edge) or `u` (cell center).
    pub fn velocity_column(&self) -> Option<&str> {
        self.columns().get(5).map(String::as_str)
    }
}

pub fn read<R: BufRead>(reader: R) -> Result<MesaModel, Error> {
    let lines = util::collect_lines(reader)?;
    if lines.len() < layout::PREAMBLE_LINES {
        return Err(Error::parse(
            Format::MesaModel,
            lines.len(),
            "file ends inside the preamble",
        ));
    }
    let preamble = lines[..layout::PREAMBLE_LINES].to_vec();

    let marker_idx = lines
        .iter()
        .position(|line| line.contains(layout::COLUMN_MARKER))
        .ok_or_else(|| Error::MissingMarker {
            format: Format::MesaModel,
            marker: layout::COLUMN_MARKER.to_string(),
        })?;

    let mut header = ModelHeader::new();
    for (idx, line) in lines
        .iter()
        .enumerate()
        .take(marker_idx)
        .skip(layout::PREAMBLE_LINES)
    {
        if !util::is_blank(line) {
            header.push(parse_header_line(line, idx + 1)?);
        }
    }

    let column_row = lines[marker_idx].clone();
    let columns: Vec<String> = column_row.split_whitespace().map(String::from).collect();
    if columns.len() < layout::STRUCTURE_COLUMNS {
        return Err(Error::parse(
            Format::MesaModel,
            marker_idx + 1,
            format!(
                "column row lists {} columns, expected at least {}",
                columns.len(),
                layout::STRUCTURE_COLUMNS
            ),
        ));
    }

    let first_row = marker_idx + 1;
    let row_count = lines[first_row..]
        .iter()
        .take_while(|line| starts_with_index(line))
        .count();
    let rows: Vec<&str> = lines[first_row..first_row + row_count]
        .iter()
        .map(|line| strip_index(line))
        .collect();
    let zones = ColumnTable::parse(Format::MesaModel, columns, &rows, first_row + 1)?;

    let mut footer = ModelHeader::new();
    let footer_start = first_row + row_count;
    for (idx, line) in lines.iter().enumerate().skip(footer_start) {
        if let Some(entry) = parse_footer_line(line, idx + 1)? {
            footer.push(entry);
        }
    }

    if let Some(field) = header.first_missing(&layout::REQUIRED_HEADER_FIELDS) {
        return Err(Error::missing_field(Format::MesaModel, field));
    }
    if let Some(field) = footer.first_missing(&layout::REQUIRED_FOOTER_FIELDS) {
        return Err(Error::missing_field(Format::MesaModel, field));
    }

    Ok(MesaModel {
        preamble,
        header,
        column_row,
        zones,
        footer,
    })
}

pub fn write<W: Write>(mut writer: W, model: &MesaModel) -> Result<(), Error> {
    for line in &model.preamble {
        writeln!(writer, "{line}")?;
    }
    writeln!(writer)?;
    for line in model.header.lines() {
        writeln!(writer, "{}", LAYOUT.header_line(line))?;
    }
    writeln!(writer)?;
    writeln!(writer, "{}", model.column_row)?;

    for index in 0..model.zones.len() {
        writeln!(writer, "{}", LAYOUT.zone_row(index + 1, model.zones.row(index)))?;
    }

    writeln!(writer, "    ")?;
    writeln!(writer, "        {}", layout::FOOTER_TITLE)?;
    writeln!(writer)?;
    for line in model.footer.lines() {
        writeln!(writer, "{}", LAYOUT.header_line(line))?;
    }
    writeln!(writer)?;
    Ok(())
}

fn parse_header_line(line: &str, line_no: usize) -> Result<HeaderLine, Error> {
    let (body, comment) = match line.split_once('!') {
        Some((body, rest)) => (body, Some(format!("!{}", rest.trim_end()))),
        None => (line, None),
    };
    let tokens: Vec<&str> = body.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() % 2 != 0 {
        return Err(Error::parse(
            Format::MesaModel,
            line_no,
            "header line must hold `key value` pairs",
        ));
    }
    let entries = tokens
        .chunks(2)
        .map(|pair| (pair[0].to_string(), layout::parse_header_value(pair[1])))
        .collect();
    Ok(HeaderLine { entries, comment })
}

fn parse_footer_line(line: &str, line_no: usize) -> Result<Option<HeaderLine>, Error> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((last, label)) = tokens.split_last() else {
        return Ok(None);
    };
    if tokens.join(" ") == layout::FOOTER_TITLE {
        return Ok(None);
    }
    if label.is_empty() {
        return Err(Error::parse(
            Format::MesaModel,
            line_no,
            format!("footer entry '{last}' has no value"),
        ));
    }
    Ok(Some(HeaderLine::new(
        label.join(" "),
        layout::parse_header_value(last),
    )))
}

fn starts_with_index(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|token| token.parse::<usize>().is_ok())
}

fn strip_index(line: &str) -> &str {
    let trimmed = line.trim_start();
    trimmed
        .find(char::is_whitespace)
        .map_or("", |end| &trimmed[end..])
}
