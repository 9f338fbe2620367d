use super::{Error, Format, numfmt};
use std::io::BufRead;

pub(crate) fn collect_lines<R: BufRead>(reader: R) -> Result<Vec<String>, Error> {
    reader
        .lines()
        .map(|line| line.map_err(|e| Error::Io { source: e }))
        .collect()
}

pub(crate) fn parse_value(token: &str, format: Format, line: usize) -> Result<f64, Error> {
    numfmt::parse_float(token)
        .or_else(|| non_finite(token))
        .ok_or_else(|| Error::parse(format, line, format!("invalid number '{token}'")))
}

pub(crate) fn parse_values(text: &str, format: Format, line: usize) -> Result<Vec<f64>, Error> {
    text.split_whitespace()
        .map(|token| parse_value(token, format, line))
        .collect()
}

fn non_finite(token: &str) -> Option<f64> {
    match token.to_ascii_lowercase().as_str() {
        "nan" => Some(f64::NAN),
        "inf" | "infinity" => Some(f64::INFINITY),
        "-inf" | "-infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
