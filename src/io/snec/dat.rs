use crate::io::{Error, Format, util};
use std::io::BufRead;

/// A two-column `time value` series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    pub time: Vec<f64>,
    pub values: Vec<f64>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Reads the first two columns of every non-blank line.
///
/// Lines starting with `#` are comments.
pub fn read<R: BufRead>(reader: R) -> Result<TimeSeries, Error> {
    read_skipping(reader, 0)
}

/// Like [`read`], ignoring the first `skip` lines.
pub fn read_skipping<R: BufRead>(reader: R, skip: usize) -> Result<TimeSeries, Error> {
    let mut series = TimeSeries::default();
    for (idx, line) in reader.lines().enumerate().skip(skip) {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let values = util::parse_values(trimmed, Format::SnecDat, idx + 1)?;
        let [time, value, ..] = values[..] else {
            return Err(Error::parse(
                Format::SnecDat,
                idx + 1,
                "expected at least two columns",
            ));
        };
        series.time.push(time);
        series.values.push(value);
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_two_columns() {
        let series = read(Cursor::new("0.0 1.0e42\n\n86400.0 5.0e41 7\n")).unwrap();
        assert_eq!(series.time, vec![0.0, 86_400.0]);
        assert_eq!(series.values, vec![1.0e42, 5.0e41]);
    }

    #[test]
    fn skips_leading_lines() {
        let series = read_skipping(Cursor::new("time logL\n1 2\n"), 1).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn single_column_is_rejected() {
        let err = read(Cursor::new("1.0\n")).unwrap_err();
        assert!(err.to_string().contains("at least two columns"));
    }
}
