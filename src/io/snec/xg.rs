use crate::io::{Error, Format, util};
use std::io::BufRead;

/// One `Time` block of an `.xg` file: a profile over the mass grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Seconds since the start of the simulation.
    pub time: f64,
    /// Mass coordinate of each point (g).
    pub mass: Vec<f64>,
    pub values: Vec<f64>,
}

/// Reads every snapshot of an `.xg` file in file order.
///
/// A block starts at a line containing `Time` (its last token is the time)
/// and collects the two-column lines that follow.
pub fn read<R: BufRead>(reader: R) -> Result<Vec<Snapshot>, Error> {
    let mut snapshots: Vec<Snapshot> = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if line.contains("Time") {
            let token = tokens
                .last()
                .ok_or_else(|| Error::parse(Format::SnecXg, line_no, "empty Time line"))?;
            let time = util::parse_value(token, Format::SnecXg, line_no)?;
            snapshots.push(Snapshot {
                time,
                mass: Vec::new(),
                values: Vec::new(),
            });
        } else if tokens.len() == 2 {
            let current = snapshots.last_mut().ok_or_else(|| {
                Error::parse(Format::SnecXg, line_no, "data line before the first Time line")
            })?;
            current
                .mass
                .push(util::parse_value(tokens[0], Format::SnecXg, line_no)?);
            current
                .values
                .push(util::parse_value(tokens[1], Format::SnecXg, line_no)?);
        }
    }
    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\"Time =    0.000000E+00
 1.0E+33  0.0E+00
 2.0E+33  0.0E+00

\"Time =    8.640000E+04
 1.0E+33  1.0E+08
 2.0E+33  2.0E+08

";

    #[test]
    fn splits_blocks_on_time_lines() {
        let snapshots = read(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].time, 0.0);
        assert_eq!(snapshots[1].time, 86_400.0);
        assert_eq!(snapshots[1].mass, vec![1.0e33, 2.0e33]);
        assert_eq!(snapshots[1].values, vec![1.0e8, 2.0e8]);
    }

    #[test]
    fn data_before_time_is_rejected() {
        let err = read(Cursor::new("1.0 2.0\n")).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }
}
