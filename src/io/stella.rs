//! STELLA radiation-hydrodynamics snapshots and luminosity logs.
//!
//! A snapshot starts with `#` comment lines: `# key: value [unit]` metadata
//! and a column-header line (the last comment without a colon) whose names
//! are separated by two or more spaces and may carry a `(unit)` suffix. Data rows follow, one per shell,
//! innermost first.

use super::{ColumnTable, Error, Format, numfmt, util};
use indexmap::IndexMap;
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StellaModel {
    pub metadata: IndexMap<String, Quantity>,
    pub data: ColumnTable,
}

pub fn read<R: BufRead>(reader: R) -> Result<StellaModel, Error> {
    let lines = util::collect_lines(reader)?;
    let mut metadata = IndexMap::new();
    let mut names = None;
    let mut data_start = lines.len();

    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        let Some(body) = trimmed.strip_prefix('#') else {
            data_start = idx;
            break;
        };
        let body = body.trim();
        if let Some((key, value)) = body.split_once(':') {
            if let Some(quantity) = parse_quantity(value) {
                metadata.insert(key.trim().to_string(), quantity);
            }
        } else if !body.is_empty() {
            names = Some(parse_column_names(body));
        }
    }

    let names = names.ok_or_else(|| Error::MissingMarker {
        format: Format::StellaModel,
        marker: "# column header".to_string(),
    })?;
    let data = ColumnTable::parse(
        Format::StellaModel,
        names,
        &lines[data_start..],
        data_start + 1,
    )?;
    Ok(StellaModel { metadata, data })
}

fn parse_quantity(text: &str) -> Option<Quantity> {
    let mut tokens = text.split_whitespace();
    let value = numfmt::parse_float(tokens.next()?)?;
    let unit: Vec<&str> = tokens.collect();
    Some(Quantity {
        value,
        unit: (!unit.is_empty()).then(|| unit.join(" ")),
    })
}

fn parse_column_names(body: &str) -> Vec<String> {
    body.split("  ")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            let name = match name.find(" (") {
                Some(cut) if name.ends_with(')') => &name[..cut],
                _ => name,
            };
            name.trim().replace(' ', "_")
        })
        .collect()
}

/// `mesa.lbol_lnuc.txt`: time (days), log10 L_bol and log10 L_nuc.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LuminosityLog {
    pub time: Vec<f64>,
    pub log_lbol: Vec<f64>,
    pub log_lnuc: Vec<f64>,
}

impl LuminosityLog {
    /// L_nuc / L_bol at every logged time.
    pub fn nuclear_ratio(&self) -> Vec<f64> {
        self.log_lnuc
            .iter()
            .zip(&self.log_lbol)
            .map(|(nuc, bol)| 10f64.powf(nuc - bol))
            .collect()
    }
}

/// Reads a luminosity log, skipping its title line.
pub fn read_luminosity<R: BufRead>(reader: R) -> Result<LuminosityLog, Error> {
    let mut log = LuminosityLog::default();
    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        if util::is_blank(&line) {
            continue;
        }
        let values = util::parse_values(&line, Format::StellaLuminosity, idx + 1)?;
        let [time, lbol, lnuc, ..] = values[..] else {
            return Err(Error::parse(
                Format::StellaLuminosity,
                idx + 1,
                "expected time, log L_bol and log L_nuc",
            ));
        };
        log.time.push(time);
        log.log_lbol.push(lbol);
        log.log_lnuc.push(lnuc);
    }
    Ok(log)
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const SNAPSHOT: &str = "\
# Stella model snapshot
# t_max: 2.5 day
# inner_boundary_mass: 2.0e33 g
# zones: 4
# cell_center_m (g)  cell_center_v (cm/s)  avg_density (g/cm^3)  radiation_temperature (K)  tau  h1  he4  na23
3.0e33  1.0e8  1.0e-10  9000.0  5.0e3  0.0  0.9  0.1
4.0e33  2.0e8  1.0e-11  8000.0  2.0e2  0.1  0.8  0.1
5.0e33  1.5e8  1.0e-12  7000.0  1.1  0.2  0.7  0.1
6.0e33  4.0e8  1.0e-13  6000.0  1.0e-2  0.3  0.6  0.1
";
}
