//! Fixed-column record layout of MESA `.mod` files.
//!
//! The reader and the writer both go through these definitions, so a file
//! written here parses back to the values it was written from.

use crate::io::numfmt;
use crate::model::header::{HeaderLine, HeaderValue};

/// Text that identifies the column-name row.
pub const COLUMN_MARKER: &str = "                lnd";

/// Lines copied verbatim from the top of the file.
pub const PREAMBLE_LINES: usize = 3;

/// `lnd lnT lnR L dq v|u mlt_vc`, followed by the nuclear network.
pub const STRUCTURE_COLUMNS: usize = 7;

pub const FOOTER_TITLE: &str = "previous model";

pub const REQUIRED_HEADER_FIELDS: [&str; 16] = [
    "version_number",
    "M/Msun",
    "model_number",
    "star_age",
    "initial_z",
    "net_name",
    "species",
    "Teff",
    "power_nuc_burn",
    "power_h_burn",
    "power_he_burn",
    "power_z_burn",
    "power_photo",
    "cumulative_energy_error",
    "cumulative_error/total_energy",
    "log_rel_run_E_err",
];

pub const PREVIOUS_SHELLS: &str = "previous n_shells";
pub const PREVIOUS_MASS: &str = "previous mass (grams)";
pub const TIMESTEP: &str = "timestep (seconds)";
pub const DT_NEXT: &str = "dt_next (seconds)";

pub const REQUIRED_FOOTER_FIELDS: [&str; 2] = [TIMESTEP, DT_NEXT];

/// Widths and gaps of one `.mod` record family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    pub index_width: usize,
    pub positive_gap: usize,
    pub negative_gap: usize,
    pub key_width: usize,
    pub float_gap: usize,
    pub int_gap: usize,
    pub int_width: usize,
    pub text_gap: usize,
    pub separator: &'static str,
    /// Entries whose rendered line ends with one extra space.
    pub padded_keys: &'static [&'static str],
}

pub const LAYOUT: RecordLayout = RecordLayout {
    index_width: 5,
    positive_gap: 5,
    negative_gap: 4,
    key_width: 32,
    float_gap: 6,
    int_gap: 6,
    int_width: 26,
    text_gap: 3,
    separator: "  ",
    padded_keys: &[TIMESTEP],
};

impl RecordLayout {
    /// One zone record: 1-based index then every value as a Fortran double.
    pub fn zone_row(&self, index: usize, values: impl IntoIterator<Item = f64>) -> String {
        let mut row = format!("{index:>width$}", width = self.index_width);
        for value in values {
            let gap = if value >= 0.0 {
                self.positive_gap
            } else {
                self.negative_gap
            };
            row.push_str(&" ".repeat(gap));
            row.push_str(&numfmt::fortran_d(value));
        }
        row
    }

    pub fn header_line(&self, line: &HeaderLine) -> String {
        let mut out = String::new();
        for (i, (key, value)) in line.entries.iter().enumerate() {
            if i == 0 {
                out.push_str(&format!("{key:>width$}", width = self.key_width));
            } else {
                out.push_str(self.separator);
                out.push_str(key);
            }
            out.push_str(&self.value(value));
        }
        if let Some(comment) = &line.comment {
            out.push_str(self.separator);
            out.push_str(comment);
        }
        let padded = line
            .entries
            .last()
            .is_some_and(|(key, _)| self.padded_keys.contains(&key.as_str()));
        if padded {
            out.push(' ');
        }
        out
    }

    fn value(&self, value: &HeaderValue) -> String {
        match value {
            HeaderValue::Float(v) => {
                format!("{}{}", " ".repeat(self.float_gap), numfmt::fortran_d(*v))
            }
            HeaderValue::Int(v) => format!(
                "{}{v:>width$}",
                " ".repeat(self.int_gap),
                width = self.int_width
            ),
            HeaderValue::Text(v) => format!("{}{v}", " ".repeat(self.text_gap)),
        }
    }
}

/// Types a header token: integer, Fortran double, or verbatim text.
pub fn parse_header_value(token: &str) -> HeaderValue {
    if let Ok(v) = token.parse::<i64>() {
        return HeaderValue::Int(v);
    }
    match numfmt::parse_float(token) {
        Some(v) => HeaderValue::Float(v),
        None => HeaderValue::Text(token.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_row_aligns_by_sign() {
        let row = LAYOUT.zone_row(12, [1.5, -2.0]);
        assert_eq!(
            row,
            "   12     1.5000000000000000D+00    -2.0000000000000000D+00"
        );
    }

    #[test]
    fn header_float_and_int_lines() {
        let line = HeaderLine::new("star_age", 2.5_f64);
        assert_eq!(
            LAYOUT.header_line(&line),
            "                        star_age      2.5000000000000000D+00"
        );
        let line = HeaderLine::new("num_retries", 0_i64);
        assert_eq!(
            LAYOUT.header_line(&line),
            "                     num_retries                               0"
        );
    }

    #[test]
    fn header_text_uses_short_gap() {
        let line = HeaderLine::new("net_name", "'approx21.net'");
        assert_eq!(
            LAYOUT.header_line(&line),
            "                        net_name   'approx21.net'"
        );
    }

    #[test]
    fn multi_entry_line_and_comment() {
        let line = HeaderLine::new("cumulative_error/total_energy", 1.0_f64)
            .and("log_rel_run_E_err", -2.0_f64);
        assert_eq!(
            LAYOUT.header_line(&line),
            "   cumulative_error/total_energy      1.0000000000000000D+00  log_rel_run_E_err      -2.0000000000000000D+00"
        );
        let line = HeaderLine::new("R_center", 0.0_f64).with_comment("! radius of core (cm).");
        assert!(LAYOUT.header_line(&line).ends_with("D+00  ! radius of core (cm)."));
    }

    #[test]
    fn timestep_line_keeps_trailing_space() {
        let line = HeaderLine::new(TIMESTEP, 1.0_f64);
        assert_eq!(
            LAYOUT.header_line(&line),
            "              timestep (seconds)      1.0000000000000000D+00 "
        );
    }

    #[test]
    fn header_tokens_are_typed() {
        assert_eq!(parse_header_value("1234"), HeaderValue::Int(1234));
        assert_eq!(parse_header_value("1.5D+01"), HeaderValue::Float(15.0));
        assert_eq!(
            parse_header_value("'approx21.net'"),
            HeaderValue::Text("'approx21.net'".into())
        );
    }
}
