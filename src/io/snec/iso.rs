use crate::io::{Error, Format, numfmt, util};
use std::io::{BufRead, Write};

/// A SNEC composition profile (`*.iso.dat`).
///
/// The first species is always free neutrons. Zones run from the center
/// outward.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IsoProfile {
    /// `(A, Z)` of every species column.
    pub species: Vec<(u32, u32)>,
    /// Enclosed mass (g).
    pub mass: Vec<f64>,
    /// Radius (cm).
    pub radius: Vec<f64>,
    /// Mass fractions, one vector per species.
    pub fractions: Vec<Vec<f64>>,
}

impl IsoProfile {
    pub fn zones(&self) -> usize {
        self.mass.len()
    }
}

pub fn read<R: BufRead>(reader: R) -> Result<IsoProfile, Error> {
    let lines = util::collect_lines(reader)?;
    if lines.len() < 3 {
        return Err(Error::parse(
            Format::SnecComposition,
            lines.len(),
            "expected a count line, a mass-number line and a charge line",
        ));
    }
    let mass_numbers = parse_numbers(&lines[1], 2)?;
    let atomic_numbers = parse_numbers(&lines[2], 3)?;
    if mass_numbers.len() != atomic_numbers.len() {
        return Err(Error::parse(
            Format::SnecComposition,
            3,
            format!(
                "{} mass numbers but {} atomic numbers",
                mass_numbers.len(),
                atomic_numbers.len()
            ),
        ));
    }

    let species: Vec<(u32, u32)> = mass_numbers.into_iter().zip(atomic_numbers).collect();
    let width = species.len() + 2;
    let mut profile = IsoProfile {
        fractions: vec![Vec::new(); species.len()],
        species,
        ..IsoProfile::default()
    };

    for (idx, line) in lines.iter().enumerate().skip(3) {
        if util::is_blank(line) {
            continue;
        }
        let values = util::parse_values(line, Format::SnecComposition, idx + 1)?;
        if values.len() != width {
            return Err(Error::parse(
                Format::SnecComposition,
                idx + 1,
                format!("expected {width} columns but found {}", values.len()),
            ));
        }
        profile.mass.push(values[0]);
        profile.radius.push(values[1]);
        for (column, value) in profile.fractions.iter_mut().zip(&values[2..]) {
            column.push(*value);
        }
    }
    Ok(profile)
}

pub fn write<W: Write>(mut writer: W, profile: &IsoProfile) -> Result<(), Error> {
    writeln!(writer, "{}\t{}", profile.zones(), profile.species.len())?;
    let mut a_line = String::new();
    let mut z_line = String::new();
    for &(a, z) in &profile.species {
        a_line.push_str(&format!("{:.1}d0 ", a as f64));
        z_line.push_str(&format!("{:.1}d0 ", z as f64));
    }
    writeln!(writer, "{a_line}")?;
    writeln!(writer, "{z_line}")?;

    for zone in 0..profile.zones() {
        let mut row = numfmt::fortran_e15_6(profile.mass[zone]);
        row.push_str(&numfmt::fortran_e15_6(profile.radius[zone]));
        for column in &profile.fractions {
            row.push_str(&numfmt::fortran_e15_6(column[zone]));
        }
        writeln!(writer, "{row}")?;
    }
    Ok(())
}

fn parse_numbers(line: &str, line_no: usize) -> Result<Vec<u32>, Error> {
    util::parse_values(line, Format::SnecComposition, line_no)?
        .into_iter()
        .map(|v| {
            if v >= 0.0 && v.fract() == 0.0 {
                Ok(v as u32)
            } else {
                Err(Error::parse(
                    Format::SnecComposition,
                    line_no,
                    format!("'{v}' is not a whole number"),
                ))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> IsoProfile {
        IsoProfile {
            species: vec![(1, 0), (1, 1), (4, 2)],
            mass: vec![1.99e33, 3.98e33],
            radius: vec![6.96e8, 6.96e10],
            fractions: vec![vec![0.0, 0.0], vec![1e-40, 0.7], vec![1.0, 0.3]],
        }
    }

    #[test]
    fn writes_snec_layout() {
        let mut out = Vec::new();
        write(&mut out, &sample()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2\t3");
        assert_eq!(lines[1], "1.0d0 1.0d0 4.0d0 ");
        assert_eq!(lines[2], "0.0d0 1.0d0 2.0d0 ");
        assert_eq!(
            lines[3],
            "   1.990000E+33   6.960000E+08   0.000000E+00   1.000000E-40   1.000000E+00"
        );
    }

    #[test]
    fn reads_what_it_writes() {
        let mut out = Vec::new();
        write(&mut out, &sample()).unwrap();
        let back = read(Cursor::new(out)).unwrap();
        assert_eq!(back.species, sample().species);
        assert_eq!(back.mass, sample().mass);
        assert_eq!(back.fractions[2], vec![1.0, 0.3]);
    }

    #[test]
    fn rejects_fractional_mass_number() {
        let err = read(Cursor::new("1\t1\n1.5d0\n0.0d0\n")).unwrap_err();
        assert!(err.to_string().contains("not a whole number"));
    }
}
