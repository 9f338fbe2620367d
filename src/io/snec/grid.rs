use crate::io::{Error, numfmt};
use std::io::Write;

/// Writes one grid coordinate per line in shortest round-trip notation.
pub fn write<W: Write>(mut writer: W, pattern: &[f64]) -> Result<(), Error> {
    for point in pattern {
        writeln!(writer, "{}", numfmt::python_repr(*point))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_point_per_line() {
        let mut out = Vec::new();
        write(&mut out, &[0.0, 2.5e-5, 0.5, 1.0]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0.0\n2.5e-05\n0.5\n1.0\n");
    }
}
