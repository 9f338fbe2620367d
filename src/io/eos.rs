//! Tabulated equation of state used to derive specific internal energy.
//!
//! Tables are stored in HDF5 with the axes `ye`, `logtemp` (log10 MeV) and
//! `logrho` (log10 g/cm³) and a `logenergy` cube indexed in that order.

use super::{Error, Format};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct EosTable {
    ye: Vec<f64>,
    logtemp: Vec<f64>,
    logrho: Vec<f64>,
    logenergy: Vec<f64>,
}

impl EosTable {
    /// Builds a table from its axes and a row-major `[ye][logtemp][logrho]` cube.
    pub fn new(
        ye: Vec<f64>,
        logtemp: Vec<f64>,
        logrho: Vec<f64>,
        logenergy: Vec<f64>,
    ) -> Result<Self, Error> {
        for (name, axis) in [("ye", &ye), ("logtemp", &logtemp), ("logrho", &logrho)] {
            if axis.len() < 2 {
                return Err(Error::unsupported(
                    Format::EosTable,
                    format!("axis '{name}' needs at least two points"),
                ));
            }
            if axis.windows(2).any(|w| w[1] <= w[0]) {
                return Err(Error::unsupported(
                    Format::EosTable,
                    format!("axis '{name}' must be strictly increasing"),
                ));
            }
        }
        let expected = ye.len() * logtemp.len() * logrho.len();
        if logenergy.len() != expected {
            return Err(Error::unsupported(
                Format::EosTable,
                format!(
                    "logenergy holds {} values but the axes span {expected}",
                    logenergy.len()
                ),
            ));
        }
        Ok(Self {
            ye,
            logtemp,
            logrho,
            logenergy,
        })
    }

    /// Trilinear interpolation of `log10(e)`; `None` outside the table.
    pub fn log_energy(&self, ye: f64, logtemp: f64, logrho: f64) -> Option<f64> {
        let (i, ti) = locate(&self.ye, ye)?;
        let (j, tj) = locate(&self.logtemp, logtemp)?;
        let (k, tk) = locate(&self.logrho, logrho)?;

        let mut acc = 0.0;
        for (di, wi) in [(0, 1.0 - ti), (1, ti)] {
            for (dj, wj) in [(0, 1.0 - tj), (1, tj)] {
                for (dk, wk) in [(0, 1.0 - tk), (1, tk)] {
                    let weight = wi * wj * wk;
                    if weight != 0.0 {
                        acc += weight * self.at(i + di, j + dj, k + dk);
                    }
                }
            }
        }
        Some(acc)
    }

    fn at(&self, i: usize, j: usize, k: usize) -> f64 {
        let nt = self.logtemp.len();
        let nr = self.logrho.len();
        self.logenergy[(i * nt + j) * nr + k]
    }
}

/// Lower grid index and fractional offset of `x`, or `None` when `x` lies
/// outside the axis (NaN included).
fn locate(axis: &[f64], x: f64) -> Option<(usize, f64)> {
    let first = *axis.first()?;
    let last = *axis.last()?;
    if !(x >= first && x <= last) {
        return None;
    }
    let upper = axis.partition_point(|&v| v <= x).min(axis.len() - 1).max(1);
    let lower = upper - 1;
    let t = (x - axis[lower]) / (axis[upper] - axis[lower]);
    Some((lower, t))
}

#[cfg(feature = "hdf5")]
pub fn open(path: &Path) -> Result<EosTable, Error> {
    let file = hdf5::File::open(path)?;
    let ye = file.dataset("ye")?.read_raw::<f64>()?;
    let logtemp = file.dataset("logtemp")?.read_raw::<f64>()?;
    let logrho = file.dataset("logrho")?.read_raw::<f64>()?;
    let logenergy = file.dataset("logenergy")?.read_raw::<f64>()?;
    EosTable::new(ye, logtemp, logrho, logenergy)
}

#[cfg(not(feature = "hdf5"))]
pub fn open(path: &Path) -> Result<EosTable, Error> {
    Err(Error::unsupported(
        Format::EosTable,
        format!(
            "'{}' is an HDF5 table; rebuild with the `hdf5` feature to read it",
            path.display()
        ),
    ))
}
