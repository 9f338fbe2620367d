use super::error::Error;
use crate::io::{self, snec};
use std::path::Path;

/// Index where the inner and outer progressions meet.
pub const ITRAN: usize = 100;
/// Size of the first cell relative to the transition cell.
pub const RATIO_INNER: f64 = 0.1;
/// Size of the last cell relative to the transition cell.
pub const RATIO_OUTER: f64 = 0.001;

pub const DEFAULT_OUTPUT: &str = "sGridPattern.dat";

/// Normalized SNEC grid of `imax` points from 0 to 1.
///
/// Cell sizes shrink geometrically toward the center and toward the surface
/// from the transition cell at [`ITRAN`].
pub fn pattern(imax: usize) -> Result<Vec<f64>, Error> {
    if imax <= ITRAN + 1 {
        return Err(Error::config(format!(
            "the grid needs more than {} points, got {imax}",
            ITRAN + 1
        )));
    }
    let f1 = RATIO_INNER.powf(1.0 / (ITRAN - 2) as f64);
    let f2 = RATIO_OUTER.powf(1.0 / (imax - ITRAN - 1) as f64);
    let delta_tran = (1.0 - f2) * (1.0 - f1)
        / ((1.0 - f2) * (1.0 - f1.powi((ITRAN - 1) as i32))
            + (1.0 - f1) * (1.0 - f2.powi((imax - ITRAN) as i32)));

    let inner = (0..ITRAN - 1).map(|l| delta_tran * f1.powi((ITRAN - 2 - l) as i32));
    let outer = (0..imax - ITRAN).map(|l| delta_tran * f2.powi(l as i32));

    let mut grid = Vec::with_capacity(imax);
    grid.push(0.0);
    for delta in inner.chain(outer).take(imax - 1) {
        let last = grid[grid.len() - 1];
        grid.push(last + delta);
    }
    Ok(grid)
}

pub fn run(imax: usize, output_path: &Path) -> Result<Vec<f64>, Error> {
    let grid = pattern(imax)?;
    io::write_file(output_path, |buf| snec::grid::write(buf, &grid))?;
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn spans_zero_to_one() {
        let grid = pattern(1000).unwrap();
        assert_eq!(grid.len(), 1000);
        assert_eq!(grid[0], 0.0);
        assert_relative_eq!(grid[999], 1.0, epsilon = 1e-12);
        assert!(grid.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn cell_ratios_follow_the_progressions() {
        let grid = pattern(500).unwrap();
        let cell = |i: usize| grid[i + 1] - grid[i];
        let transition = cell(ITRAN - 1);
        assert_relative_eq!(cell(0) / transition, RATIO_INNER, max_relative = 1e-9);
        assert_relative_eq!(cell(498) / transition, RATIO_OUTER, max_relative = 1e-9);
    }

    #[test]
    fn too_few_points_are_rejected() {
        assert!(matches!(pattern(101), Err(Error::Config(_))));
        assert!(pattern(102).is_ok());
    }

    #[test]
    fn run_writes_one_point_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT);
        run(200, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 200);
        assert_eq!(lines[0], "0.0");
    }
}
