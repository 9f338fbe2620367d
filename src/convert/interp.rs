//! Small numeric helpers shared by the pipelines.

use std::cmp::Ordering;

/// Piecewise-linear interpolant that clamps to the end values outside its
/// sample range.
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Linear {
    /// Builds the interpolant from samples in any order.
    ///
    /// Returns `None` when the inputs differ in length or are empty.
    pub fn new(x: &[f64], y: &[f64]) -> Option<Self> {
        if x.len() != y.len() || x.is_empty() {
            return None;
        }
        let mut pairs: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        let (x, y) = pairs.into_iter().unzip();
        Some(Self { x, y })
    }

    pub fn at(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        let last = self.x.len() - 1;
        if x <= self.x[0] {
            return self.y[0];
        }
        if x >= self.x[last] {
            return self.y[last];
        }
        // First sample strictly above x; guaranteed in 1..=last here.
        let hi = self.x.partition_point(|&xi| xi <= x);
        let lo = hi - 1;
        let span = self.x[hi] - self.x[lo];
        if span == 0.0 {
            return self.y[hi];
        }
        let t = (x - self.x[lo]) / span;
        self.y[lo] + t * (self.y[hi] - self.y[lo])
    }

    pub fn sample(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.at(x)).collect()
    }
}

/// Moves cell-centered values to the outer cell edges.
///
/// Each edge is the midpoint of its two neighbouring centers; the last edge
/// is extrapolated by half the final spacing.
pub fn shift_to_cell_edge(centers: &[f64]) -> Vec<f64> {
    match centers.len() {
        0 => Vec::new(),
        1 => centers.to_vec(),
        n => {
            let mut edges: Vec<f64> = centers
                .windows(2)
                .map(|pair| pair[0] + 0.5 * (pair[1] - pair[0]))
                .collect();
            edges.push(centers[n - 1] + 0.5 * (centers[n - 1] - centers[n - 2]));
            edges
        }
    }
}

/// Index of the value closest to `target`; the first one on ties.
pub fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .min_by(|a, b| {
            (a.1 - target)
                .abs()
                .partial_cmp(&(b.1 - target).abs())
                .unwrap_or(Ordering::Equal)
        })
        .map(|(idx, _)| idx)
}

/// Running sum starting from the first element.
pub fn cumulative_sum(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    values
        .into_iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}
