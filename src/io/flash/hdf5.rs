use super::Checkpoint;
use crate::io::{Error, Format};
use hdf5::types::FixedAscii;
use std::f64::consts::PI;
use std::path::Path;

const LEAF_NODE: i32 = 1;
const UNKNOWN_NAMES: &str = "unknown names";
const REFERENCE_FIELD: &str = "dens";

/// A FLASH checkpoint or plot file on a 1-D spherical grid.
///
/// Only leaf blocks are read; cells are ordered by radius.
pub struct FlashFile {
    file: hdf5::File,
    /// Leaf block indices, innermost block first.
    leaves: Vec<usize>,
    bounds: Vec<(f64, f64)>,
    nxb: usize,
    unknowns: Vec<String>,
}

impl FlashFile {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = hdf5::File::open(path)?;

        let node_type = file.dataset("node type")?.read_raw::<i32>()?;
        let bbox = file.dataset("bounding box")?;
        let shape = bbox.shape();
        let stride = shape.get(1).copied().unwrap_or(1) * 2;
        let corners = bbox.read_raw::<f64>()?;

        let mut leaves: Vec<(usize, (f64, f64))> = node_type
            .iter()
            .enumerate()
            .filter(|&(_, &kind)| kind == LEAF_NODE)
            .map(|(block, _)| (block, (corners[block * stride], corners[block * stride + 1])))
            .collect();
        leaves.sort_by(|a, b| a.1.0.total_cmp(&b.1.0));

        let unknowns = file
            .dataset(UNKNOWN_NAMES)?
            .read_raw::<FixedAscii<4>>()?
            .iter()
            .map(|name| name.as_str().to_string())
            .collect();

        let nxb = file
            .dataset(REFERENCE_FIELD)?
            .shape()
            .last()
            .copied()
            .ok_or_else(|| Error::unsupported(Format::FlashCheckpoint, "field dataset has no dimensions"))?;

        Ok(Self {
            file,
            leaves: leaves.iter().map(|(block, _)| *block).collect(),
            bounds: leaves.iter().map(|(_, bounds)| *bounds).collect(),
            nxb,
            unknowns,
        })
    }

    fn edges(&self) -> Vec<f64> {
        let mut edges = Vec::with_capacity(self.len() + 1);
        for &(lo, hi) in &self.bounds {
            let dx = (hi - lo) / self.nxb as f64;
            edges.extend((0..self.nxb).map(|i| lo + i as f64 * dx));
        }
        if let Some(&(_, hi)) = self.bounds.last() {
            edges.push(hi);
        }
        edges
    }
}

impl Checkpoint for FlashFile {
    fn format(&self) -> Format {
        Format::FlashCheckpoint
    }

    fn len(&self) -> usize {
        self.leaves.len() * self.nxb
    }

    fn radius(&self) -> Result<Vec<f64>, Error> {
        let mut radius = Vec::with_capacity(self.len());
        for &(lo, hi) in &self.bounds {
            let dx = (hi - lo) / self.nxb as f64;
            radius.extend((0..self.nxb).map(|i| lo + (i as f64 + 0.5) * dx));
        }
        Ok(radius)
    }

    fn cell_volume(&self) -> Result<Vec<f64>, Error> {
        let edges = self.edges();
        let mut volume = Vec::with_capacity(self.len());
        for block in 0..self.bounds.len() {
            for i in 0..self.nxb {
                let inner = edges[block * self.nxb + i];
                let outer = if i + 1 < self.nxb {
                    edges[block * self.nxb + i + 1]
                } else {
                    self.bounds[block].1
                };
                volume.push(4.0 / 3.0 * PI * (outer.powi(3) - inner.powi(3)));
            }
        }
        Ok(volume)
    }

    fn field(&self, name: &str) -> Result<Option<Vec<f64>>, Error> {
        let wanted = name.trim();
        let Some(stored) = self.unknowns.iter().find(|u| u.trim() == wanted) else {
            return Ok(None);
        };
        let dataset = self.file.dataset(stored)?;
        let per_block: usize = dataset.shape().iter().skip(1).product();
        let raw = dataset.read_raw::<f64>()?;

        let mut values = Vec::with_capacity(self.len());
        for &block in &self.leaves {
            let start = block * per_block;
            values.extend_from_slice(&raw[start..start + self.nxb]);
        }
        Ok(Some(values))
    }
}
