//! Sources for STIR simulation checkpoints.
//!
//! A checkpoint is a 1-D spherical grid of cells, innermost first, carrying
//! named per-cell fields. FLASH HDF5 files are read when the `hdf5` feature
//! is enabled; plain-text column dumps are always available.

use super::{Error, Format};
use std::io::Read;
use std::path::Path;

pub mod dump;
#[cfg(feature = "hdf5")]
pub mod hdf5;

pub use dump::ColumnDump;

/// Signature that opens every HDF5 file.
pub const HDF5_MAGIC: [u8; 8] = *b"\x89HDF\r\n\x1a\n";

/// Read access to a simulation checkpoint.
pub trait Checkpoint {
    fn format(&self) -> Format;

    /// Number of cells.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell-centered radius (cm).
    fn radius(&self) -> Result<Vec<f64>, Error>;

    /// Cell volume (cm³).
    fn cell_volume(&self) -> Result<Vec<f64>, Error>;

    /// Named per-cell field, `Ok(None)` when the checkpoint does not carry it.
    fn field(&self, name: &str) -> Result<Option<Vec<f64>>, Error>;

    fn require(&self, name: &str) -> Result<Vec<f64>, Error> {
        self.field(name)?
            .ok_or_else(|| Error::missing_column(self.format(), name))
    }
}

/// Whether the file at `path` starts with the HDF5 signature.
pub fn is_hdf5(path: &Path) -> Result<bool, Error> {
    let mut magic = Vec::with_capacity(HDF5_MAGIC.len());
    std::fs::File::open(path)?
        .take(HDF5_MAGIC.len() as u64)
        .read_to_end(&mut magic)?;
    Ok(magic == HDF5_MAGIC)
}

/// Opens a checkpoint, choosing the reader from the file's leading bytes.
pub fn open(path: &Path) -> Result<Box<dyn Checkpoint>, Error> {
    if is_hdf5(path)? {
        open_hdf5(path)
    } else {
        let dump = dump::read(super::open(path)?)?;
        Ok(Box::new(dump))
    }
}

#[cfg(feature = "hdf5")]
fn open_hdf5(path: &Path) -> Result<Box<dyn Checkpoint>, Error> {
    Ok(Box::new(hdf5::FlashFile::open(path)?))
}

#[cfg(not(feature = "hdf5"))]
fn open_hdf5(path: &Path) -> Result<Box<dyn Checkpoint>, Error> {
    Err(Error::unsupported(
        Format::FlashCheckpoint,
        format!(
            "'{}' is an HDF5 checkpoint; rebuild with the `hdf5` feature to read it",
            path.display()
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_hdf5_signature() {
        let dir = tempfile::tempdir().unwrap();
        let hdf = dir.path().join("chk.h5");
        let mut bytes = HDF5_MAGIC.to_vec();
        bytes.extend_from_slice(&[0; 16]);
        std::fs::write(&hdf, bytes).unwrap();
        let text = dir.path().join("dump.txt");
        std::fs::write(&text, "r cell_volume\n1 1\n").unwrap();
        let short = dir.path().join("short");
        std::fs::write(&short, b"\x89H").unwrap();

        assert!(is_hdf5(&hdf).unwrap());
        assert!(!is_hdf5(&text).unwrap());
        assert!(!is_hdf5(&short).unwrap());
    }

    #[test]
    fn opens_text_dump_through_sniffing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.txt");
        std::fs::write(&path, "r cell_volume dens\n1 2 3\n4 5 6\n").unwrap();
        let checkpoint = open(&path).unwrap();
        assert_eq!(checkpoint.format(), Format::ColumnDump);
        assert_eq!(checkpoint.len(), 2);
        assert_eq!(checkpoint.require("dens").unwrap(), vec![3.0, 6.0]);
    }

    #[cfg(not(feature = "hdf5"))]
    #[test]
    fn hdf5_without_feature_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chk.h5");
        std::fs::write(&path, HDF5_MAGIC).unwrap();
        let err = open(&path).err().unwrap();
        assert!(matches!(err, Error::UnsupportedSource { .. }));
    }
}
