//! In-memory data model shared by every converter.
//!
//! - [`types`] – Elements and nuclides as named in nuclear networks.
//! - [`zone`] – Radial zone tables with typed column access.
//! - [`composition`] – Per-zone mass fractions and the SNEC isotope groups.
//! - [`header`] – Ordered scalar metadata of stellar-model files.
//! - [`constants`] – CGS physical constants.

pub mod composition;
pub mod constants;
pub mod header;
pub mod types;
pub mod zone;
