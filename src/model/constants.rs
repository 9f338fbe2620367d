//! Physical constants in CGS units.
//!
//! The converters were calibrated against the constants their downstream
//! codes use, so the STIR/MESA pipeline and the SNEC composition tool carry
//! slightly different solar values on purpose.

/// Solar mass used by the STIR → MESA stitching (g).
pub const M_SUN: f64 = 1.989e33;
/// Solar radius used by the STIR → MESA stitching (cm).
pub const R_SUN: f64 = 6.959e10;
/// Newtonian gravitational constant (cm³ g⁻¹ s⁻²).
pub const G: f64 = 6.67430e-8;

/// Solar mass used when writing SNEC composition profiles (g).
pub const SNEC_M_SUN: f64 = 1.99e33;
/// Solar radius used when writing SNEC composition profiles (cm).
pub const SNEC_R_SUN: f64 = 6.96e10;

/// IAU nominal solar mass, used for STELLA mass grids (g).
pub const IAU_M_SUN: f64 = 1.988409870698051e33;

/// Boltzmann constant in MeV per Kelvin.
pub const K_B_MEV: f64 = 8.61733326e-11;

/// Seconds per day.
pub const DAY: f64 = 86_400.0;

/// Placeholder substituted for any requested quantity absent from a file.
pub const FLOOR_VALUE: f64 = 1e-99;
