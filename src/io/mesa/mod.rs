//! MESA stellar models (`.mod`) and profiles (`.data`).

pub mod layout;
pub mod model;
pub mod profile;

pub use model::{MesaModel, read as read_model, write as write_model};
pub use profile::{MesaProfile, read as read_profile};
