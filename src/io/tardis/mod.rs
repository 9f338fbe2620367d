//! TARDIS inputs: CSVY density/abundance models and YAML run configurations,
//! both derived from user-supplied templates.

pub mod config;
pub mod csvy;

pub use config::ConfigOverrides;
pub use csvy::ShellTable;

/// Configuration template used for SNEC runs.
pub const CONFIG_TEMPLATE: &str = "tardis_template_config_SESN.yml";
/// Configuration template used for STELLA runs.
pub const EXAMPLE_CONFIG_TEMPLATE: &str = "tardis_example_config_SESN.yml";
pub const CSVY_TEMPLATE: &str = "tardis_example_csvy.csvy";
