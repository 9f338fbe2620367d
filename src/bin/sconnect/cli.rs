use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stellar_connect::convert::snec_grid;

#[derive(Parser)]
#[command(
    name = "sconnect",
    about = "Converters between stellar-evolution and supernova model formats",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Stitch a STIR checkpoint onto its MESA progenitor
    #[command(name = "stir-mesa", visible_alias = "sm")]
    StirMesa(StirMesaArgs),

    /// Lump a MESA profile's isotopes into a SNEC composition file
    #[command(name = "mesa-iso", visible_alias = "mi")]
    MesaIso(MesaIsoArgs),

    /// Write SNEC's normalized grid pattern
    #[command(name = "snec-grid", visible_alias = "sg")]
    SnecGrid(SnecGridArgs),

    /// Turn SNEC light-curve snapshots into TARDIS models
    #[command(name = "snec-tardis", visible_alias = "st")]
    SnecTardis(TardisArgs),

    /// Turn STELLA snapshots into TARDIS models
    #[command(name = "stella-tardis", visible_alias = "lt")]
    StellaTardis(TardisArgs),
}

#[derive(clap::Args)]
pub struct StirMesaArgs {
    /// Campaign configuration (YAML, or TOML by extension)
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Progenitor model name, e.g. s12
    #[arg(value_name = "MODEL")]
    pub model: String,

    /// STIR alpha value as it appears in the checkpoint name
    #[arg(value_name = "ALPHA")]
    pub alpha: String,

    /// Fraction of the checkpoint's outer radius to keep [default: 0.8]
    #[arg(value_name = "PORTION")]
    pub portion: Option<f64>,
}

#[derive(clap::Args)]
pub struct MesaIsoArgs {
    /// MESA profile (.data)
    #[arg(value_name = "PROFILE")]
    pub profile: PathBuf,

    /// SNEC composition file to write
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

#[derive(clap::Args)]
pub struct SnecGridArgs {
    /// Number of grid points
    #[arg(value_name = "IMAX")]
    pub imax: usize,

    /// Output file
    #[arg(value_name = "OUTPUT", default_value = snec_grid::DEFAULT_OUTPUT)]
    pub output: PathBuf,
}

#[derive(clap::Args)]
pub struct TardisArgs {
    /// Run directory of the light-curve code
    #[arg(value_name = "RUN_DIR")]
    pub run_dir: PathBuf,

    /// Directory holding the TARDIS templates
    #[arg(value_name = "TEMPLATE_DIR")]
    pub template_dir: PathBuf,

    /// Output directory [default: RUN_DIR/tardis_configs]
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn snec_grid_output_defaults() {
        let cli = Cli::try_parse_from(["sconnect", "snec-grid", "1000"]).unwrap();
        let Command::SnecGrid(args) = cli.command else {
            panic!("expected snec-grid");
        };
        assert_eq!(args.imax, 1000);
        assert_eq!(args.output, PathBuf::from("sGridPattern.dat"));
    }

    #[test]
    fn stir_mesa_takes_an_optional_portion() {
        let cli = Cli::try_parse_from(["sconnect", "stir-mesa", "c.yml", "s12", "1.25", "0.5"]).unwrap();
        let Command::StirMesa(args) = cli.command else {
            panic!("expected stir-mesa");
        };
        assert_eq!(args.model, "s12");
        assert_eq!(args.alpha, "1.25");
        assert_eq!(args.portion, Some(0.5));
    }

    #[test]
    fn tardis_output_dir_is_optional() {
        let cli = Cli::try_parse_from(["sconnect", "stella-tardis", "run", "templates"]).unwrap();
        let Command::StellaTardis(args) = cli.command else {
            panic!("expected stella-tardis");
        };
        assert!(args.output_dir.is_none());
    }

    #[test]
    fn flags_are_rejected() {
        assert!(Cli::try_parse_from(["sconnect", "mesa-iso", "--profile", "a", "b"]).is_err());
    }
}
