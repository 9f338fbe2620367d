mod mesa_iso;
mod snec_grid;
mod stir_mesa;
mod tardis;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::StirMesa(args) => stir_mesa::run(args, ctx),
        Command::MesaIso(args) => mesa_iso::run(args, ctx),
        Command::SnecGrid(args) => snec_grid::run(args, ctx),
        Command::SnecTardis(args) => tardis::run_snec(args, ctx),
        Command::StellaTardis(args) => tardis::run_stella(args, ctx),
    }
}
