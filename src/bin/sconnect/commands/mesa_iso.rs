use anyhow::{Context as _, Result};
use stellar_connect::convert::mesa_isotopes;

use crate::cli::MesaIsoArgs;
use crate::display::{Context, Progress};

pub fn run(args: MesaIsoArgs, ctx: Context) -> Result<()> {
    let mut progress = Progress::new(ctx.interactive, 1);

    progress.step("Lumping isotopes into SNEC groups");
    let lumped = mesa_isotopes::run(&args.profile, &args.output).with_context(|| {
        format!(
            "Failed to convert {} into {}",
            args.profile.display(),
            args.output.display()
        )
    })?;
    let zones = format!("{} zones, {} species", lumped.zones(), lumped.species.len());
    let output = format!("output: {}", args.output.display());
    progress.complete_step("Wrote SNEC composition", &[&zones, &output]);

    progress.finish();
    Ok(())
}
