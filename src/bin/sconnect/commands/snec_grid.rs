use anyhow::{Context as _, Result};
use stellar_connect::convert::snec_grid;

use crate::cli::SnecGridArgs;
use crate::display::{Context, Progress};

pub fn run(args: SnecGridArgs, ctx: Context) -> Result<()> {
    let mut progress = Progress::new(ctx.interactive, 1);

    progress.step("Building grid pattern");
    let pattern = snec_grid::run(args.imax, &args.output)
        .with_context(|| format!("Failed to write grid pattern to {}", args.output.display()))?;
    let points = format!("{} points", pattern.len());
    let output = format!("output: {}", args.output.display());
    progress.complete_step("Wrote grid pattern", &[&points, &output]);

    progress.finish();
    Ok(())
}
