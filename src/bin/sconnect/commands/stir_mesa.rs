use anyhow::{Context as _, Result, bail};
use stellar_connect::convert::{StirConfig, StirOptions, stir_to_mesa};

use crate::cli::StirMesaArgs;
use crate::display::{self, Context, Progress};

const TOTAL_STEPS: u8 = 2;

pub fn run(args: StirMesaArgs, ctx: Context) -> Result<()> {
    let mut options = StirOptions::default();
    if let Some(portion) = args.portion {
        if !(portion > 0.0 && portion <= 1.0) {
            bail!("PORTION must lie in (0, 1], got {portion}");
        }
        options.stir_portion = portion;
    }

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Loading configuration");
    let config = StirConfig::load(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    progress.complete_step(
        "Loaded configuration",
        &[&format!("velocity column: {}", config.velocity_column())],
    );

    progress.step("Stitching checkpoint onto progenitor");
    let report = stir_to_mesa::run(&config, &args.model, &args.alpha, &options)
        .with_context(|| format!("Failed to convert {} at alpha {}", args.model, args.alpha))?;
    let model_line = format!("model: {}", report.model.display());
    let plot_line = format!("plot data: {}", report.plot.display());
    progress.complete_step("Wrote MESA model", &[&model_line, &plot_line]);

    progress.finish();

    if ctx.interactive {
        display::print_stitch_summary(&report);
    }

    Ok(())
}
