use std::path::Path;

use anyhow::{Context as _, Result};
use stellar_connect::convert::{
    DEFAULT_OUTPUT_DIR, Export, SnecTardisOptions, StellaTardisOptions, snec_to_tardis,
    stella_to_tardis,
};
use stellar_connect::ConvertError;

use crate::cli::TardisArgs;
use crate::display::{self, Context, Progress};

pub fn run_snec(args: TardisArgs, ctx: Context) -> Result<()> {
    export("SNEC", &args, ctx, |run_dir, templates, out| {
        snec_to_tardis::run(run_dir, templates, out, &SnecTardisOptions::default())
    })
}

pub fn run_stella(args: TardisArgs, ctx: Context) -> Result<()> {
    export("STELLA", &args, ctx, |run_dir, templates, out| {
        stella_to_tardis::run(run_dir, templates, out, &StellaTardisOptions::default())
    })
}

fn export<F>(code: &str, args: &TardisArgs, ctx: Context, convert: F) -> Result<()>
where
    F: FnOnce(&Path, &Path, Option<&Path>) -> Result<Export, ConvertError>,
{
    let mut progress = Progress::new(ctx.interactive, 1);

    progress.step(&format!("Converting {code} snapshots"));
    let export = convert(&args.run_dir, &args.template_dir, args.output_dir.as_deref())
        .with_context(|| format!("Failed to convert {code} run {}", args.run_dir.display()))?;

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.run_dir.join(DEFAULT_OUTPUT_DIR));
    let written = format!("{} models written", export.written.len());
    let skipped = format!("{} snapshots skipped", export.skipped.len());
    let output = format!("output: {}", output_dir.display());
    progress.complete_step("Wrote TARDIS models", &[&written, &skipped, &output]);

    progress.finish();

    if ctx.interactive {
        display::print_export(&export);
    }

    Ok(())
}
