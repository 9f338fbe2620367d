use std::io::{self, Write};
use std::ops::Range;

use stellar_connect::convert::Export;
use stellar_connect::convert::stir_to_mesa::StirReport;
use stellar_connect::model::constants::M_SUN;

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_stitch_summary(report: &StirReport) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    let stitched = &report.stitched;

    let cut = stitched
        .cut
        .map_or_else(|| "none".to_string(), |zone| zone.to_string());
    let rows = vec![
        ("Stitched Zones", stitched.zones.len().to_string()),
        ("Retained Zones", stitched.retained.len().to_string()),
        ("Domain End", stitched.domain_end.to_string()),
        ("Mass Cut Zone", cut),
        ("Core Mass (M☉)", format!("{:.4}", stitched.core_mass)),
        ("Core Radius (cm)", format!("{:.4e}", stitched.core_radius)),
        ("Total Mass (M☉)", format!("{:.4}", stitched.total_mass / M_SUN)),
        ("Energy (erg)", format!("{:.4e}", stitched.total_energy)),
    ];
    print_kv_table(&mut out, "Stitch Summary", &rows);

    let regions = &report.regions;
    let rows = vec![
        ("Core", span(&regions.core)),
        ("Simulation", span(&regions.simulation)),
        ("Progenitor", span(&regions.progenitor)),
        ("Zoom Window", span(&regions.zoom)),
    ];
    print_kv_table(&mut out, "Plot Regions", &rows);
}

pub fn print_export(export: &Export) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    if !export.written.is_empty() {
        let rows: Vec<_> = export
            .written
            .iter()
            .map(|w| {
                let file = w
                    .config
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (w.label.as_str(), w.shells.to_string(), file)
            })
            .collect();
        print_written_table(&mut out, &rows);
    }

    if !export.skipped.is_empty() {
        let rows: Vec<_> = export
            .skipped
            .iter()
            .map(|(label, reason)| (label.as_str(), reason.clone()))
            .collect();
        print_kv_table(&mut out, "Skipped Snapshots", &rows);
    }
}

fn span(range: &Range<usize>) -> String {
    if range.is_empty() {
        "-".to_string()
    } else {
        format!("{}..{} ({})", range.start, range.end, range.len())
    }
}

fn print_written_table(out: &mut impl Write, rows: &[(&str, String, String)]) {
    let label_w = 12usize;
    let shells_w = 6usize;
    let file_w = SAFE_TABLE_WIDTH.saturating_sub(label_w + shells_w + 10);

    let _ = writeln!(out, "{}┌─ TARDIS Models ─┐", INDENT);
    let _ = writeln!(
        out,
        "{}┌{}┬{}┬{}┐",
        INDENT,
        "─".repeat(label_w + 2),
        "─".repeat(shells_w + 2),
        "─".repeat(file_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<label_w$} │ {:>shells_w$} │ {:<file_w$} │",
        INDENT, "Snapshot", "Shells", "Config"
    );
    let _ = writeln!(
        out,
        "{}├{}┼{}┼{}┤",
        INDENT,
        "─".repeat(label_w + 2),
        "─".repeat(shells_w + 2),
        "─".repeat(file_w + 2)
    );
    for (label, shells, file) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<label_w$} │ {:>shells_w$} │ {:<file_w$} │",
            INDENT,
            truncate(label, label_w),
            shells,
            truncate(file, file_w)
        );
    }
    let _ = writeln!(
        out,
        "{}└{}┴{}┴{}┘",
        INDENT,
        "─".repeat(label_w + 2),
        "─".repeat(shells_w + 2),
        "─".repeat(file_w + 2)
    );
    let _ = writeln!(out);
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 18usize;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + 7);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{}┬{}┐",
        INDENT,
        "─".repeat(key_w + 2),
        "─".repeat(val_w + 2)
    );
    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w)
        );
    }
    let _ = writeln!(
        out,
        "{}└{}┴{}┘",
        INDENT,
        "─".repeat(key_w + 2),
        "─".repeat(val_w + 2)
    );
    let _ = writeln!(out);
}
