use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Spinner for one pipeline; finished steps stay on screen as check marks.
pub struct Spinner {
    bar: ProgressBar,
    started: Instant,
    step_started: Instant,
}

impl Spinner {
    fn new(total_steps: u8) -> Self {
        let bar = ProgressBar::with_draw_target(Some(u64::from(total_steps)), ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} [{pos}/{len}] {msg}...") {
            bar.set_style(style.tick_chars(TICKS));
        }
        let now = Instant::now();
        Self {
            bar,
            started: now,
            step_started: now,
        }
    }

    fn step(&mut self, description: &str) {
        self.step_started = Instant::now();
        self.bar.inc(1);
        self.bar.set_message(description.to_string());
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn complete_step(&mut self, description: &str, details: &[&str]) {
        let secs = self.step_started.elapsed().as_secs_f64();
        self.bar
            .println(format!("  \x1b[32m✓\x1b[0m {description:<44} {secs:>5.1}s"));
        for detail in details {
            self.bar.println(format!("      \x1b[2m·\x1b[0m {detail}"));
        }
    }

    fn finish(self) {
        self.bar.finish_and_clear();
        let total = format!("Total: {:.2}s", self.started.elapsed().as_secs_f64());
        eprintln!();
        eprintln!("  \x1b[32m✓\x1b[0m Conversion complete {total:>30}");
        eprintln!();
    }
}

/// Step reporter: a spinner on a terminal, nothing otherwise.
pub enum Progress {
    Interactive(Spinner),
    Silent,
}

impl Progress {
    pub fn new(interactive: bool, total_steps: u8) -> Self {
        if interactive {
            Self::Interactive(Spinner::new(total_steps))
        } else {
            Self::Silent
        }
    }

    pub fn step(&mut self, description: &str) {
        if let Self::Interactive(spinner) = self {
            spinner.step(description);
        }
    }

    pub fn complete_step(&mut self, description: &str, details: &[&str]) {
        if let Self::Interactive(spinner) = self {
            spinner.complete_step(description, details);
        }
    }

    pub fn finish(self) {
        if let Self::Interactive(spinner) = self {
            spinner.finish();
        }
    }
}
