//! Terminal progress rendering for dubbing runs.
//!
//! Progress goes to stderr so stdout stays clean for scripting; the
//! final report is the only thing printed to stdout.

use crate::languages::Language;
use crate::pipeline::{DubReport, Stage};
use owo_colors::OwoColorize;
use std::path::Path;
use std::time::Duration;

/// Stage-by-stage progress printer.
#[derive(Debug, Clone)]
pub struct Progress {
    quiet: bool,
    verbose: u8,
}

impl Progress {
    pub fn new(quiet: bool, verbose: u8) -> Self {
        Self { quiet, verbose }
    }

    /// Silent progress for tests and embedding.
    pub fn silent() -> Self {
        Self {
            quiet: true,
            verbose: 0,
        }
    }

    pub fn banner(&self, video: &Path, target: &Language) {
        if self.quiet {
            return;
        }
        eprintln!(
            "Dubbing {} into {} ({})",
            video.display(),
            target.name,
            target.code.dimmed()
        );
    }

    pub fn stage_start(&self, stage: Stage) {
        if self.quiet {
            return;
        }
        eprintln!("{} {}...", "→".dimmed(), stage);
    }

    pub fn stage_done(&self, stage: Stage, elapsed: Duration) {
        if self.quiet {
            return;
        }
        eprintln!(
            "{} {} {}",
            "✓".green(),
            stage,
            format!("({})", format_elapsed(elapsed)).dimmed()
        );
    }

    pub fn stage_failed(&self, stage: Stage, error: &crate::error::DubError) {
        if self.quiet {
            return;
        }
        eprintln!("{} {} failed: {}", "✗".red(), stage, error);
    }

    pub fn detail(&self, message: &str) {
        if self.quiet || self.verbose == 0 {
            return;
        }
        eprintln!("  {}", message.dimmed());
    }

    /// Print the final run report to stdout.
    pub fn report(&self, report: &DubReport) {
        if self.quiet {
            return;
        }
        if self.verbose > 0 && !report.transcript.is_empty() {
            println!("{}", report.transcript);
            println!();
        }
        println!("Dubbed video: {}", report.output_video.display());
        println!("Segments dubbed: {}", report.segments);
        for (stage, elapsed) in report.timings.entries() {
            println!("  {:<14} {}", format!("{}:", stage), format_elapsed(*elapsed));
        }
        println!("  {:<14} {}", "total:", format_elapsed(report.timings.total()));
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs >= 60.0 {
        format!("{}m{:02.0}s", (secs / 60.0) as u64, secs % 60.0)
    } else {
        format!("{:.1}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_under_a_minute_is_seconds() {
        assert_eq!(format_elapsed(Duration::from_millis(1540)), "1.5s");
        assert_eq!(format_elapsed(Duration::from_secs(0)), "0.0s");
    }

    #[test]
    fn elapsed_over_a_minute_is_minutes_and_seconds() {
        assert_eq!(format_elapsed(Duration::from_secs(75)), "1m15s");
        assert_eq!(format_elapsed(Duration::from_secs(125)), "2m05s");
    }

    #[test]
    fn silent_progress_prints_nothing() {
        // Smoke test: all methods should be no-ops without panicking.
        let progress = Progress::silent();
        progress.banner(Path::new("in.mp4"), crate::languages::get("hi").unwrap());
        progress.stage_start(Stage::Extraction);
        progress.stage_done(Stage::Extraction, Duration::from_secs(1));
        progress.detail("detail line");
    }
}
