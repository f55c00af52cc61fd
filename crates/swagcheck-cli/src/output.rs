//! Terminal output

use crate::commands::ColorArg;
use console::{style, Term};
use swagcheck::{CaseResult, RunSummary, TestStatus};

/// Writes run progress and the summary to stdout
#[derive(Debug)]
pub struct Output {
    term: Term,
    use_color: bool,
    quiet: bool,
}

impl Output {
    /// Create output for the given color choice
    #[must_use]
    pub fn new(color: ColorArg, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_color = match color {
            ColorArg::Always => true,
            ColorArg::Never => false,
            ColorArg::Auto => term.features().colors_supported(),
        };
        Self {
            term,
            use_color,
            quiet,
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    /// Print a plain line unless quiet
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.line(message);
        }
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };
        self.line("");
        self.line(&styled);
    }

    /// Print one scenario result; failures are printed even when quiet
    pub fn case(&self, result: &CaseResult) {
        if self.quiet && !result.status.is_failure() {
            return;
        }
        let label = format!("{:<20} {}", result.id, result.name);
        let timing = format!("({:.2}s)", result.duration.as_secs_f64());
        let prefix = match (&result.status, self.use_color) {
            (TestStatus::Passed, true) => style("✓").green().bold().to_string(),
            (TestStatus::Skipped, true) => style("-").dim().to_string(),
            (_, true) => style("✗").red().bold().to_string(),
            (status, false) => status.as_str().to_string(),
        };
        self.line(&format!("{prefix} {label} {timing}"));
        if let Some(ref error) = result.error {
            self.line(&format!("    {error}"));
        }
        if let Some(ref shot) = result.screenshot {
            self.line(&format!("    screenshot: {}", shot.display()));
        }
    }

    /// Print the totals line
    pub fn summary(&self, summary: &RunSummary) {
        self.line("");
        let text = summary.to_string();
        let styled = match (self.use_color, summary.all_passed()) {
            (false, _) => text,
            (true, true) => style(text).green().bold().to_string(),
            (true, false) => style(text).red().bold().to_string(),
        };
        self.line(&styled);
    }
}
