//! Terminal output for the release command.
//!
//! Progress goes to stdout, warnings and errors to stderr. Write failures
//! (e.g. a closed pipe) are ignored; they must never fail a release.

use console::{Term, style};

/// Styled terminal output with verbose/quiet switches.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    stdout: Term,
    stderr: Term,
}

impl OutputManager {
    /// Creates an output manager. `quiet` wins over `verbose`.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            stdout: Term::stdout(),
            stderr: Term::stderr(),
        }
    }

    fn out(&self, line: String) {
        if !self.quiet {
            let _ = self.stdout.write_line(&line);
        }
    }

    /// Stage header.
    pub fn section(&self, title: &str) {
        self.out(format!("\n{}", style(title).bold().cyan()));
    }

    /// Progress line.
    pub fn progress(&self, message: &str) {
        self.out(format!("{} {}", style("→").cyan(), message));
    }

    /// Success line.
    pub fn success(&self, message: &str) {
        self.out(format!("{} {}", style("✓").green().bold(), message));
    }

    /// Indented detail line.
    pub fn indent(&self, message: &str) {
        self.out(format!("  {message}"));
    }

    /// Only shown in verbose mode.
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            self.out(format!("  {}", style(message).dim()));
        }
    }

    /// Warning on stderr, suppressed in quiet mode.
    pub fn warn(&self, message: &str) {
        if !self.quiet {
            let _ = self
                .stderr
                .write_line(&format!("{} {}", style("⚠").yellow().bold(), message));
        }
    }

    /// Error on stderr, always shown.
    pub fn error(&self, message: &str) {
        let _ = self
            .stderr
            .write_line(&format!("{} {}", style("✗").red().bold(), message));
    }
}
