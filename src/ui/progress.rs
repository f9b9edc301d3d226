use crate::diagnostics::Diagnostics;
use crate::output::is_quiet;
use indicatif::ProgressBar;
use std::time::Duration;

/// Spinner shown while a merge runs; hidden when quiet or not on a terminal
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = if is_quiet() || !console::Term::stdout().is_term() {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        pb.set_message(message.to_string());
        if !pb.is_hidden() {
            pb.enable_steady_tick(Duration::from_millis(100));
        }
        Self { pb }
    }

    /// Clear the spinner, run `f`, then redraw it
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.pb.suspend(f)
    }

    pub fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }
}

/// Forwards diagnostics with the spinner cleared, so log lines on stderr
/// never interleave with the spinner frame.
pub struct SpinnerDiagnostics<'a> {
    spinner: &'a Spinner,
    inner: &'a dyn Diagnostics,
}

impl<'a> SpinnerDiagnostics<'a> {
    pub fn new(spinner: &'a Spinner, inner: &'a dyn Diagnostics) -> Self {
        Self { spinner, inner }
    }
}

impl Diagnostics for SpinnerDiagnostics<'_> {
    fn info(&self, message: &str) {
        self.spinner.suspend(|| self.inner.info(message));
    }

    fn warn(&self, message: &str) {
        self.spinner.suspend(|| self.inner.warn(message));
    }

    fn error(&self, message: &str) {
        self.spinner.suspend(|| self.inner.error(message));
    }

    fn debug(&self, message: &str) {
        self.spinner.suspend(|| self.inner.debug(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticLevel, RecordingDiagnostics};

    #[test]
    fn test_spinner_diagnostics_forward() {
        let spinner = Spinner::new("working");
        let recorder = RecordingDiagnostics::new();
        let diag = SpinnerDiagnostics::new(&spinner, &recorder);

        diag.info("loaded map");
        diag.warn("codepoint 0051 missing");
        diag.error("no match on line 3");
        spinner.finish_and_clear();

        assert!(recorder.contains(DiagnosticLevel::Info, "loaded map"));
        assert!(recorder.contains(DiagnosticLevel::Warn, "0051"));
        assert_eq!(recorder.errors().len(), 1);
    }

    #[test]
    fn test_suspend_returns_value() {
        let spinner = Spinner::new("working");
        assert_eq!(spinner.suspend(|| 42), 42);
    }
}
