//! Spinner rendering of scaffold steps

use forge_ui_scaffold::{Error, ScaffoldObserver, Step};
use indicatif::ProgressBar;
use std::sync::Mutex;

use crate::output;

/// Shows a spinner while a step runs and a check mark once it is done
pub struct SpinnerObserver {
    quiet: bool,
    current: Mutex<Option<ProgressBar>>,
}

impl SpinnerObserver {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            current: Mutex::new(None),
        }
    }

    fn take_spinner(&self) -> Option<ProgressBar> {
        self.current.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl ScaffoldObserver for SpinnerObserver {
    fn on_step_start(&self, step: Step) {
        if self.quiet {
            return;
        }
        let pb = output::spinner(&format!("{}...", step));
        if let Ok(mut guard) = self.current.lock() {
            *guard = Some(pb);
        }
    }

    fn on_step_complete(&self, step: Step) {
        if let Some(pb) = self.take_spinner() {
            pb.finish_and_clear();
        }
        if !self.quiet {
            output::success(step.description());
        }
    }

    fn on_step_skipped(&self, step: Step) {
        if !self.quiet {
            output::info(&format!("{} (skipped)", step));
        }
    }

    fn on_step_failed(&self, _step: Step, _error: &Error) {
        // the error itself is reported once by main
        if let Some(pb) = self.take_spinner() {
            pb.finish_and_clear();
        }
    }
}
