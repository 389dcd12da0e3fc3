//! Spinner shown while the emulator starts and its window is polled for.

use std::time::Duration;

use cartkit_lib::LaunchProgress;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

pub(crate) struct LaunchSpinner {
    pb: ProgressBar,
}

impl LaunchSpinner {
    /// When `quiet` is true the spinner is never drawn.
    pub(crate) fn new(quiet: bool) -> Self {
        let pb = ProgressBar::new_spinner();
        if quiet {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        let style = ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("/-\\|");
        pb.set_style(style);
        Self { pb }
    }

    pub(crate) fn update(&self, progress: &LaunchProgress) {
        match progress {
            LaunchProgress::Spawned { pid } => {
                self.pb.enable_steady_tick(Duration::from_millis(100));
                self.pb.set_message(format!("Emulator started (pid {pid})"));
            }
            LaunchProgress::Polling { attempt, total } => {
                self.pb
                    .set_message(format!("Waiting for emulator window ({attempt}/{total})"));
            }
            LaunchProgress::Embedded(_) | LaunchProgress::Detached => self.finish(),
        }
    }

    /// Stop ticking and clear the line.
    pub(crate) fn finish(&self) {
        self.pb.disable_steady_tick();
        self.pb.finish_and_clear();
    }
}
