//! Progress Indicator - spinner while waiting on the switch or the model
//!
//! TTY-aware: no spinner unless stdout may be styled (see `display`), but timing
//! still works so callers can log durations either way.

use crate::display;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

/// Progress indicator with spinner and timing
pub struct ProgressIndicator {
    spinner: Option<ProgressBar>,
    start_time: Instant,
    enabled: bool,
}

impl ProgressIndicator {
    /// Start a spinner with the given message.
    pub fn new(message: &str) -> Self {
        let enabled = display::should_use_color();

        let spinner = if enabled {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
                .template("{spinner} {msg}")
            {
                pb.set_style(style);
            }
            pb.set_message(message.to_string());
            pb.enable_steady_tick(Duration::from_millis(80));
            Some(pb)
        } else {
            println!("... {}", message);
            None
        };

        Self {
            spinner,
            start_time: Instant::now(),
            enabled,
        }
    }

    /// Finish with timing display: "✓ <message> (X.Xs)"
    pub fn finish_with_timing(&mut self, message: &str) -> Duration {
        let elapsed = self.start_time.elapsed();
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        if self.enabled {
            println!("✓ {} ({:.1}s)", message, elapsed.as_secs_f64());
        } else {
            println!("{} ({:.1}s)", message, elapsed.as_secs_f64());
        }
        elapsed
    }

    /// Stop without a completion line (used on failure)
    pub fn abandon(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Get elapsed time since creation.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Drop for ProgressIndicator {
    fn drop(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}
