//! Terminal progress reporting for backup operations.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

use eva_toolpath_core::backup::BackupProgress;

/// CLI progress handler using indicatif. Draws to stderr, one bar per operation.
#[derive(Default)]
pub struct CliProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackupProgress for CliProgress {
    fn on_start(&self, operation: &str, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix:>8} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_prefix(operation.to_string());

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_item(&self, name: &str) {
        if let Ok(bar) = self.bar.lock() {
            if let Some(pb) = bar.as_ref() {
                pb.set_message(name.to_string());
                pb.inc(1);
            }
        }
    }

    fn on_finish(&self) {
        if let Ok(mut bar) = self.bar.lock() {
            if let Some(pb) = bar.take() {
                pb.finish_and_clear();
            }
        }
    }
}
