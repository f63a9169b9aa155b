use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use superclean_core::{PruneReporter, RelPath};

/// CLI reporter: one report line per deleted item on stdout, and an
/// indicatif spinner on stderr while the tree is being walked.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }
}

impl PruneReporter for CliReporter {
    fn on_file(&self, path: &RelPath, dry_run: bool) {
        if dry_run {
            println!("Would delete file {}", path);
        } else {
            println!("Deleting file {}", path);
        }
    }

    fn on_walk_start(&self) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message("Scanning directories...");
        pb.enable_steady_tick(Duration::from_millis(80));

        let mut guard = self.bar.lock().unwrap();
        if let Some(old) = guard.replace(pb) {
            old.finish_and_clear();
        }
    }

    fn on_walk_progress(&self, dirs_seen: usize) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            pb.set_message(format!("Scanning... {} directories", dirs_seen));
        }
    }

    fn on_walk_complete(&self, dirs_seen: usize, files_seen: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  {} Scan complete: {} directories, {} files kept in {:.2}s",
            "✓".green(),
            dirs_seen,
            files_seen,
            duration_secs
        );
    }

    fn on_dir(&self, path: &RelPath, dry_run: bool) {
        if dry_run {
            println!("Would delete empty directory {}", path);
        } else {
            println!("Deleting empty directory {}", path);
        }
    }
}
