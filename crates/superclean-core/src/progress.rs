use crate::paths::RelPath;

/// Trait for reporting prune progress.
///
/// The CLI implements it with report lines on stdout and an indicatif spinner.
/// All methods have default no-op implementations.
pub trait PruneReporter {
    /// Called once per candidate file, before it is removed (or instead of
    /// removing it on a dry run).
    fn on_file(&self, _path: &RelPath, _dry_run: bool) {}
    fn on_walk_start(&self) {}
    fn on_walk_progress(&self, _dirs_seen: usize) {}
    fn on_walk_complete(&self, _dirs_seen: usize, _files_seen: usize, _duration_secs: f64) {}
    /// Called once per empty directory, deepest first, before it is removed.
    fn on_dir(&self, _path: &RelPath, _dry_run: bool) {}
}

/// No-op reporter for silent operation.
pub struct SilentReporter;

impl PruneReporter for SilentReporter {}
