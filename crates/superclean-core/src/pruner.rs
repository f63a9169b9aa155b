use crate::counts::FileCounts;
use crate::error::Error;
use crate::paths::RelPath;
use crate::progress::PruneReporter;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const WALK_PROGRESS_INTERVAL: usize = 256;

/// Whether the scan root itself may be removed when nothing is left in it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RootPolicy {
    #[default]
    Keep,
    DeleteIfEmpty,
}

#[derive(Debug, Clone)]
pub struct PruneOptions {
    /// Control directory, relative to the root or absolute beneath it.
    /// Never scanned, counted or deleted.
    pub exclude_dir: PathBuf,
    pub dry_run: bool,
    pub root_policy: RootPolicy,
    /// Traverse symlinked directories. Off by default: links are leaf entries.
    pub follow_symlinks: bool,
}

impl Default for PruneOptions {
    fn default() -> Self {
        Self {
            exclude_dir: PathBuf::from(".git"),
            dry_run: false,
            root_policy: RootPolicy::Keep,
            follow_symlinks: false,
        }
    }
}

/// What was deleted, or would have been on a dry run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub deleted_files: Vec<RelPath>,
    /// Deepest first.
    pub deleted_dirs: Vec<RelPath>,
    pub dry_run: bool,
}

impl PruneReport {
    pub fn is_empty(&self) -> bool {
        self.deleted_files.is_empty() && self.deleted_dirs.is_empty()
    }
}

/// Refuse to run anywhere but a project root: `root` must be a directory
/// holding `control_dir`.
pub fn check_project_root(root: &Path, control_dir: &Path) -> Result<(), Error> {
    if !root.is_dir() {
        return Err(Error::InvalidRoot(root.to_path_buf()));
    }
    if !root.join(control_dir).exists() {
        return Err(Error::PreconditionFailed(format!(
            "No '{}' in '{}'. Please run this from the project root directory.",
            control_dir.display(),
            root.display()
        )));
    }
    Ok(())
}

/// Deletes candidate files under a root, then every directory left without
/// files anywhere in its subtree.
pub struct DirectoryPruner {
    root: PathBuf,
    exclude: RelPath,
    options: PruneOptions,
}

impl DirectoryPruner {
    pub fn new(root: impl AsRef<Path>, options: PruneOptions) -> Result<Self, Error> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::InvalidRoot(root.to_path_buf()));
        }
        let root = fs::canonicalize(root)?;

        let exclude = match RelPath::under(&root, &options.exclude_dir) {
            Some(rel) if !rel.is_root() => rel,
            _ => {
                return Err(Error::PreconditionFailed(format!(
                    "Excluded directory '{}' must lie beneath root '{}'",
                    options.exclude_dir.display(),
                    root.display()
                )))
            }
        };

        Ok(Self {
            root,
            exclude,
            options,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exclude_dir(&self) -> &RelPath {
        &self.exclude
    }

    pub fn options(&self) -> &PruneOptions {
        &self.options
    }

    /// Run both phases: delete `candidates`, then delete the directories that
    /// are empty afterwards. Stops at the first failure; deletions already
    /// made are not rolled back.
    pub fn prune(
        &self,
        candidates: &[PathBuf],
        reporter: &dyn PruneReporter,
    ) -> Result<PruneReport, Error> {
        let dry_run = self.options.dry_run;
        info!(
            "Pruning '{}' (excluding '{}', dry run: {})",
            self.root.display(),
            self.exclude,
            dry_run
        );

        let deleted_files = self.delete_files(candidates, reporter)?;

        // A live run has already removed these; a dry run has to pretend it did.
        let removed: HashSet<RelPath> = if dry_run {
            deleted_files.iter().cloned().collect()
        } else {
            HashSet::new()
        };

        let empty_dirs = self.find_empty_dirs(&removed, reporter)?;
        let deleted_dirs = self.delete_dirs(empty_dirs, reporter)?;

        info!(
            "{} {} files and {} empty directories",
            if dry_run { "Would delete" } else { "Deleted" },
            deleted_files.len(),
            deleted_dirs.len()
        );

        Ok(PruneReport {
            deleted_files,
            deleted_dirs,
            dry_run,
        })
    }

    fn delete_files(
        &self,
        candidates: &[PathBuf],
        reporter: &dyn PruneReporter,
    ) -> Result<Vec<RelPath>, Error> {
        let mut seen: HashSet<RelPath> = HashSet::new();
        let mut deleted = Vec::new();

        for candidate in candidates {
            let rel = match RelPath::under(&self.root, candidate) {
                Some(rel) if !rel.is_root() => rel,
                _ => {
                    return Err(Error::PreconditionFailed(format!(
                        "Candidate '{}' is not a path beneath root '{}'",
                        candidate.display(),
                        self.root.display()
                    )))
                }
            };

            if rel.starts_with(&self.exclude) {
                warn!("Skipping '{}' inside excluded directory '{}'", rel, self.exclude);
                continue;
            }
            if !seen.insert(rel.clone()) {
                continue;
            }

            reporter.on_file(&rel, self.options.dry_run);
            if !self.options.dry_run {
                let path = rel.to_path(&self.root);
                fs::remove_file(&path).map_err(|source| Error::DeletionFailed { path, source })?;
                debug!("Deleted file {}", rel);
            }
            deleted.push(rel);
        }

        Ok(deleted)
    }

    fn count_files(
        &self,
        removed: &HashSet<RelPath>,
        reporter: &dyn PruneReporter,
    ) -> Result<(FileCounts, Vec<RelPath>), Error> {
        reporter.on_walk_start();
        let walk_start = Instant::now();

        let mut counts = FileCounts::new();
        let mut linked_dirs: Vec<RelPath> = Vec::new();

        let mut walker = WalkDir::new(&self.root)
            .follow_links(self.options.follow_symlinks)
            .into_iter()
            .filter_entry(|entry| match self.relative(entry.path()) {
                Some(rel) => !rel.starts_with(&self.exclude),
                None => true,
            });

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => match self.dangling_link(&err) {
                    Some(rel) => {
                        if !removed.contains(&rel) && !rel.starts_with(&self.exclude) {
                            debug!("Counting unresolvable link {} as a file", rel);
                            counts.record_file(&rel.parent().unwrap_or_default());
                        }
                        continue;
                    }
                    None => return Err(err.into()),
                },
            };
            let rel = self.relative(entry.path()).ok_or_else(|| {
                Error::PreconditionFailed(format!(
                    "Walked path '{}' is outside root '{}'",
                    entry.path().display(),
                    self.root.display()
                ))
            })?;

            if removed.contains(&rel) {
                // A followed link to a directory is one entry, gone with its candidate.
                if entry.file_type().is_dir() {
                    walker.skip_current_dir();
                }
                continue;
            }

            if entry.file_type().is_dir() {
                if entry.path_is_symlink() {
                    // The link itself stays behind in its parent.
                    counts.record_file(&rel.parent().unwrap_or_default());
                    linked_dirs.push(rel.clone());
                }
                counts.record_dir(rel);
                if counts.dirs_seen() % WALK_PROGRESS_INTERVAL == 0 {
                    reporter.on_walk_progress(counts.dirs_seen());
                }
            } else {
                counts.record_file(&rel.parent().unwrap_or_default());
            }
        }

        let duration = walk_start.elapsed();
        debug!(
            "Walk completed in {:.2}s: {} directories, {} files",
            duration.as_secs_f64(),
            counts.dirs_seen(),
            counts.files_seen()
        );
        reporter.on_walk_complete(counts.dirs_seen(), counts.files_seen(), duration.as_secs_f64());

        Ok((counts, linked_dirs))
    }

    fn find_empty_dirs(
        &self,
        removed: &HashSet<RelPath>,
        reporter: &dyn PruneReporter,
    ) -> Result<Vec<RelPath>, Error> {
        let (counts, linked_dirs) = self.count_files(removed, reporter)?;

        let control_dir_present = self.exclude.to_path(&self.root).symlink_metadata().is_ok();

        let mut empty = counts.empty_dirs();
        empty.retain(|dir| {
            if dir.is_root() && self.options.root_policy == RootPolicy::Keep {
                return false;
            }
            // Ancestors of the control directory still hold it on disk.
            if control_dir_present && self.exclude.starts_with(dir) {
                return false;
            }
            // rmdir cannot remove a link, and must not reach through one.
            !linked_dirs.iter().any(|link| dir.starts_with(link))
        });

        Ok(empty)
    }

    fn delete_dirs(
        &self,
        dirs: Vec<RelPath>,
        reporter: &dyn PruneReporter,
    ) -> Result<Vec<RelPath>, Error> {
        for dir in &dirs {
            reporter.on_dir(dir, self.options.dry_run);
            if self.options.dry_run {
                continue;
            }

            let path = dir.to_path(&self.root);
            let mut entries = match fs::read_dir(&path) {
                Ok(entries) => entries,
                Err(source) => return Err(Error::DeletionFailed { path, source }),
            };
            if entries.next().is_some() {
                return Err(Error::DirectoryNotEmpty { path });
            }
            fs::remove_dir(&path).map_err(|source| Error::DeletionFailed { path, source })?;
            debug!("Deleted empty directory {}", dir);
        }

        Ok(dirs)
    }

    /// A walk error on a path that is itself a symlink whose target cannot be
    /// read (dangling or unreadable). Loops are not included.
    fn dangling_link(&self, err: &walkdir::Error) -> Option<RelPath> {
        if err.loop_ancestor().is_some() {
            return None;
        }
        let path = err.path()?;
        let metadata = fs::symlink_metadata(path).ok()?;
        if !metadata.file_type().is_symlink() {
            return None;
        }
        self.relative(path).filter(|rel| !rel.is_root())
    }

    fn relative(&self, path: &Path) -> Option<RelPath> {
        RelPath::from_relative(path.strip_prefix(&self.root).ok()?)
    }
}
