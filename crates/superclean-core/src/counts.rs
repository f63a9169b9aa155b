use crate::paths::RelPath;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Per-directory file counts gathered during a single walk.
///
/// Only direct children are recorded while walking; `totals` folds each
/// directory's direct count into all of its ancestors afterwards, so a
/// directory whose subtree holds nothing but empty directories ends up at 0.
#[derive(Debug, Default)]
pub struct FileCounts {
    direct: BTreeMap<RelPath, usize>,
}

impl FileCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a visited directory, even if it turns out to hold no files.
    pub fn record_dir(&mut self, dir: RelPath) {
        self.direct.entry(dir).or_insert(0);
    }

    /// Count one non-directory entry directly inside `parent`.
    pub fn record_file(&mut self, parent: &RelPath) {
        *self.direct.entry(parent.clone()).or_insert(0) += 1;
    }

    pub fn dirs_seen(&self) -> usize {
        self.direct.len()
    }

    pub fn files_seen(&self) -> usize {
        self.direct.values().sum()
    }

    /// Subtree totals: every visited directory and every ancestor of one,
    /// mapped to the number of files anywhere beneath it.
    pub fn totals(&self) -> BTreeMap<RelPath, usize> {
        let mut totals: BTreeMap<RelPath, usize> = BTreeMap::new();
        for (dir, count) in &self.direct {
            for ancestor in dir.ancestors() {
                *totals.entry(ancestor).or_insert(0) += count;
            }
        }
        totals
    }

    /// Directories whose subtree holds no files, deepest first.
    pub fn empty_dirs(&self) -> Vec<RelPath> {
        let mut empty: Vec<RelPath> = self
            .totals()
            .into_iter()
            .filter(|(_, count)| *count == 0)
            .map(|(dir, _)| dir)
            .collect();
        sort_deepest_first(&mut empty);
        empty
    }
}

/// Order by depth descending, so a child always precedes its parent.
///
/// Ties are broken by component-wise path order, not by the displayed string:
/// `a/c` sorts before `a-b/c` because the component `a` is less than `a-b`.
pub fn sort_deepest_first(dirs: &mut [RelPath]) {
    dirs.sort_by(|a, b| {
        Reverse(a.depth())
            .cmp(&Reverse(b.depth()))
            .then_with(|| a.cmp(b))
    });
}
