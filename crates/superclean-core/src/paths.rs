use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A path relative to the scan root, holding only normal components.
///
/// Every key in the file-count map and every reported path goes through this
/// type, so two spellings of the same location (`./a/b`, `a//b`, `a/x/../b`)
/// always compare equal. The root itself is the empty path and displays as `.`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelPath(PathBuf);

impl RelPath {
    pub fn root() -> Self {
        RelPath(PathBuf::new())
    }

    /// Lexically normalize a relative path. Returns `None` for absolute paths
    /// and for paths whose `..` components climb above the root.
    pub fn from_relative(path: &Path) -> Option<Self> {
        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !normalized.pop() {
                        return None;
                    }
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(RelPath(normalized))
    }

    /// Resolve `path` against `root`. Relative paths are taken as relative to
    /// the root; absolute paths must lie under it.
    pub fn under(root: &Path, path: &Path) -> Option<Self> {
        if path.is_absolute() {
            Self::from_relative(path.strip_prefix(root).ok()?)
        } else {
            Self::from_relative(path)
        }
    }

    pub fn is_root(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Number of components; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.0.components().count()
    }

    pub fn parent(&self) -> Option<RelPath> {
        if self.is_root() {
            None
        } else {
            self.0.parent().map(|p| RelPath(p.to_path_buf()))
        }
    }

    /// This path followed by each of its ancestors, ending with the root.
    pub fn ancestors(&self) -> impl Iterator<Item = RelPath> + '_ {
        std::iter::successors(Some(self.clone()), |p| p.parent())
    }

    /// True if `self` is `other` or lies beneath it.
    pub fn starts_with(&self, other: &RelPath) -> bool {
        self.0.starts_with(&other.0)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn to_path(&self, root: &Path) -> PathBuf {
        if self.is_root() {
            root.to_path_buf()
        } else {
            root.join(&self.0)
        }
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        let mut first = true;
        for component in self.0.components() {
            if !first {
                f.write_str("/")?;
            }
            write!(f, "{}", component.as_os_str().to_string_lossy())?;
            first = false;
        }
        Ok(())
    }
}
