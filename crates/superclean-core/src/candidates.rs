use crate::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Supplies the files a prune run should delete.
pub trait CandidateSource {
    fn candidates(&self, root: &Path) -> Result<Vec<PathBuf>, Error>;
}

/// A fixed list, used as-is.
impl CandidateSource for Vec<PathBuf> {
    fn candidates(&self, _root: &Path) -> Result<Vec<PathBuf>, Error> {
        Ok(self.clone())
    }
}

/// Files git reports as both untracked and ignored.
#[derive(Debug, Clone)]
pub struct GitIgnored {
    program: String,
}

impl GitIgnored {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Confirm the git binary can be started at all.
    pub fn check_available(&self) -> Result<(), Error> {
        match Command::new(&self.program).arg("--version").output() {
            Ok(output) if output.status.success() => Ok(()),
            Ok(output) => Err(Error::PreconditionFailed(format!(
                "'{} --version' exited with {}",
                self.program, output.status
            ))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(Error::PreconditionFailed(
                format!("Cannot find {}. Is it on the command path?", self.program),
            )),
            Err(err) => Err(err.into()),
        }
    }
}

impl Default for GitIgnored {
    fn default() -> Self {
        Self::new("git")
    }
}

impl CandidateSource for GitIgnored {
    fn candidates(&self, root: &Path) -> Result<Vec<PathBuf>, Error> {
        let output = Command::new(&self.program)
            // Unquoted output, so non-ASCII names come back as real paths.
            .args(["-c", "core.quotePath=false"])
            .args(["ls-files", "--others", "--ignored", "--exclude-standard"])
            .current_dir(root)
            .output()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => Error::PreconditionFailed(format!(
                    "Cannot find {}. Is it on the command path?",
                    self.program
                )),
                _ => Error::Io(err),
            })?;

        if !output.status.success() {
            return Err(Error::CandidateListing(format!(
                "{} returned an error ({}): {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let files = parse_listing(&String::from_utf8_lossy(&output.stdout));
        debug!("{} listed {} ignored files", self.program, files.len());
        Ok(files)
    }
}

/// Split newline-delimited tool output into paths, dropping blank lines.
pub fn parse_listing(listing: &str) -> Vec<PathBuf> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}
