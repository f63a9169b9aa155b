use crate::pruner::{PruneOptions, RootPolicy};
pub use config::ConfigError;
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Directory to clean.
    pub root: String,
    /// Version-control metadata directory, relative to `root`.
    pub control_dir: String,
    pub git_program: String,
    pub follow_symlinks: bool,
    pub delete_root: bool,
    /// Refuse to run unless `control_dir` exists under `root`.
    pub require_control_dir: bool,
}

impl AppConfig {
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }

    pub fn prune_options(&self, dry_run: bool) -> PruneOptions {
        PruneOptions {
            exclude_dir: PathBuf::from(&self.control_dir),
            dry_run,
            root_policy: if self.delete_root {
                RootPolicy::DeleteIfEmpty
            } else {
                RootPolicy::Keep
            },
            follow_symlinks: self.follow_symlinks,
        }
    }
}

/// Defaults, then `Superclean.toml` if present, then `SUPERCLEAN_*` variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    build(ConfigFile::with_name("Superclean").required(false))
}

/// Same layering, reading the given file instead of `Superclean.toml`.
pub fn load_configuration_from(path: &Path) -> Result<AppConfig, ConfigError> {
    build(ConfigFile::from(path).required(true))
}

fn build<S>(file: S) -> Result<AppConfig, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let builder = Config::builder()
        .set_default("root", ".")?
        .set_default("control_dir", ".git")?
        .set_default("git_program", "git")?
        .set_default("follow_symlinks", false)?
        .set_default("delete_root", false)?
        .set_default("require_control_dir", true)?
        .add_source(file)
        .add_source(Environment::with_prefix("SUPERCLEAN").try_parsing(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
