use clap::{Parser, Subcommand};
use std::path::PathBuf;
use superclean_core::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "superclean")]
#[command(
    about = "Delete git-ignored files and the empty directories they leave behind",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Project root to clean
    #[arg(short = 'C', long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Control directory that is never scanned or deleted
    #[arg(long, value_name = "DIR")]
    pub exclude: Option<String>,

    /// Descend into symlinked directories instead of treating links as files
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Also remove the root directory if nothing is left in it
    #[arg(long)]
    pub delete_root: bool,

    /// Ask before deleting anything
    #[arg(long)]
    pub confirm: bool,

    /// Read settings from this file instead of Superclean.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print configuration values
    PrintConfig,
    /// Print the ignored files git reports, without deleting anything
    ListCandidates,
}

impl Cli {
    /// Command-line flags take precedence over file and environment settings.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(root) = &self.root {
            config.root = root.to_string_lossy().into_owned();
        }
        if let Some(exclude) = &self.exclude {
            config.control_dir = exclude.clone();
        }
        if self.follow_symlinks {
            config.follow_symlinks = true;
        }
        if self.delete_root {
            config.delete_root = true;
        }
    }
}
