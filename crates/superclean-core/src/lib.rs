pub mod candidates;
pub mod config;
pub mod counts;
pub mod error;
pub mod paths;
pub mod progress;
pub mod pruner;

pub use candidates::{CandidateSource, GitIgnored};
pub use config::AppConfig;
pub use error::Error;
pub use paths::RelPath;
pub use progress::{PruneReporter, SilentReporter};
pub use pruner::{check_project_root, DirectoryPruner, PruneOptions, PruneReport, RootPolicy};
