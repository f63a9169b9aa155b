mod commands;
mod logging;
mod progress;

use std::io::{self, Write};
use std::path::Path;
use std::process;

use anyhow::Context;
use clap::Parser;
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use progress::CliReporter;
use superclean_core::config::{self, ConfigError};
use superclean_core::{
    check_project_root, AppConfig, CandidateSource, DirectoryPruner, GitIgnored,
};
use tracing::{debug, info};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            exit_with_error(format!("Error loading configuration: {}", err));
        }
    };

    let result = match args.command {
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            Ok(())
        }
        Some(Commands::ListCandidates) => run_list_candidates(&config),
        None => run_clean(&config, &args),
    };

    if let Err(err) = result {
        exit_with_error(format!("{:#}", err));
    }
}

/// Fatal errors always reach stderr, whatever `TRACING_LEVEL` filters out.
fn exit_with_error(message: String) -> ! {
    debug!("Exiting after error: {}", message);
    let _ = write_failure(&mut io::stderr(), &message);
    process::exit(1);
}

fn write_failure(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "error:".red().bold(), message)
}

fn load_config(args: &Cli) -> Result<AppConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => config::load_configuration_from(path)?,
        None => config::load_configuration()?,
    };
    args.apply(&mut config);
    Ok(config)
}

/// Everything that must hold before the first deletion.
fn check_preconditions(config: &AppConfig) -> anyhow::Result<GitIgnored> {
    let root = config.root_path();
    if config.require_control_dir {
        check_project_root(&root, Path::new(&config.control_dir))?;
    }
    let git = GitIgnored::new(&config.git_program);
    git.check_available()?;
    Ok(git)
}

fn run_list_candidates(config: &AppConfig) -> anyhow::Result<()> {
    let git = check_preconditions(config)?;
    let candidates = git
        .candidates(&config.root_path())
        .context("Listing ignored files")?;
    for path in &candidates {
        println!("{}", path.display());
    }
    info!("{} ignored files", candidates.len());
    Ok(())
}

fn run_clean(config: &AppConfig, args: &Cli) -> anyhow::Result<()> {
    let root = config.root_path();
    let git = check_preconditions(config)?;
    let pruner = DirectoryPruner::new(&root, config.prune_options(args.dry_run))?;

    if args.confirm && !args.dry_run {
        let prompt = format!(
            "Delete ignored files and empty directories under '{}'?",
            pruner.root().display()
        );
        if !prompt_confirm(&prompt, Some(false))? {
            info!("Nothing deleted");
            return Ok(());
        }
    }

    let candidates = git.candidates(&root).context("Listing ignored files")?;
    let reporter = CliReporter::new();
    let report = pruner.prune(&candidates, &reporter)?;

    if report.dry_run {
        println!("\n--dry-run specified, so no actual deletes occurred.");
    }
    info!(
        "{} files, {} empty directories{}",
        format!("{}", report.deleted_files.len()).red(),
        format!("{}", report.deleted_dirs.len()).red(),
        if report.dry_run { " would be deleted" } else { " deleted" },
    );

    Ok(())
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(default.unwrap_or(false));
        }

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
