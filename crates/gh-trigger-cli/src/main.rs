use anyhow::Result;
use clap::{Parser, Subcommand};
use gh_trigger_config::{load_jobs, AppConfig};
use std::path::PathBuf;

mod commands;
mod process_env;

/// Resolve which jobs a GitHub push concerns
#[derive(Debug, Parser)]
#[command(name = "gh-trigger", version, about)]
struct Cli {
    /// Jobs file (defaults to `jobs_file` from .gh-trigger.toml)
    #[arg(long, short, global = true, env = "GH_TRIGGER_JOBS")]
    jobs: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the repository/branch associations of every job
    Resolve {
        /// Only resolve the job with this name
        #[arg(long)]
        job: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the jobs associated with a push
    Match {
        /// Repository URL, e.g. https://github.com/acme/widgets.git
        url: String,

        /// Pushed ref, e.g. refs/heads/master
        git_ref: String,
    },
}

/// Report the outcome of loading `.env`, returning the level it was logged at
///
/// A missing file is normal; a file that exists but cannot be read or
/// parsed is worth a warning.
fn log_dotenv(result: &dotenvy::Result<PathBuf>) -> log::Level {
    match result {
        Ok(path) => {
            log::debug!("Loaded .env file from: {:?}", path);
            log::Level::Debug
        }
        Err(e) if e.not_found() => {
            log::debug!(".env file not found, using process environment");
            log::Level::Debug
        }
        Err(e) => {
            log::warn!("Failed to load .env file: {}", e);
            log::Level::Warn
        }
    }
}

fn main() -> Result<()> {
    // Load .env before anything reads the process environment
    let dotenv = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    log_dotenv(&dotenv);

    let cli = Cli::parse();
    let config = AppConfig::load();

    let jobs_path = cli
        .jobs
        .unwrap_or_else(|| PathBuf::from(&config.jobs_file));
    let jobs = load_jobs(&jobs_path)?;
    let registry = commands::build_registry(&config);

    let output = match cli.command {
        Command::Resolve { job, json } => {
            commands::resolve(&registry, &jobs, job.as_deref(), json)?
        }
        Command::Match { url, git_ref } => commands::match_push(&registry, &jobs, &url, &git_ref)?,
    };

    print!("{}", output);
    Ok(())
}
