//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod comment;
pub mod config;
pub mod post;
pub mod reconcile;
pub mod thread;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use threadline_core::config::Config;
use threadline_core::engine::Discussion;
use threadline_core::types::Principal;
use threadline_storage::FileSystemStorage;
use tracing::debug;

/// Project-local configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = ".threadline/config.toml";

/// threadline - threaded discussions with likes, reports and moderation
#[derive(Debug, Parser)]
#[command(name = "threadline")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory (overrides [storage] data_dir)
    #[arg(long, global = true, env = "THREADLINE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage posts
    #[command(subcommand)]
    Post(post::PostCommand),

    /// Write, like and report comments
    #[command(subcommand)]
    Comment(comment::CommentCommand),

    /// Show a post's comment thread
    Thread(thread::ThreadArgs),

    /// Recount a post's comment and reply totals
    Reconcile(reconcile::ReconcileArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Who is performing a write
#[derive(Debug, Clone, Args)]
pub struct ActorArgs {
    /// Acting user ID
    #[arg(long = "as", value_name = "USER")]
    pub user: String,

    /// Act with admin privileges
    #[arg(long)]
    pub admin: bool,
}

impl ActorArgs {
    pub fn principal(&self) -> Principal {
        if self.admin {
            Principal::admin(self.user.clone())
        } else {
            Principal::user(self.user.clone())
        }
    }
}

/// Resolved configuration and data location shared by every command
pub struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Context {
    fn resolve(config_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<Self> {
        let explicit = config_path.is_some();
        let config_path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let config = if config_path.exists() {
            Config::load(&config_path)
                .with_context(|| format!("Failed to load config from {}", config_path.display()))?
        } else if explicit {
            anyhow::bail!("Config file not found: {}", config_path.display());
        } else {
            Config::default()
        };

        let data_dir = data_dir.unwrap_or_else(|| config.storage.data_dir.clone());
        debug!("Using data directory {:?}", data_dir);

        Ok(Self {
            config,
            config_path,
            data_dir,
        })
    }

    pub fn storage(&self) -> Result<FileSystemStorage> {
        FileSystemStorage::open(&self.data_dir).with_context(|| {
            format!("Failed to open data directory {}", self.data_dir.display())
        })
    }

    pub fn discussion(&self) -> Result<Discussion> {
        Ok(self.storage()?.discussion(&self.config))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let ctx = Context::resolve(cli.config, cli.data_dir)?;

    // Dispatch to command handler
    match cli.command {
        Commands::Post(cmd) => post::execute(&ctx, cmd),
        Commands::Comment(cmd) => comment::execute(&ctx, cmd),
        Commands::Thread(args) => thread::execute(&ctx, args),
        Commands::Reconcile(args) => reconcile::execute(&ctx, args),
        Commands::Config(cmd) => config::execute(&ctx, cmd),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_actor_flags() {
        let cli = Cli::try_parse_from([
            "threadline", "comment", "delete", "abc", "--as", "root", "--admin",
        ])
        .unwrap();
        match cli.command {
            Commands::Comment(comment::CommentCommand::Delete { actor, .. }) => {
                assert!(actor.principal().is_admin());
                assert_eq!(actor.principal().id.as_str(), "root");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_write_requires_actor() {
        let result = Cli::try_parse_from(["threadline", "comment", "like", "abc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let temp = TempDir::new().unwrap();
        let result = Context::resolve(Some(temp.path().join("nope.toml")), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_data_dir_override() {
        let temp = TempDir::new().unwrap();
        let ctx = Context::resolve(None, Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(ctx.data_dir(), temp.path());
    }
}
