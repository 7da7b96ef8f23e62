//! Config command
//!
//! Manage threadline configuration.

use super::Context;
use anyhow::{Context as _, Result};
use clap::Subcommand;
use colored::Colorize;
use std::fs;
use threadline_core::config::Config;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate the configuration file
    Validate,
}

/// Execute the config command
pub fn execute(ctx: &Context, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(ctx, json),
        ConfigCommand::Init { force } => init_config(ctx, force),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&ctx.config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if ctx.config_path.exists() {
        println!("{}", ctx.config_path.display().to_string().dimmed());
    } else {
        println!("{}", "(built-in defaults)".dimmed());
    }
    println!();
    println!("{}", ctx.config.to_toml()?);
    Ok(())
}

fn init_config(ctx: &Context, force: bool) -> Result<()> {
    let path = &ctx.config_path;
    if path.exists() && !force {
        eprintln!(
            "{} {} already exists. Use '{}' to overwrite.",
            "⚠".yellow(),
            path.display(),
            "threadline config init --force".cyan()
        );
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = format!("# threadline configuration\n\n{}", Config::default().to_toml()?);
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    if !ctx.config_path.exists() {
        eprintln!(
            "{} Configuration not found at {}",
            "✗".red(),
            ctx.config_path.display()
        );
        return Ok(());
    }

    let content = fs::read_to_string(&ctx.config_path)?;
    match Config::from_toml(&content) {
        Ok(_) => println!("{} Configuration is valid", "✓".green()),
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            anyhow::bail!("invalid configuration");
        }
    }
    Ok(())
}
