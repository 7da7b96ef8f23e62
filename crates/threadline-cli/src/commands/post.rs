//! Post command
//!
//! Register posts and change whether they accept comments.

use super::Context;
use anyhow::{Context as _, Result};
use clap::Subcommand;
use colored::Colorize;
use threadline_core::post::{PostRecord, PostStatus};
use threadline_core::types::PostId;

/// Post subcommands
#[derive(Debug, Subcommand)]
pub enum PostCommand {
    /// Register a new active post
    Register {
        /// Post ID
        id: String,
    },

    /// Change a post's status (active, closed, hidden, deleted)
    Status {
        /// Post ID
        id: String,

        /// New status
        status: String,
    },

    /// Show a post
    Show {
        /// Post ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered posts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the post command
pub fn execute(ctx: &Context, cmd: PostCommand) -> Result<()> {
    let storage = ctx.storage()?;
    let posts = storage.posts();

    match cmd {
        PostCommand::Register { id } => {
            let record = posts.register(&PostId::from(id.as_str()))?;
            println!("{} Post {} registered", "✓".green(), record.id.to_string().cyan());
            Ok(())
        }
        PostCommand::Status { id, status } => {
            let status = PostStatus::from_name(&status).with_context(|| {
                format!(
                    "Unknown post status '{}' (expected active, closed, hidden or deleted)",
                    status
                )
            })?;
            let record = posts.set_status(&PostId::from(id.as_str()), status)?;
            println!(
                "{} Post {} is now {:?}",
                "✓".green(),
                record.id.to_string().cyan(),
                record.status
            );
            Ok(())
        }
        PostCommand::Show { id, json } => {
            let record = posts.get(&PostId::from(id.as_str()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_post(&record);
            }
            Ok(())
        }
        PostCommand::List { json } => {
            let records = posts.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("No posts found.");
            } else {
                println!("{}", "Posts:".bold().underline());
                println!();
                for record in &records {
                    print_post(record);
                }
            }
            Ok(())
        }
    }
}

fn print_post(record: &PostRecord) {
    let status = format!("{:?}", record.status).to_lowercase();
    let status = if record.status.is_active() {
        status.green()
    } else {
        status.yellow()
    };
    println!("  {} [{}]", record.id.to_string().cyan(), status);
    println!("    Comments: {}", record.comment_count);
    println!(
        "    Created: {}",
        record.created_at.format("%Y-%m-%d %H:%M:%S")
    );
}
