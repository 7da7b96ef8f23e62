//! Reconcile command
//!
//! Recount a post's denormalized totals from the stored comments.

use super::Context;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use threadline_core::types::PostId;

/// Arguments for the reconcile command
#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Post ID
    pub post: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the reconcile command
pub fn execute(ctx: &Context, args: ReconcileArgs) -> Result<()> {
    let discussion = ctx.discussion()?;
    let report = discussion.reconcile_post(&PostId::from(args.post.as_str()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} Post {} has {} active comments",
        "✓".green(),
        report.post.to_string().cyan(),
        report.comment_count
    );
    if report.reply_counts_fixed > 0 {
        println!(
            "{} Corrected {} reply count(s)",
            "⚠".yellow(),
            report.reply_counts_fixed
        );
    }
    Ok(())
}
