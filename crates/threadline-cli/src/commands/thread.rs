//! Thread command
//!
//! Print one page of a post's active comments with nested replies.

use super::Context;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use threadline_core::engine::{ThreadNode, ThreadPage};
use threadline_core::types::PostId;

/// Arguments for the thread command
#[derive(Debug, Args)]
pub struct ThreadArgs {
    /// Post ID
    pub post: String,

    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Top-level comments per page (defaults to [listing] page_size)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the thread command
pub fn execute(ctx: &Context, args: ThreadArgs) -> Result<()> {
    let discussion = ctx.discussion()?;
    let page = discussion.list_thread(
        &PostId::from(args.post.as_str()),
        args.page,
        args.limit.unwrap_or(0),
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print_page(&page);
    }
    Ok(())
}

fn print_page(page: &ThreadPage) {
    println!(
        "{} {}",
        "Thread".bold().underline(),
        page.post.to_string().cyan()
    );
    println!(
        "{}",
        format!(
            "page {}/{} · {} top-level comments",
            page.pagination.current,
            page.pagination.pages.max(1),
            page.pagination.total
        )
        .dimmed()
    );
    println!();

    if page.comments.is_empty() {
        println!("No comments yet.");
        return;
    }

    for node in &page.comments {
        print_node(node, 0);
    }
}

fn print_node(node: &ThreadNode, indent: usize) {
    let pad = "  ".repeat(indent);
    let comment = &node.comment;
    let author = if comment.is_anonymous {
        "anonymous".to_string()
    } else {
        comment.author.to_string()
    };
    let edited = if comment.is_edited { " (edited)" } else { "" };

    println!(
        "{}{} {} {}{}",
        pad,
        "•".dimmed(),
        author.bold(),
        comment.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
        edited.dimmed()
    );
    for line in comment.content.lines() {
        println!("{}  {}", pad, line);
    }
    println!(
        "{}  {}",
        pad,
        format!(
            "♥ {}  ↳ {}  id {}",
            comment.like_count, comment.reply_count, comment.id
        )
        .dimmed()
    );

    for reply in &node.replies {
        print_node(reply, indent + 1);
    }
}
