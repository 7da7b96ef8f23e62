//! Comment command
//!
//! Write, edit, delete, like and report comments.

use super::{ActorArgs, Context};
use anyhow::{Context as _, Result};
use clap::Subcommand;
use colored::Colorize;
use threadline_core::comment::{Comment, Language, ReportReason};
use threadline_core::store::NewComment;
use threadline_core::types::{CommentId, PostId, UserId};

/// Comment subcommands
#[derive(Debug, Subcommand)]
pub enum CommentCommand {
    /// Add a comment or reply to a post
    Add {
        /// Post ID
        post: String,

        /// Comment text
        content: String,

        /// Reply to this comment ID
        #[arg(long, value_name = "COMMENT")]
        reply_to: Option<String>,

        /// Language name (e.g. korean, english, japanese)
        #[arg(long)]
        language: Option<String>,

        /// Hide the author's name in listings
        #[arg(long)]
        anonymous: bool,

        /// Mention a user (repeatable)
        #[arg(long, value_name = "USER")]
        mention: Vec<String>,

        #[command(flatten)]
        actor: ActorArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace a comment's text
    Edit {
        /// Comment ID
        id: String,

        /// New text
        content: String,

        /// Reason recorded in the edit history
        #[arg(long)]
        reason: Option<String>,

        #[command(flatten)]
        actor: ActorArgs,
    },

    /// Delete a comment
    Delete {
        /// Comment ID
        id: String,

        #[command(flatten)]
        actor: ActorArgs,
    },

    /// Like a comment, or remove an existing like
    Like {
        /// Comment ID
        id: String,

        #[command(flatten)]
        actor: ActorArgs,
    },

    /// Report a comment
    Report {
        /// Comment ID
        id: String,

        /// spam, abuse, inappropriate, harassment or other
        #[arg(long, default_value = "other")]
        reason: String,

        /// Free-form details
        #[arg(long)]
        description: Option<String>,

        #[command(flatten)]
        actor: ActorArgs,
    },

    /// Show a comment
    Show {
        /// Comment ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the comment command
pub fn execute(ctx: &Context, cmd: CommentCommand) -> Result<()> {
    let discussion = ctx.discussion()?;

    match cmd {
        CommentCommand::Add {
            post,
            content,
            reply_to,
            language,
            anonymous,
            mention,
            actor,
            json,
        } => {
            let mut input = NewComment::new(PostId::from(post.as_str()), content)
                .anonymous(anonymous);
            if let Some(parent) = reply_to {
                input = input.reply_to(parse_id(&parent)?);
            }
            if let Some(code) = language {
                let language = Language::from_name(&code)
                    .with_context(|| format!("Unknown language '{}'", code))?;
                input = input.language(language);
            }
            for user in mention {
                input = input.mention(UserId::from(user.as_str()));
            }

            let comment = discussion.post_comment(&actor.principal(), input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&comment)?);
            } else {
                println!(
                    "{} Comment {} added (depth {})",
                    "✓".green(),
                    comment.id.to_string().cyan(),
                    comment.depth
                );
            }
            Ok(())
        }
        CommentCommand::Edit {
            id,
            content,
            reason,
            actor,
        } => {
            let comment = discussion.edit_comment(
                &actor.principal(),
                &parse_id(&id)?,
                &content,
                reason.as_deref(),
            )?;
            println!(
                "{} Comment {} edited ({} revisions)",
                "✓".green(),
                comment.id.to_string().cyan(),
                comment.edit_history.len()
            );
            Ok(())
        }
        CommentCommand::Delete { id, actor } => {
            let comment = discussion.delete_comment(&actor.principal(), &parse_id(&id)?)?;
            println!("{} Comment {} deleted", "✓".green(), comment.id.to_string().cyan());
            Ok(())
        }
        CommentCommand::Like { id, actor } => {
            let outcome = discussion.toggle_like(&actor.principal(), &parse_id(&id)?)?;
            let verb = if outcome.is_liked { "Liked" } else { "Unliked" };
            println!("{} {} ({} likes)", "♥".red(), verb, outcome.like_count);
            Ok(())
        }
        CommentCommand::Report {
            id,
            reason,
            description,
            actor,
        } => {
            let reason = ReportReason::from_name(&reason)
                .with_context(|| format!("Unknown report reason '{}'", reason))?;
            let outcome =
                discussion.report_comment(&actor.principal(), &parse_id(&id)?, reason, description)?;

            if !outcome.recorded {
                println!("{} Already reported", "⚠".yellow());
            } else if outcome.auto_reported {
                println!(
                    "{} Report recorded; comment hidden after {} reports",
                    "✓".green(),
                    outcome.report_count
                );
            } else {
                println!(
                    "{} Report recorded ({} so far)",
                    "✓".green(),
                    outcome.report_count
                );
            }
            Ok(())
        }
        CommentCommand::Show { id, json } => {
            let comment = discussion.get_comment(&parse_id(&id)?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&comment)?);
            } else {
                print_comment(&comment);
            }
            Ok(())
        }
    }
}

fn parse_id(id: &str) -> Result<CommentId> {
    CommentId::from_string(id).with_context(|| format!("Invalid comment ID '{}'", id))
}

fn print_comment(comment: &Comment) {
    println!("{}", comment.id.to_string().cyan());
    println!("  Post: {}", comment.post);
    println!("  Author: {}", comment.author);
    if let Some(parent) = &comment.parent {
        println!("  Reply to: {}", parent);
    }
    println!("  Depth: {}", comment.depth);
    println!("  Status: {}", comment.status);
    println!(
        "  Likes: {}  Replies: {}  Reports: {}",
        comment.like_count, comment.reply_count, comment.report_count
    );
    if comment.is_edited {
        println!("  Edited {} time(s)", comment.edit_history.len());
    }
    println!(
        "  Created: {}",
        comment.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!();
    println!("{}", comment.content);
}
