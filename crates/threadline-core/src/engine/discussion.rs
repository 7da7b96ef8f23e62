//! Discussion engine
//!
//! Every public operation is one logical unit: the triggering write happens
//! first, then the counter effects owed to the parent comment and the post
//! are applied in order. Counts that can be derived from the store are
//! recounted rather than incremented, so a retried or interleaved operation
//! converges on the right value.

use super::thread::{Pagination, ReconcileReport, ThreadNode, ThreadPage};
use crate::access::{AccessPolicy, AuthorOrAdmin};
use crate::comment::ledger::{self, CounterEffect, LikeOutcome, ReportOutcome};
use crate::comment::{
    Comment, CommentStatus, CommentValidator, ModerationPolicy, Report, ReportReason, Transition,
};
use crate::config::Config;
use crate::error::{Result, ThreadlineError};
use crate::post::PostAggregate;
use crate::store::{CommentStore, CommentTree, NewComment};
use crate::types::{CommentId, PostId, Principal};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Orchestrates comment writes and the counters that depend on them
pub struct Discussion {
    tree: CommentTree,
    store: Arc<dyn CommentStore>,
    posts: Arc<dyn PostAggregate>,
    access: Arc<dyn AccessPolicy>,
    validator: CommentValidator,
    moderation: ModerationPolicy,
    default_edit_reason: String,
    page_size: usize,
}

impl Discussion {
    /// Create an engine over the given store and post aggregate
    pub fn new(store: impl CommentStore + 'static, posts: impl PostAggregate + 'static) -> Self {
        Self::with_shared(Arc::new(store), Arc::new(posts))
    }

    /// Create an engine over shared backends
    pub fn with_shared(store: Arc<dyn CommentStore>, posts: Arc<dyn PostAggregate>) -> Self {
        let config = Config::default();
        Self {
            tree: CommentTree::new(store.clone(), posts.clone()),
            store,
            posts,
            access: Arc::new(AuthorOrAdmin),
            validator: CommentValidator::from_config(&config.discussion),
            moderation: ModerationPolicy::new(config.moderation.report_threshold),
            default_edit_reason: config.discussion.default_edit_reason,
            page_size: config.listing.page_size,
        }
    }

    /// Apply content bounds, report threshold and page size from `config`
    pub fn with_config(mut self, config: &Config) -> Self {
        self.validator = CommentValidator::from_config(&config.discussion);
        self.moderation = ModerationPolicy::new(config.moderation.report_threshold);
        self.default_edit_reason = config.discussion.default_edit_reason.clone();
        self.page_size = config.listing.page_size;
        self
    }

    /// Replace the ownership check
    pub fn with_access_policy(mut self, policy: impl AccessPolicy + 'static) -> Self {
        self.access = Arc::new(policy);
        self
    }

    /// Create a comment or reply
    pub fn post_comment(&self, actor: &Principal, mut input: NewComment) -> Result<Comment> {
        input.content = input.content.trim().to_string();
        self.validator.validate_content(&input.content)?;

        let comment = self.tree.create(&actor.id, &input)?;
        self.apply_effects(ledger::on_create(&comment))?;

        info!(
            "Comment {} created on post {} by {} (depth {})",
            comment.id, comment.post, actor.id, comment.depth
        );
        Ok(comment)
    }

    /// Replace a comment's content, keeping the old text in its history
    pub fn edit_comment(
        &self,
        actor: &Principal,
        id: &CommentId,
        content: &str,
        reason: Option<&str>,
    ) -> Result<Comment> {
        let current = self.store.get(id)?;
        self.authorize(actor, &current)?;
        let content = content.trim();
        self.validator.validate_content(content)?;

        let reason = reason.unwrap_or(&self.default_edit_reason);
        let updated = self.store.update(id, &mut |comment| {
            if !comment.is_active() {
                return Err(ThreadlineError::CommentNotActive(comment.id.clone()));
            }
            comment.record_edit(content, reason);
            Ok(())
        })?;

        debug!("Comment {} edited by {}", id, actor.id);
        Ok(updated)
    }

    /// Soft-delete a comment and release its counters
    pub fn delete_comment(&self, actor: &Principal, id: &CommentId) -> Result<Comment> {
        let current = self.store.get(id)?;
        self.authorize(actor, &current)?;

        let moderation = self.moderation;
        let mut previous = None;
        let updated = self.store.update(id, &mut |comment| {
            match moderation.on_delete(comment.status) {
                Transition::To(status) => {
                    previous = Some(comment.status);
                    comment.set_status(status);
                    Ok(())
                }
                Transition::Stay => Ok(()),
                Transition::Rejected => Err(ThreadlineError::CommentNotActive(comment.id.clone())),
            }
        })?;

        match previous {
            Some(from) => {
                self.apply_effects(ledger::on_deactivate(&updated, from, updated.status))?;
                info!("Comment {} deleted by {}", id, actor.id);
            }
            None => debug!("Comment {} was already deleted", id),
        }
        Ok(updated)
    }

    /// Like a comment, or take the like back
    pub fn toggle_like(&self, actor: &Principal, id: &CommentId) -> Result<LikeOutcome> {
        let moderation = self.moderation;
        let mut outcome = None;
        self.store.update(id, &mut |comment| {
            if !moderation.accepts_engagement(comment.status) {
                return Err(ThreadlineError::CommentNotFound(comment.id.clone()));
            }
            outcome = Some(ledger::toggle_like(comment, &actor.id));
            Ok(())
        })?;

        outcome.ok_or_else(|| ThreadlineError::Storage("like toggle was not applied".to_string()))
    }

    /// File a report; a repeat report from the same user changes nothing
    pub fn report_comment(
        &self,
        actor: &Principal,
        id: &CommentId,
        reason: ReportReason,
        description: Option<String>,
    ) -> Result<ReportOutcome> {
        self.validator
            .validate_report_description(description.as_deref())?;

        let moderation = self.moderation;
        let mut outcome = None;
        let updated = self.store.update(id, &mut |comment| {
            if !moderation.accepts_engagement(comment.status) {
                return Err(ThreadlineError::CommentNotActive(comment.id.clone()));
            }
            if comment.author == actor.id {
                return Err(ThreadlineError::SelfReportForbidden(comment.id.clone()));
            }
            let report = Report {
                reason,
                description: description.clone(),
                reported_at: Utc::now(),
            };
            outcome = Some(ledger::add_report(comment, &actor.id, report, &moderation));
            Ok(())
        })?;

        let outcome = outcome
            .ok_or_else(|| ThreadlineError::Storage("report was not applied".to_string()))?;

        if outcome.auto_reported {
            self.apply_effects(ledger::on_deactivate(
                &updated,
                CommentStatus::Active,
                outcome.status,
            ))?;
            info!(
                "Comment {} hidden after {} reports",
                id, outcome.report_count
            );
        }
        Ok(outcome)
    }

    /// Load a comment by ID, any status
    pub fn get_comment(&self, id: &CommentId) -> Result<Comment> {
        self.store.get(id)
    }

    /// One page of a post's active thread, oldest first
    ///
    /// `page` is 1-based; `limit` of zero falls back to the configured page size.
    pub fn list_thread(&self, post: &PostId, page: usize, limit: usize) -> Result<ThreadPage> {
        self.tree.require_active_post(post)?;

        let limit = if limit == 0 { self.page_size } else { limit };
        let top_level: Vec<Comment> = self
            .store
            .top_level(post)?
            .into_iter()
            .filter(Comment::is_active)
            .collect();

        let pagination = Pagination::new(page.max(1), limit, top_level.len());
        let comments = top_level
            .into_iter()
            .skip(pagination.offset(limit))
            .take(limit)
            .map(|comment| self.build_node(comment))
            .collect::<Result<Vec<_>>>()?;

        Ok(ThreadPage {
            post: post.clone(),
            comments,
            pagination,
        })
    }

    /// Recount every reply total on a post and the post's comment total
    pub fn reconcile_post(&self, post: &PostId) -> Result<ReconcileReport> {
        if self.posts.post_status(post)?.is_none() {
            return Err(ThreadlineError::PostNotFound(post.clone()));
        }

        let comments = self.store.by_post(post)?;
        let mut fixed = 0;
        for comment in &comments {
            let count = self.store.refresh_reply_count(&comment.id)?;
            if count != comment.reply_count {
                debug!(
                    "Reply count of {} corrected from {} to {}",
                    comment.id, comment.reply_count, count
                );
                fixed += 1;
            }
        }

        let live = self.store.count_active_on_post(post)? as u64;
        self.posts.reset_comment_count(post, live)?;

        info!(
            "Reconciled post {}: {} active comments, {} reply counts fixed",
            post, live, fixed
        );
        Ok(ReconcileReport {
            post: post.clone(),
            comment_count: live,
            reply_counts_fixed: fixed,
        })
    }

    fn authorize(&self, actor: &Principal, comment: &Comment) -> Result<()> {
        if self.access.can_modify(actor, comment) {
            Ok(())
        } else {
            Err(ThreadlineError::Forbidden {
                actor: actor.id.to_string(),
                comment: comment.id.clone(),
            })
        }
    }

    fn apply_effects(&self, effects: Vec<CounterEffect>) -> Result<()> {
        for effect in effects {
            match effect {
                CounterEffect::RecomputeReplies { parent } => {
                    let count = self.store.refresh_reply_count(&parent)?;
                    debug!("Reply count of {} is now {}", parent, count);
                }
                CounterEffect::AdjustPostComments { post, delta } => {
                    let count = self.posts.increment_comment_count(&post, delta)?;
                    debug!("Comment count of post {} is now {}", post, count);
                }
            }
        }
        Ok(())
    }

    fn build_node(&self, comment: Comment) -> Result<ThreadNode> {
        let replies = self
            .store
            .children(&comment.id)?
            .into_iter()
            .filter(Comment::is_active)
            .map(|reply| self.build_node(reply))
            .collect::<Result<Vec<_>>>()?;
        Ok(ThreadNode { comment, replies })
    }
}
