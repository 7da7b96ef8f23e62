//! Comment builder for fluent API

use super::model::{Comment, CommentStatus, Language};
use crate::error::{Result, ThreadlineError};
use crate::types::{CommentId, PostId, UserId, MAX_DEPTH};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};

/// Builder for creating comments with fluent API
pub struct CommentBuilder {
    post: PostId,
    author: UserId,
    content: Option<String>,
    parent: Option<CommentId>,
    depth: u8,
    language: Language,
    is_anonymous: bool,
    mentions: BTreeSet<UserId>,
}

impl CommentBuilder {
    /// Create a new builder for a top-level comment
    pub fn new(post: PostId, author: UserId) -> Self {
        Self {
            post,
            author,
            content: None,
            parent: None,
            depth: 0,
            language: Language::default(),
            is_anonymous: false,
            mentions: BTreeSet::new(),
        }
    }

    /// Set the comment content
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Reply to a resolved parent; depth is derived from it
    pub fn reply_to(mut self, parent: &Comment) -> Self {
        self.parent = Some(parent.id.clone());
        self.depth = parent.depth.saturating_add(1);
        self
    }

    /// Set the language
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Hide the author in listings
    pub fn anonymous(mut self, is_anonymous: bool) -> Self {
        self.is_anonymous = is_anonymous;
        self
    }

    /// Add a mentioned user
    pub fn mention(mut self, user: UserId) -> Self {
        self.mentions.insert(user);
        self
    }

    /// Add multiple mentioned users
    pub fn mentions(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.mentions.extend(users);
        self
    }

    /// Build the comment
    pub fn build(self) -> Result<Comment> {
        let content = self.content.ok_or_else(|| {
            ThreadlineError::Validation("Comment content is required".to_string())
        })?;

        if content.trim().is_empty() {
            return Err(ThreadlineError::Validation(
                "Comment content cannot be empty".to_string(),
            ));
        }

        if self.depth > MAX_DEPTH {
            return Err(ThreadlineError::MaxDepthExceeded {
                parent_depth: self.depth - 1,
                max: MAX_DEPTH,
            });
        }

        let now = Utc::now();

        Ok(Comment {
            id: CommentId::new(),
            post: self.post,
            author: self.author,
            parent: self.parent,
            depth: self.depth,
            content,
            status: CommentStatus::Active,
            language: self.language,
            is_anonymous: self.is_anonymous,
            mentions: self.mentions,
            likes: BTreeMap::new(),
            like_count: 0,
            reports: BTreeMap::new(),
            report_count: 0,
            reply_count: 0,
            is_edited: false,
            last_edited_at: None,
            edit_history: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }
}
