//! Comment indexing for fast lookup

use super::model::Comment;
use crate::types::{CommentId, PostId};
use std::collections::HashMap;

/// Relationship index over comment ids
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    /// Every comment on a post
    by_post: HashMap<PostId, Vec<CommentId>>,
    /// Top-level comments on a post
    top_level: HashMap<PostId, Vec<CommentId>>,
    /// Direct replies of a comment
    by_parent: HashMap<CommentId, Vec<CommentId>>,
}

impl CommentIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a comment to the index
    pub fn add(&mut self, comment: &Comment) {
        self.by_post
            .entry(comment.post.clone())
            .or_default()
            .push(comment.id.clone());

        match &comment.parent {
            Some(parent) => self
                .by_parent
                .entry(parent.clone())
                .or_default()
                .push(comment.id.clone()),
            None => self
                .top_level
                .entry(comment.post.clone())
                .or_default()
                .push(comment.id.clone()),
        }
    }

    /// Get all comment ids on a post
    pub fn get_by_post(&self, post: &PostId) -> Vec<CommentId> {
        self.by_post.get(post).cloned().unwrap_or_default()
    }

    /// Get top-level comment ids on a post
    pub fn get_top_level(&self, post: &PostId) -> Vec<CommentId> {
        self.top_level.get(post).cloned().unwrap_or_default()
    }

    /// Get direct reply ids of a comment
    pub fn get_children(&self, parent: &CommentId) -> Vec<CommentId> {
        self.by_parent.get(parent).cloned().unwrap_or_default()
    }

    /// Iterate direct reply ids without cloning
    pub fn children(&self, parent: &CommentId) -> &[CommentId] {
        self.by_parent.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Clear the entire index
    pub fn clear(&mut self) {
        self.by_post.clear();
        self.top_level.clear();
        self.by_parent.clear();
    }

    /// Rebuild index from a collection of comments
    pub fn rebuild(&mut self, comments: impl IntoIterator<Item = impl std::borrow::Borrow<Comment>>) {
        self.clear();
        for comment in comments {
            self.add(comment.borrow());
        }
    }
}
