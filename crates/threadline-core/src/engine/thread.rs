//! Read models for thread listings and reconciliation

use crate::comment::Comment;
use crate::types::PostId;
use serde::{Deserialize, Serialize};

/// A comment with its active replies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadNode {
    pub comment: Comment,
    #[serde(default)]
    pub replies: Vec<ThreadNode>,
}

impl ThreadNode {
    /// Number of comments in this subtree, including the root
    pub fn size(&self) -> usize {
        1 + self.replies.iter().map(ThreadNode::size).sum::<usize>()
    }
}

/// Page position within a thread listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page number
    pub current: usize,
    pub pages: usize,
    /// Active top-level comments on the post
    pub total: usize,
}

impl Pagination {
    pub fn new(current: usize, limit: usize, total: usize) -> Self {
        Self {
            current,
            pages: total.div_ceil(limit.max(1)),
            total,
        }
    }

    /// Offset of the first item on the current page
    pub fn offset(&self, limit: usize) -> usize {
        self.current.saturating_sub(1).saturating_mul(limit)
    }
}

/// One page of top-level comments with nested replies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadPage {
    pub post: PostId,
    pub comments: Vec<ThreadNode>,
    pub pagination: Pagination,
}

/// Outcome of recounting a post's counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub post: PostId,
    /// Active comments on the post, now stored on the post aggregate
    pub comment_count: u64,
    /// Comments whose reply count was wrong and has been rewritten
    pub reply_counts_fixed: usize,
}
