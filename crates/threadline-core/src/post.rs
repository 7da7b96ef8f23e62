//! Post aggregate interface
//!
//! Posts live outside the engine. The engine only needs to know whether a post
//! accepts comments and to adjust its denormalized comment total.

use crate::error::{Result, ThreadlineError};
use crate::store::lock_poisoned;
use crate::types::PostId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Post lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Active,
    Closed,
    Hidden,
    Deleted,
}

impl PostStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, PostStatus::Active)
    }

    /// Parse from the lowercase status name
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "active" => Some(PostStatus::Active),
            "closed" => Some(PostStatus::Closed),
            "hidden" => Some(PostStatus::Hidden),
            "deleted" => Some(PostStatus::Deleted),
            _ => None,
        }
    }
}

/// Trait for the external owner of post comment totals
pub trait PostAggregate: Send + Sync {
    /// Status of a post, `None` if it does not exist
    fn post_status(&self, post: &PostId) -> Result<Option<PostStatus>>;

    /// Add `delta` to the post's comment total, flooring at zero; returns the new total
    fn increment_comment_count(&self, post: &PostId, delta: i64) -> Result<u64>;

    /// Overwrite the post's comment total with a recounted value
    fn reset_comment_count(&self, post: &PostId, count: u64) -> Result<()>;
}

/// Minimal post record kept by the bundled aggregates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: PostId,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostRecord {
    pub fn new(id: PostId) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: PostStatus::Active,
            comment_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a signed delta, flooring at zero
    pub fn apply_delta(&mut self, delta: i64) -> u64 {
        self.comment_count = if delta.is_negative() {
            self.comment_count.saturating_sub(delta.unsigned_abs())
        } else {
            self.comment_count.saturating_add(delta as u64)
        };
        self.updated_at = Utc::now();
        self.comment_count
    }
}

/// In-memory post aggregate
#[derive(Debug, Default)]
pub struct MemoryPostAggregate {
    posts: RwLock<HashMap<PostId, PostRecord>>,
}

impl MemoryPostAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an active post; an existing post is left untouched
    pub fn register(&self, post: PostId) -> Result<()> {
        let mut posts = self.posts.write().map_err(lock_poisoned)?;
        posts
            .entry(post.clone())
            .or_insert_with(|| PostRecord::new(post));
        Ok(())
    }

    /// Change a post's status
    pub fn set_status(&self, post: &PostId, status: PostStatus) -> Result<()> {
        let mut posts = self.posts.write().map_err(lock_poisoned)?;
        let record = posts
            .get_mut(post)
            .ok_or_else(|| ThreadlineError::PostNotFound(post.clone()))?;
        record.status = status;
        record.updated_at = Utc::now();
        Ok(())
    }

    /// Current comment total of a post
    pub fn comment_count(&self, post: &PostId) -> Result<u64> {
        let posts = self.posts.read().map_err(lock_poisoned)?;
        posts
            .get(post)
            .map(|p| p.comment_count)
            .ok_or_else(|| ThreadlineError::PostNotFound(post.clone()))
    }
}

impl PostAggregate for MemoryPostAggregate {
    fn post_status(&self, post: &PostId) -> Result<Option<PostStatus>> {
        let posts = self.posts.read().map_err(lock_poisoned)?;
        Ok(posts.get(post).map(|p| p.status))
    }

    fn increment_comment_count(&self, post: &PostId, delta: i64) -> Result<u64> {
        let mut posts = self.posts.write().map_err(lock_poisoned)?;
        let record = posts
            .get_mut(post)
            .ok_or_else(|| ThreadlineError::PostNotFound(post.clone()))?;
        Ok(record.apply_delta(delta))
    }

    fn reset_comment_count(&self, post: &PostId, count: u64) -> Result<()> {
        let mut posts = self.posts.write().map_err(lock_poisoned)?;
        let record = posts
            .get_mut(post)
            .ok_or_else(|| ThreadlineError::PostNotFound(post.clone()))?;
        record.comment_count = count;
        record.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_status() {
        let posts = MemoryPostAggregate::new();
        let id = PostId::from("p1");

        assert_eq!(posts.post_status(&id).unwrap(), None);
        posts.register(id.clone()).unwrap();
        assert_eq!(posts.post_status(&id).unwrap(), Some(PostStatus::Active));

        posts.set_status(&id, PostStatus::Closed).unwrap();
        assert_eq!(posts.post_status(&id).unwrap(), Some(PostStatus::Closed));
    }

    #[test]
    fn test_increment_floors_at_zero() {
        let posts = MemoryPostAggregate::new();
        let id = PostId::from("p1");
        posts.register(id.clone()).unwrap();

        assert_eq!(posts.increment_comment_count(&id, 2).unwrap(), 2);
        assert_eq!(posts.increment_comment_count(&id, -1).unwrap(), 1);
        assert_eq!(posts.increment_comment_count(&id, -5).unwrap(), 0);
    }

    #[test]
    fn test_missing_post() {
        let posts = MemoryPostAggregate::new();
        let id = PostId::from("ghost");
        assert!(matches!(
            posts.increment_comment_count(&id, 1),
            Err(ThreadlineError::PostNotFound(_))
        ));
        assert!(posts.reset_comment_count(&id, 0).is_err());
    }

    #[test]
    fn test_reset() {
        let posts = MemoryPostAggregate::new();
        let id = PostId::from("p1");
        posts.register(id.clone()).unwrap();
        posts.increment_comment_count(&id, 7).unwrap();

        posts.reset_comment_count(&id, 3).unwrap();
        assert_eq!(posts.comment_count(&id).unwrap(), 3);
    }

    #[test]
    fn test_status_names() {
        assert_eq!(PostStatus::from_name("closed"), Some(PostStatus::Closed));
        assert_eq!(PostStatus::from_name("archived"), None);
    }
}
