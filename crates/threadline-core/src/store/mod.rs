//! Comment persistence
//!
//! [`CommentStore`] is the storage seam: backends implement a handful of
//! primitive reads and one atomic read-modify-write. [`CommentTree`] layers
//! the structural rules (post/parent resolution, depth) on top of a store.

mod memory;
mod tree;

pub use memory::MemoryCommentStore;
pub use tree::{CommentTree, NewComment};

use crate::comment::{Comment, CommentStatus};
use crate::error::{Result, ThreadlineError};
use crate::types::{CommentId, PostId};
use std::sync::PoisonError;

/// Trait for comment storage implementations
///
/// Every method must be safe to call concurrently. `update` runs `apply`
/// while holding whatever lock makes the read-modify-write atomic; if `apply`
/// returns an error nothing is written.
pub trait CommentStore: Send + Sync {
    /// Persist a new comment
    fn insert(&self, comment: &Comment) -> Result<()>;

    /// Load a comment by ID
    fn get(&self, id: &CommentId) -> Result<Comment>;

    /// Atomically modify a comment and return the stored result
    fn update(
        &self,
        id: &CommentId,
        apply: &mut dyn FnMut(&mut Comment) -> Result<()>,
    ) -> Result<Comment>;

    /// All comments on a post, any status
    fn by_post(&self, post: &PostId) -> Result<Vec<Comment>>;

    /// Direct replies of a comment, any status, oldest first
    fn children(&self, parent: &CommentId) -> Result<Vec<Comment>>;

    /// Top-level comments on a post, any status, oldest first
    fn top_level(&self, post: &PostId) -> Result<Vec<Comment>>;

    /// Overwrite a comment's status
    fn set_status(&self, id: &CommentId, status: CommentStatus) -> Result<Comment> {
        self.update(id, &mut |comment| {
            comment.set_status(status);
            Ok(())
        })
    }

    fn count_active_children(&self, parent: &CommentId) -> Result<usize> {
        Ok(self.children(parent)?.iter().filter(|c| c.is_active()).count())
    }

    fn count_active_top_level(&self, post: &PostId) -> Result<usize> {
        Ok(self.top_level(post)?.iter().filter(|c| c.is_active()).count())
    }

    fn count_active_on_post(&self, post: &PostId) -> Result<usize> {
        Ok(self.by_post(post)?.iter().filter(|c| c.is_active()).count())
    }

    /// Recount a comment's active replies and store the result
    ///
    /// The default implementation counts and writes in two steps; backends
    /// that can hold one lock across both should override it.
    fn refresh_reply_count(&self, parent: &CommentId) -> Result<u32> {
        let count = self.count_active_children(parent)? as u32;
        self.update(parent, &mut |comment| {
            comment.reply_count = count;
            Ok(())
        })?;
        Ok(count)
    }
}

/// Map a poisoned lock to a storage error
pub fn lock_poisoned<T>(_: PoisonError<T>) -> ThreadlineError {
    ThreadlineError::Storage("lock poisoned by a panicked writer".to_string())
}
