//! In-memory comment store

use super::{lock_poisoned, CommentStore};
use crate::comment::{Comment, CommentIndex};
use crate::error::{Result, ThreadlineError};
use crate::types::{CommentId, PostId};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    comments: HashMap<CommentId, Comment>,
    index: CommentIndex,
}

impl Inner {
    fn collect(&self, ids: &[CommentId]) -> Vec<Comment> {
        let mut comments: Vec<Comment> = ids
            .iter()
            .filter_map(|id| self.comments.get(id))
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        comments
    }
}

/// Comment store backed by a `HashMap` behind one `RwLock`
#[derive(Debug, Default)]
pub struct MemoryCommentStore {
    inner: RwLock<Inner>,
}

impl MemoryCommentStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored comments, any status
    pub fn len(&self) -> Result<usize> {
        Ok(self.inner.read().map_err(lock_poisoned)?.comments.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl CommentStore for MemoryCommentStore {
    fn insert(&self, comment: &Comment) -> Result<()> {
        let mut inner = self.inner.write().map_err(lock_poisoned)?;
        if inner.comments.contains_key(&comment.id) {
            return Err(ThreadlineError::Validation(format!(
                "Comment with ID {} already exists",
                comment.id
            )));
        }
        inner.index.add(comment);
        inner.comments.insert(comment.id.clone(), comment.clone());
        Ok(())
    }

    fn get(&self, id: &CommentId) -> Result<Comment> {
        let inner = self.inner.read().map_err(lock_poisoned)?;
        inner
            .comments
            .get(id)
            .cloned()
            .ok_or_else(|| ThreadlineError::CommentNotFound(id.clone()))
    }

    fn update(
        &self,
        id: &CommentId,
        apply: &mut dyn FnMut(&mut Comment) -> Result<()>,
    ) -> Result<Comment> {
        let mut inner = self.inner.write().map_err(lock_poisoned)?;
        let stored = inner
            .comments
            .get_mut(id)
            .ok_or_else(|| ThreadlineError::CommentNotFound(id.clone()))?;

        // Work on a copy so a failed closure leaves the record untouched.
        let mut draft = stored.clone();
        apply(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }

    fn by_post(&self, post: &PostId) -> Result<Vec<Comment>> {
        let inner = self.inner.read().map_err(lock_poisoned)?;
        Ok(inner.collect(&inner.index.get_by_post(post)))
    }

    fn children(&self, parent: &CommentId) -> Result<Vec<Comment>> {
        let inner = self.inner.read().map_err(lock_poisoned)?;
        Ok(inner.collect(inner.index.children(parent)))
    }

    fn top_level(&self, post: &PostId) -> Result<Vec<Comment>> {
        let inner = self.inner.read().map_err(lock_poisoned)?;
        Ok(inner.collect(&inner.index.get_top_level(post)))
    }

    fn refresh_reply_count(&self, parent: &CommentId) -> Result<u32> {
        let mut inner = self.inner.write().map_err(lock_poisoned)?;
        let count = inner
            .index
            .children(parent)
            .iter()
            .filter_map(|id| inner.comments.get(id))
            .filter(|c| c.is_active())
            .count() as u32;

        let stored = inner
            .comments
            .get_mut(parent)
            .ok_or_else(|| ThreadlineError::CommentNotFound(parent.clone()))?;
        stored.reply_count = count;
        Ok(count)
    }
}
