//! Structural rules for creating comments

use super::CommentStore;
use crate::comment::{Comment, CommentBuilder, CommentStatus, Language};
use crate::error::{Result, ThreadlineError};
use crate::post::PostAggregate;
use crate::types::{CommentId, PostId, UserId, MAX_DEPTH};
use std::sync::Arc;
use tracing::debug;

/// Input for a new comment; author and depth are never taken from here
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post: PostId,
    pub content: String,
    pub parent: Option<CommentId>,
    pub language: Language,
    pub is_anonymous: bool,
    pub mentions: Vec<UserId>,
}

impl NewComment {
    /// Top-level comment on `post`
    pub fn new(post: PostId, content: impl Into<String>) -> Self {
        Self {
            post,
            content: content.into(),
            parent: None,
            language: Language::default(),
            is_anonymous: false,
            mentions: Vec::new(),
        }
    }

    /// Reply to an existing comment
    pub fn reply_to(mut self, parent: CommentId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn anonymous(mut self, is_anonymous: bool) -> Self {
        self.is_anonymous = is_anonymous;
        self
    }

    pub fn mention(mut self, user: UserId) -> Self {
        self.mentions.push(user);
        self
    }
}

/// Comment store plus the post lookups needed to place comments in a thread
#[derive(Clone)]
pub struct CommentTree {
    store: Arc<dyn CommentStore>,
    posts: Arc<dyn PostAggregate>,
}

impl CommentTree {
    pub fn new(store: Arc<dyn CommentStore>, posts: Arc<dyn PostAggregate>) -> Self {
        Self { store, posts }
    }

    /// Fail unless the post exists and accepts comments
    pub fn require_active_post(&self, post: &PostId) -> Result<()> {
        match self.posts.post_status(post)? {
            None => Err(ThreadlineError::PostNotFound(post.clone())),
            Some(status) if !status.is_active() => Err(ThreadlineError::PostNotActive(post.clone())),
            Some(_) => Ok(()),
        }
    }

    /// Resolve the parent of a reply
    fn resolve_parent(&self, post: &PostId, parent_id: &CommentId) -> Result<Comment> {
        let parent = self.store.get(parent_id).map_err(|e| match e {
            ThreadlineError::CommentNotFound(id) => ThreadlineError::ParentNotFound(id),
            other => other,
        })?;

        if &parent.post != post {
            return Err(ThreadlineError::Validation(format!(
                "Parent comment {} belongs to a different post",
                parent_id
            )));
        }
        if !parent.is_active() {
            return Err(ThreadlineError::ParentNotActive(parent_id.clone()));
        }
        if parent.depth >= MAX_DEPTH {
            return Err(ThreadlineError::MaxDepthExceeded {
                parent_depth: parent.depth,
                max: MAX_DEPTH,
            });
        }
        Ok(parent)
    }

    /// Validate placement, compute depth and persist a new active comment
    pub fn create(&self, author: &UserId, input: &NewComment) -> Result<Comment> {
        self.require_active_post(&input.post)?;

        let mut builder = CommentBuilder::new(input.post.clone(), author.clone())
            .content(input.content.clone())
            .language(input.language)
            .anonymous(input.is_anonymous)
            .mentions(input.mentions.iter().cloned());

        if let Some(parent_id) = &input.parent {
            let parent = self.resolve_parent(&input.post, parent_id)?;
            builder = builder.reply_to(&parent);
        }

        let comment = builder.build()?;
        self.store.insert(&comment)?;
        debug!("Stored comment {} at depth {}", comment.id, comment.depth);
        Ok(comment)
    }

    /// Load a comment by ID
    pub fn get(&self, id: &CommentId) -> Result<Comment> {
        self.store.get(id)
    }

    /// Overwrite a comment's status
    pub fn set_status(&self, id: &CommentId, status: CommentStatus) -> Result<Comment> {
        self.store.set_status(id, status)
    }

    pub fn count_active_children(&self, parent: &CommentId) -> Result<usize> {
        self.store.count_active_children(parent)
    }

    pub fn count_active_top_level(&self, post: &PostId) -> Result<usize> {
        self.store.count_active_top_level(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::{MemoryPostAggregate, PostStatus};
    use crate::store::MemoryCommentStore;

    fn setup() -> (CommentTree, Arc<MemoryPostAggregate>, Arc<MemoryCommentStore>) {
        let store = Arc::new(MemoryCommentStore::new());
        let posts = Arc::new(MemoryPostAggregate::new());
        posts.register(PostId::from("p1")).unwrap();
        let tree = CommentTree::new(store.clone(), posts.clone());
        (tree, posts, store)
    }

    fn alice() -> UserId {
        UserId::from("alice")
    }

    #[test]
    fn test_create_top_level() {
        let (tree, _, _) = setup();
        let c = tree.create(&alice(), &NewComment::new(PostId::from("p1"), "hi")).unwrap();
        assert_eq!(c.depth, 0);
        assert_eq!(c.author, alice());
        assert_eq!(tree.get(&c.id).unwrap().content, "hi");
    }

    #[test]
    fn test_create_requires_active_post() {
        let (tree, posts, _) = setup();
        let missing = tree.create(&alice(), &NewComment::new(PostId::from("nope"), "hi"));
        assert!(matches!(missing, Err(ThreadlineError::PostNotFound(_))));

        posts.set_status(&PostId::from("p1"), PostStatus::Closed).unwrap();
        let closed = tree.create(&alice(), &NewComment::new(PostId::from("p1"), "hi"));
        assert!(matches!(closed, Err(ThreadlineError::PostNotActive(_))));
    }

    #[test]
    fn test_parent_resolution() {
        let (tree, _, _) = setup();
        let ghost = NewComment::new(PostId::from("p1"), "hi").reply_to(CommentId::new());
        assert!(matches!(
            tree.create(&alice(), &ghost),
            Err(ThreadlineError::ParentNotFound(_))
        ));

        let parent = tree.create(&alice(), &NewComment::new(PostId::from("p1"), "root")).unwrap();
        tree.set_status(&parent.id, CommentStatus::Hidden).unwrap();
        let to_hidden = NewComment::new(PostId::from("p1"), "hi").reply_to(parent.id.clone());
        assert!(matches!(
            tree.create(&alice(), &to_hidden),
            Err(ThreadlineError::ParentNotActive(_))
        ));
    }

    #[test]
    fn test_parent_on_other_post_rejected() {
        let (tree, posts, _) = setup();
        posts.register(PostId::from("p2")).unwrap();
        let parent = tree.create(&alice(), &NewComment::new(PostId::from("p2"), "root")).unwrap();

        let cross = NewComment::new(PostId::from("p1"), "hi").reply_to(parent.id);
        assert!(matches!(
            tree.create(&alice(), &cross),
            Err(ThreadlineError::Validation(_))
        ));
    }

    #[test]
    fn test_depth_bound_writes_nothing() {
        let (tree, _, store) = setup();
        let mut parent = tree.create(&alice(), &NewComment::new(PostId::from("p1"), "d0")).unwrap();
        for _ in 0..MAX_DEPTH {
            let input = NewComment::new(PostId::from("p1"), "deeper").reply_to(parent.id.clone());
            parent = tree.create(&alice(), &input).unwrap();
        }
        assert_eq!(parent.depth, MAX_DEPTH);
        let before = store.len().unwrap();

        let input = NewComment::new(PostId::from("p1"), "too deep").reply_to(parent.id.clone());
        assert!(matches!(
            tree.create(&alice(), &input),
            Err(ThreadlineError::MaxDepthExceeded { parent_depth: 3, max: 3 })
        ));
        assert_eq!(store.len().unwrap(), before);
    }
}
