//! threadline-storage - File-system storage for threadline
//!
//! Comments and posts are kept as one JSON record file each, written
//! atomically and tagged with a schema version.

mod comment_store;
mod post_store;
mod record;

pub use comment_store::FileSystemCommentStore;
pub use post_store::FileSystemPostAggregate;
pub use record::{RecordFile, CURRENT_SCHEMA_VERSION};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use threadline_core::config::Config;
use threadline_core::engine::Discussion;
use threadline_core::error::Result;

/// Comment and post stores rooted in one data directory
pub struct FileSystemStorage {
    base_dir: PathBuf,
    comments: Arc<FileSystemCommentStore>,
    posts: Arc<FileSystemPostAggregate>,
}

impl FileSystemStorage {
    /// Open (or create) storage under `base_dir`
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let comments = Arc::new(FileSystemCommentStore::open(base_dir.join("comments"))?);
        let posts = Arc::new(FileSystemPostAggregate::open(base_dir.join("posts"))?);
        Ok(Self {
            base_dir,
            comments,
            posts,
        })
    }

    /// Open storage in the per-user data directory
    pub fn default_location() -> Result<Self> {
        Self::open(default_data_dir())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn comments(&self) -> &Arc<FileSystemCommentStore> {
        &self.comments
    }

    pub fn posts(&self) -> &Arc<FileSystemPostAggregate> {
        &self.posts
    }

    /// Build a discussion engine over these stores
    pub fn discussion(&self, config: &Config) -> Discussion {
        Discussion::with_shared(self.comments.clone(), self.posts.clone()).with_config(config)
    }
}

/// Per-user data directory (falls back to `~/.threadline`)
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("org", "threadline", "threadline")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".threadline")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use threadline_core::store::NewComment;
    use threadline_core::types::{PostId, Principal};

    #[test]
    fn test_open_creates_layout() {
        let temp = TempDir::new().unwrap();
        let storage = FileSystemStorage::open(temp.path().join("data")).unwrap();
        assert!(storage.base_dir().join("comments").is_dir());
        assert!(storage.base_dir().join("posts").is_dir());
    }

    #[test]
    fn test_discussion_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let post = PostId::from("launch");
        let parent_id = {
            let storage = FileSystemStorage::open(temp.path()).unwrap();
            storage.posts().register(&post).unwrap();
            let engine = storage.discussion(&Config::default());
            let parent = engine
                .post_comment(&Principal::user("alice"), NewComment::new(post.clone(), "hello"))
                .unwrap();
            engine
                .post_comment(
                    &Principal::user("bob"),
                    NewComment::new(post.clone(), "hi").reply_to(parent.id.clone()),
                )
                .unwrap();
            parent.id
        };

        let storage = FileSystemStorage::open(temp.path()).unwrap();
        let engine = storage.discussion(&Config::default());
        assert_eq!(engine.get_comment(&parent_id).unwrap().reply_count, 1);
        assert_eq!(storage.posts().get(&post).unwrap().comment_count, 2);

        let page = engine.list_thread(&post, 1, 0).unwrap();
        assert_eq!(page.comments.len(), 1);
        assert_eq!(page.comments[0].replies.len(), 1);
    }

    #[test]
    fn test_concurrent_toggles_by_one_actor() {
        let temp = TempDir::new().unwrap();
        let storage = FileSystemStorage::open(temp.path()).unwrap();
        let post = PostId::from("hot");
        storage.posts().register(&post).unwrap();
        let engine = Arc::new(storage.discussion(&Config::default()));
        let target = engine
            .post_comment(&Principal::user("alice"), NewComment::new(post, "tap tap"))
            .unwrap();

        for toggles in [8u32, 5] {
            let before = engine.get_comment(&target.id).unwrap().like_count;
            let handles: Vec<_> = (0..toggles)
                .map(|_| {
                    let engine = Arc::clone(&engine);
                    let id = target.id.clone();
                    std::thread::spawn(move || {
                        engine.toggle_like(&Principal::user("bob"), &id).unwrap();
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            let stored = engine.get_comment(&target.id).unwrap();
            assert_eq!(stored.like_count as usize, stored.likes.len());
            assert_eq!(stored.like_count, (before + toggles) % 2);
        }
    }
}
