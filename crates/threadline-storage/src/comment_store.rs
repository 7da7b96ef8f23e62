//! File system storage for comments

use crate::record::{read_record, record_paths, write_record};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use threadline_core::comment::{Comment, CommentIndex};
use threadline_core::error::{Result, ThreadlineError};
use threadline_core::store::{lock_poisoned, CommentStore};
use threadline_core::types::{CommentId, PostId};
use tracing::{debug, info, warn};

/// One JSON file per comment, named by comment ID
///
/// Writes go through a single in-process mutex so that `update` and
/// `refresh_reply_count` are atomic with respect to each other. The
/// relationship index is rebuilt from disk on open.
///
/// The mutex does not span processes. Two processes writing the same data
/// directory at once can each read a record and write it back, losing one
/// of the changes; run `reconcile` afterwards to repair derived counters.
/// Comments created by another process are not seen until the store is
/// reopened.
pub struct FileSystemCommentStore {
    dir: PathBuf,
    index: Mutex<CommentIndex>,
}

impl FileSystemCommentStore {
    /// Open the store in `dir`, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                ThreadlineError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create comments directory: {}", e),
                ))
            })?;
            debug!("Created comments directory: {:?}", dir);
        }

        let mut comments = Vec::new();
        for path in record_paths(&dir)? {
            match read_record::<Comment>(&path) {
                Ok(Some(comment)) => comments.push(comment),
                Ok(None) => {}
                Err(e) => warn!("Skipping unreadable comment file {:?}: {}", path, e),
            }
        }

        let mut index = CommentIndex::new();
        index.rebuild(&comments);
        info!("Loaded {} comments from {:?}", comments.len(), dir);

        Ok(Self {
            dir,
            index: Mutex::new(index),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn comment_path(&self, id: &CommentId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn lock(&self) -> Result<MutexGuard<'_, CommentIndex>> {
        self.index.lock().map_err(lock_poisoned)
    }

    fn read(&self, id: &CommentId) -> Result<Comment> {
        read_record(&self.comment_path(id))?
            .ok_or_else(|| ThreadlineError::CommentNotFound(id.clone()))
    }

    fn read_sorted(&self, ids: &[CommentId]) -> Result<Vec<Comment>> {
        let mut comments = ids
            .iter()
            .map(|id| self.read(id))
            .collect::<Result<Vec<_>>>()?;
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(comments)
    }
}

impl CommentStore for FileSystemCommentStore {
    fn insert(&self, comment: &Comment) -> Result<()> {
        let mut index = self.lock()?;
        let path = self.comment_path(&comment.id);
        if path.exists() {
            return Err(ThreadlineError::Validation(format!(
                "Comment with ID {} already exists",
                comment.id
            )));
        }
        write_record(&path, comment)?;
        index.add(comment);
        Ok(())
    }

    fn get(&self, id: &CommentId) -> Result<Comment> {
        self.read(id)
    }

    fn update(
        &self,
        id: &CommentId,
        apply: &mut dyn FnMut(&mut Comment) -> Result<()>,
    ) -> Result<Comment> {
        let _index = self.lock()?;
        let mut comment = self.read(id)?;
        apply(&mut comment)?;
        write_record(&self.comment_path(id), &comment)?;
        Ok(comment)
    }

    fn by_post(&self, post: &PostId) -> Result<Vec<Comment>> {
        let ids = self.lock()?.get_by_post(post);
        self.read_sorted(&ids)
    }

    fn children(&self, parent: &CommentId) -> Result<Vec<Comment>> {
        let ids = self.lock()?.get_children(parent);
        self.read_sorted(&ids)
    }

    fn top_level(&self, post: &PostId) -> Result<Vec<Comment>> {
        let ids = self.lock()?.get_top_level(post);
        self.read_sorted(&ids)
    }

    fn refresh_reply_count(&self, parent: &CommentId) -> Result<u32> {
        let index = self.lock()?;
        let mut count = 0u32;
        for id in index.children(parent) {
            if self.read(id)?.is_active() {
                count += 1;
            }
        }

        let mut stored = self.read(parent)?;
        if stored.reply_count != count {
            stored.reply_count = count;
            write_record(&self.comment_path(parent), &stored)?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use threadline_core::comment::{CommentBuilder, CommentStatus};
    use threadline_core::types::UserId;

    fn create_test_store() -> (FileSystemCommentStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemCommentStore::open(temp_dir.path().join("comments")).unwrap();
        (store, temp_dir)
    }

    fn top(content: &str) -> Comment {
        CommentBuilder::new(PostId::from("p1"), UserId::from("alice"))
            .content(content)
            .build()
            .unwrap()
    }

    fn reply(parent: &Comment) -> Comment {
        CommentBuilder::new(parent.post.clone(), UserId::from("bob"))
            .content("reply")
            .reply_to(parent)
            .build()
            .unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let (store, _temp) = create_test_store();
        let comment = top("hello");

        store.insert(&comment).unwrap();

        let loaded = store.get(&comment.id).unwrap();
        assert_eq!(loaded.content, "hello");
        assert_eq!(loaded.created_at, comment.created_at);
        assert!(store.dir().join(format!("{}.json", comment.id)).exists());
    }

    #[test]
    fn test_duplicate_insert_fails() {
        let (store, _temp) = create_test_store();
        let comment = top("once");
        store.insert(&comment).unwrap();
        assert!(store.insert(&comment).is_err());
    }

    #[test]
    fn test_get_missing() {
        let (store, _temp) = create_test_store();
        assert!(matches!(
            store.get(&CommentId::new()),
            Err(ThreadlineError::CommentNotFound(_))
        ));
    }

    #[test]
    fn test_failed_update_leaves_file_untouched() {
        let (store, _temp) = create_test_store();
        let comment = top("before");
        store.insert(&comment).unwrap();

        let result = store.update(&comment.id, &mut |c| {
            c.content = "after".to_string();
            Err(ThreadlineError::Validation("rejected".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(store.get(&comment.id).unwrap().content, "before");
    }

    #[test]
    fn test_index_rebuilt_on_open() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("comments");
        let a = top("root");
        let b = reply(&a);
        {
            let store = FileSystemCommentStore::open(&dir).unwrap();
            store.insert(&a).unwrap();
            store.insert(&b).unwrap();
        }

        let store = FileSystemCommentStore::open(&dir).unwrap();
        let children = store.children(&a.id).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, b.id);
        assert_eq!(store.top_level(&PostId::from("p1")).unwrap().len(), 1);
        assert_eq!(store.by_post(&PostId::from("p1")).unwrap().len(), 2);
    }

    #[test]
    fn test_refresh_reply_count() {
        let (store, _temp) = create_test_store();
        let a = top("root");
        let b = reply(&a);
        let c = reply(&a);
        store.insert(&a).unwrap();
        store.insert(&b).unwrap();
        store.insert(&c).unwrap();

        assert_eq!(store.refresh_reply_count(&a.id).unwrap(), 2);
        store.set_status(&b.id, CommentStatus::Deleted).unwrap();
        assert_eq!(store.refresh_reply_count(&a.id).unwrap(), 1);
        assert_eq!(store.get(&a.id).unwrap().reply_count, 1);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("comments");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("garbage.json"), "not json").unwrap();

        let store = FileSystemCommentStore::open(&dir).unwrap();
        assert!(store.by_post(&PostId::from("p1")).unwrap().is_empty());
    }
}
