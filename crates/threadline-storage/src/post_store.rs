//! File system storage for post aggregates

use crate::record::{read_record, record_paths, write_record};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use threadline_core::error::{Result, ThreadlineError};
use threadline_core::post::{PostAggregate, PostRecord, PostStatus};
use threadline_core::store::lock_poisoned;
use threadline_core::types::PostId;
use tracing::{debug, info, warn};

/// One JSON file per post, named by post ID
pub struct FileSystemPostAggregate {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSystemPostAggregate {
    /// Open the store in `dir`, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                ThreadlineError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create posts directory: {}", e),
                ))
            })?;
            debug!("Created posts directory: {:?}", dir);
        }
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Post IDs become file names, so only a safe alphabet maps to a path
    fn valid_path(&self, post: &PostId) -> Option<PathBuf> {
        let id = post.as_str();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.dir.join(format!("{}.json", id)))
    }

    fn post_path(&self, post: &PostId) -> Result<PathBuf> {
        self.valid_path(post).ok_or_else(|| {
            ThreadlineError::Validation(format!(
                "Invalid post ID '{}': use letters, digits, '-' or '_'",
                post
            ))
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(lock_poisoned)
    }

    /// A post whose ID cannot name a file does not exist
    fn read(&self, post: &PostId) -> Result<Option<PostRecord>> {
        match self.valid_path(post) {
            Some(path) => read_record(&path),
            None => Ok(None),
        }
    }

    fn modify(&self, post: &PostId, apply: impl FnOnce(&mut PostRecord)) -> Result<PostRecord> {
        let _guard = self.lock()?;
        let mut record = self
            .read(post)?
            .ok_or_else(|| ThreadlineError::PostNotFound(post.clone()))?;
        apply(&mut record);
        write_record(&self.post_path(post)?, &record)?;
        Ok(record)
    }

    /// Register an active post; an existing post is returned unchanged
    pub fn register(&self, post: &PostId) -> Result<PostRecord> {
        let _guard = self.lock()?;
        if let Some(existing) = self.read(post)? {
            return Ok(existing);
        }
        let record = PostRecord::new(post.clone());
        write_record(&self.post_path(post)?, &record)?;
        info!("Registered post {}", post);
        Ok(record)
    }

    /// Load a post record
    pub fn get(&self, post: &PostId) -> Result<PostRecord> {
        self.read(post)?
            .ok_or_else(|| ThreadlineError::PostNotFound(post.clone()))
    }

    /// Change a post's status
    pub fn set_status(&self, post: &PostId, status: PostStatus) -> Result<PostRecord> {
        let record = self.modify(post, |record| {
            record.status = status;
            record.updated_at = chrono::Utc::now();
        })?;
        info!("Post {} is now {:?}", post, status);
        Ok(record)
    }

    /// All readable post records, ordered by ID
    pub fn list(&self) -> Result<Vec<PostRecord>> {
        let mut posts = Vec::new();
        for path in record_paths(&self.dir)? {
            match read_record::<PostRecord>(&path) {
                Ok(Some(record)) => posts.push(record),
                Ok(None) => {}
                Err(e) => warn!("Skipping unreadable post file {:?}: {}", path, e),
            }
        }
        posts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(posts)
    }
}

impl PostAggregate for FileSystemPostAggregate {
    fn post_status(&self, post: &PostId) -> Result<Option<PostStatus>> {
        Ok(self.read(post)?.map(|record| record.status))
    }

    fn increment_comment_count(&self, post: &PostId, delta: i64) -> Result<u64> {
        let mut total = 0;
        self.modify(post, |record| total = record.apply_delta(delta))?;
        Ok(total)
    }

    fn reset_comment_count(&self, post: &PostId, count: u64) -> Result<()> {
        self.modify(post, |record| {
            record.comment_count = count;
            record.updated_at = chrono::Utc::now();
        })?;
        Ok(())
    }
}
