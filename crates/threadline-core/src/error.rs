//! Error types for threadline

use crate::types::{CommentId, PostId};
use thiserror::Error;

/// Main error type for threadline
#[derive(Debug, Error)]
pub enum ThreadlineError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Post does not exist
    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    /// Post exists but does not accept comments
    #[error("Post is not active: {0}")]
    PostNotActive(PostId),

    /// Comment not found
    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    /// Comment exists but is deleted, hidden or reported
    #[error("Comment is not active: {0}")]
    CommentNotActive(CommentId),

    /// Parent comment not found
    #[error("Parent comment not found: {0}")]
    ParentNotFound(CommentId),

    /// Parent comment is not active
    #[error("Parent comment is not active: {0}")]
    ParentNotActive(CommentId),

    /// Actor is neither the author nor an admin
    #[error("User {actor} may not modify comment {comment}")]
    Forbidden { actor: String, comment: CommentId },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Reply would nest deeper than the thread allows
    #[error("Maximum comment depth of {max} exceeded (parent depth {parent_depth})")]
    MaxDepthExceeded { parent_depth: u8, max: u8 },

    /// Authors cannot report their own comments
    #[error("Cannot report your own comment: {0}")]
    SelfReportForbidden(CommentId),

    /// Backing store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ThreadlineError>,
    },
}

/// Coarse failure classes handed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    NotActive,
    Forbidden,
    Validation,
    MaxDepthExceeded,
    SelfReportForbidden,
    /// Infrastructure failures (IO, serialization, storage, config)
    Internal,
}

impl ThreadlineError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ThreadlineError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ThreadlineError::PostNotFound(_)
            | ThreadlineError::CommentNotFound(_)
            | ThreadlineError::ParentNotFound(_) => ErrorKind::NotFound,
            ThreadlineError::PostNotActive(_)
            | ThreadlineError::CommentNotActive(_)
            | ThreadlineError::ParentNotActive(_) => ErrorKind::NotActive,
            ThreadlineError::Forbidden { .. } => ErrorKind::Forbidden,
            ThreadlineError::Validation(_) => ErrorKind::Validation,
            ThreadlineError::MaxDepthExceeded { .. } => ErrorKind::MaxDepthExceeded,
            ThreadlineError::SelfReportForbidden(_) => ErrorKind::SelfReportForbidden,
            ThreadlineError::WithContext { source, .. } => source.kind(),
            ThreadlineError::Io(_)
            | ThreadlineError::Serde(_)
            | ThreadlineError::Toml(_)
            | ThreadlineError::Storage(_)
            | ThreadlineError::Config(_)
            | ThreadlineError::UnsupportedSchemaVersion(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for threadline
pub type Result<T> = std::result::Result<T, ThreadlineError>;
