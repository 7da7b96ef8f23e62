//! threadline-core - Core library for threadline
//!
//! This crate provides the discussion model: threaded comments with bounded
//! depth, likes, reports with threshold-based auto-moderation, and the
//! denormalized counters that keep post and reply totals in step.

pub mod access;
pub mod comment;
pub mod config;
pub mod engine;
pub mod error;
pub mod post;
pub mod store;
pub mod types;

pub use access::{AccessPolicy, AuthorOrAdmin};
pub use comment::{Comment, CommentStatus, Language, ReportReason};
pub use config::Config;
pub use engine::{Discussion, Pagination, ReconcileReport, ThreadNode, ThreadPage};
pub use error::{ErrorKind, Result, ThreadlineError};
pub use post::{MemoryPostAggregate, PostAggregate, PostStatus};
pub use store::{CommentStore, MemoryCommentStore, NewComment};
pub use types::*;
