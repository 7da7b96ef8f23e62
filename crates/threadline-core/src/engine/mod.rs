//! Discussion operations
//!
//! [`Discussion`] is the entry point for every write and read a caller makes
//! against a comment thread.

mod discussion;
mod thread;

pub use discussion::Discussion;
pub use thread::{Pagination, ReconcileReport, ThreadNode, ThreadPage};
