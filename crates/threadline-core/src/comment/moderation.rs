//! Moderation state machine
//!
//! ```text
//! active --report threshold--> reported   (engine, one-way)
//! active --owner/admin delete--> deleted  (engine, soft)
//! active --moderator--> hidden            (external)
//! ```
//!
//! `hidden`, `reported` and `deleted` are terminal as far as the engine is
//! concerned.

use super::model::CommentStatus;

/// Number of distinct reports that hides a comment
pub const DEFAULT_REPORT_THRESHOLD: u32 = 5;

/// Outcome of feeding an event to the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Keep the current status
    Stay,
    /// Move to the given status
    To(CommentStatus),
    /// The event is not allowed from the current status
    Rejected,
}

/// Decides status transitions for report and delete events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModerationPolicy {
    report_threshold: u32,
}

impl ModerationPolicy {
    pub fn new(report_threshold: u32) -> Self {
        Self { report_threshold }
    }

    /// Likes and reports are only accepted on active comments
    pub fn accepts_engagement(&self, current: CommentStatus) -> bool {
        current.is_active()
    }

    /// Status after a report brought the distinct report total to `report_count`
    pub fn after_report(&self, current: CommentStatus, report_count: u32) -> Transition {
        match current {
            CommentStatus::Active if report_count >= self.report_threshold => {
                Transition::To(CommentStatus::Reported)
            }
            CommentStatus::Active => Transition::Stay,
            _ => Transition::Rejected,
        }
    }

    /// Status after an owner or admin deletes the comment
    pub fn on_delete(&self, current: CommentStatus) -> Transition {
        match current {
            CommentStatus::Active => Transition::To(CommentStatus::Deleted),
            CommentStatus::Deleted => Transition::Stay,
            CommentStatus::Hidden | CommentStatus::Reported => Transition::Rejected,
        }
    }
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_THRESHOLD)
    }
}
