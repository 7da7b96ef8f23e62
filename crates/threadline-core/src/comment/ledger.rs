//! Counter ledger
//!
//! Pure rules describing which denormalized counters an event touches. The
//! engine applies the returned effects in order, right after the write that
//! triggered them.

use super::model::{Comment, CommentStatus, Report};
use super::moderation::{ModerationPolicy, Transition};
use crate::types::{CommentId, PostId, UserId};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A counter change owed to another entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterEffect {
    /// Recount the parent's active replies from the store
    RecomputeReplies { parent: CommentId },
    /// Adjust the post aggregate's comment total
    AdjustPostComments { post: PostId, delta: i64 },
}

/// Effects of persisting a new comment
pub fn on_create(comment: &Comment) -> Vec<CounterEffect> {
    if !comment.is_active() {
        return Vec::new();
    }
    activity_effects(comment, 1)
}

/// Effects of a status change; only leaving `active` changes counters
pub fn on_deactivate(comment: &Comment, from: CommentStatus, to: CommentStatus) -> Vec<CounterEffect> {
    if !from.is_active() || to.is_active() {
        return Vec::new();
    }
    activity_effects(comment, -1)
}

fn activity_effects(comment: &Comment, delta: i64) -> Vec<CounterEffect> {
    let mut effects = Vec::with_capacity(2);
    if let Some(parent) = &comment.parent {
        effects.push(CounterEffect::RecomputeReplies {
            parent: parent.clone(),
        });
    }
    effects.push(CounterEffect::AdjustPostComments {
        post: comment.post.clone(),
        delta,
    });
    effects
}

/// Result of a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeOutcome {
    pub is_liked: bool,
    pub like_count: u32,
}

/// Add or remove `actor`'s like
pub fn toggle_like(comment: &mut Comment, actor: &UserId) -> LikeOutcome {
    let is_liked = if comment.likes.remove(actor).is_some() {
        false
    } else {
        comment.likes.insert(actor.clone(), Utc::now());
        true
    };
    // Membership is the source of truth; the count follows it.
    comment.like_count = comment.likes.len() as u32;
    comment.touch();

    LikeOutcome {
        is_liked,
        like_count: comment.like_count,
    }
}

/// Result of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOutcome {
    /// False when the actor had already reported this comment
    pub recorded: bool,
    pub report_count: u32,
    pub status: CommentStatus,
    /// True when this report pushed the comment over the threshold
    pub auto_reported: bool,
}

/// Record `actor`'s report unless one already exists
pub fn add_report(
    comment: &mut Comment,
    actor: &UserId,
    report: Report,
    policy: &ModerationPolicy,
) -> ReportOutcome {
    if comment.has_reported(actor) {
        return ReportOutcome {
            recorded: false,
            report_count: comment.report_count,
            status: comment.status,
            auto_reported: false,
        };
    }

    comment.reports.insert(actor.clone(), report);
    comment.report_count = comment.reports.len() as u32;
    comment.touch();

    let auto_reported = match policy.after_report(comment.status, comment.report_count) {
        Transition::To(status) => {
            comment.set_status(status);
            true
        }
        Transition::Stay | Transition::Rejected => false,
    };

    ReportOutcome {
        recorded: true,
        report_count: comment.report_count,
        status: comment.status,
        auto_reported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::builder::CommentBuilder;
    use crate::comment::model::ReportReason;
    use pretty_assertions::assert_eq;

    fn comment() -> Comment {
        CommentBuilder::new(PostId::from("p"), UserId::from("author"))
            .content("hello")
            .build()
            .unwrap()
    }

    fn reply(parent: &Comment) -> Comment {
        CommentBuilder::new(PostId::from("p"), UserId::from("author"))
            .content("reply")
            .reply_to(parent)
            .build()
            .unwrap()
    }

    fn spam() -> Report {
        Report {
            reason: ReportReason::Spam,
            description: None,
            reported_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_effects_top_level() {
        let c = comment();
        assert_eq!(
            on_create(&c),
            vec![CounterEffect::AdjustPostComments {
                post: PostId::from("p"),
                delta: 1
            }]
        );
    }

    #[test]
    fn test_create_effects_reply_recomputes_parent_first() {
        let parent = comment();
        let child = reply(&parent);
        assert_eq!(
            on_create(&child),
            vec![
                CounterEffect::RecomputeReplies {
                    parent: parent.id.clone()
                },
                CounterEffect::AdjustPostComments {
                    post: PostId::from("p"),
                    delta: 1
                },
            ]
        );
    }

    #[test]
    fn test_deactivate_effects() {
        let parent = comment();
        let child = reply(&parent);

        let effects = on_deactivate(&child, CommentStatus::Active, CommentStatus::Deleted);
        assert_eq!(effects.len(), 2);
        assert_eq!(
            effects[1],
            CounterEffect::AdjustPostComments {
                post: PostId::from("p"),
                delta: -1
            }
        );

        assert!(on_deactivate(&child, CommentStatus::Deleted, CommentStatus::Deleted).is_empty());
        assert!(on_deactivate(&child, CommentStatus::Reported, CommentStatus::Deleted).is_empty());
    }

    #[test]
    fn test_toggle_like_twice_restores_state() {
        let mut c = comment();
        let bob = UserId::from("bob");

        let first = toggle_like(&mut c, &bob);
        assert_eq!(first, LikeOutcome { is_liked: true, like_count: 1 });

        let second = toggle_like(&mut c, &bob);
        assert_eq!(second, LikeOutcome { is_liked: false, like_count: 0 });
        assert!(c.likes.is_empty());
    }

    #[test]
    fn test_like_count_tracks_distinct_actors() {
        let mut c = comment();
        toggle_like(&mut c, &UserId::from("a"));
        toggle_like(&mut c, &UserId::from("b"));
        let out = toggle_like(&mut c, &UserId::from("c"));
        assert_eq!(out.like_count, 3);
        assert_eq!(c.like_count as usize, c.likes.len());
    }

    #[test]
    fn test_duplicate_report_is_noop() {
        let mut c = comment();
        let policy = ModerationPolicy::default();
        let bob = UserId::from("bob");

        let first = add_report(&mut c, &bob, spam(), &policy);
        assert!(first.recorded);
        assert_eq!(first.report_count, 1);

        let again = add_report(&mut c, &bob, spam(), &policy);
        assert!(!again.recorded);
        assert_eq!(again.report_count, 1);
        assert_eq!(c.reports.len(), 1);
    }

    #[test]
    fn test_fifth_report_auto_reports() {
        let mut c = comment();
        let policy = ModerationPolicy::default();

        for i in 0..4 {
            let out = add_report(&mut c, &UserId(format!("u{}", i)), spam(), &policy);
            assert_eq!(out.status, CommentStatus::Active);
            assert!(!out.auto_reported);
        }

        let fifth = add_report(&mut c, &UserId::from("u4"), spam(), &policy);
        assert!(fifth.auto_reported);
        assert_eq!(fifth.status, CommentStatus::Reported);
        assert_eq!(c.report_count, 5);
    }
}
