//! Comment system module
//!
//! Comment records, their validation, the counter ledger and the moderation
//! state machine.

pub mod builder;
pub mod index;
pub mod ledger;
pub mod model;
pub mod moderation;
pub mod validator;

pub use builder::CommentBuilder;
pub use index::CommentIndex;
pub use ledger::{CounterEffect, LikeOutcome, ReportOutcome};
pub use model::*;
pub use moderation::{ModerationPolicy, Transition, DEFAULT_REPORT_THRESHOLD};
pub use validator::CommentValidator;
