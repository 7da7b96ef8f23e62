//! Comment data models

use crate::types::{CommentId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A comment on a post, possibly replying to another comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment identifier
    pub id: CommentId,
    /// Post the comment belongs to; never changes after creation
    pub post: PostId,
    /// Author of the comment
    pub author: UserId,
    /// Comment this one replies to
    #[serde(default)]
    pub parent: Option<CommentId>,
    /// Nesting level, 0 for top-level comments
    pub depth: u8,
    /// Comment content
    pub content: String,
    /// Moderation status
    #[serde(default)]
    pub status: CommentStatus,
    /// Language the comment is written in
    #[serde(default)]
    pub language: Language,
    /// Hide the author in listings
    #[serde(default)]
    pub is_anonymous: bool,
    /// Users mentioned in the comment
    #[serde(default)]
    pub mentions: BTreeSet<UserId>,
    /// Likes keyed by the user who gave them
    #[serde(default)]
    pub likes: BTreeMap<UserId, DateTime<Utc>>,
    /// Always equal to `likes.len()`
    #[serde(default)]
    pub like_count: u32,
    /// Reports keyed by the reporting user
    #[serde(default)]
    pub reports: BTreeMap<UserId, Report>,
    /// Always equal to `reports.len()`
    #[serde(default)]
    pub report_count: u32,
    /// Number of direct replies with status active
    #[serde(default)]
    pub reply_count: u32,
    /// Whether the content was ever edited
    #[serde(default)]
    pub is_edited: bool,
    /// When the content was last edited
    #[serde(default)]
    pub last_edited_at: Option<DateTime<Utc>>,
    /// Append-only log of edits
    #[serde(default)]
    pub edit_history: Vec<EditRecord>,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
    /// When the comment was last updated
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Check if the comment counts towards active totals and listings
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.contains_key(user)
    }

    pub fn has_reported(&self, user: &UserId) -> bool {
        self.reports.contains_key(user)
    }

    /// Change status
    pub fn set_status(&mut self, status: CommentStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Replace the content and append the previous version to the edit history
    pub fn record_edit(&mut self, content: impl Into<String>, reason: impl Into<String>) {
        let now = Utc::now();
        let previous = std::mem::replace(&mut self.content, content.into());
        self.edit_history.push(EditRecord {
            edited_at: now,
            reason: reason.into(),
            previous_content: previous,
        });
        self.is_edited = true;
        self.last_edited_at = Some(now);
        self.updated_at = now;
    }

    /// Mark as updated
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Comment moderation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    /// Visible and counted
    #[default]
    Active,
    /// Hidden by a moderator
    Hidden,
    /// Soft-deleted by its author or an admin
    Deleted,
    /// Hidden automatically after too many reports
    Reported,
}

impl CommentStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, CommentStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Active => "active",
            CommentStatus::Hidden => "hidden",
            CommentStatus::Deleted => "deleted",
            CommentStatus::Reported => "reported",
        }
    }
}

impl std::fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a comment was reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportReason {
    Spam,
    Abuse,
    Inappropriate,
    Harassment,
    Other,
}

impl ReportReason {
    /// Parse from the wire name
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "spam" => Some(ReportReason::Spam),
            "abuse" => Some(ReportReason::Abuse),
            "inappropriate" => Some(ReportReason::Inappropriate),
            "harassment" => Some(ReportReason::Harassment),
            "other" => Some(ReportReason::Other),
            _ => None,
        }
    }
}

/// A single user's report against a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub reason: ReportReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub reported_at: DateTime<Utc>,
}

/// Entry in a comment's edit history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    pub edited_at: DateTime<Utc>,
    pub reason: String,
    /// Content before this edit
    pub previous_content: String,
}

/// Languages a comment can be tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Korean,
    English,
    Tagalog,
    Vietnamese,
    Thai,
    Indonesian,
    Burmese,
    Khmer,
    Lao,
    Bengali,
    Urdu,
    Nepali,
    Sinhala,
    Uzbek,
    Kazakh,
    Mongolian,
    Chinese,
    Japanese,
    Mixed,
}

impl Language {
    /// Parse from the lowercase language name
    pub fn from_name(s: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(s.to_lowercase())).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_comment() -> Comment {
        let now = Utc::now();
        Comment {
            id: CommentId::new(),
            post: PostId::from("post-1"),
            author: UserId::from("alice"),
            parent: None,
            depth: 0,
            content: "Test comment".to_string(),
            status: CommentStatus::Active,
            language: Language::default(),
            is_anonymous: false,
            mentions: BTreeSet::new(),
            likes: BTreeMap::new(),
            like_count: 0,
            reports: BTreeMap::new(),
            report_count: 0,
            reply_count: 0,
            is_edited: false,
            last_edited_at: None,
            edit_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_comment_defaults() {
        let comment = create_test_comment();
        assert!(comment.is_active());
        assert!(comment.parent.is_none());
        assert_eq!(comment.language, Language::Korean);
    }

    #[test]
    fn test_record_edit_appends_history() {
        let mut comment = create_test_comment();
        comment.record_edit("First edit", "typo");
        comment.record_edit("Second edit", "content edited");

        assert_eq!(comment.content, "Second edit");
        assert!(comment.is_edited);
        assert!(comment.last_edited_at.is_some());
        assert_eq!(comment.edit_history.len(), 2);
        assert_eq!(comment.edit_history[0].previous_content, "Test comment");
        assert_eq!(comment.edit_history[1].previous_content, "First edit");
        assert_eq!(comment.edit_history[0].reason, "typo");
    }

    #[test]
    fn test_status_activity() {
        assert!(CommentStatus::Active.is_active());
        assert!(!CommentStatus::Hidden.is_active());
        assert!(!CommentStatus::Deleted.is_active());
        assert!(!CommentStatus::Reported.is_active());
        assert_eq!(CommentStatus::Reported.to_string(), "reported");
    }

    #[test]
    fn test_report_reason_names() {
        assert_eq!(ReportReason::from_name("spam"), Some(ReportReason::Spam));
        assert_eq!(ReportReason::from_name("harassment"), Some(ReportReason::Harassment));
        assert_eq!(ReportReason::from_name("rude"), None);
    }

    #[test]
    fn test_language_names() {
        assert_eq!(Language::from_name("English"), Some(Language::English));
        assert_eq!(Language::from_name("mixed"), Some(Language::Mixed));
        assert_eq!(Language::from_name("klingon"), None);
    }

    #[test]
    fn test_comment_serialization() {
        let mut comment = create_test_comment();
        comment.likes.insert(UserId::from("bob"), Utc::now());
        comment.like_count = 1;

        let json = serde_json::to_string(&comment).unwrap();
        assert!(json.contains("\"status\":\"active\""));

        let comment2: Comment = serde_json::from_str(&json).unwrap();
        assert_eq!(comment.content, comment2.content);
        assert!(comment2.is_liked_by(&UserId::from("bob")));
        assert_eq!(comment2.like_count, 1);
    }
}
