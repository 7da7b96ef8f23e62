//! Core type definitions for threadline

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Deepest nesting level a reply may reach (0 = top-level)
pub const MAX_DEPTH: u8 = 3;

/// Unique identifier for a comment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentId(pub Uuid);

impl CommentId {
    /// Generate a new CommentId
    pub fn new() -> Self {
        CommentId(Uuid::new_v4())
    }

    /// Create from UUID string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(CommentId(Uuid::parse_str(s)?))
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a post owned by the external post aggregate
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostId(pub String);

impl PostId {
    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        PostId(s.to_string())
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user, issued by the external identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Principal role as asserted by the authorization layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Volunteer,
    Admin,
}

/// Authenticated caller of an engine operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
}

impl Principal {
    /// Regular user principal
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            id: UserId(id.into()),
            role: Role::User,
        }
    }

    /// Admin principal
    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: UserId(id.into()),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Schema version for persisted records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
}

impl SchemaVersion {
    pub const V1_0: Self = Self { major: 1, minor: 0 };

    /// Check if this version is compatible with another version
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.major == other.major
    }

    /// Parse "major.minor"
    pub fn parse(s: &str) -> Option<Self> {
        let (major, minor) = s.split_once('.')?;
        Some(Self {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::V1_0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_id_uniqueness() {
        let id1 = CommentId::new();
        let id2 = CommentId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_comment_id_from_string() {
        let id = CommentId::new();
        let parsed = CommentId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert!(CommentId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_principal_roles() {
        assert!(Principal::admin("root").is_admin());
        assert!(!Principal::user("alice").is_admin());
    }

    #[test]
    fn test_schema_version_compatibility() {
        let v1_0 = SchemaVersion::V1_0;
        let v1_1 = SchemaVersion::parse("1.1").unwrap();
        let v2_0 = SchemaVersion::parse("2.0").unwrap();

        assert!(v1_0.is_compatible(&v1_1));
        assert!(!v1_0.is_compatible(&v2_0));
        assert!(SchemaVersion::parse("1").is_none());
        assert!(SchemaVersion::parse("a.b").is_none());
    }

    #[test]
    fn test_user_id_serializes_as_string() {
        let json = serde_json::to_string(&UserId::from("u-1")).unwrap();
        assert_eq!(json, "\"u-1\"");
    }
}
