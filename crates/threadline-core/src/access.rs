//! Ownership checks supplied by the authorization layer

use crate::comment::Comment;
use crate::types::Principal;

/// Decides whether a principal may edit or delete a comment
pub trait AccessPolicy: Send + Sync {
    fn can_modify(&self, actor: &Principal, comment: &Comment) -> bool;
}

/// The author, or any admin
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorOrAdmin;

impl AccessPolicy for AuthorOrAdmin {
    fn can_modify(&self, actor: &Principal, comment: &Comment) -> bool {
        actor.is_admin() || actor.id == comment.author
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::CommentBuilder;
    use crate::types::{PostId, Role, UserId};

    #[test]
    fn test_author_or_admin() {
        let comment = CommentBuilder::new(PostId::from("p"), UserId::from("alice"))
            .content("mine")
            .build()
            .unwrap();
        let policy = AuthorOrAdmin;

        assert!(policy.can_modify(&Principal::user("alice"), &comment));
        assert!(policy.can_modify(&Principal::admin("root"), &comment));
        assert!(!policy.can_modify(&Principal::user("mallory"), &comment));

        let volunteer = Principal {
            id: UserId::from("vol"),
            role: Role::Volunteer,
        };
        assert!(!policy.can_modify(&volunteer, &comment));
    }
}
