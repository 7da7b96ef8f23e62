//! Comment validation

use crate::config::DiscussionConfig;
use crate::error::{Result, ThreadlineError};

/// Maximum comment length (default)
pub const MAX_COMMENT_LENGTH: usize = 1000;

/// Minimum comment length
pub const MIN_COMMENT_LENGTH: usize = 1;

/// Maximum length of a report description
pub const MAX_REPORT_DESCRIPTION: usize = 500;

/// Validator for user-supplied comment text
#[derive(Debug, Clone)]
pub struct CommentValidator {
    max_length: usize,
    min_length: usize,
    max_report_description: usize,
}

impl CommentValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self {
            max_length: MAX_COMMENT_LENGTH,
            min_length: MIN_COMMENT_LENGTH,
            max_report_description: MAX_REPORT_DESCRIPTION,
        }
    }

    /// Create a new validator with custom max length
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length,
            ..Self::new()
        }
    }

    /// Create a validator from the discussion settings
    pub fn from_config(config: &DiscussionConfig) -> Self {
        Self {
            max_length: config.max_content_length,
            min_length: config.min_content_length,
            max_report_description: config.max_report_description,
        }
    }

    /// Validate comment content; lengths are counted in characters after trimming
    pub fn validate_content(&self, content: &str) -> Result<()> {
        let length = content.trim().chars().count();

        if length < self.min_length.max(1) {
            return Err(ThreadlineError::Validation(
                "Comment content cannot be empty".to_string(),
            ));
        }

        if length > self.max_length {
            return Err(ThreadlineError::Validation(format!(
                "Comment content exceeds maximum length of {} characters",
                self.max_length
            )));
        }

        Ok(())
    }

    /// Validate the free-text part of a report
    pub fn validate_report_description(&self, description: Option<&str>) -> Result<()> {
        if let Some(description) = description {
            if description.chars().count() > self.max_report_description {
                return Err(ThreadlineError::Validation(format!(
                    "Report description exceeds maximum length of {} characters",
                    self.max_report_description
                )));
            }
        }
        Ok(())
    }
}

impl Default for CommentValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content_valid() {
        let validator = CommentValidator::new();
        assert!(validator.validate_content("Valid comment").is_ok());
    }

    #[test]
    fn test_validate_content_empty() {
        let validator = CommentValidator::new();
        assert!(validator.validate_content("").is_err());
        assert!(validator.validate_content("   ").is_err());
    }

    #[test]
    fn test_validate_content_too_long() {
        let validator = CommentValidator::with_max_length(10);
        assert!(validator.validate_content("Short").is_ok());
        assert!(validator.validate_content("This is too long").is_err());
    }

    #[test]
    fn test_validate_content_counts_characters() {
        let validator = CommentValidator::with_max_length(5);
        // five Hangul syllables are 15 bytes but 5 characters
        assert!(validator.validate_content("안녕하세요").is_ok());
    }

    #[test]
    fn test_validate_content_default_bound() {
        let validator = CommentValidator::new();
        assert!(validator.validate_content(&"a".repeat(1000)).is_ok());
        assert!(validator.validate_content(&"a".repeat(1001)).is_err());
    }

    #[test]
    fn test_validate_report_description() {
        let validator = CommentValidator::new();
        assert!(validator.validate_report_description(None).is_ok());
        assert!(validator.validate_report_description(Some("rude")).is_ok());
        assert!(validator
            .validate_report_description(Some(&"x".repeat(501)))
            .is_err());
    }
}
