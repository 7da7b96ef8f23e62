//! Configuration management for threadline

use crate::comment::moderation::DEFAULT_REPORT_THRESHOLD;
use crate::comment::validator::{MAX_COMMENT_LENGTH, MAX_REPORT_DESCRIPTION, MIN_COMMENT_LENGTH};
use crate::error::{Result, ThreadlineError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Comment content and edit settings
    pub discussion: DiscussionConfig,
    /// Report threshold settings
    pub moderation: ModerationConfig,
    /// Thread listing settings
    pub listing: ListingConfig,
    /// Storage location
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ThreadlineError::Io(e).with_context(format!("Failed to read {}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ThreadlineError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ThreadlineError::Toml(e.to_string()))
    }

    /// Reject settings that cannot work together
    pub fn validate(&self) -> Result<()> {
        let d = &self.discussion;
        if d.min_content_length > d.max_content_length {
            return Err(ThreadlineError::Config(format!(
                "discussion.min_content_length ({}) exceeds max_content_length ({})",
                d.min_content_length, d.max_content_length
            )));
        }
        if d.max_content_length == 0 {
            return Err(ThreadlineError::Config(
                "discussion.max_content_length must be positive".to_string(),
            ));
        }
        if self.moderation.report_threshold == 0 {
            return Err(ThreadlineError::Config(
                "moderation.report_threshold must be positive".to_string(),
            ));
        }
        if self.listing.page_size == 0 {
            return Err(ThreadlineError::Config(
                "listing.page_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Discussion-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscussionConfig {
    /// Minimum comment content length in characters
    pub min_content_length: usize,
    /// Maximum comment content length in characters
    pub max_content_length: usize,
    /// Maximum report description length in characters
    pub max_report_description: usize,
    /// Edit reason recorded when the caller gives none
    pub default_edit_reason: String,
}

impl Default for DiscussionConfig {
    fn default() -> Self {
        Self {
            min_content_length: MIN_COMMENT_LENGTH,
            max_content_length: MAX_COMMENT_LENGTH,
            max_report_description: MAX_REPORT_DESCRIPTION,
            default_edit_reason: "content edited".to_string(),
        }
    }
}

/// Moderation-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Distinct reports that move a comment to `reported`
    pub report_threshold: u32,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            report_threshold: DEFAULT_REPORT_THRESHOLD,
        }
    }
}

/// Listing-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Top-level comments per page
    pub page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { page_size: 50 }
    }
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding comment and post records
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".threadline"),
        }
    }
}
