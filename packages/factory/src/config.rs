//! Configuration constants and factory policies.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Retry hint, in seconds, used when the API gives no usable `Retry-After`.
pub const DEFAULT_RATELIMIT_RETRY_SECS: u64 = 30;

/// `TYPE` value marking a market entry as an ask rather than a bid.
pub const ASK_SENTINEL: &str = "ask";

/// What a factory does with a child tag that has no registered handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownTagPolicy {
    /// Skip the tag. Keeps older factories working when the API adds tags.
    #[default]
    Ignore,
    /// Fail with `NsError::UnexpectedTag`.
    Reject,
}

/// What a factory does when a tag is registered twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateHandlerPolicy {
    /// The later registration replaces the earlier one.
    #[default]
    Overwrite,
    /// Fail with `NsError::DuplicateHandler`.
    Reject,
}

/// Policies applied by a factory and inherited by its child factories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FactoryConfig {
    pub unknown_tags: UnknownTagPolicy,
    pub duplicate_handlers: DuplicateHandlerPolicy,
}

impl FactoryConfig {
    /// Configuration that rejects both unknown tags and duplicate handlers.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            unknown_tags: UnknownTagPolicy::Reject,
            duplicate_handlers: DuplicateHandlerPolicy::Reject,
        }
    }

    /// Load a configuration from YAML.
    ///
    /// Missing keys take their defaults.
    ///
    /// # Examples
    /// ```
    /// use nationscript_factory::config::{FactoryConfig, UnknownTagPolicy};
    ///
    /// let config = FactoryConfig::from_yaml_str("unknown-tags: reject").unwrap();
    /// assert_eq!(config.unknown_tags, UnknownTagPolicy::Reject);
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }
}
