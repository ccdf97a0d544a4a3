//! Error taxonomy shared by the factory engine and its callers.
//!
//! Every failure is a variant of [`NsError`]. Callers branch on
//! [`NsError::kind`] rather than on message text; messages are rendered
//! from the variant fields and never change after construction.

use std::time::Duration;

use thiserror::Error;

use crate::config::DEFAULT_RATELIMIT_RETRY_SECS;

/// Main error type for the factory library.
#[derive(Debug, Error)]
pub enum NsError {
    /// Unclassified failure inside the library.
    #[error("Internal error{}", .0.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Internal(Option<String>),

    /// Failure reported by, or while talking to, the NationStates API.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A required property never arrived.
    #[error("Missing property: {}", qualify(.parent.as_deref(), .property))]
    PropertyMissing {
        property: String,
        parent: Option<String>,
    },

    /// A property arrived with a value that could not be converted.
    #[error("Invalid property: {} ({value})", qualify(.parent.as_deref(), .property))]
    PropertyInvalid {
        property: String,
        value: String,
        parent: Option<String>,
    },

    /// A property holds a value of the wrong shape for its consumer.
    #[error("Faulty property {property}: {supplied} (expected {expected})")]
    PropertyMalformed {
        property: String,
        expected: String,
        supplied: String,
    },

    /// The product was requested before the factory was finalised.
    #[error("Factory withheld still-work-in-progress product")]
    ProductWithheld,

    /// A finalised factory was asked to take more input.
    #[error("Finalised factory refused to process data")]
    FactoryFinalised,

    /// An unregistered tag was met under the strict unknown-tag policy.
    #[error("No handler for tag <{tag}>{}", .parent.as_ref().map(|p| format!(" in {p}")).unwrap_or_default())]
    UnexpectedTag { tag: String, parent: Option<String> },

    /// A second handler was registered for a tag under the strict policy.
    #[error("Handler already registered for tag <{tag}>")]
    DuplicateHandler { tag: String },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Configuration could not be read.
    #[error("Invalid factory configuration: {0}")]
    Config(#[from] serde_yaml_ng::Error),
}

/// Failures originating from the API layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The queried nation, region or card does not exist.
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// A nation login was refused.
    #[error("Login failed: {0}")]
    Login(String),

    /// The rate limit was exceeded.
    #[error("Ratelimit exceeded; retry in {retry_seconds} s")]
    Ratelimit { retry_seconds: u64 },

    /// A conditional dump request found nothing new.
    #[error("Dump not modified")]
    DumpNotModified,

    /// Any other API-side failure.
    #[error("{0}")]
    Other(String),
}

/// Result type alias for factory operations.
pub type Result<T> = std::result::Result<T, NsError>;

/// Category of an [`NsError`], for branching without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Internal,
    Api(ApiErrorKind),
    PropertyMissing,
    PropertyInvalid,
    PropertyMalformed,
    ProductWithheld,
    FactoryFinalised,
    UnexpectedTag,
    DuplicateHandler,
    Xml,
    Config,
}

/// Category of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    EntityNotFound,
    Login,
    Ratelimit,
    DumpNotModified,
    Other,
}

impl ApiError {
    /// Rate limit error with an explicit retry hint.
    #[must_use]
    pub fn ratelimit(retry_seconds: u64) -> Self {
        Self::Ratelimit { retry_seconds }
    }

    /// Rate limit error from a `Retry-After` style header value.
    ///
    /// Reads the leading whole number of seconds, so `"45.5"` yields 45.
    /// Falls back to [`DEFAULT_RATELIMIT_RETRY_SECS`] when the header is
    /// absent or does not start with a digit.
    #[must_use]
    pub fn ratelimit_from_header(value: Option<&str>) -> Self {
        let retry_seconds = value
            .and_then(|v| {
                let v = v.trim();
                let digits = v.find(|c: char| !c.is_ascii_digit()).unwrap_or(v.len());
                v[..digits].parse::<u64>().ok()
            })
            .unwrap_or(DEFAULT_RATELIMIT_RETRY_SECS);
        Self::Ratelimit { retry_seconds }
    }

    /// Return the category of this error.
    #[must_use]
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::EntityNotFound(_) => ApiErrorKind::EntityNotFound,
            Self::Login(_) => ApiErrorKind::Login,
            Self::Ratelimit { .. } => ApiErrorKind::Ratelimit,
            Self::DumpNotModified => ApiErrorKind::DumpNotModified,
            Self::Other(_) => ApiErrorKind::Other,
        }
    }
}

impl NsError {
    /// Internal error with the default message.
    #[must_use]
    pub fn internal() -> Self {
        Self::Internal(None)
    }

    /// A required property is absent.
    #[must_use]
    pub fn missing(property: impl Into<String>, parent: Option<&str>) -> Self {
        Self::PropertyMissing {
            property: property.into(),
            parent: parent.map(str::to_string),
        }
    }

    /// A property value was rejected.
    #[must_use]
    pub fn invalid(
        property: impl Into<String>,
        value: impl Into<String>,
        parent: Option<&str>,
    ) -> Self {
        Self::PropertyInvalid {
            property: property.into(),
            value: value.into(),
            parent: parent.map(str::to_string),
        }
    }

    /// A property holds the wrong kind of value.
    #[must_use]
    pub fn malformed(
        property: impl Into<String>,
        expected: impl Into<String>,
        supplied: impl Into<String>,
    ) -> Self {
        Self::PropertyMalformed {
            property: property.into(),
            expected: expected.into(),
            supplied: supplied.into(),
        }
    }

    /// Return the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Internal(_) => ErrorKind::Internal,
            Self::Api(api) => ErrorKind::Api(api.kind()),
            Self::PropertyMissing { .. } => ErrorKind::PropertyMissing,
            Self::PropertyInvalid { .. } => ErrorKind::PropertyInvalid,
            Self::PropertyMalformed { .. } => ErrorKind::PropertyMalformed,
            Self::ProductWithheld => ErrorKind::ProductWithheld,
            Self::FactoryFinalised => ErrorKind::FactoryFinalised,
            Self::UnexpectedTag { .. } => ErrorKind::UnexpectedTag,
            Self::DuplicateHandler { .. } => ErrorKind::DuplicateHandler,
            Self::Xml(_) => ErrorKind::Xml,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether the API reported that the queried entity does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(ApiError::EntityNotFound(_)))
    }

    /// Whether the error describes bad upstream data rather than a bug.
    #[must_use]
    pub fn is_malformed_data(&self) -> bool {
        matches!(
            self,
            Self::PropertyMissing { .. }
                | Self::PropertyInvalid { .. }
                | Self::PropertyMalformed { .. }
                | Self::UnexpectedTag { .. }
                | Self::Xml(_)
        )
    }

    /// Backoff hint carried by a rate limit error.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Api(ApiError::Ratelimit { retry_seconds }) => {
                Some(Duration::from_secs(*retry_seconds))
            }
            _ => None,
        }
    }
}

impl Default for ApiError {
    fn default() -> Self {
        Self::ratelimit(DEFAULT_RATELIMIT_RETRY_SECS)
    }
}

/// Join a parent path and a property name with a dot.
pub(crate) fn qualify(parent: Option<&str>, property: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{parent}.{property}"),
        _ => property.to_string(),
    }
}
