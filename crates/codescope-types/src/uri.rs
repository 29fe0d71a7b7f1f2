//! Resource origin identifiers.
//!
//! A [`ResourceUri`] names the origin whose permissions are being scoped
//! (typically a local archive such as `file:///opt/plugins/feed.jar`).
//! It is immutable once a protection domain has been built from it.
//!
//! # Why Not a Full URL Type?
//!
//! The engine only ever needs two questions answered:
//!
//! 1. What is the scheme? (only `file` origins carry signing metadata)
//! 2. What is the filesystem path, if the scheme is `file`?
//!
//! A full RFC 3986 parser would add surface without adding capability.
//! The newtype keeps the raw text verbatim so it round-trips losslessly
//! through serialization and policy-oracle keys.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error from [`ResourceUri::parse`].
#[derive(Debug, Error)]
pub enum UriError {
    /// The input has no valid `scheme:` prefix — either the `:` is
    /// missing entirely or the scheme text is malformed.
    #[error("resource uri has no valid scheme: '{uri}'")]
    InvalidScheme {
        /// The rejected input.
        uri: String,
    },
}

/// The origin of a resource whose code is being permission-scoped.
///
/// # Example
///
/// ```
/// use codescope_types::ResourceUri;
///
/// let uri = ResourceUri::parse("file:///opt/plugins/feed.jar").unwrap();
/// assert_eq!(uri.scheme(), "file");
/// assert!(uri.is_local_file());
/// assert_eq!(uri.file_path(), Some("/opt/plugins/feed.jar"));
///
/// let remote = ResourceUri::parse("https://example.com/feed.jar").unwrap();
/// assert!(!remote.is_local_file());
/// assert_eq!(remote.file_path(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceUri {
    uri: String,
}

impl ResourceUri {
    /// Parses a resource URI.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::InvalidScheme`] if the input does not start
    /// with an alphabetic `scheme:` prefix.
    pub fn parse(input: impl Into<String>) -> Result<Self, UriError> {
        let uri = input.into();
        let valid = match uri.split_once(':') {
            Some((scheme, _)) => {
                !scheme.is_empty()
                    && scheme
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
                    && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            }
            None => false,
        };
        if valid {
            Ok(Self { uri })
        } else {
            Err(UriError::InvalidScheme { uri })
        }
    }

    /// Returns the scheme: the text before the first `:`, verbatim.
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.uri.split(':').next().unwrap_or("")
    }

    /// Returns the full URI text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Returns `true` if this origin is addressable as a local file.
    ///
    /// Only local-file origins can carry embedded signing metadata;
    /// every other scheme is treated as unsigned.
    #[must_use]
    pub fn is_local_file(&self) -> bool {
        self.scheme().eq_ignore_ascii_case("file")
    }

    /// Returns the filesystem path for a `file` URI, or `None` otherwise.
    ///
    /// Accepts both `file:///path` and `file:/path` forms.
    #[must_use]
    pub fn file_path(&self) -> Option<&str> {
        if !self.is_local_file() {
            return None;
        }
        let (_, rest) = self.uri.split_once(':')?;
        Some(rest.strip_prefix("//").unwrap_or(rest))
    }
}

impl TryFrom<String> for ResourceUri {
    type Error = UriError;

    fn try_from(uri: String) -> Result<Self, Self::Error> {
        Self::parse(uri)
    }
}

impl From<ResourceUri> for String {
    fn from(uri: ResourceUri) -> Self {
        uri.uri
    }
}

impl std::fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}
