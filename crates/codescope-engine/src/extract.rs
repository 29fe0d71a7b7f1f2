//! Signing-evidence extraction from archive resources.
//!
//! [`SignerExtractor`] scans an archive's manifest for code-unit entries
//! carrying digest attributes and returns the signing evidence of the
//! first one found.
//!
//! # First Signed Entry Wins
//!
//! If an archive contains entries signed by different signer sets, the
//! evidence of the first qualifying entry in manifest order is used and
//! the rest are ignored. The manifest model is ordered, so the pick is
//! reproducible for a given archive.
//!
//! # Scope Limit
//!
//! Only local-file origins are supported. Any other scheme — and any
//! resource the opener declines — yields absent evidence silently, never
//! an error.

use crate::{ArchiveError, ArchiveOpener, ArchiveReader};
use codescope_types::{ResourceUri, SigningDetails};
use tracing::debug;

/// Default entry-name suffixes that denote compiled-code units.
pub const DEFAULT_CODE_SUFFIXES: &[&str] = &[".wasm"];

/// Scans archive manifests for signing evidence.
///
/// # Example
///
/// ```
/// use codescope_engine::testing::MemoryArchiveOpener;
/// use codescope_engine::SignerExtractor;
/// use codescope_types::ResourceUri;
///
/// let opener = MemoryArchiveOpener::new();
/// let extractor = SignerExtractor::new(opener);
///
/// // Remote origins are out of scope and silently unsigned.
/// let remote = ResourceUri::parse("https://example.com/p.jar").unwrap();
/// assert!(extractor.extract(&remote).unwrap().is_unsigned());
/// ```
#[derive(Debug)]
pub struct SignerExtractor<A: ArchiveOpener> {
    opener: A,
    code_suffixes: Vec<String>,
}

impl<A: ArchiveOpener> SignerExtractor<A> {
    /// Creates an extractor with [`DEFAULT_CODE_SUFFIXES`].
    #[must_use]
    pub fn new(opener: A) -> Self {
        Self {
            opener,
            code_suffixes: DEFAULT_CODE_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replaces the entry-name suffixes that denote code units.
    #[must_use]
    pub fn with_code_suffixes(mut self, suffixes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.code_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    /// The opener backing this extractor.
    #[must_use]
    pub fn opener(&self) -> &A {
        &self.opener
    }

    /// Extracts the signing evidence of `uri`.
    ///
    /// Returns [`SigningDetails::absent`] for non-local origins, archives
    /// the opener declines, archives without a manifest, and archives
    /// with no signed code-unit entry.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] if the archive should be readable but is
    /// not, or if a signed entry fails verification.
    pub fn extract(&self, uri: &ResourceUri) -> Result<SigningDetails, ArchiveError> {
        if !uri.is_local_file() {
            debug!(uri = %uri, scheme = uri.scheme(), "origin not a local archive, treating as unsigned");
            return Ok(SigningDetails::absent());
        }
        let Some(reader) = self.opener.open(uri)? else {
            debug!(uri = %uri, "opener declined origin, treating as unsigned");
            return Ok(SigningDetails::absent());
        };
        let Some(manifest) = reader.manifest()? else {
            return Ok(SigningDetails::absent());
        };

        for entry in manifest.entries() {
            if !self.is_code_unit(&entry.name) || !entry.has_digest_attribute() {
                continue;
            }
            let details = reader.entry_signing(&entry.name)?;
            debug!(
                uri = %uri,
                entry = %entry.name,
                signers = details.signers.as_ref().map_or(0, Vec::len),
                certificates = details.certificates.as_ref().map_or(0, Vec::len),
                "selected first signed code entry"
            );
            return Ok(details);
        }

        Ok(SigningDetails::absent())
    }

    fn is_code_unit(&self, name: &str) -> bool {
        self.code_suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }
}
