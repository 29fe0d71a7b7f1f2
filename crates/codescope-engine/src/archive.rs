//! Verifying archive reader traits and manifest model.
//!
//! An archive-addressable resource exposes an integrity **manifest**: an
//! ordered list of per-entry attribute sections. Entries that were signed
//! carry digest attributes, and for those the reader can produce the
//! resolved [`SigningDetails`].
//!
//! # Architecture
//!
//! ```text
//! ArchiveOpener / ArchiveReader traits (codescope-engine)  ← THIS MODULE
//!          │
//!          ├── host archive backend (jar/zip/wasm bundle)  ← production impl
//!          └── testing::MemoryArchiveOpener                ← in-memory impl
//! ```
//!
//! # Metadata Without Draining
//!
//! Readers must expose [`entry_signing`](ArchiveReader::entry_signing)
//! directly: signing metadata is part of the reader contract, valid
//! without the caller consuming the entry's content stream. Backends that
//! internally need to verify bytes before evidence is trustworthy do that
//! verification themselves and surface failures as
//! [`ArchiveError::Verification`].

use crate::ArchiveError;
use codescope_types::{ResourceUri, SigningDetails};
use serde::{Deserialize, Serialize};

/// One attribute of a manifest entry, in manifest order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestAttribute {
    /// Attribute key, e.g. `SHA-256-Digest`.
    pub key: String,
    /// Attribute value.
    pub value: String,
}

/// One per-entry section of an archive manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Entry name within the archive, e.g. `plugin.wasm`.
    pub name: String,
    /// Attributes in manifest order.
    pub attributes: Vec<ManifestAttribute>,
}

impl ManifestEntry {
    /// Creates an entry from `(key, value)` attribute pairs.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        attributes: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes: attributes
                .into_iter()
                .map(|(key, value)| ManifestAttribute { key, value })
                .collect(),
        }
    }

    /// Returns `true` if any attribute key contains `digest`
    /// (case-insensitive) — the marker that this entry was signed.
    #[must_use]
    pub fn has_digest_attribute(&self) -> bool {
        self.attributes
            .iter()
            .any(|a| a.key.to_ascii_lowercase().contains("digest"))
    }
}

/// The per-entry section of an archive's integrity manifest.
///
/// Entry order is the manifest's own order and is significant: the
/// extractor uses the **first** qualifying signed entry it encounters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Creates a manifest from entries in manifest order.
    #[must_use]
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    /// The entries, in manifest order.
    #[must_use]
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Returns `true` if the manifest has no per-entry sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An opened, verifying archive.
pub trait ArchiveReader {
    /// The archive's manifest, or `None` if the archive carries none.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Manifest`] if the manifest exists but
    /// cannot be read.
    fn manifest(&self) -> Result<Option<&Manifest>, ArchiveError>;

    /// Signing evidence for one entry.
    ///
    /// Valid for any entry named in the manifest; unsigned entries yield
    /// [`SigningDetails::absent`].
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Verification`] if the entry's content does
    /// not match its digests, or [`ArchiveError::Manifest`] if the entry
    /// is unknown.
    fn entry_signing(&self, name: &str) -> Result<SigningDetails, ArchiveError>;
}

/// Opens archive-addressable resources.
///
/// `Ok(None)` means the resource is not addressable as a local archive —
/// a deliberate scope limit, treated as "unsigned", never as an error.
pub trait ArchiveOpener: Send + Sync + std::fmt::Debug {
    /// The reader this opener produces.
    type Reader: ArchiveReader;

    /// Opens the resource as a verifying archive.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Open`] if the resource should be readable
    /// but is not (missing file, corrupt container).
    fn open(&self, uri: &ResourceUri) -> Result<Option<Self::Reader>, ArchiveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest_attrs() -> Vec<(String, String)> {
        vec![("SHA-256-Digest".to_string(), "q1w2e3".to_string())]
    }

    #[test]
    fn digest_attribute_detection() {
        let signed = ManifestEntry::new("plugin.wasm", digest_attrs());
        assert!(signed.has_digest_attribute());

        let unsigned = ManifestEntry::new(
            "plugin.wasm",
            vec![("Created-By".to_string(), "tool".to_string())],
        );
        assert!(!unsigned.has_digest_attribute());
    }

    #[test]
    fn digest_detection_is_case_insensitive() {
        let entry = ManifestEntry::new(
            "plugin.wasm",
            vec![("sha-1-DIGEST-Manifest".to_string(), "x".to_string())],
        );
        assert!(entry.has_digest_attribute());
    }

    #[test]
    fn entry_with_no_attributes_is_unsigned() {
        let entry = ManifestEntry::new("plugin.wasm", Vec::new());
        assert!(!entry.has_digest_attribute());
    }

    #[test]
    fn manifest_preserves_order() {
        let manifest = Manifest::new(vec![
            ManifestEntry::new("b.wasm", Vec::new()),
            ManifestEntry::new("a.wasm", Vec::new()),
        ]);
        let names: Vec<_> = manifest.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b.wasm", "a.wasm"]);
    }

    #[test]
    fn empty_manifest() {
        assert!(Manifest::default().is_empty());
        assert!(Manifest::new(Vec::new()).is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let manifest = Manifest::new(vec![ManifestEntry::new("plugin.wasm", digest_attrs())]);
        let json = serde_json::to_string(&manifest).expect("serialize");
        let parsed: Manifest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, manifest);
    }
}
