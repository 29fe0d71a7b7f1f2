//! Testing doubles for the engine's collaborators.
//!
//! Provides in-memory, scripted implementations of [`PolicyOracle`] and
//! [`ArchiveOpener`] so hosts (and this crate's own tests) can exercise
//! scoping behavior without a real policy engine or archive backend.
//!
//! Both doubles count their queries, which is how the "zero collaborator
//! calls when enforcement is disabled" and "exactly one oracle call for
//! an unsigned resource" properties are observed. They share state
//! through `Arc`, so a clone kept by the test sees the counters of the
//! instance moved into the engine.
//!
//! # Example
//!
//! ```
//! use codescope_engine::testing::{MapOracle, MemoryArchiveOpener};
//! use codescope_engine::{Enforcement, ScopeEngine};
//! use codescope_types::{Access, Permission, PermissionSet, ResourceUri};
//!
//! let uri = ResourceUri::parse("file:///opt/p.jar").unwrap();
//! let oracle = MapOracle::new().grant(
//!     &uri,
//!     "unsigned",
//!     PermissionSet::from(vec![Permission::new(Access::READ, Some("/data"))]),
//! );
//! let observer = oracle.clone();
//!
//! let engine = ScopeEngine::new(oracle, MemoryArchiveOpener::new(), Enforcement::Disabled);
//! let _guard = engine.enter(&uri).unwrap();
//! assert_eq!(observer.query_count(), 0); // disabled engine never asked
//! ```

use crate::{ArchiveError, ArchiveOpener, ArchiveReader, Manifest, PolicyOracle};
use codescope_types::{Credentials, PermissionSet, ResourceUri, SigningDetails};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ─── MapOracle ──────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct MapOracleInner {
    /// (uri, credential kind) → granted set.
    grants: Mutex<HashMap<(String, &'static str), PermissionSet>>,
    queries: AtomicUsize,
}

/// Scripted policy oracle keyed by (origin, credential kind).
///
/// Unknown keys yield the empty set. Clones share grants and the query
/// counter.
#[derive(Debug, Clone, Default)]
pub struct MapOracle {
    inner: Arc<MapOracleInner>,
}

impl MapOracle {
    /// Creates an oracle that grants nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a grant for (`uri`, credential `kind`), where `kind` is
    /// one of `"unsigned"`, `"signers"`, `"certificates"`.
    #[must_use]
    pub fn grant(self, uri: &ResourceUri, kind: &'static str, set: PermissionSet) -> Self {
        self.inner
            .grants
            .lock()
            .expect("oracle grants lock")
            .insert((uri.as_str().to_string(), kind), set);
        self
    }

    /// Number of [`PolicyOracle::permissions`] calls observed so far.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.inner.queries.load(Ordering::SeqCst)
    }
}

impl PolicyOracle for MapOracle {
    fn permissions(&self, uri: &ResourceUri, credentials: &Credentials) -> PermissionSet {
        self.inner.queries.fetch_add(1, Ordering::SeqCst);
        self.inner
            .grants
            .lock()
            .expect("oracle grants lock")
            .get(&(uri.as_str().to_string(), credentials.kind()))
            .cloned()
            .unwrap_or_default()
    }
}

// ─── MemoryArchive ──────────────────────────────────────────────────

/// In-memory verifying archive with scripted signing evidence.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    uri: Option<ResourceUri>,
    manifest: Option<Manifest>,
    signing: HashMap<String, SigningDetails>,
    failures: HashMap<String, String>,
}

impl MemoryArchive {
    /// Creates an archive with the given manifest.
    #[must_use]
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest: Some(manifest),
            ..Self::default()
        }
    }

    /// Creates an archive that carries no manifest at all.
    #[must_use]
    pub fn without_manifest() -> Self {
        Self::default()
    }

    /// Scripts the signing evidence returned for one entry.
    #[must_use]
    pub fn with_entry_signing(mut self, name: impl Into<String>, details: SigningDetails) -> Self {
        self.signing.insert(name.into(), details);
        self
    }

    /// Scripts a verification failure for one entry.
    #[must_use]
    pub fn with_failing_entry(mut self, name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.failures.insert(name.into(), reason.into());
        self
    }

    fn uri(&self) -> ResourceUri {
        self.uri.clone().unwrap_or_else(|| {
            ResourceUri::parse("file:///in-memory").expect("static uri is valid")
        })
    }
}

impl ArchiveReader for MemoryArchive {
    fn manifest(&self) -> Result<Option<&Manifest>, ArchiveError> {
        Ok(self.manifest.as_ref())
    }

    fn entry_signing(&self, name: &str) -> Result<SigningDetails, ArchiveError> {
        if let Some(reason) = self.failures.get(name) {
            return Err(ArchiveError::Verification {
                uri: self.uri(),
                entry: name.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.signing.get(name).cloned().unwrap_or_default())
    }
}

// ─── MemoryArchiveOpener ────────────────────────────────────────────

#[derive(Debug, Default)]
struct MemoryArchiveOpenerInner {
    archives: Mutex<HashMap<String, MemoryArchive>>,
    open_calls: AtomicUsize,
}

/// URI-keyed collection of [`MemoryArchive`]s.
///
/// Unknown URIs are declined (`Ok(None)`), matching the "not addressable
/// as a local archive" contract. Clones share archives and the open
/// counter.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchiveOpener {
    inner: Arc<MemoryArchiveOpenerInner>,
}

impl MemoryArchiveOpener {
    /// Creates an opener with no archives.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an archive under `uri`.
    pub fn insert(&self, uri: ResourceUri, archive: MemoryArchive) {
        self.inner
            .archives
            .lock()
            .expect("opener archives lock")
            .insert(uri.as_str().to_string(), archive);
    }

    /// Number of [`ArchiveOpener::open`] calls observed so far.
    #[must_use]
    pub fn open_calls(&self) -> usize {
        self.inner.open_calls.load(Ordering::SeqCst)
    }
}

impl ArchiveOpener for MemoryArchiveOpener {
    type Reader = MemoryArchive;

    fn open(&self, uri: &ResourceUri) -> Result<Option<Self::Reader>, ArchiveError> {
        self.inner.open_calls.fetch_add(1, Ordering::SeqCst);
        let archive = self
            .inner
            .archives
            .lock()
            .expect("opener archives lock")
            .get(uri.as_str())
            .cloned();
        Ok(archive.map(|mut a| {
            a.uri = Some(uri.clone());
            a
        }))
    }
}
