//! Origin-derived privilege scoping for codescope.
//!
//! This crate lets a host temporarily narrow its own execution
//! permissions while running code that came from a specific resource
//! (typically a local archive). Operations performed "on behalf of" that
//! resource are checked against a permission set derived from its origin
//! URI and, if the archive is signed, its signing evidence — not against
//! the host's full ambient privilege.
//!
//! # Architecture
//!
//! ```text
//!            ┌────────────────────────────────────────────────┐
//!            │                 ScopeEngine                     │
//!            │  enter(uri) ──► SignerExtractor ──► resolver ──►│── push
//!            │  invoke(f)  ──► EffectiveContext (cached)       │
//!            │  ScopeGuard::drop ─────────────────────────────►│── pop
//!            └───────┬──────────────────────┬─────────────────┘
//!                    │                      │
//!            ArchiveOpener trait     PolicyOracle trait
//!            (host archive backend)  (host policy engine)
//! ```
//!
//! - [`SignerExtractor`] scans an archive's manifest and returns the
//!   signing evidence of the first signed code entry.
//! - [`DomainResolver`] queries the [`PolicyOracle`] per identity and
//!   keeps the larger grant (ties favor signers), producing one
//!   [`ProtectionDomain`](codescope_types::ProtectionDomain).
//! - The engine's per-thread domain stack caches an
//!   [`EffectiveContext`]; pushes and pops invalidate it.
//! - [`ScopeGuard`] pops on drop, so push/pop pairing holds on every
//!   exit path including panics.
//!
//! # Example
//!
//! ```
//! use codescope_engine::testing::{MapOracle, MemoryArchiveOpener};
//! use codescope_engine::{Enforcement, ScopeEngine};
//! use codescope_types::{Access, Permission, PermissionSet, ResourceUri};
//!
//! let uri = ResourceUri::parse("file:///opt/plugins/feed.jar").unwrap();
//! let oracle = MapOracle::new().grant(
//!     &uri,
//!     "unsigned",
//!     PermissionSet::from(vec![Permission::new(Access::READ, Some("/data"))]),
//! );
//! let engine = ScopeEngine::new(oracle, MemoryArchiveOpener::new(), Enforcement::Enforcing);
//!
//! let guard = engine.enter(&uri).unwrap();
//! let probe = Permission::new(Access::READ, Some("/data/feed.json"));
//! engine.try_invoke(|ctx| ctx.check(&probe)).unwrap();
//! drop(guard);
//!
//! // Outside every scope, nothing is authorized.
//! assert!(engine.try_invoke(|ctx| ctx.check(&probe)).is_err());
//! ```
//!
//! # Threading
//!
//! One engine per thread. The engine owns the only mutable state in the
//! system (the stack and its context cache) behind a `RefCell`, so it is
//! not `Sync` — sharing across threads is a compile error, which is the
//! point: scoping must never leak between threads.

pub mod testing;

mod archive;
mod context;
mod engine;
mod error;
mod extract;
mod oracle;
mod resolve;
mod stack;

pub use archive::{ArchiveOpener, ArchiveReader, Manifest, ManifestAttribute, ManifestEntry};
pub use context::EffectiveContext;
pub use engine::{Enforcement, ScopeEngine, ScopeGuard};
pub use error::{AccessDenied, ArchiveError, ResolveError, ScopeError};
pub use extract::{SignerExtractor, DEFAULT_CODE_SUFFIXES};
pub use oracle::PolicyOracle;
pub use resolve::{DomainResolver, MismatchPolicy};

// Re-export the data model for convenience.
pub use codescope_types::{
    Access, Certificate, CodeSource, Credentials, Permission, PermissionSet, ProtectionDomain,
    ResourceUri, Signer, SigningDetails, UriError,
};
