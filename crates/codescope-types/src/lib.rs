//! Core types for codescope.
//!
//! This crate provides the identity, evidence, and permission value types
//! for the codescope origin-scoping engine. It contains no policy logic —
//! only data that flows between the engine and its collaborators.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  codescope-types : ResourceUri, Permission(Set),    ◄── HERE  │
//! │                    Signer/Certificate evidence,              │
//! │                    CodeSource, ProtectionDomain              │
//! └──────────────────────────────────────────────────────────────┘
//!                               ↑
//! ┌──────────────────────────────────────────────────────────────┐
//! │  codescope-engine : SignerExtractor, DomainResolver,         │
//! │                     DomainStack, ScopeEngine + ScopeGuard    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Why a Separate Types Crate?
//!
//! - **Collaborator boundary**: policy oracles and archive readers are
//!   implemented by hosts; they should depend on the data model without
//!   pulling in the engine.
//! - **Immutability discipline**: everything here is an immutable value
//!   type. The only mutable state in the system (the per-thread domain
//!   stack and its context cache) lives in the engine crate.
//! - **Serialization**: all types are serde-ready so hosts can persist
//!   or transmit policy inputs and granted domains.
//!
//! # Example
//!
//! ```
//! use codescope_types::{
//!     Access, CodeSource, Credentials, Permission, PermissionSet, ProtectionDomain, ResourceUri,
//! };
//!
//! let uri = ResourceUri::parse("file:///opt/plugins/feed.jar").unwrap();
//! let permissions = PermissionSet::from(vec![
//!     Permission::new(Access::READ, Some("/data")),
//! ]);
//! let domain = ProtectionDomain::new(
//!     CodeSource::new(uri, Credentials::Unsigned),
//!     permissions,
//! );
//! assert!(domain.implies(&Permission::new(Access::READ, Some("/data/feed.json"))));
//! ```

mod credentials;
mod domain;
mod permission;
mod uri;

pub use credentials::{Certificate, Credentials, Signer, SigningDetails};
pub use domain::{CodeSource, ProtectionDomain};
pub use permission::{Access, Permission, PermissionSet};
pub use uri::{ResourceUri, UriError};
