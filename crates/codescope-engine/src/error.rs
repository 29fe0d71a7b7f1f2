//! Error types for the scoping engine.
//!
//! Taxonomy:
//!
//! ```text
//! enter(uri) ──► ScopeError
//!                  ├── Archive(ArchiveError)   I/O opening/reading the resource
//!                  └── Resolve(ResolveError)   evidence rejected by policy
//!
//! check(perm) ─► AccessDenied                  raised by the context walk,
//!                                              propagated verbatim
//! ```
//!
//! A failed `enter` never pushes anything: partial domain construction is
//! not observable. The only tolerated irregularities in the whole engine
//! are popping an empty stack and running with enforcement disabled.

use codescope_types::{Permission, ResourceUri};
use thiserror::Error;

/// Errors from opening or reading an archive resource.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The resource could not be opened.
    #[error("failed to open archive '{uri}'")]
    Open {
        /// The origin that failed to open.
        uri: ResourceUri,
        #[source]
        source: std::io::Error,
    },

    /// The archive's manifest could not be read.
    #[error("failed to read manifest of '{uri}': {reason}")]
    Manifest {
        /// The origin whose manifest failed.
        uri: ResourceUri,
        /// What went wrong.
        reason: String,
    },

    /// An entry failed integrity verification.
    #[error("entry '{entry}' of '{uri}' failed verification: {reason}")]
    Verification {
        /// The origin containing the entry.
        uri: ResourceUri,
        /// The entry that failed.
        entry: String,
        /// What went wrong.
        reason: String,
    },
}

/// Errors from reconciling signing evidence into a domain.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// One evidence side present without the other, under
    /// [`MismatchPolicy::Reject`](crate::MismatchPolicy::Reject).
    #[error("mismatched signing evidence for '{uri}': {present} present without {missing}")]
    MismatchedEvidence {
        /// The origin with lopsided evidence.
        uri: ResourceUri,
        /// The evidence side that was found.
        present: &'static str,
        /// The evidence side that was absent.
        missing: &'static str,
    },
}

/// Errors from entering a scope.
#[derive(Debug, Error)]
pub enum ScopeError {
    /// Extraction failed against the archive.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Resolution rejected the extracted evidence.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// A permission check failed against the effective context.
///
/// Carries the probe that was denied and, when a specific domain blocked
/// it, the origin of that domain. Raised by the context walk and
/// propagated to the caller unchanged.
#[derive(Debug, Error)]
#[error("access denied: {permission}{}", .blocked_by.as_ref().map(|u| format!(" (blocked by {u})")).unwrap_or_default())]
pub struct AccessDenied {
    /// The permission that was refused.
    pub permission: Permission,
    /// The origin whose domain refused it, if the denial came from a
    /// specific domain rather than an empty context.
    pub blocked_by: Option<ResourceUri>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use codescope_types::Access;

    fn uri() -> ResourceUri {
        ResourceUri::parse("file:///opt/p.jar").expect("uri")
    }

    #[test]
    fn open_error_chains_io_source() {
        use std::error::Error;

        let err = ArchiveError::Open {
            uri: uri(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("file:///opt/p.jar"), "got: {err}");
        assert!(err.source().is_some());
    }

    #[test]
    fn verification_error_names_entry() {
        let err = ArchiveError::Verification {
            uri: uri(),
            entry: "plugin.wasm".to_string(),
            reason: "digest mismatch".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("plugin.wasm"), "got: {msg}");
        assert!(msg.contains("digest mismatch"), "got: {msg}");
    }

    #[test]
    fn mismatched_evidence_display() {
        let err = ResolveError::MismatchedEvidence {
            uri: uri(),
            present: "signers",
            missing: "certificates",
        };
        let msg = err.to_string();
        assert!(msg.contains("signers present without certificates"), "got: {msg}");
    }

    #[test]
    fn scope_error_is_transparent() {
        let inner = ArchiveError::Manifest {
            uri: uri(),
            reason: "truncated".to_string(),
        };
        let inner_msg = inner.to_string();
        let err = ScopeError::from(inner);
        assert_eq!(err.to_string(), inner_msg);
    }

    #[test]
    fn access_denied_display() {
        let err = AccessDenied {
            permission: Permission::new(Access::READ, Some("/data/feed.json")),
            blocked_by: None,
        };
        assert_eq!(err.to_string(), "access denied: READ on '/data/feed.json'");

        let err = AccessDenied {
            permission: Permission::new(Access::READ, Some("/data/feed.json")),
            blocked_by: Some(uri()),
        };
        let msg = err.to_string();
        assert!(msg.contains("blocked by file:///opt/p.jar"), "got: {msg}");
    }
}
