//! The effective access-control context.
//!
//! An [`EffectiveContext`] is the materialized, checkable form of
//! "everything currently in scope": the ordered protection domains the
//! stack held when it was built, and nothing else. Whatever ambient call
//! stack surrounds a check is irrelevant — the assigned domain list is
//! used verbatim.
//!
//! # Check Semantics
//!
//! ```text
//! Unrestricted            → every probe allowed (enforcement disabled)
//! Assigned([])            → every probe denied (zero domains vouch)
//! Assigned([d1, .., dn])  → allowed iff EVERY domain implies the probe
//! ```
//!
//! The all-domains rule is the intersection walk of a stack-inspecting
//! access controller: an operation performed on behalf of several origins
//! is only as privileged as the least privileged of them.

use crate::AccessDenied;
use codescope_types::{Permission, ProtectionDomain};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
enum ContextKind {
    Unrestricted,
    Assigned(Arc<[ProtectionDomain]>),
}

/// The materialized authorization state for one thread's current scopes.
///
/// Cheap to clone: the domain list is shared, not copied.
///
/// # Example
///
/// ```
/// use codescope_engine::EffectiveContext;
/// use codescope_types::{Access, Permission};
///
/// let probe = Permission::new(Access::READ, Some("/data"));
///
/// // Zero domains: maximal restriction, not maximal privilege.
/// assert!(!EffectiveContext::empty().authorizes(&probe));
///
/// // No enforcement: everything passes.
/// assert!(EffectiveContext::unrestricted().authorizes(&probe));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveContext {
    kind: ContextKind,
}

impl EffectiveContext {
    /// A context that allows everything. Used only when enforcement is
    /// disabled at engine construction.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self {
            kind: ContextKind::Unrestricted,
        }
    }

    /// A context built from zero protection domains: denies every probe.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_domains(Vec::new())
    }

    /// A context over an ordered domain list, used verbatim.
    #[must_use]
    pub fn from_domains(domains: Vec<ProtectionDomain>) -> Self {
        Self {
            kind: ContextKind::Assigned(Arc::from(domains)),
        }
    }

    /// Returns `true` if this context performs no checks at all.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        matches!(self.kind, ContextKind::Unrestricted)
    }

    /// The number of assigned domains (0 for the empty context).
    #[must_use]
    pub fn domain_count(&self) -> usize {
        match &self.kind {
            ContextKind::Unrestricted => 0,
            ContextKind::Assigned(domains) => domains.len(),
        }
    }

    /// Checks a probe against this context.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] when any assigned domain does not imply
    /// the probe, or when the context has zero domains. The error names
    /// the blocking origin when a specific domain refused.
    pub fn check(&self, probe: &Permission) -> Result<(), AccessDenied> {
        match &self.kind {
            ContextKind::Unrestricted => Ok(()),
            ContextKind::Assigned(domains) => {
                if domains.is_empty() {
                    return Err(AccessDenied {
                        permission: probe.clone(),
                        blocked_by: None,
                    });
                }
                for domain in domains.iter() {
                    if !domain.implies(probe) {
                        return Err(AccessDenied {
                            permission: probe.clone(),
                            blocked_by: Some(domain.source().uri().clone()),
                        });
                    }
                }
                Ok(())
            }
        }
    }

    /// Boolean form of [`check`](Self::check).
    #[must_use]
    pub fn authorizes(&self, probe: &Permission) -> bool {
        self.check(probe).is_ok()
    }
}

impl std::fmt::Display for EffectiveContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ContextKind::Unrestricted => write!(f, "context:unrestricted"),
            ContextKind::Assigned(domains) => write!(f, "context:{} domains", domains.len()),
        }
    }
}
