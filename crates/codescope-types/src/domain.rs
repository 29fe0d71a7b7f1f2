//! Code sources and protection domains.
//!
//! A [`CodeSource`] names *where code came from and under which identity*
//! (origin URI plus the winning credentials). A [`ProtectionDomain`] pairs
//! that source with the permission set the policy oracle granted it:
//! "what code from this resource is allowed to do."
//!
//! Both are immutable value types. A domain is constructed once per scope
//! entry and discarded when the scope exits; nothing mutates it in between.

use crate::{Credentials, Permission, PermissionSet, ResourceUri};
use serde::{Deserialize, Serialize};

/// The identity a permission set was granted to.
///
/// # Example
///
/// ```
/// use codescope_types::{CodeSource, Credentials, ResourceUri};
///
/// let uri = ResourceUri::parse("file:///opt/p.jar").unwrap();
/// let source = CodeSource::new(uri, Credentials::Unsigned);
/// assert_eq!(source.credentials().kind(), "unsigned");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSource {
    uri: ResourceUri,
    credentials: Credentials,
}

impl CodeSource {
    /// Creates a code source.
    #[must_use]
    pub fn new(uri: ResourceUri, credentials: Credentials) -> Self {
        Self { uri, credentials }
    }

    /// The origin URI.
    #[must_use]
    pub fn uri(&self) -> &ResourceUri {
        &self.uri
    }

    /// The credentials the origin was keyed with.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl std::fmt::Display for CodeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.uri, self.credentials)
    }
}

/// What code from one resource is allowed to do.
///
/// Immutable pairing of a [`CodeSource`] with its granted
/// [`PermissionSet`]. Domains live on the per-thread scope stack; the
/// effective context consults [`implies`](Self::implies) during checks.
///
/// # Example
///
/// ```
/// use codescope_types::{
///     Access, CodeSource, Credentials, Permission, PermissionSet, ProtectionDomain, ResourceUri,
/// };
///
/// let uri = ResourceUri::parse("file:///opt/p.jar").unwrap();
/// let grant = Permission::new(Access::READ, Some("/data"));
/// let domain = ProtectionDomain::new(
///     CodeSource::new(uri, Credentials::Unsigned),
///     PermissionSet::from(vec![grant]),
/// );
///
/// assert!(domain.implies(&Permission::new(Access::READ, Some("/data/feed.json"))));
/// assert!(!domain.implies(&Permission::new(Access::WRITE, Some("/data/feed.json"))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionDomain {
    source: CodeSource,
    permissions: PermissionSet,
}

impl ProtectionDomain {
    /// Creates a protection domain.
    #[must_use]
    pub fn new(source: CodeSource, permissions: PermissionSet) -> Self {
        Self {
            source,
            permissions,
        }
    }

    /// The identity this domain was granted to.
    #[must_use]
    pub fn source(&self) -> &CodeSource {
        &self.source
    }

    /// The granted permissions.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Returns `true` if this domain's grants cover the probe.
    #[must_use]
    pub fn implies(&self, probe: &Permission) -> bool {
        self.permissions.implies(probe)
    }
}

impl std::fmt::Display for ProtectionDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "domain[{} +{} permissions]",
            self.source,
            self.permissions.len()
        )
    }
}
