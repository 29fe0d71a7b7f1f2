//! Permission and permission-set types.
//!
//! A [`Permission`] pairs an [`Access`] action mask with an optional
//! target, and a [`PermissionSet`] is the opaque collection the policy
//! oracle hands back for one (origin, credentials) key.
//!
//! # Opacity
//!
//! The reconciliation policy in the resolver compares permission sets by
//! **count only** — it never inspects, merges, or unions their contents.
//! `PermissionSet` therefore deliberately exposes no union operation;
//! the losing set of a comparison is discarded whole.
//!
//! # Example
//!
//! ```
//! use codescope_types::{Access, Permission, PermissionSet};
//!
//! let grant = Permission::new(Access::READ, Some("/data"));
//! let set = PermissionSet::from(vec![grant]);
//!
//! assert_eq!(set.len(), 1);
//! assert!(set.implies(&Permission::new(Access::READ, Some("/data/feed.json"))));
//! assert!(!set.implies(&Permission::new(Access::WRITE, Some("/data/feed.json"))));
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Actions a permission can grant.
    ///
    /// | Flag | Gated operations |
    /// |------|------------------|
    /// | [`READ`](Self::READ) | reading files or entries under the target |
    /// | [`WRITE`](Self::WRITE) | creating or overwriting under the target |
    /// | [`DELETE`](Self::DELETE) | removing under the target |
    /// | [`EXECUTE`](Self::EXECUTE) | running code loaded from the target |
    /// | [`CONNECT`](Self::CONNECT) | opening a connection to the target |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Access: u8 {
        /// Read files or entries.
        const READ    = 0b0000_0001;
        /// Create or overwrite files.
        const WRITE   = 0b0000_0010;
        /// Remove files.
        const DELETE  = 0b0000_0100;
        /// Run loaded code.
        const EXECUTE = 0b0000_1000;
        /// Open outbound connections.
        const CONNECT = 0b0001_0000;
    }
}

impl Access {
    /// All actions.
    pub const ALL: Self = Self::all();

    /// Returns a human-readable list of action names.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Self::READ) {
            names.push("READ");
        }
        if self.contains(Self::WRITE) {
            names.push("WRITE");
        }
        if self.contains(Self::DELETE) {
            names.push("DELETE");
        }
        if self.contains(Self::EXECUTE) {
            names.push("EXECUTE");
        }
        if self.contains(Self::CONNECT) {
            names.push("CONNECT");
        }
        names
    }
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.names();
        if names.is_empty() {
            write!(f, "(none)")
        } else {
            write!(f, "{}", names.join(" | "))
        }
    }
}

/// One permission: an action mask over an optional target.
///
/// # Implication
///
/// A granted permission implies a probe when:
///
/// - the grant's access mask contains the probe's mask, and
/// - the grant has no target (applies anywhere), or the grant's target
///   equals the probe's target, or the probe's target continues past the
///   grant's at a `/` component boundary.
///
/// The boundary rule means a grant on `/data` covers `/data/feed.json`
/// but not the sibling `/database` — a raw string prefix would widen the
/// grant across path components. Non-path targets (host:port strings and
/// the like) therefore match only on equality unless the grant itself
/// ends with `/`.
///
/// # Example
///
/// ```
/// use codescope_types::{Access, Permission};
///
/// let grant = Permission::new(Access::READ | Access::WRITE, Some("/data"));
/// assert!(grant.implies(&Permission::new(Access::READ, Some("/data/x"))));
/// assert!(!grant.implies(&Permission::new(Access::DELETE, Some("/data/x"))));
/// assert!(!grant.implies(&Permission::new(Access::READ, Some("/etc/x"))));
/// assert!(!grant.implies(&Permission::new(Access::READ, Some("/database/x"))));
///
/// let anywhere = Permission::new(Access::CONNECT, None::<&str>);
/// assert!(anywhere.implies(&Permission::new(Access::CONNECT, Some("example.com:443"))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    /// Granted actions.
    pub access: Access,
    /// Target the actions apply to; `None` means any target.
    pub target: Option<String>,
}

impl Permission {
    /// Creates a permission.
    #[must_use]
    pub fn new(access: Access, target: Option<impl Into<String>>) -> Self {
        Self {
            access,
            target: target.map(Into::into),
        }
    }

    /// Returns `true` if this grant covers the probe permission.
    #[must_use]
    pub fn implies(&self, probe: &Permission) -> bool {
        if !self.access.contains(probe.access) {
            return false;
        }
        match (&self.target, &probe.target) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(grant), Some(asked)) => Self::target_covers(grant, asked),
        }
    }

    /// Prefix match that only extends past the grant at a `/` boundary,
    /// so `/data` covers `/data/x` but not `/database`.
    fn target_covers(grant: &str, asked: &str) -> bool {
        match asked.strip_prefix(grant) {
            Some("") => true,
            Some(rest) => rest.starts_with('/') || grant.ends_with('/'),
            None => false,
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{} on '{target}'", self.access),
            None => write!(f, "{} on any target", self.access),
        }
    }
}

/// An opaque, ordered collection of permissions.
///
/// Obtained from the policy oracle for one (origin, credentials) key.
/// Comparable only by [`len`](Self::len); the resolver's reconciliation
/// uses the count as its sole tie-break metric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    permissions: Vec<Permission>,
}

impl PermissionSet {
    /// Creates an empty set (grants nothing).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the number of permissions in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Returns `true` if the set grants nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Returns `true` if any member grant covers the probe.
    #[must_use]
    pub fn implies(&self, probe: &Permission) -> bool {
        self.permissions.iter().any(|p| p.implies(probe))
    }

    /// Iterates the permissions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }
}

impl From<Vec<Permission>> for PermissionSet {
    fn from(permissions: Vec<Permission>) -> Self {
        Self { permissions }
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(target: &str) -> Permission {
        Permission::new(Access::READ, Some(target))
    }

    #[test]
    fn access_display() {
        assert_eq!(Access::READ.to_string(), "READ");
        assert_eq!((Access::READ | Access::WRITE).to_string(), "READ | WRITE");
        assert_eq!(Access::empty().to_string(), "(none)");
    }

    #[test]
    fn access_all_contains_everything() {
        for flag in [
            Access::READ,
            Access::WRITE,
            Access::DELETE,
            Access::EXECUTE,
            Access::CONNECT,
        ] {
            assert!(Access::ALL.contains(flag));
        }
    }

    #[test]
    fn implies_requires_access_superset() {
        let grant = Permission::new(Access::READ | Access::WRITE, None::<&str>);
        assert!(grant.implies(&Permission::new(Access::READ, None::<&str>)));
        assert!(grant.implies(&Permission::new(Access::READ | Access::WRITE, None::<&str>)));
        assert!(!grant.implies(&Permission::new(Access::DELETE, None::<&str>)));
    }

    #[test]
    fn implies_target_prefix() {
        let grant = read("/data");
        assert!(grant.implies(&read("/data")));
        assert!(grant.implies(&read("/data/feed.json")));
        assert!(!grant.implies(&read("/etc/passwd")));
    }

    #[test]
    fn implies_stops_at_component_boundary() {
        // /data must not leak into its sibling /database.
        let grant = read("/data");
        assert!(!grant.implies(&read("/database")));
        assert!(!grant.implies(&read("/database/secret")));
        assert!(!grant.implies(&read("/data2/x")));
    }

    #[test]
    fn implies_trailing_slash_grant_covers_children() {
        let grant = read("/data/");
        assert!(grant.implies(&read("/data/feed.json")));
        assert!(!grant.implies(&read("/data")));
    }

    #[test]
    fn implies_non_path_target_requires_equality() {
        let grant = Permission::new(Access::CONNECT, Some("example.com:443"));
        assert!(grant.implies(&Permission::new(Access::CONNECT, Some("example.com:443"))));
        assert!(!grant.implies(&Permission::new(Access::CONNECT, Some("example.com:4433"))));
    }

    #[test]
    fn implies_untargeted_grant_covers_any() {
        let grant = Permission::new(Access::READ, None::<&str>);
        assert!(grant.implies(&read("/anywhere")));
        assert!(grant.implies(&Permission::new(Access::READ, None::<&str>)));
    }

    #[test]
    fn implies_targeted_grant_rejects_untargeted_probe() {
        let grant = read("/data");
        assert!(!grant.implies(&Permission::new(Access::READ, None::<&str>)));
    }

    #[test]
    fn permission_display() {
        let p = read("/data");
        assert_eq!(p.to_string(), "READ on '/data'");
        let p = Permission::new(Access::CONNECT, None::<&str>);
        assert_eq!(p.to_string(), "CONNECT on any target");
    }

    #[test]
    fn set_len_and_empty() {
        assert_eq!(PermissionSet::empty().len(), 0);
        assert!(PermissionSet::empty().is_empty());

        let set = PermissionSet::from(vec![read("/a"), read("/b")]);
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn set_implies_any_member() {
        let set = PermissionSet::from(vec![read("/a"), Permission::new(Access::WRITE, Some("/b"))]);
        assert!(set.implies(&read("/a/x")));
        assert!(set.implies(&Permission::new(Access::WRITE, Some("/b/y"))));
        assert!(!set.implies(&Permission::new(Access::WRITE, Some("/a/x"))));
    }

    #[test]
    fn empty_set_implies_nothing() {
        assert!(!PermissionSet::empty().implies(&read("/a")));
    }

    #[test]
    fn set_from_iterator() {
        let set: PermissionSet = [read("/a"), read("/b")].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn serde_roundtrip() {
        let set = PermissionSet::from(vec![
            read("/data"),
            Permission::new(Access::CONNECT, None::<&str>),
        ]);
        let json = serde_json::to_string(&set).expect("serialize");
        let parsed: PermissionSet = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, set);
    }
}
