//! Policy oracle trait.
//!
//! The oracle is the external policy engine that maps an origin identity
//! plus credentials to a permission set. The scoping engine treats it as
//! opaque: it never inspects grant rules, only counts and checks the
//! returned sets.
//!
//! # Architecture
//!
//! ```text
//! PolicyOracle trait (codescope-engine)   ← trait definition (THIS MODULE)
//!          │
//!          ├── host policy engine          ← production impl
//!          └── testing::MapOracle          ← scripted impl for tests
//! ```
//!
//! # Query Discipline
//!
//! The resolver queries the oracle:
//!
//! - exactly once for an unsigned resource (`Credentials::Unsigned`), or
//! - exactly twice for a signed resource (once per credential kind),
//!
//! and never at all when enforcement is disabled.

use codescope_types::{Credentials, PermissionSet, ResourceUri};

/// External policy engine mapping (origin, credentials) to permissions.
///
/// Implementations must answer independently for each credential kind of
/// the same origin: the resolver compares the answers and keeps one.
///
/// # Example
///
/// ```
/// use codescope_engine::PolicyOracle;
/// use codescope_types::{Credentials, PermissionSet, ResourceUri};
///
/// #[derive(Debug)]
/// struct DenyAll;
///
/// impl PolicyOracle for DenyAll {
///     fn permissions(&self, _uri: &ResourceUri, _credentials: &Credentials) -> PermissionSet {
///         PermissionSet::empty()
///     }
/// }
///
/// let oracle = DenyAll;
/// let uri = ResourceUri::parse("file:///opt/p.jar").unwrap();
/// assert!(oracle.permissions(&uri, &Credentials::Unsigned).is_empty());
/// ```
pub trait PolicyOracle: Send + Sync + std::fmt::Debug {
    /// Returns the permission set granted to `uri` under `credentials`.
    ///
    /// An unknown identity should yield an empty set, not an error: the
    /// oracle's answer is authoritative and "grants nothing" is a valid
    /// answer.
    fn permissions(&self, uri: &ResourceUri, credentials: &Credentials) -> PermissionSet;
}

#[cfg(test)]
mod tests {
    use super::*;
    use codescope_types::{Access, Permission};
    use std::sync::Arc;

    #[derive(Debug)]
    struct FixedOracle(PermissionSet);

    impl PolicyOracle for FixedOracle {
        fn permissions(&self, _uri: &ResourceUri, _credentials: &Credentials) -> PermissionSet {
            self.0.clone()
        }
    }

    fn uri() -> ResourceUri {
        ResourceUri::parse("file:///opt/p.jar").expect("uri")
    }

    #[test]
    fn fixed_oracle_returns_its_set() {
        let set = PermissionSet::from(vec![Permission::new(Access::READ, Some("/data"))]);
        let oracle = FixedOracle(set.clone());
        assert_eq!(oracle.permissions(&uri(), &Credentials::Unsigned), set);
    }

    #[test]
    fn trait_object_box_dyn() {
        let oracle: Box<dyn PolicyOracle> = Box::new(FixedOracle(PermissionSet::empty()));
        assert!(oracle.permissions(&uri(), &Credentials::Unsigned).is_empty());
    }

    #[test]
    fn trait_object_arc_dyn() {
        let oracle: Arc<dyn PolicyOracle> = Arc::new(FixedOracle(PermissionSet::empty()));
        let clone = Arc::clone(&oracle);
        assert!(clone.permissions(&uri(), &Credentials::Unsigned).is_empty());
    }
}
