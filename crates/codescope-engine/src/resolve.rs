//! Domain resolution: evidence + oracle → protection domain.
//!
//! [`DomainResolver`] turns an origin URI and its extracted signing
//! evidence into one [`ProtectionDomain`] by querying the policy oracle
//! under each applicable identity and keeping the most permissive answer.
//!
//! # Reconciliation Policy
//!
//! | Evidence | Oracle queries | Winner |
//! |----------|----------------|--------|
//! | none | 1 × `Unsigned` | the only answer |
//! | signers and/or certificates | 1 × signer key, 1 × certificate key | larger permission **count**; ties favor signers |
//!
//! The losing identity and its permission set are discarded whole — the
//! sets are never merged or unioned. Count comparison is a heuristic for
//! "more specific grant", inherited from the behavior this engine
//! preserves; see `DESIGN.md` for the open question around it.

use crate::{PolicyOracle, ResolveError};
use codescope_types::{CodeSource, Credentials, ProtectionDomain, ResourceUri, SigningDetails};
use tracing::debug;

/// How to treat evidence where only one of signers/certificates is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// Resolve anyway, degrading the absent side to the unsigned
    /// identity. Preserves the historical behavior.
    #[default]
    Tolerate,
    /// Fail resolution with [`ResolveError::MismatchedEvidence`].
    Reject,
}

/// Builds one protection domain per origin from evidence and policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainResolver {
    mismatch: MismatchPolicy,
}

impl DomainResolver {
    /// Creates a resolver with [`MismatchPolicy::Tolerate`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mismatched-evidence policy.
    #[must_use]
    pub fn with_mismatch_policy(mut self, mismatch: MismatchPolicy) -> Self {
        self.mismatch = mismatch;
        self
    }

    /// Resolves `uri` + `details` into a protection domain.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MismatchedEvidence`] only under
    /// [`MismatchPolicy::Reject`] when exactly one evidence side is
    /// present.
    pub fn resolve<O: PolicyOracle + ?Sized>(
        &self,
        oracle: &O,
        uri: &ResourceUri,
        details: &SigningDetails,
    ) -> Result<ProtectionDomain, ResolveError> {
        if details.is_unsigned() {
            let credentials = Credentials::Unsigned;
            let permissions = oracle.permissions(uri, &credentials);
            debug!(uri = %uri, granted = permissions.len(), "resolved unsigned domain");
            return Ok(ProtectionDomain::new(
                CodeSource::new(uri.clone(), credentials),
                permissions,
            ));
        }

        if self.mismatch == MismatchPolicy::Reject {
            match (&details.signers, &details.certificates) {
                (Some(_), None) => {
                    return Err(ResolveError::MismatchedEvidence {
                        uri: uri.clone(),
                        present: "signers",
                        missing: "certificates",
                    })
                }
                (None, Some(_)) => {
                    return Err(ResolveError::MismatchedEvidence {
                        uri: uri.clone(),
                        present: "certificates",
                        missing: "signers",
                    })
                }
                _ => {}
            }
        }

        // An absent side degrades to the unsigned identity of the same
        // origin, mirroring a code source with null credentials.
        let signer_creds = details
            .signers
            .clone()
            .map_or(Credentials::Unsigned, Credentials::Signers);
        let cert_creds = details
            .certificates
            .clone()
            .map_or(Credentials::Unsigned, Credentials::Certificates);

        let signer_permissions = oracle.permissions(uri, &signer_creds);
        let cert_permissions = oracle.permissions(uri, &cert_creds);

        // Larger grant wins; >= makes the signer identity win ties.
        let signers_win = signer_permissions.len() >= cert_permissions.len();
        let (credentials, permissions) = if signers_win {
            (signer_creds, signer_permissions)
        } else {
            (cert_creds, cert_permissions)
        };
        debug!(
            uri = %uri,
            winner = credentials.kind(),
            granted = permissions.len(),
            "reconciled signed domain"
        );
        Ok(ProtectionDomain::new(
            CodeSource::new(uri.clone(), credentials),
            permissions,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MapOracle;
    use codescope_types::{Access, Certificate, Permission, PermissionSet, Signer};

    fn uri() -> ResourceUri {
        ResourceUri::parse("file:///opt/p.jar").expect("uri")
    }

    fn grants(n: usize) -> PermissionSet {
        (0..n)
            .map(|i| Permission::new(Access::READ, Some(format!("/data/{i}"))))
            .collect()
    }

    fn both_sides() -> SigningDetails {
        SigningDetails {
            signers: Some(vec![Signer::new("CN=Release")]),
            certificates: Some(vec![Certificate::new("CN=Release", "ab12")]),
        }
    }

    #[test]
    fn unsigned_queries_oracle_exactly_once() {
        let oracle = MapOracle::new().grant(&uri(), "unsigned", grants(2));
        let resolver = DomainResolver::new();

        let domain = resolver
            .resolve(&oracle, &uri(), &SigningDetails::absent())
            .expect("resolve");

        assert_eq!(oracle.query_count(), 1);
        assert_eq!(domain.source().credentials(), &Credentials::Unsigned);
        assert_eq!(domain.permissions(), &grants(2));
    }

    #[test]
    fn signed_queries_both_identities() {
        let oracle = MapOracle::new()
            .grant(&uri(), "signers", grants(5))
            .grant(&uri(), "certificates", grants(3));
        let resolver = DomainResolver::new();

        let domain = resolver
            .resolve(&oracle, &uri(), &both_sides())
            .expect("resolve");

        assert_eq!(oracle.query_count(), 2);
        assert_eq!(domain.source().credentials().kind(), "signers");
        assert_eq!(domain.permissions().len(), 5);
    }

    #[test]
    fn larger_certificate_grant_wins() {
        let oracle = MapOracle::new()
            .grant(&uri(), "signers", grants(1))
            .grant(&uri(), "certificates", grants(4));
        let resolver = DomainResolver::new();

        let domain = resolver
            .resolve(&oracle, &uri(), &both_sides())
            .expect("resolve");

        assert_eq!(domain.source().credentials().kind(), "certificates");
        assert_eq!(domain.permissions().len(), 4);
    }

    #[test]
    fn tie_favors_signers() {
        let oracle = MapOracle::new()
            .grant(&uri(), "signers", grants(3))
            .grant(&uri(), "certificates", grants(3));
        let resolver = DomainResolver::new();

        let domain = resolver
            .resolve(&oracle, &uri(), &both_sides())
            .expect("resolve");

        assert_eq!(domain.source().credentials().kind(), "signers");
    }

    #[test]
    fn loser_is_discarded_not_merged() {
        let oracle = MapOracle::new()
            .grant(
                &uri(),
                "signers",
                PermissionSet::from(vec![
                    Permission::new(Access::READ, Some("/a")),
                    Permission::new(Access::READ, Some("/b")),
                ]),
            )
            .grant(
                &uri(),
                "certificates",
                PermissionSet::from(vec![Permission::new(Access::WRITE, Some("/c"))]),
            );
        let resolver = DomainResolver::new();

        let domain = resolver
            .resolve(&oracle, &uri(), &both_sides())
            .expect("resolve");

        // The certificate grant must not leak into the winning domain.
        assert!(!domain.implies(&Permission::new(Access::WRITE, Some("/c"))));
        assert!(domain.implies(&Permission::new(Access::READ, Some("/a"))));
    }

    #[test]
    fn tolerate_degrades_missing_side_to_unsigned() {
        let signers_only = SigningDetails {
            signers: Some(vec![Signer::new("CN=Release")]),
            certificates: None,
        };
        let oracle = MapOracle::new()
            .grant(&uri(), "signers", grants(1))
            .grant(&uri(), "unsigned", grants(4));
        let resolver = DomainResolver::new();

        let domain = resolver
            .resolve(&oracle, &uri(), &signers_only)
            .expect("resolve");

        // The unsigned identity stood in for the missing certificate side
        // and won on count.
        assert_eq!(oracle.query_count(), 2);
        assert_eq!(domain.source().credentials(), &Credentials::Unsigned);
        assert_eq!(domain.permissions().len(), 4);
    }

    #[test]
    fn reject_fails_on_signers_without_certificates() {
        let signers_only = SigningDetails {
            signers: Some(vec![Signer::new("CN=Release")]),
            certificates: None,
        };
        let oracle = MapOracle::new();
        let resolver = DomainResolver::new().with_mismatch_policy(MismatchPolicy::Reject);

        let err = resolver.resolve(&oracle, &uri(), &signers_only).unwrap_err();
        assert!(matches!(err, ResolveError::MismatchedEvidence { .. }));
        assert_eq!(oracle.query_count(), 0);
    }

    #[test]
    fn reject_fails_on_certificates_without_signers() {
        let certs_only = SigningDetails {
            signers: None,
            certificates: Some(vec![Certificate::new("CN=Release", "ab12")]),
        };
        let oracle = MapOracle::new();
        let resolver = DomainResolver::new().with_mismatch_policy(MismatchPolicy::Reject);

        let err = resolver.resolve(&oracle, &uri(), &certs_only).unwrap_err();
        assert!(matches!(err, ResolveError::MismatchedEvidence { .. }));
    }

    #[test]
    fn reject_accepts_paired_evidence() {
        let oracle = MapOracle::new()
            .grant(&uri(), "signers", grants(2))
            .grant(&uri(), "certificates", grants(1));
        let resolver = DomainResolver::new().with_mismatch_policy(MismatchPolicy::Reject);

        let domain = resolver
            .resolve(&oracle, &uri(), &both_sides())
            .expect("resolve");
        assert_eq!(domain.source().credentials().kind(), "signers");
    }

    #[test]
    fn unknown_identity_yields_empty_domain() {
        let oracle = MapOracle::new();
        let resolver = DomainResolver::new();

        let domain = resolver
            .resolve(&oracle, &uri(), &SigningDetails::absent())
            .expect("resolve");
        assert!(domain.permissions().is_empty());
    }
}
