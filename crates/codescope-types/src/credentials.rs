//! Signing evidence extracted from a resource.
//!
//! When an archive is signed, its integrity manifest yields two kinds of
//! cryptographic evidence for a representative entry: the [`Signer`]s
//! (who signed) and the raw [`Certificate`]s backing them. Either may be
//! absent. The pair travels as [`SigningDetails`] from the extractor to
//! the resolver, which turns one side of it into the [`Credentials`] key
//! used against the policy oracle.
//!
//! # Pairing Is Not Validated
//!
//! Signers and certificates usually come as a pair, but nothing here
//! enforces that. Whether a lone side should be rejected is a resolver
//! policy decision (`MismatchPolicy` in the engine crate), not a property
//! of the evidence itself.

use serde::{Deserialize, Serialize};

/// One signer of an archive entry: the identity that produced a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signer {
    /// Distinguished name of the signing identity.
    pub subject: String,
}

impl Signer {
    /// Creates a signer from its subject name.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

impl std::fmt::Display for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "signer:{}", self.subject)
    }
}

/// One certificate attached to an archive entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Certificate {
    /// Distinguished name of the certificate subject.
    pub subject: String,
    /// Digest of the encoded certificate, hex-encoded.
    pub fingerprint: String,
}

impl Certificate {
    /// Creates a certificate from its subject and fingerprint.
    #[must_use]
    pub fn new(subject: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            fingerprint: fingerprint.into(),
        }
    }
}

impl std::fmt::Display for Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cert:{}@{}", self.subject, self.fingerprint)
    }
}

/// Signing evidence read from one representative signed entry.
///
/// Both sides absent means the resource is unsigned. Both present is the
/// normal signed case. One side present without the other is tolerated
/// here and adjudicated by the resolver.
///
/// # Example
///
/// ```
/// use codescope_types::{Signer, SigningDetails};
///
/// assert!(SigningDetails::absent().is_unsigned());
///
/// let signed = SigningDetails {
///     signers: Some(vec![Signer::new("CN=Release")]),
///     certificates: None,
/// };
/// assert!(!signed.is_unsigned());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningDetails {
    /// Signers of the representative entry, in signature order.
    pub signers: Option<Vec<Signer>>,
    /// Certificates of the representative entry, in chain order.
    pub certificates: Option<Vec<Certificate>>,
}

impl SigningDetails {
    /// Evidence for an unsigned resource: both sides absent.
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }

    /// Returns `true` if no evidence is present on either side.
    #[must_use]
    pub fn is_unsigned(&self) -> bool {
        self.signers.is_none() && self.certificates.is_none()
    }
}

/// The credential key used to query the policy oracle.
///
/// The oracle must answer independently for each variant of the same
/// origin URI; the resolver compares the answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Credentials {
    /// No signing evidence: the unsigned identity of the origin.
    Unsigned,
    /// Signer-based identity.
    Signers(Vec<Signer>),
    /// Certificate-based identity.
    Certificates(Vec<Certificate>),
}

impl Credentials {
    /// Returns a short label for the credential kind, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unsigned => "unsigned",
            Self::Signers(_) => "signers",
            Self::Certificates(_) => "certificates",
        }
    }
}

impl std::fmt::Display for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsigned => write!(f, "unsigned"),
            Self::Signers(s) => write!(f, "signers[{}]", s.len()),
            Self::Certificates(c) => write!(f, "certificates[{}]", c.len()),
        }
    }
}
