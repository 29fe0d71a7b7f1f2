//! The scope engine: entry point tying extraction, resolution, the
//! per-thread stack, and privileged invocation together.
//!
//! # Usage
//!
//! ```text
//! let engine = ScopeEngine::new(oracle, opener, Enforcement::Enforcing);
//!
//! let guard = engine.enter(&uri)?;          // extract + resolve + push
//! engine.invoke(|ctx| {
//!     ctx.check(&probe)?;                   // gate the privileged work
//!     do_the_work()
//! })?;
//! drop(guard);                              // matching pop, always
//! ```
//!
//! # Threading
//!
//! All mutable state (the domain stack and its context cache) is owned by
//! the engine instance, which is deliberately not `Sync`: construct one
//! engine per thread. One thread's scoping can never leak into another's
//! because nothing is shared.
//!
//! # Enforcement
//!
//! Whether scoping is active is explicit construction-time configuration,
//! not ambient process state. With [`Enforcement::Disabled`] every
//! operation is a complete no-op: the oracle and the archive opener are
//! never consulted, nothing is pushed, and every check passes.

use crate::{
    AccessDenied, ArchiveOpener, DomainResolver, EffectiveContext, MismatchPolicy, PolicyOracle,
    ScopeError, SignerExtractor,
};
use codescope_types::{Permission, ProtectionDomain, ResourceUri};
use std::cell::RefCell;
use tracing::debug;

use crate::stack::DomainStack;

/// Whether the engine performs any scoping work at all.
///
/// Explicit configuration, injected at construction. There is no
/// `Default`: hosts must state their intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    /// Scoping is off. Every engine operation is a complete no-op and
    /// no collaborator is ever called.
    Disabled,
    /// Scoping is on.
    Enforcing,
}

impl Enforcement {
    /// Returns `true` when scoping is active.
    #[must_use]
    pub fn is_enforcing(self) -> bool {
        matches!(self, Self::Enforcing)
    }
}

/// Per-thread privilege-scoping engine.
///
/// Owns the policy oracle, the signing extractor, the resolver, and the
/// thread's domain stack. See the [module docs](self) for the usage
/// pattern.
#[derive(Debug)]
pub struct ScopeEngine<O: PolicyOracle, A: ArchiveOpener> {
    oracle: O,
    extractor: SignerExtractor<A>,
    resolver: DomainResolver,
    enforcement: Enforcement,
    stack: RefCell<DomainStack>,
}

impl<O: PolicyOracle, A: ArchiveOpener> ScopeEngine<O, A> {
    /// Creates an engine with default extractor and resolver settings.
    #[must_use]
    pub fn new(oracle: O, opener: A, enforcement: Enforcement) -> Self {
        Self {
            oracle,
            extractor: SignerExtractor::new(opener),
            resolver: DomainResolver::new(),
            enforcement,
            stack: RefCell::new(DomainStack::new()),
        }
    }

    /// Sets the mismatched-evidence policy of the resolver.
    #[must_use]
    pub fn with_mismatch_policy(mut self, mismatch: MismatchPolicy) -> Self {
        self.resolver = self.resolver.with_mismatch_policy(mismatch);
        self
    }

    /// Replaces the entry-name suffixes that denote code units.
    #[must_use]
    pub fn with_code_suffixes(
        mut self,
        suffixes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.extractor = self.extractor.with_code_suffixes(suffixes);
        self
    }

    /// The configured enforcement mode.
    #[must_use]
    pub fn enforcement(&self) -> Enforcement {
        self.enforcement
    }

    /// The current scope depth (0 outside any scope).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.borrow().depth()
    }

    /// Enters a scope for `uri`: derives its protection domain and pushes
    /// it for the lifetime of the returned guard.
    ///
    /// Dropping the guard performs the matching pop on every exit path,
    /// including panics — callers need no try/finally discipline.
    ///
    /// With [`Enforcement::Disabled`] this returns an inactive guard
    /// without touching the oracle, the opener, or the stack.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError`] if the resource cannot be read or its
    /// evidence is rejected. On error nothing was pushed: the stack is
    /// exactly as it was before the call.
    pub fn enter(&self, uri: &ResourceUri) -> Result<ScopeGuard<'_>, ScopeError> {
        if !self.enforcement.is_enforcing() {
            return Ok(ScopeGuard { stack: None });
        }
        let details = self.extractor.extract(uri)?;
        let domain = self.resolver.resolve(&self.oracle, uri, &details)?;
        self.stack.borrow_mut().push(domain);
        Ok(ScopeGuard {
            stack: Some(&self.stack),
        })
    }

    /// Enters a scope for a pre-built domain.
    ///
    /// For hosts that construct domains themselves (or tests); same guard
    /// semantics as [`enter`](Self::enter), and the same complete no-op
    /// when enforcement is disabled.
    #[must_use]
    pub fn enter_domain(&self, domain: ProtectionDomain) -> ScopeGuard<'_> {
        if !self.enforcement.is_enforcing() {
            return ScopeGuard { stack: None };
        }
        self.stack.borrow_mut().push(domain);
        ScopeGuard {
            stack: Some(&self.stack),
        }
    }

    /// The effective context for the thread's current scopes.
    ///
    /// Rebuilt lazily after any push or pop; outside every scope this is
    /// the empty (deny-all) context, or the unrestricted context when
    /// enforcement is disabled.
    #[must_use]
    pub fn current_context(&self) -> EffectiveContext {
        if !self.enforcement.is_enforcing() {
            return EffectiveContext::unrestricted();
        }
        self.stack.borrow_mut().current()
    }

    /// Checks a probe against the current effective context.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] verbatim from the context walk.
    pub fn check(&self, probe: &Permission) -> Result<(), AccessDenied> {
        self.current_context().check(probe)
    }

    /// Runs an infallible action under the current effective context.
    pub fn invoke<T>(&self, action: impl FnOnce(&EffectiveContext) -> T) -> T {
        let context = self.current_context();
        action(&context)
    }

    /// Runs a fallible action under the current effective context.
    ///
    /// # Errors
    ///
    /// Propagates the action's error unchanged — including any
    /// [`AccessDenied`] the action surfaced from a context check.
    pub fn try_invoke<T, E>(
        &self,
        action: impl FnOnce(&EffectiveContext) -> Result<T, E>,
    ) -> Result<T, E> {
        let context = self.current_context();
        action(&context)
    }
}

/// Scope handle: its `Drop` performs the matching pop.
///
/// An inactive guard (from a disabled engine) pops nothing.
#[derive(Debug)]
#[must_use = "dropping the guard ends the scope; binding it to `_` ends it immediately"]
pub struct ScopeGuard<'a> {
    stack: Option<&'a RefCell<DomainStack>>,
}

impl ScopeGuard<'_> {
    /// Returns `true` if this guard holds a pushed domain.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.stack.is_some()
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if let Some(stack) = self.stack {
            if stack.borrow_mut().pop().is_none() {
                // Unbalanced pops are tolerated on the stack itself, but
                // an active guard finding an empty stack means something
                // else drained it.
                debug!("scope guard dropped over an already-empty stack");
            }
        }
    }
}
