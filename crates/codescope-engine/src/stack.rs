//! The per-thread protection-domain stack.
//!
//! [`DomainStack`] is the ordered list of domains currently in scope for
//! one thread, plus a cached [`EffectiveContext`]. Push and pop both
//! invalidate the cache; [`current`](DomainStack::current) lazily
//! rebuilds it, so a read always reflects the stack's contents at that
//! moment — no stale contexts.
//!
//! The stack itself enforces nothing about pairing: the engine's
//! [`ScopeGuard`](crate::ScopeGuard) guarantees every push is matched by
//! a pop. Popping an empty stack is a tolerated no-op, not an error.

use crate::EffectiveContext;
use codescope_types::ProtectionDomain;
use tracing::debug;

/// Ordered stack of in-scope domains with a cached effective context.
#[derive(Debug, Default)]
pub(crate) struct DomainStack {
    domains: Vec<ProtectionDomain>,
    cached: Option<EffectiveContext>,
}

impl DomainStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a domain and invalidates the cached context.
    pub(crate) fn push(&mut self, domain: ProtectionDomain) {
        debug!(domain = %domain, depth = self.domains.len() + 1, "scope entered");
        self.domains.push(domain);
        self.cached = None;
    }

    /// Removes the most recent domain, if any, and invalidates the cache.
    ///
    /// Popping an empty stack is a no-op.
    pub(crate) fn pop(&mut self) -> Option<ProtectionDomain> {
        let popped = self.domains.pop()?;
        debug!(domain = %popped, depth = self.domains.len(), "scope exited");
        self.cached = None;
        Some(popped)
    }

    /// The effective context for the current stack contents.
    ///
    /// Returns the cached context when valid; otherwise rebuilds it —
    /// the empty context for an empty stack, or a context over the
    /// ordered domain list verbatim.
    pub(crate) fn current(&mut self) -> EffectiveContext {
        if let Some(cached) = &self.cached {
            return cached.clone();
        }
        let context = if self.domains.is_empty() {
            EffectiveContext::empty()
        } else {
            EffectiveContext::from_domains(self.domains.clone())
        };
        self.cached = Some(context.clone());
        context
    }

    pub(crate) fn depth(&self) -> usize {
        self.domains.len()
    }
}
