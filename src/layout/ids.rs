// SPDX-License-Identifier: GPL-3.0-only

//! Identifier allocation for layout build sessions.
//!
//! Every node in a built keyset tree carries an identifier that is unique
//! within the build session that produced it. Identifiers are issued by an
//! explicit [`IdAllocator`] constructed per build, never by ambient global
//! state, so repeated or concurrent builds in tests are trivially isolated
//! from one another.

use std::fmt;

/// Issues unique string identifiers within one namespace lifetime.
///
/// An identifier is the namespace prefix followed by a strictly increasing
/// counter, e.g. `us_compact0`, `us_compact1`, ... Counters are never reused
/// within one prefix lifetime, so all identifiers issued between two
/// [`set_namespace`](Self::set_namespace) calls are pairwise distinct, and
/// two builds under different prefixes produce disjoint identifier sets.
///
/// Single-writer contract: an allocator must be driven by one build pass run
/// to completion before another pass begins. Interleaving two builds under
/// the same namespace would corrupt uniqueness; this is a documented usage
/// constraint, not a lock-protected resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    prefix: String,
    counter: u64,
}

impl IdAllocator {
    /// Creates an allocator scoped to `prefix` with the counter at zero.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: 0,
        }
    }

    /// Stores a new namespace prefix and resets the counter to zero.
    pub fn set_namespace(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
        self.counter = 0;
    }

    /// Returns the next identifier under the current namespace.
    pub fn next(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.counter);
        self.counter += 1;
        id
    }

    /// The current namespace prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// How many identifiers have been issued under the current namespace.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.counter
    }
}

impl fmt::Display for IdAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.prefix, self.counter)
    }
}

// ============================================================================
// Tests
// ============================================================================
