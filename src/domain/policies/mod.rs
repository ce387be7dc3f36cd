//! # Business Policies
//!
//! A policy is a named bundle of specifications. Evaluating it yields a
//! [`PolicyDecision`] listing every rule the candidate fails, so callers can
//! both gate an action and explain why it was refused.

mod listing;

pub use listing::*;

use serde::Serialize;

use crate::domain::specification::{unmet, Specification};

/// Outcome of evaluating one policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyDecision {
    pub policy: &'static str,
    pub allowed: bool,
    pub violations: Vec<String>,
}

impl PolicyDecision {
    /// Evaluate `rules` against `candidate`; allowed when none fail.
    pub fn from_rules<T: ?Sized>(
        policy: &'static str,
        rules: &[&dyn Specification<T>],
        candidate: &T,
    ) -> Self {
        let violations = unmet(rules, candidate);
        Self {
            policy,
            allowed: violations.is_empty(),
            violations,
        }
    }
}

/// A named business rule set over `T`.
pub trait BusinessPolicy<T: ?Sized>: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, candidate: &T) -> PolicyDecision;

    fn is_allowed(&self, candidate: &T) -> bool {
        self.evaluate(candidate).allowed
    }
}
