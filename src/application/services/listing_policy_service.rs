//! Listing Policy Service
//!
//! Evaluates lifecycle policies for a listing and applies status changes
//! that both the lifecycle graph and the gating policy allow.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::application::dto::{ListingPolicyResponse, ListingTransitionResponse};
use crate::domain::policies::{ListingPolicies, PolicyDecision};
use crate::domain::specification::ListingSnapshot;
use crate::domain::{Listing, ListingStatus};
use crate::infrastructure::metrics;

/// Why a transition was refused.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("cannot move listing from {from} to {to}")]
    InvalidTransition {
        from: ListingStatus,
        to: ListingStatus,
    },

    #[error("{policy} policy not satisfied")]
    Violations {
        policy: &'static str,
        violations: Vec<String>,
    },
}

#[async_trait]
pub trait ListingPolicyService: Send + Sync {
    /// Every policy decision for `listing` at `as_of`.
    async fn evaluate(&self, listing: &Listing, as_of: DateTime<Utc>) -> ListingPolicyResponse;

    /// Move `listing` to `target`. Returns the updated listing.
    async fn transition(
        &self,
        listing: Listing,
        target: ListingStatus,
        as_of: DateTime<Utc>,
    ) -> Result<ListingTransitionResponse, PolicyError>;
}

pub struct ListingPolicyServiceImpl {
    policies: ListingPolicies,
}

impl ListingPolicyServiceImpl {
    pub fn new(policies: ListingPolicies) -> Self {
        Self { policies }
    }
}

fn record(decision: &PolicyDecision) {
    metrics::record_policy_decision(decision.policy, decision.allowed);
}

#[async_trait]
impl ListingPolicyService for ListingPolicyServiceImpl {
    async fn evaluate(&self, listing: &Listing, as_of: DateTime<Utc>) -> ListingPolicyResponse {
        let snapshot = ListingSnapshot::new(listing, as_of);
        let decisions = self.policies.evaluate_all(&snapshot);
        decisions.iter().for_each(record);

        tracing::debug!(
            listing_id = %listing.id,
            status = %listing.status,
            allowed = decisions.iter().filter(|d| d.allowed).count(),
            "Listing policies evaluated"
        );

        ListingPolicyResponse {
            listing_id: listing.id,
            status: listing.status,
            as_of,
            days_on_market: snapshot.days_on_market(),
            days_since_update: snapshot.days_since_update(),
            decisions,
        }
    }

    async fn transition(
        &self,
        mut listing: Listing,
        target: ListingStatus,
        as_of: DateTime<Utc>,
    ) -> Result<ListingTransitionResponse, PolicyError> {
        let previous_status = listing.status;
        if !previous_status.can_transition_to(target) {
            tracing::info!(
                listing_id = %listing.id,
                from = %previous_status,
                to = %target,
                "Transition rejected by lifecycle"
            );
            return Err(PolicyError::InvalidTransition {
                from: previous_status,
                to: target,
            });
        }

        let decision = self
            .policies
            .gate_for(target, &ListingSnapshot::new(&listing, as_of));
        if let Some(decision) = &decision {
            record(decision);
            if !decision.allowed {
                tracing::info!(
                    listing_id = %listing.id,
                    policy = decision.policy,
                    violations = ?decision.violations,
                    "Transition rejected by policy"
                );
                return Err(PolicyError::Violations {
                    policy: decision.policy,
                    violations: decision.violations.clone(),
                });
            }
        }

        listing.apply_transition(target, as_of);
        tracing::info!(
            listing_id = %listing.id,
            from = %previous_status,
            to = %target,
            "Listing transitioned"
        );

        Ok(ListingTransitionResponse {
            previous_status,
            listing,
            decision,
        })
    }
}
