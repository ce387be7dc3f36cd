//! Listing lifecycle policies.

use serde::{Deserialize, Serialize};

use super::{BusinessPolicy, PolicyDecision};
use crate::config::PolicySettings;
use crate::domain::entities::ListingStatus;
use crate::domain::specification::{
    DaysOnMarketAtLeast, DaysSinceUpdateAtLeast, HasMinimumPhotos, HasPositivePrice, HasStatus,
    IsClosed, IsVerified, ListingSnapshot, Specification, SpecificationExt,
};

/// Day and count thresholds shared by the listing policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyThresholds {
    pub min_photos: u32,
    pub featured_max_days: i64,
    pub stale_after_days: i64,
    pub expire_after_days: i64,
    pub archive_after_days: i64,
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            min_photos: 5,
            featured_max_days: 14,
            stale_after_days: 30,
            expire_after_days: 180,
            archive_after_days: 90,
        }
    }
}

impl From<&PolicySettings> for PolicyThresholds {
    fn from(settings: &PolicySettings) -> Self {
        Self {
            min_photos: settings.min_photos,
            featured_max_days: settings.featured_max_days,
            stale_after_days: settings.stale_after_days,
            expire_after_days: settings.expire_after_days,
            archive_after_days: settings.archive_after_days,
        }
    }
}

/// A draft or reviewed listing may go live.
#[derive(Debug, Clone, Copy)]
pub struct PublishPolicy {
    pub min_photos: u32,
}

impl BusinessPolicy<ListingSnapshot<'_>> for PublishPolicy {
    fn name(&self) -> &'static str {
        "publish"
    }

    fn evaluate(&self, candidate: &ListingSnapshot<'_>) -> PolicyDecision {
        let status = HasStatus(vec![ListingStatus::Draft, ListingStatus::PendingReview]);
        let photos = HasMinimumPhotos(self.min_photos);
        let rules: [&dyn Specification<ListingSnapshot<'_>>; 4] =
            [&status, &IsVerified, &HasPositivePrice, &photos];
        PolicyDecision::from_rules(self.name(), &rules, candidate)
    }
}

/// A fresh, verified, active listing may be promoted.
#[derive(Debug, Clone, Copy)]
pub struct FeaturePolicy {
    pub featured_max_days: i64,
}

impl BusinessPolicy<ListingSnapshot<'_>> for FeaturePolicy {
    fn name(&self) -> &'static str {
        "feature"
    }

    fn evaluate(&self, candidate: &ListingSnapshot<'_>) -> PolicyDecision {
        let active = HasStatus::one(ListingStatus::Active);
        let fresh = DaysOnMarketAtLeast(self.featured_max_days).not();
        let rules: [&dyn Specification<ListingSnapshot<'_>>; 3] = [&active, &IsVerified, &fresh];
        PolicyDecision::from_rules(self.name(), &rules, candidate)
    }
}

/// An active listing nobody has touched in a while. Allowed means stale.
#[derive(Debug, Clone, Copy)]
pub struct StaleListingPolicy {
    pub stale_after_days: i64,
}

impl BusinessPolicy<ListingSnapshot<'_>> for StaleListingPolicy {
    fn name(&self) -> &'static str {
        "stale"
    }

    fn evaluate(&self, candidate: &ListingSnapshot<'_>) -> PolicyDecision {
        let active = HasStatus::one(ListingStatus::Active);
        let untouched = DaysSinceUpdateAtLeast(self.stale_after_days);
        let rules: [&dyn Specification<ListingSnapshot<'_>>; 2] = [&active, &untouched];
        PolicyDecision::from_rules(self.name(), &rules, candidate)
    }
}

/// An active listing that has been on the market too long may expire.
#[derive(Debug, Clone, Copy)]
pub struct ExpirePolicy {
    pub expire_after_days: i64,
}

impl BusinessPolicy<ListingSnapshot<'_>> for ExpirePolicy {
    fn name(&self) -> &'static str {
        "expire"
    }

    fn evaluate(&self, candidate: &ListingSnapshot<'_>) -> PolicyDecision {
        let active = HasStatus::one(ListingStatus::Active);
        let aged = DaysOnMarketAtLeast(self.expire_after_days);
        let rules: [&dyn Specification<ListingSnapshot<'_>>; 2] = [&active, &aged];
        PolicyDecision::from_rules(self.name(), &rules, candidate)
    }
}

/// A closed listing left alone long enough may be archived.
#[derive(Debug, Clone, Copy)]
pub struct ArchivePolicy {
    pub archive_after_days: i64,
}

impl BusinessPolicy<ListingSnapshot<'_>> for ArchivePolicy {
    fn name(&self) -> &'static str {
        "archive"
    }

    fn evaluate(&self, candidate: &ListingSnapshot<'_>) -> PolicyDecision {
        let settled = DaysSinceUpdateAtLeast(self.archive_after_days);
        let rules: [&dyn Specification<ListingSnapshot<'_>>; 2] = [&IsClosed, &settled];
        PolicyDecision::from_rules(self.name(), &rules, candidate)
    }
}

/// Every listing policy, configured from one set of thresholds.
#[derive(Debug, Clone, Copy)]
pub struct ListingPolicies {
    pub publish: PublishPolicy,
    pub feature: FeaturePolicy,
    pub stale: StaleListingPolicy,
    pub expire: ExpirePolicy,
    pub archive: ArchivePolicy,
}

impl ListingPolicies {
    pub fn new(thresholds: PolicyThresholds) -> Self {
        Self {
            publish: PublishPolicy {
                min_photos: thresholds.min_photos,
            },
            feature: FeaturePolicy {
                featured_max_days: thresholds.featured_max_days,
            },
            stale: StaleListingPolicy {
                stale_after_days: thresholds.stale_after_days,
            },
            expire: ExpirePolicy {
                expire_after_days: thresholds.expire_after_days,
            },
            archive: ArchivePolicy {
                archive_after_days: thresholds.archive_after_days,
            },
        }
    }

    /// Decisions of every policy, in a stable order.
    pub fn evaluate_all(&self, snapshot: &ListingSnapshot<'_>) -> Vec<PolicyDecision> {
        vec![
            self.publish.evaluate(snapshot),
            self.feature.evaluate(snapshot),
            self.stale.evaluate(snapshot),
            self.expire.evaluate(snapshot),
            self.archive.evaluate(snapshot),
        ]
    }

    /// Decision gating a move into `target`, if that move is gated at all.
    pub fn gate_for(
        &self,
        target: ListingStatus,
        snapshot: &ListingSnapshot<'_>,
    ) -> Option<PolicyDecision> {
        match target {
            ListingStatus::Active if snapshot.listing.status != ListingStatus::UnderOffer => {
                Some(self.publish.evaluate(snapshot))
            }
            ListingStatus::Expired => Some(self.expire.evaluate(snapshot)),
            ListingStatus::Archived => Some(self.archive.evaluate(snapshot)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Listing;
    use chrono::{DateTime, Duration, Utc};
    use pretty_assertions::assert_eq;

    fn policies() -> ListingPolicies {
        ListingPolicies::new(PolicyThresholds::default())
    }

    fn ready_draft(now: DateTime<Utc>) -> Listing {
        let mut listing = Listing::new("Two bed flat", 320_000.0, now - Duration::days(2));
        listing.photo_count = 6;
        listing.verified = true;
        listing
    }

    fn active(now: DateTime<Utc>, published_days_ago: i64, updated_days_ago: i64) -> Listing {
        let mut listing = ready_draft(now);
        listing.status = ListingStatus::Active;
        listing.created_at = now - Duration::days(published_days_ago + 1);
        listing.published_at = Some(now - Duration::days(published_days_ago));
        listing.updated_at = now - Duration::days(updated_days_ago);
        listing
    }

    #[test]
    fn test_publish_allows_complete_draft() {
        let now = Utc::now();
        let listing = ready_draft(now);
        let decision = policies().publish.evaluate(&ListingSnapshot::new(&listing, now));
        assert!(decision.allowed);
        assert!(decision.violations.is_empty());
    }

    #[test]
    fn test_publish_reports_every_violation() {
        let now = Utc::now();
        let mut listing = ready_draft(now);
        listing.verified = false;
        listing.photo_count = 1;
        listing.price = 0.0;

        let decision = policies().publish.evaluate(&ListingSnapshot::new(&listing, now));
        assert!(!decision.allowed);
        assert_eq!(
            decision.violations,
            vec![
                "ownership verified".to_string(),
                "price is positive".to_string(),
                "at least 5 photos".to_string(),
            ]
        );
    }

    #[test]
    fn test_feature_requires_fresh_listing() {
        let now = Utc::now();
        let policies = policies();

        let fresh = active(now, 3, 1);
        assert!(policies.feature.is_allowed(&ListingSnapshot::new(&fresh, now)));

        let old = active(now, 14, 1);
        let decision = policies.feature.evaluate(&ListingSnapshot::new(&old, now));
        assert!(!decision.allowed);
        assert_eq!(decision.violations, vec!["not on market at least 14 days".to_string()]);
    }

    #[test]
    fn test_stale_and_expire_thresholds() {
        let now = Utc::now();
        let policies = policies();

        let quiet = active(now, 200, 45);
        let snapshot = ListingSnapshot::new(&quiet, now);
        assert!(policies.stale.is_allowed(&snapshot));
        assert!(policies.expire.is_allowed(&snapshot));

        let busy = active(now, 20, 2);
        let snapshot = ListingSnapshot::new(&busy, now);
        assert!(!policies.stale.is_allowed(&snapshot));
        assert!(!policies.expire.is_allowed(&snapshot));
    }

    #[test]
    fn test_archive_requires_closed_and_settled() {
        let now = Utc::now();
        let policies = policies();

        let mut sold = active(now, 300, 120);
        sold.status = ListingStatus::Sold;
        assert!(policies.archive.is_allowed(&ListingSnapshot::new(&sold, now)));

        sold.updated_at = now - Duration::days(10);
        let decision = policies.archive.evaluate(&ListingSnapshot::new(&sold, now));
        assert_eq!(decision.violations, vec!["unchanged for at least 90 days".to_string()]);

        let still_active = active(now, 300, 120);
        let decision = policies.archive.evaluate(&ListingSnapshot::new(&still_active, now));
        assert!(!decision.allowed);
        assert_eq!(decision.violations, vec!["listing is closed".to_string()]);
    }

    #[test]
    fn test_evaluate_all_order() {
        let now = Utc::now();
        let listing = ready_draft(now);
        let names: Vec<&str> = policies()
            .evaluate_all(&ListingSnapshot::new(&listing, now))
            .iter()
            .map(|d| d.policy)
            .collect();
        assert_eq!(names, vec!["publish", "feature", "stale", "expire", "archive"]);
    }

    #[test]
    fn test_returning_from_offer_is_not_gated() {
        let now = Utc::now();
        let mut listing = active(now, 10, 1);
        listing.status = ListingStatus::UnderOffer;
        let snapshot = ListingSnapshot::new(&listing, now);

        assert!(policies().gate_for(ListingStatus::Active, &snapshot).is_none());
        assert!(policies().gate_for(ListingStatus::Sold, &snapshot).is_none());
    }
}
