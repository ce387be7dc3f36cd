//! Listing rules evaluated at a fixed instant.

use chrono::{DateTime, Utc};

use super::Specification;
use crate::domain::entities::{Listing, ListingStatus};

/// A listing paired with the instant its day counts are measured at.
#[derive(Debug, Clone, Copy)]
pub struct ListingSnapshot<'a> {
    pub listing: &'a Listing,
    pub as_of: DateTime<Utc>,
}

impl<'a> ListingSnapshot<'a> {
    pub fn new(listing: &'a Listing, as_of: DateTime<Utc>) -> Self {
        Self { listing, as_of }
    }

    pub fn days_on_market(&self) -> i64 {
        self.listing.days_on_market(self.as_of)
    }

    pub fn days_since_update(&self) -> i64 {
        self.listing.days_since_update(self.as_of)
    }
}

/// Status is one of the given set.
#[derive(Debug, Clone)]
pub struct HasStatus(pub Vec<ListingStatus>);

impl HasStatus {
    pub fn one(status: ListingStatus) -> Self {
        Self(vec![status])
    }
}

impl Specification<ListingSnapshot<'_>> for HasStatus {
    fn is_satisfied_by(&self, candidate: &ListingSnapshot<'_>) -> bool {
        self.0.contains(&candidate.listing.status)
    }

    fn description(&self) -> String {
        let names: Vec<&str> = self.0.iter().map(ListingStatus::as_str).collect();
        if names.len() == 1 {
            format!("status is {}", names[0])
        } else {
            format!("status is one of [{}]", names.join(", "))
        }
    }
}

/// Sold, withdrawn or expired.
#[derive(Debug, Clone, Copy)]
pub struct IsClosed;

impl Specification<ListingSnapshot<'_>> for IsClosed {
    fn is_satisfied_by(&self, candidate: &ListingSnapshot<'_>) -> bool {
        candidate.listing.status.is_closed()
    }

    fn description(&self) -> String {
        "listing is closed".into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DaysOnMarketAtLeast(pub i64);

impl Specification<ListingSnapshot<'_>> for DaysOnMarketAtLeast {
    fn is_satisfied_by(&self, candidate: &ListingSnapshot<'_>) -> bool {
        candidate.days_on_market() >= self.0
    }

    fn description(&self) -> String {
        format!("on market at least {} days", self.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DaysSinceUpdateAtLeast(pub i64);

impl Specification<ListingSnapshot<'_>> for DaysSinceUpdateAtLeast {
    fn is_satisfied_by(&self, candidate: &ListingSnapshot<'_>) -> bool {
        candidate.days_since_update() >= self.0
    }

    fn description(&self) -> String {
        format!("unchanged for at least {} days", self.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HasMinimumPhotos(pub u32);

impl Specification<ListingSnapshot<'_>> for HasMinimumPhotos {
    fn is_satisfied_by(&self, candidate: &ListingSnapshot<'_>) -> bool {
        candidate.listing.photo_count >= self.0
    }

    fn description(&self) -> String {
        format!("at least {} photos", self.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IsVerified;

impl Specification<ListingSnapshot<'_>> for IsVerified {
    fn is_satisfied_by(&self, candidate: &ListingSnapshot<'_>) -> bool {
        candidate.listing.verified
    }

    fn description(&self) -> String {
        "ownership verified".into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HasPositivePrice;

impl Specification<ListingSnapshot<'_>> for HasPositivePrice {
    fn is_satisfied_by(&self, candidate: &ListingSnapshot<'_>) -> bool {
        candidate.listing.price.is_finite() && candidate.listing.price > 0.0
    }

    fn description(&self) -> String {
        "price is positive".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::specification::SpecificationExt;
    use chrono::Duration;

    fn listing(days_old: i64) -> (Listing, DateTime<Utc>) {
        let now = Utc::now();
        let mut listing = Listing::new("Townhouse", 410_000.0, now - Duration::days(days_old));
        listing.photo_count = 8;
        listing.verified = true;
        (listing, now)
    }

    #[test]
    fn test_status_membership() {
        let (listing, now) = listing(3);
        let snapshot = ListingSnapshot::new(&listing, now);

        assert!(HasStatus::one(ListingStatus::Draft).is_satisfied_by(&snapshot));
        assert!(!HasStatus(vec![ListingStatus::Active, ListingStatus::Sold]).is_satisfied_by(&snapshot));
        assert_eq!(
            HasStatus(vec![ListingStatus::Active, ListingStatus::Sold]).description(),
            "status is one of [active, sold]"
        );
    }

    #[test]
    fn test_closed_statuses() {
        let (mut listing, now) = listing(3);
        assert!(!IsClosed.is_satisfied_by(&ListingSnapshot::new(&listing, now)));

        for status in [ListingStatus::Sold, ListingStatus::Withdrawn, ListingStatus::Expired] {
            listing.status = status;
            assert!(IsClosed.is_satisfied_by(&ListingSnapshot::new(&listing, now)));
        }

        listing.status = ListingStatus::Archived;
        assert!(!IsClosed.is_satisfied_by(&ListingSnapshot::new(&listing, now)));
    }

    #[test]
    fn test_day_thresholds_are_inclusive() {
        let (listing, now) = listing(30);
        let snapshot = ListingSnapshot::new(&listing, now);

        assert!(DaysOnMarketAtLeast(30).is_satisfied_by(&snapshot));
        assert!(!DaysOnMarketAtLeast(31).is_satisfied_by(&snapshot));
        assert!(DaysSinceUpdateAtLeast(30).is_satisfied_by(&snapshot));
    }

    #[test]
    fn test_price_and_photos() {
        let (mut listing, now) = listing(1);
        listing.price = 0.0;
        listing.photo_count = 2;
        let snapshot = ListingSnapshot::new(&listing, now);

        assert!(!HasPositivePrice.is_satisfied_by(&snapshot));
        assert!(!HasMinimumPhotos(3).is_satisfied_by(&snapshot));
        assert!(HasMinimumPhotos(2).is_satisfied_by(&snapshot));
    }

    #[test]
    fn test_composes_with_combinators() {
        let (listing, now) = listing(20);
        let snapshot = ListingSnapshot::new(&listing, now);

        let fresh_and_verified = IsVerified.and(DaysOnMarketAtLeast(14).not());
        assert!(!fresh_and_verified.is_satisfied_by(&snapshot));
        assert_eq!(
            fresh_and_verified.description(),
            "(ownership verified and not on market at least 14 days)"
        );
    }
}
