//! Listing entity and its lifecycle graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a property listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    /// Being prepared by the agent, not visible
    #[default]
    Draft,
    /// Submitted for moderation
    PendingReview,
    /// Visible on the marketplace
    Active,
    /// An offer has been accepted, awaiting completion
    UnderOffer,
    Sold,
    /// Taken off the market by the owner
    Withdrawn,
    /// Aged out of the market
    Expired,
    /// Terminal, kept for records only
    Archived,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingReview => "pending_review",
            Self::Active => "active",
            Self::UnderOffer => "under_offer",
            Self::Sold => "sold",
            Self::Withdrawn => "withdrawn",
            Self::Expired => "expired",
            Self::Archived => "archived",
        }
    }

    /// Statuses reachable in one step from this one.
    pub fn allowed_transitions(&self) -> &'static [ListingStatus] {
        use ListingStatus::*;
        match self {
            Draft => &[PendingReview, Active, Withdrawn],
            PendingReview => &[Draft, Active, Withdrawn],
            Active => &[UnderOffer, Sold, Withdrawn, Expired],
            UnderOffer => &[Active, Sold, Withdrawn],
            Sold => &[Archived],
            Withdrawn => &[Draft, Archived],
            Expired => &[Draft, Archived],
            Archived => &[],
        }
    }

    pub fn can_transition_to(&self, target: ListingStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Whether the listing has left the market for good.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Sold | Self::Withdrawn | Self::Expired)
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A property listing on the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub status: ListingStatus,

    /// Asking price in the marketplace currency
    pub price: f64,

    pub photo_count: u32,

    /// Ownership documents checked by moderation
    pub verified: bool,

    pub created_at: DateTime<Utc>,

    /// First time the listing went live (None if never published)
    pub published_at: Option<DateTime<Utc>>,

    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Create a new draft listing.
    pub fn new(title: impl Into<String>, price: f64, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            status: ListingStatus::Draft,
            price,
            photo_count: 0,
            verified: false,
            created_at: now,
            published_at: None,
            updated_at: now,
        }
    }

    /// Whole days since the listing first went live, or since creation if
    /// it never did. Never negative.
    pub fn days_on_market(&self, as_of: DateTime<Utc>) -> i64 {
        let since = self.published_at.unwrap_or(self.created_at);
        (as_of - since).num_days().max(0)
    }

    /// Whole days since the last modification. Never negative.
    pub fn days_since_update(&self, as_of: DateTime<Utc>) -> i64 {
        (as_of - self.updated_at).num_days().max(0)
    }

    /// Move to `target`, stamping the update time and, on first
    /// activation, the publication time. Callers check the lifecycle
    /// graph and business policies beforehand.
    pub fn apply_transition(&mut self, target: ListingStatus, at: DateTime<Utc>) {
        if target == ListingStatus::Active && self.published_at.is_none() {
            self.published_at = Some(at);
        }
        self.status = target;
        self.updated_at = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use test_case::test_case;

    #[test_case(ListingStatus::Draft, ListingStatus::Active => true)]
    #[test_case(ListingStatus::Active, ListingStatus::Sold => true)]
    #[test_case(ListingStatus::Sold, ListingStatus::Archived => true)]
    #[test_case(ListingStatus::Sold, ListingStatus::Active => false)]
    #[test_case(ListingStatus::Archived, ListingStatus::Draft => false)]
    #[test_case(ListingStatus::Draft, ListingStatus::Sold => false)]
    fn test_lifecycle_graph(from: ListingStatus, to: ListingStatus) -> bool {
        from.can_transition_to(to)
    }

    #[test]
    fn test_days_on_market_prefers_publication_date() {
        let now = Utc::now();
        let mut listing = Listing::new("Loft", 250_000.0, now - Duration::days(40));
        assert_eq!(listing.days_on_market(now), 40);

        listing.published_at = Some(now - Duration::days(10));
        assert_eq!(listing.days_on_market(now), 10);
    }

    #[test]
    fn test_day_counts_never_negative() {
        let now = Utc::now();
        let listing = Listing::new("Loft", 250_000.0, now + Duration::days(2));
        assert_eq!(listing.days_on_market(now), 0);
        assert_eq!(listing.days_since_update(now), 0);
    }

    #[test]
    fn test_first_activation_stamps_publication() {
        let created = Utc::now() - Duration::days(5);
        let now = Utc::now();
        let mut listing = Listing::new("Loft", 250_000.0, created);

        listing.apply_transition(ListingStatus::Active, now);
        assert_eq!(listing.published_at, Some(now));
        assert_eq!(listing.updated_at, now);

        let later = now + Duration::days(3);
        listing.apply_transition(ListingStatus::UnderOffer, later);
        listing.apply_transition(ListingStatus::Active, later);
        assert_eq!(listing.published_at, Some(now));
    }
}
