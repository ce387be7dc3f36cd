//! Request DTOs
//!
//! Data structures for API request bodies.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::{Listing, ListingStatus};

/// Fraud screening of a payment or listing action
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FraudAnalysisRequest {
    #[validate(length(min = 1, max = 64, message = "User ID must be 1-64 characters"))]
    pub user_id: String,

    pub listing_id: Option<Uuid>,

    #[validate(range(min = 0.0, message = "Transaction amount must not be negative"))]
    pub transaction_amount: f64,

    #[validate(range(exclusive_min = 0.0, message = "Listed price must be positive"))]
    pub listed_price: f64,

    pub account_age_days: u32,

    #[serde(default)]
    pub failed_payment_attempts: u32,

    #[validate(length(equal = 2, message = "Country must be an ISO 3166 alpha-2 code"))]
    pub ip_country: Option<String>,

    #[validate(length(equal = 2, message = "Country must be an ISO 3166 alpha-2 code"))]
    pub account_country: Option<String>,

    #[serde(default)]
    pub documents_verified: bool,

    #[serde(default)]
    pub listings_created_last_24h: u32,
}

/// Risk assessment of a property transaction
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RiskAssessmentRequest {
    #[validate(length(min = 1, max = 64, message = "Property ID must be 1-64 characters"))]
    pub property_id: String,

    #[validate(range(exclusive_min = 0.0, message = "Asking price must be positive"))]
    pub asking_price: f64,

    #[validate(range(exclusive_min = 0.0, message = "Estimated value must be positive"))]
    pub estimated_value: f64,

    pub days_on_market: u32,

    #[validate(range(min = 300, max = 850, message = "Credit score must be 300-850"))]
    pub buyer_credit_score: u16,

    #[validate(range(min = 0.0, max = 1.5, message = "Loan to value must be 0-1.5"))]
    pub loan_to_value: f64,

    #[serde(default = "default_volatility")]
    #[validate(range(min = 0.0, max = 1.0, message = "Market volatility must be 0-1"))]
    pub market_volatility: f64,
}

fn default_volatility() -> f64 {
    0.2
}

/// Customer experience review over recent interactions
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerExperienceRequest {
    #[validate(length(min = 1, max = 64, message = "Customer ID must be 1-64 characters"))]
    pub customer_id: String,

    #[serde(default)]
    #[validate(custom(function = "validate_durations"))]
    pub response_times_hours: Vec<f64>,

    #[serde(default)]
    #[validate(custom(function = "validate_ratings"))]
    pub ratings: Vec<u8>,

    #[serde(default)]
    pub open_tickets: u32,

    #[serde(default)]
    pub resolved_tickets: u32,

    #[serde(default)]
    #[validate(length(max = 200, message = "At most 200 feedback comments"))]
    pub feedback: Vec<String>,
}

/// Where a lead came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Referral,
    Organic,
    Portal,
    Paid,
}

impl LeadSource {
    /// Historical close rate of the channel, relative to referrals.
    pub fn quality(&self) -> f64 {
        match self {
            Self::Referral => 1.0,
            Self::Organic => 0.6,
            Self::Portal => 0.4,
            Self::Paid => 0.3,
        }
    }
}

/// Buyer lead to be scored
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LeadScoringRequest {
    #[validate(length(min = 1, max = 64, message = "Lead ID must be 1-64 characters"))]
    pub lead_id: String,

    pub source: LeadSource,

    #[validate(range(exclusive_min = 0.0, message = "Budget must be positive"))]
    pub budget: f64,

    #[validate(range(exclusive_min = 0.0, message = "Target price must be positive"))]
    pub target_price: f64,

    #[serde(default)]
    pub pre_approved: bool,

    #[serde(default)]
    pub interactions: u32,

    #[serde(default)]
    pub days_since_last_contact: u32,

    #[serde(default)]
    pub viewed_listings: u32,
}

/// Agent performance over a reporting period
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_period"))]
pub struct PerformanceEvaluationRequest {
    #[validate(length(min = 1, max = 64, message = "Agent ID must be 1-64 characters"))]
    pub agent_id: String,

    pub period_start: NaiveDate,
    pub period_end: NaiveDate,

    pub listings_handled: u32,
    pub deals_closed: u32,

    #[validate(range(min = 0.0, message = "Sales volume must not be negative"))]
    pub total_sales_volume: f64,

    #[validate(range(min = 0.0, message = "Days to close must not be negative"))]
    pub avg_days_to_close: Option<f64>,

    #[serde(default)]
    #[validate(custom(function = "validate_ratings"))]
    pub client_ratings: Vec<u8>,

    #[validate(range(min = 1, message = "Deal target must be at least 1"))]
    pub target_deals: u32,

    #[validate(range(exclusive_min = 0.0, message = "Volume target must be positive"))]
    pub target_volume: f64,
}

/// One observed run of a business process
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProcessSample {
    #[validate(range(min = 0.0, message = "Duration must not be negative"))]
    pub duration_minutes: f64,

    pub succeeded: bool,

    #[serde(default)]
    pub manual_steps: u32,
}

/// Operational review of a business process
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OperationalAnalysisRequest {
    #[validate(length(min = 1, max = 100, message = "Process name must be 1-100 characters"))]
    pub process_name: String,

    #[validate(range(exclusive_min = 0.0, message = "SLA must be positive"))]
    pub sla_minutes: f64,

    #[validate(length(min = 1, max = 10000, message = "Provide 1-10000 samples"), nested)]
    pub samples: Vec<ProcessSample>,
}

/// Evaluate every lifecycle policy for a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateListingRequest {
    pub listing: Listing,

    /// Evaluation instant, defaults to now
    pub as_of: Option<DateTime<Utc>>,
}

/// Move a listing to another lifecycle status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionListingRequest {
    pub listing: Listing,
    pub target_status: ListingStatus,
    pub as_of: Option<DateTime<Utc>>,
}

fn validate_ratings(ratings: &[u8]) -> Result<(), ValidationError> {
    if ratings.iter().all(|r| (1..=5).contains(r)) {
        Ok(())
    } else {
        Err(ValidationError::new("rating_range").with_message("Ratings must be 1-5".into()))
    }
}

fn validate_durations(hours: &[f64]) -> Result<(), ValidationError> {
    if hours.iter().all(|h| h.is_finite() && *h >= 0.0) {
        Ok(())
    } else {
        Err(ValidationError::new("duration_range")
            .with_message("Durations must not be negative".into()))
    }
}

fn validate_period(request: &PerformanceEvaluationRequest) -> Result<(), ValidationError> {
    if request.period_end < request.period_start {
        return Err(ValidationError::new("period_order")
            .with_message("Period end must not precede period start".into()));
    }
    Ok(())
}
