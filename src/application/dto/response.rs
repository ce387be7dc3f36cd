//! Response DTOs
//!
//! Data structures for API response bodies.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::policies::PolicyDecision;
use crate::domain::{Listing, ListingStatus, RiskLevel};

/// One weighted input of a composite score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub name: String,
    /// Component score on the 0-100 scale
    pub score: f64,
    pub weight: f64,
}

/// Fields every analysis result carries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub analysis_id: Uuid,
    pub model_version: String,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisMetadata {
    pub fn new(model_version: impl Into<String>) -> Self {
        Self {
            analysis_id: Uuid::new_v4(),
            model_version: model_version.into(),
            analyzed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudAction {
    Approve,
    Review,
    Block,
}

/// A feature that pushed the fraud score up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudIndicator {
    pub code: String,
    pub description: String,
    /// Contribution to the linear score before the logistic
    pub contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudAnalysisResponse {
    #[serde(flatten)]
    pub metadata: AnalysisMetadata,
    pub user_id: String,
    pub listing_id: Option<Uuid>,
    /// Probability of fraud, 0-1
    pub fraud_probability: f64,
    pub risk_level: RiskLevel,
    pub indicators: Vec<FraudIndicator>,
    pub recommended_action: FraudAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessmentResponse {
    #[serde(flatten)]
    pub metadata: AnalysisMetadata,
    pub property_id: String,
    /// Overall risk, 0-100
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub factors: Vec<ScoreComponent>,
    pub mitigations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    /// -1 (negative) to 1 (positive)
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpsCategory {
    Promoter,
    Passive,
    Detractor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerExperienceResponse {
    #[serde(flatten)]
    pub metadata: AnalysisMetadata,
    pub customer_id: String,
    /// Satisfaction, 0-100
    pub satisfaction_score: f64,
    pub sentiment: Sentiment,
    pub nps_category: NpsCategory,
    pub components: Vec<ScoreComponent>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeadGrade {
    A,
    B,
    C,
    D,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadScoringResponse {
    #[serde(flatten)]
    pub metadata: AnalysisMetadata,
    pub lead_id: String,
    /// Probability of converting, 0-1
    pub conversion_probability: f64,
    pub grade: LeadGrade,
    pub next_best_action: String,
    pub follow_up_within_hours: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    TopPerformer,
    Strong,
    Developing,
    NeedsSupport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceEvaluationResponse {
    #[serde(flatten)]
    pub metadata: AnalysisMetadata,
    pub agent_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Composite score, 0-100
    pub performance_score: f64,
    /// Deals closed per listing handled, 0-1
    pub conversion_rate: f64,
    /// Mean of deal and volume attainment, 1.0 = on target
    pub target_attainment: f64,
    pub tier: PerformanceTier,
    pub components: Vec<ScoreComponent>,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalAnalysisResponse {
    #[serde(flatten)]
    pub metadata: AnalysisMetadata,
    pub process_name: String,
    /// Composite efficiency, 0-100
    pub efficiency_score: f64,
    pub success_rate: f64,
    pub p50_duration_minutes: f64,
    pub p95_duration_minutes: f64,
    pub sla_breach_rate: f64,
    pub components: Vec<ScoreComponent>,
    pub bottlenecks: Vec<String>,
    pub improvement_actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingPolicyResponse {
    pub listing_id: Uuid,
    pub status: ListingStatus,
    pub as_of: DateTime<Utc>,
    pub days_on_market: i64,
    pub days_since_update: i64,
    pub decisions: Vec<PolicyDecision>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingTransitionResponse {
    pub previous_status: ListingStatus,
    pub listing: Listing,
    /// Policy that gated the move, if any
    pub decision: Option<PolicyDecision>,
}
