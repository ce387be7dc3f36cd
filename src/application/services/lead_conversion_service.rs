//! Lead Conversion Service
//!
//! Conversion probability of a buyer lead plus the follow-up the agent
//! should take next.

use std::sync::Arc;

use async_trait::async_trait;

use super::analysis::{instrumented, AnalysisError};
use crate::application::dto::{
    AnalysisMetadata, LeadGrade, LeadScoringRequest, LeadScoringResponse,
};
use crate::infrastructure::models::{ModelKind, ModelStore, ModelWeights};

const SERVICE: &str = "lead_conversion";

/// Budgets below this share of the target price need different listings.
const BUDGET_MISMATCH_RATIO: f64 = 0.8;

#[async_trait]
pub trait LeadConversionService: Send + Sync {
    async fn score(&self, request: LeadScoringRequest)
        -> Result<LeadScoringResponse, AnalysisError>;
}

pub struct LeadConversionServiceImpl {
    models: Arc<dyn ModelStore>,
}

impl LeadConversionServiceImpl {
    pub fn new(models: Arc<dyn ModelStore>) -> Self {
        Self { models }
    }
}

#[async_trait]
impl LeadConversionService for LeadConversionServiceImpl {
    async fn score(
        &self,
        request: LeadScoringRequest,
    ) -> Result<LeadScoringResponse, AnalysisError> {
        instrumented(SERVICE, async {
            let weights = self.models.load(ModelKind::LeadConversion).await?;
            let response = score(&request, &weights);
            tracing::info!(
                lead_id = %response.lead_id,
                probability = response.conversion_probability,
                grade = ?response.grade,
                "Lead scored"
            );
            Ok::<_, AnalysisError>(response)
        })
        .await
    }
}

impl LeadGrade {
    pub fn from_probability(p: f64) -> Self {
        if p >= 0.75 {
            Self::A
        } else if p >= 0.5 {
            Self::B
        } else if p >= 0.25 {
            Self::C
        } else {
            Self::D
        }
    }

    /// Hours within which the lead should be contacted again.
    pub fn follow_up_hours(&self) -> u32 {
        match self {
            Self::A => 4,
            Self::B => 24,
            Self::C => 72,
            Self::D => 168,
        }
    }
}

pub fn score(request: &LeadScoringRequest, weights: &ModelWeights) -> LeadScoringResponse {
    let budget_ratio = request.budget / request.target_price;

    let features = [
        ("source_quality", request.source.quality()),
        ("budget_fit", budget_ratio.min(1.0)),
        ("pre_approved", if request.pre_approved { 1.0 } else { 0.0 }),
        ("engagement", request.interactions.min(10) as f64 / 10.0),
        (
            "recency",
            1.0 - request.days_since_last_contact.min(30) as f64 / 30.0,
        ),
        ("interest", request.viewed_listings.min(20) as f64 / 20.0),
    ];

    let probability = weights.probability(&features);
    let grade = LeadGrade::from_probability(probability);

    let next_best_action = if budget_ratio < BUDGET_MISMATCH_RATIO {
        "suggest_listings_within_budget"
    } else if !request.pre_approved && probability >= 0.5 {
        "arrange_mortgage_pre_approval"
    } else {
        match grade {
            LeadGrade::A => "schedule_viewing",
            LeadGrade::B => "send_matching_listings",
            LeadGrade::C => "add_to_nurture_campaign",
            LeadGrade::D => "low_priority_follow_up",
        }
    };

    LeadScoringResponse {
        metadata: AnalysisMetadata::new(weights.version.clone()),
        lead_id: request.lead_id.clone(),
        conversion_probability: (probability * 10_000.0).round() / 10_000.0,
        grade,
        next_best_action: next_best_action.to_string(),
        follow_up_within_hours: grade.follow_up_hours(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::LeadSource;
    use test_case::test_case;

    fn builtin() -> ModelWeights {
        ModelWeights::builtin(ModelKind::LeadConversion)
    }

    fn lead(source: LeadSource, budget: f64, pre_approved: bool) -> LeadScoringRequest {
        LeadScoringRequest {
            lead_id: "lead-1".into(),
            source,
            budget,
            target_price: 400_000.0,
            pre_approved,
            interactions: 5,
            days_since_last_contact: 3,
            viewed_listings: 10,
        }
    }

    #[test_case(0.9 => LeadGrade::A)]
    #[test_case(0.75 => LeadGrade::A)]
    #[test_case(0.6 => LeadGrade::B)]
    #[test_case(0.3 => LeadGrade::C)]
    #[test_case(0.1 => LeadGrade::D)]
    fn test_grade_boundaries(p: f64) -> LeadGrade {
        LeadGrade::from_probability(p)
    }

    #[test]
    fn test_hot_lead_gets_viewing() {
        let mut request = lead(LeadSource::Referral, 450_000.0, true);
        request.interactions = 8;
        request.days_since_last_contact = 1;
        request.viewed_listings = 12;

        let response = score(&request, &builtin());
        assert_eq!(response.grade, LeadGrade::A);
        assert_eq!(response.next_best_action, "schedule_viewing");
        assert_eq!(response.follow_up_within_hours, 4);
    }

    #[test]
    fn test_warm_lead_without_finance_needs_pre_approval() {
        let response = score(&lead(LeadSource::Organic, 400_000.0, false), &builtin());
        assert!(response.conversion_probability >= 0.5);
        assert_eq!(response.next_best_action, "arrange_mortgage_pre_approval");
    }

    #[test]
    fn test_cold_lead_with_small_budget() {
        let request = LeadScoringRequest {
            lead_id: "lead-2".into(),
            source: LeadSource::Paid,
            budget: 200_000.0,
            target_price: 400_000.0,
            pre_approved: false,
            interactions: 0,
            days_since_last_contact: 45,
            viewed_listings: 0,
        };

        let response = score(&request, &builtin());
        assert_eq!(response.grade, LeadGrade::D);
        assert_eq!(response.next_best_action, "suggest_listings_within_budget");
        assert_eq!(response.follow_up_within_hours, 168);
    }
}
