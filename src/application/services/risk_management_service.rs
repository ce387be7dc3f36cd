//! Risk Management Service
//!
//! Property transaction risk as a weighted mean of five factor scores,
//! each on the 0-100 scale where higher is riskier.

use std::sync::Arc;

use async_trait::async_trait;

use super::analysis::{instrumented, AnalysisError};
use crate::application::dto::{
    AnalysisMetadata, RiskAssessmentRequest, RiskAssessmentResponse, ScoreComponent,
};
use crate::domain::{clamp_score, round2, RiskLevel};
use crate::infrastructure::models::{ModelKind, ModelStore, ModelWeights};

const SERVICE: &str = "risk_management";

/// Factor score from which a mitigation is suggested.
const MITIGATION_THRESHOLD: f64 = 60.0;

/// Days on market at which the market time factor saturates.
const MARKET_TIME_SATURATION_DAYS: f64 = 180.0;

const MIN_CREDIT: f64 = 300.0;
const MAX_CREDIT: f64 = 850.0;

#[async_trait]
pub trait RiskManagementService: Send + Sync {
    async fn assess(
        &self,
        request: RiskAssessmentRequest,
    ) -> Result<RiskAssessmentResponse, AnalysisError>;
}

pub struct RiskManagementServiceImpl {
    models: Arc<dyn ModelStore>,
}

impl RiskManagementServiceImpl {
    pub fn new(models: Arc<dyn ModelStore>) -> Self {
        Self { models }
    }
}

#[async_trait]
impl RiskManagementService for RiskManagementServiceImpl {
    async fn assess(
        &self,
        request: RiskAssessmentRequest,
    ) -> Result<RiskAssessmentResponse, AnalysisError> {
        instrumented(SERVICE, async {
            let weights = self.models.load(ModelKind::RiskManagement).await?;
            let response = score(&request, &weights);
            tracing::info!(
                property_id = %response.property_id,
                risk_score = response.risk_score,
                level = %response.risk_level,
                "Risk assessment completed"
            );
            Ok::<_, AnalysisError>(response)
        })
        .await
    }
}

pub fn score(request: &RiskAssessmentRequest, weights: &ModelWeights) -> RiskAssessmentResponse {
    let price_gap = (request.asking_price - request.estimated_value) / request.estimated_value;

    let factors = [
        ("pricing", clamp_score(price_gap.abs() * 200.0)),
        (
            "market_time",
            clamp_score(request.days_on_market as f64 / MARKET_TIME_SATURATION_DAYS * 100.0),
        ),
        (
            "credit",
            clamp_score(
                (MAX_CREDIT - request.buyer_credit_score as f64) / (MAX_CREDIT - MIN_CREDIT)
                    * 100.0,
            ),
        ),
        (
            "leverage",
            clamp_score((request.loan_to_value - 0.5) / 0.5 * 100.0),
        ),
        ("volatility", clamp_score(request.market_volatility * 100.0)),
    ];

    let risk_score = round2(clamp_score(weights.weighted_average(&factors)));

    let mut mitigations: Vec<String> = factors
        .iter()
        .filter(|(_, score)| *score >= MITIGATION_THRESHOLD)
        .map(|(name, _)| mitigation(name, request, price_gap))
        .collect();
    if mitigations.is_empty() {
        mitigations.push("No mitigation required".to_string());
    }

    RiskAssessmentResponse {
        metadata: AnalysisMetadata::new(weights.version.clone()),
        property_id: request.property_id.clone(),
        risk_score,
        risk_level: RiskLevel::from_score(risk_score),
        factors: factors
            .iter()
            .map(|(name, score)| ScoreComponent {
                name: name.to_string(),
                score: round2(*score),
                weight: weights.weight(name),
            })
            .collect(),
        mitigations,
    }
}

fn mitigation(factor: &str, request: &RiskAssessmentRequest, price_gap: f64) -> String {
    match factor {
        "pricing" if price_gap > 0.0 => format!(
            "Commission an independent valuation; asking price exceeds estimate by {:.0}%",
            price_gap * 100.0
        ),
        "pricing" => format!(
            "Inspect property condition; asking price is {:.0}% below estimate",
            -price_gap * 100.0
        ),
        "market_time" => format!(
            "Review pricing strategy; listing has been on market {} days",
            request.days_on_market
        ),
        "credit" => "Require mortgage pre-approval before accepting the offer".to_string(),
        "leverage" => "Request a larger deposit to bring loan-to-value below 80%".to_string(),
        "volatility" => "Add a valuation contingency to the contract".to_string(),
        other => format!("Review {} exposure", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RiskAssessmentRequest {
        RiskAssessmentRequest {
            property_id: "prop-7".into(),
            asking_price: 400_000.0,
            estimated_value: 400_000.0,
            days_on_market: 10,
            buyer_credit_score: 800,
            loan_to_value: 0.6,
            market_volatility: 0.1,
        }
    }

    fn builtin() -> ModelWeights {
        ModelWeights::builtin(ModelKind::RiskManagement)
    }

    #[test]
    fn test_sound_transaction_is_low_risk() {
        let response = score(&request(), &builtin());
        assert_eq!(response.risk_level, RiskLevel::Low);
        assert!(response.risk_score < 10.0);
        assert_eq!(response.mitigations, vec!["No mitigation required".to_string()]);
        assert_eq!(response.factors.len(), 5);
    }

    #[test]
    fn test_stretched_transaction_is_critical() {
        let request = RiskAssessmentRequest {
            property_id: "prop-9".into(),
            asking_price: 560_000.0,
            estimated_value: 400_000.0,
            days_on_market: 200,
            buyer_credit_score: 320,
            loan_to_value: 1.0,
            market_volatility: 0.9,
        };

        let response = score(&request, &builtin());
        assert_eq!(response.risk_level, RiskLevel::Critical);
        assert_eq!(response.mitigations.len(), 5);
        assert!(response.mitigations[0].contains("exceeds estimate by 40%"));
    }

    #[test]
    fn test_underpriced_property_flags_condition() {
        let mut request = request();
        request.asking_price = 240_000.0;

        let response = score(&request, &builtin());
        let pricing = &response.factors[0];
        assert_eq!(pricing.name, "pricing");
        assert_eq!(pricing.score, 80.0);
        assert!(response.mitigations[0].contains("40% below estimate"));
    }

    #[test]
    fn test_custom_weights_shift_the_score() {
        let mut request = request();
        request.market_volatility = 1.0;

        let volatility_only = ModelWeights::new("test", 0.0, &[("volatility", 1.0)]);
        let response = score(&request, &volatility_only);
        assert_eq!(response.risk_score, 100.0);
        assert_eq!(response.metadata.model_version, "test");
    }
}
