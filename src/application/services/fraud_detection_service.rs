//! Fraud Detection Service
//!
//! Screens payments and listing activity. Each signal is scaled to 0-1,
//! weighted by the `fraud_detection` model and squashed through a logistic
//! into a fraud probability.

use std::sync::Arc;

use async_trait::async_trait;

use super::analysis::{instrumented, AnalysisError};
use crate::application::dto::{
    AnalysisMetadata, FraudAction, FraudAnalysisRequest, FraudAnalysisResponse, FraudIndicator,
};
use crate::domain::{round2, RiskLevel};
use crate::infrastructure::models::{logistic, ModelKind, ModelStore, ModelWeights};

const SERVICE: &str = "fraud_detection";

/// Contribution above which a signal is reported as an indicator.
const INDICATOR_THRESHOLD: f64 = 0.5;

const BLOCK_THRESHOLD: f64 = 0.7;
const REVIEW_THRESHOLD: f64 = 0.4;

/// Accounts younger than this are treated as new.
const NEW_ACCOUNT_DAYS: f64 = 30.0;

#[async_trait]
pub trait FraudDetectionService: Send + Sync {
    async fn analyze(
        &self,
        request: FraudAnalysisRequest,
    ) -> Result<FraudAnalysisResponse, AnalysisError>;
}

pub struct FraudDetectionServiceImpl {
    models: Arc<dyn ModelStore>,
}

impl FraudDetectionServiceImpl {
    pub fn new(models: Arc<dyn ModelStore>) -> Self {
        Self { models }
    }
}

#[async_trait]
impl FraudDetectionService for FraudDetectionServiceImpl {
    async fn analyze(
        &self,
        request: FraudAnalysisRequest,
    ) -> Result<FraudAnalysisResponse, AnalysisError> {
        instrumented(SERVICE, async {
            let weights = self.models.load(ModelKind::FraudDetection).await?;
            let response = score(&request, &weights);
            tracing::info!(
                user_id = %response.user_id,
                probability = response.fraud_probability,
                action = ?response.recommended_action,
                "Fraud analysis completed"
            );
            Ok::<_, AnalysisError>(response)
        })
        .await
    }
}

fn signals(request: &FraudAnalysisRequest) -> Vec<(&'static str, f64, String)> {
    let deviation =
        ((request.transaction_amount - request.listed_price).abs() / request.listed_price).min(2.0);
    let age = request.account_age_days as f64;
    let new_account = if age < NEW_ACCOUNT_DAYS {
        1.0 - age / NEW_ACCOUNT_DAYS
    } else {
        0.0
    };
    let country_mismatch = match (&request.ip_country, &request.account_country) {
        (Some(ip), Some(account)) if !ip.eq_ignore_ascii_case(account) => 1.0,
        _ => 0.0,
    };

    vec![
        (
            "price_deviation",
            deviation,
            format!(
                "Transaction amount deviates {:.0}% from listed price",
                deviation * 100.0
            ),
        ),
        (
            "new_account",
            new_account,
            format!("Account is {} days old", request.account_age_days),
        ),
        (
            "failed_payments",
            (request.failed_payment_attempts.min(5) as f64) / 5.0,
            format!(
                "{} failed payment attempts",
                request.failed_payment_attempts
            ),
        ),
        (
            "country_mismatch",
            country_mismatch,
            "Request origin differs from account country".to_string(),
        ),
        (
            "unverified_documents",
            if request.documents_verified { 0.0 } else { 1.0 },
            "Identity documents not verified".to_string(),
        ),
        (
            "listing_velocity",
            (request.listings_created_last_24h.min(10) as f64) / 10.0,
            format!(
                "{} listings created in the last 24 hours",
                request.listings_created_last_24h
            ),
        ),
    ]
}

/// Score a request against a weight table.
pub fn score(request: &FraudAnalysisRequest, weights: &ModelWeights) -> FraudAnalysisResponse {
    let signals = signals(request);

    let mut linear = weights.bias;
    let mut indicators = Vec::new();
    for (code, value, description) in signals {
        let contribution = weights.weight(code) * value;
        linear += contribution;
        if contribution >= INDICATOR_THRESHOLD {
            indicators.push(FraudIndicator {
                code: code.to_string(),
                description,
                contribution: round2(contribution),
            });
        }
    }
    indicators.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));

    let probability = logistic(linear);
    let recommended_action = if probability >= BLOCK_THRESHOLD {
        FraudAction::Block
    } else if probability >= REVIEW_THRESHOLD {
        FraudAction::Review
    } else {
        FraudAction::Approve
    };

    FraudAnalysisResponse {
        metadata: AnalysisMetadata::new(weights.version.clone()),
        user_id: request.user_id.clone(),
        listing_id: request.listing_id,
        fraud_probability: (probability * 10_000.0).round() / 10_000.0,
        risk_level: RiskLevel::from_score(probability * 100.0),
        indicators,
        recommended_action,
    }
}
