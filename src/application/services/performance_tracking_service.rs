//! Performance Tracking Service
//!
//! Agent performance over a reporting period against deal and volume
//! targets.

use std::sync::Arc;

use async_trait::async_trait;

use super::analysis::{instrumented, mean, AnalysisError};
use crate::application::dto::{
    AnalysisMetadata, PerformanceEvaluationRequest, PerformanceEvaluationResponse,
    PerformanceTier, ScoreComponent,
};
use crate::domain::{clamp_score, round2};
use crate::infrastructure::models::{ModelKind, ModelStore, ModelWeights};

const SERVICE: &str = "performance_tracking";

/// Conversion rate that earns a full conversion score.
const CONVERSION_BENCHMARK: f64 = 0.25;

/// Conversion rate below which an insight is raised.
const CONVERSION_FLOOR: f64 = 0.10;

/// Closing within this many days earns a full speed score.
const FAST_CLOSE_DAYS: f64 = 30.0;

/// Days beyond `FAST_CLOSE_DAYS` at which the speed score reaches zero.
const SLOW_CLOSE_SPAN_DAYS: f64 = 90.0;

const NEUTRAL: f64 = 50.0;

#[async_trait]
pub trait PerformanceTrackingService: Send + Sync {
    async fn evaluate(
        &self,
        request: PerformanceEvaluationRequest,
    ) -> Result<PerformanceEvaluationResponse, AnalysisError>;
}

pub struct PerformanceTrackingServiceImpl {
    models: Arc<dyn ModelStore>,
}

impl PerformanceTrackingServiceImpl {
    pub fn new(models: Arc<dyn ModelStore>) -> Self {
        Self { models }
    }
}

#[async_trait]
impl PerformanceTrackingService for PerformanceTrackingServiceImpl {
    async fn evaluate(
        &self,
        request: PerformanceEvaluationRequest,
    ) -> Result<PerformanceEvaluationResponse, AnalysisError> {
        instrumented(SERVICE, async {
            let weights = self.models.load(ModelKind::PerformanceTracking).await?;
            let response = score(&request, &weights)?;
            tracing::info!(
                agent_id = %response.agent_id,
                score = response.performance_score,
                tier = ?response.tier,
                "Performance evaluation completed"
            );
            Ok::<_, AnalysisError>(response)
        })
        .await
    }
}

impl PerformanceTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Self::TopPerformer
        } else if score >= 70.0 {
            Self::Strong
        } else if score >= 50.0 {
            Self::Developing
        } else {
            Self::NeedsSupport
        }
    }
}

pub fn score(
    request: &PerformanceEvaluationRequest,
    weights: &ModelWeights,
) -> Result<PerformanceEvaluationResponse, AnalysisError> {
    if request.deals_closed > request.listings_handled {
        return Err(AnalysisError::InvalidInput(format!(
            "deals closed ({}) exceeds listings handled ({})",
            request.deals_closed, request.listings_handled
        )));
    }

    let conversion_rate = if request.listings_handled == 0 {
        0.0
    } else {
        request.deals_closed as f64 / request.listings_handled as f64
    };
    let deal_ratio = request.deals_closed as f64 / request.target_deals as f64;
    let volume_ratio = request.total_sales_volume / request.target_volume;
    let ratings: Vec<f64> = request.client_ratings.iter().map(|r| *r as f64).collect();
    let mean_rating = mean(&ratings);

    let components = [
        (
            "conversion",
            clamp_score(conversion_rate / CONVERSION_BENCHMARK * 100.0),
        ),
        ("deal_attainment", clamp_score(deal_ratio * 100.0)),
        ("volume_attainment", clamp_score(volume_ratio * 100.0)),
        (
            "speed",
            request.avg_days_to_close.map_or(NEUTRAL, |days| {
                clamp_score((1.0 - (days - FAST_CLOSE_DAYS) / SLOW_CLOSE_SPAN_DAYS) * 100.0)
            }),
        ),
        (
            "satisfaction",
            mean_rating.map_or(NEUTRAL, |m| clamp_score((m - 1.0) / 4.0 * 100.0)),
        ),
    ];

    let performance_score = round2(clamp_score(weights.weighted_average(&components)));

    let mut insights = Vec::new();
    if deal_ratio >= 1.0 && volume_ratio >= 1.0 {
        insights.push("Exceeded deal and volume targets".to_string());
    }
    if conversion_rate < CONVERSION_FLOOR {
        insights.push(format!(
            "Conversion rate of {:.1}% is below the {:.0}% floor; review listing qualification",
            conversion_rate * 100.0,
            CONVERSION_FLOOR * 100.0
        ));
    }
    if let Some(days) = request.avg_days_to_close {
        if components[3].1 < NEUTRAL {
            insights.push(format!(
                "Average of {:.0} days to close; tighten offer-to-completion follow-up",
                days
            ));
        }
    }
    if let Some(m) = mean_rating {
        if components[4].1 < 60.0 {
            insights.push(format!(
                "Client ratings average {:.1}; schedule service coaching",
                m
            ));
        }
    }
    if volume_ratio < 0.5 {
        insights.push(format!(
            "Sales volume at {:.0}% of target",
            volume_ratio * 100.0
        ));
    }
    if insights.is_empty() {
        insights.push("Performance on track".to_string());
    }

    Ok(PerformanceEvaluationResponse {
        metadata: AnalysisMetadata::new(weights.version.clone()),
        agent_id: request.agent_id.clone(),
        period_start: request.period_start,
        period_end: request.period_end,
        performance_score,
        conversion_rate: round2(conversion_rate),
        target_attainment: round2((deal_ratio + volume_ratio) / 2.0),
        tier: PerformanceTier::from_score(performance_score),
        components: components
            .iter()
            .map(|(name, score)| ScoreComponent {
                name: name.to_string(),
                score: round2(*score),
                weight: weights.weight(name),
            })
            .collect(),
        insights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn builtin() -> ModelWeights {
        ModelWeights::builtin(ModelKind::PerformanceTracking)
    }

    fn request() -> PerformanceEvaluationRequest {
        PerformanceEvaluationRequest {
            agent_id: "agent-5".into(),
            period_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            listings_handled: 20,
            deals_closed: 6,
            total_sales_volume: 2_400_000.0,
            avg_days_to_close: Some(25.0),
            client_ratings: vec![5, 5, 4],
            target_deals: 5,
            target_volume: 2_000_000.0,
        }
    }

    #[test]
    fn test_top_performer() {
        let response = score(&request(), &builtin()).unwrap();
        assert_eq!(response.tier, PerformanceTier::TopPerformer);
        assert_eq!(response.conversion_rate, 0.3);
        assert_eq!(response.target_attainment, 1.2);
        assert_eq!(response.insights, vec!["Exceeded deal and volume targets".to_string()]);
    }

    #[test]
    fn test_struggling_agent_gets_insights() {
        let request = PerformanceEvaluationRequest {
            listings_handled: 30,
            deals_closed: 2,
            total_sales_volume: 400_000.0,
            avg_days_to_close: Some(110.0),
            client_ratings: vec![2, 3],
            target_deals: 6,
            ..request()
        };

        let response = score(&request, &builtin()).unwrap();
        assert_eq!(response.tier, PerformanceTier::NeedsSupport);
        assert_eq!(response.insights.len(), 4);
        assert!(response.insights[0].starts_with("Conversion rate of 6.7%"));
        assert_eq!(response.insights[3], "Sales volume at 20% of target");
    }

    #[test]
    fn test_more_deals_than_listings_is_rejected() {
        let request = PerformanceEvaluationRequest {
            listings_handled: 2,
            deals_closed: 3,
            ..request()
        };
        assert!(matches!(
            score(&request, &builtin()),
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}
