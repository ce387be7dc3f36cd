//! Operational Excellence Service
//!
//! Efficiency of a repeated business process (valuations, document checks,
//! closings) from a sample of recent runs.

use std::sync::Arc;

use async_trait::async_trait;

use super::analysis::{instrumented, mean, percentile, AnalysisError};
use crate::application::dto::{
    AnalysisMetadata, OperationalAnalysisRequest, OperationalAnalysisResponse, ScoreComponent,
};
use crate::domain::{clamp_score, round2};
use crate::infrastructure::models::{ModelKind, ModelStore, ModelWeights};

const SERVICE: &str = "operational_excellence";

const TARGET_SUCCESS_RATE: f64 = 0.95;
const MAX_MANUAL_STEPS: f64 = 2.0;

/// Consistency score below which duration variance is a bottleneck.
const CONSISTENCY_FLOOR: f64 = 50.0;

#[async_trait]
pub trait OperationalExcellenceService: Send + Sync {
    async fn analyze(
        &self,
        request: OperationalAnalysisRequest,
    ) -> Result<OperationalAnalysisResponse, AnalysisError>;
}

pub struct OperationalExcellenceServiceImpl {
    models: Arc<dyn ModelStore>,
}

impl OperationalExcellenceServiceImpl {
    pub fn new(models: Arc<dyn ModelStore>) -> Self {
        Self { models }
    }
}

#[async_trait]
impl OperationalExcellenceService for OperationalExcellenceServiceImpl {
    async fn analyze(
        &self,
        request: OperationalAnalysisRequest,
    ) -> Result<OperationalAnalysisResponse, AnalysisError> {
        instrumented(SERVICE, async {
            let weights = self.models.load(ModelKind::OperationalExcellence).await?;
            let response = score(&request, &weights)?;
            tracing::info!(
                process = %response.process_name,
                efficiency = response.efficiency_score,
                bottlenecks = response.bottlenecks.len(),
                "Operational analysis completed"
            );
            Ok::<_, AnalysisError>(response)
        })
        .await
    }
}

pub fn score(
    request: &OperationalAnalysisRequest,
    weights: &ModelWeights,
) -> Result<OperationalAnalysisResponse, AnalysisError> {
    if request.samples.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "at least one process sample is required".into(),
        ));
    }

    let total = request.samples.len() as f64;
    let mut durations: Vec<f64> = request.samples.iter().map(|s| s.duration_minutes).collect();
    durations.sort_by(f64::total_cmp);

    let succeeded = request.samples.iter().filter(|s| s.succeeded).count() as f64;
    let success_rate = succeeded / total;
    let breaches = durations.iter().filter(|d| **d > request.sla_minutes).count() as f64;
    let sla_breach_rate = breaches / total;
    let manual: Vec<f64> = request.samples.iter().map(|s| s.manual_steps as f64).collect();
    let avg_manual = mean(&manual).unwrap_or_default();

    let p50 = percentile(&durations, 50.0);
    let p95 = percentile(&durations, 95.0);
    let spread = if p50 > 0.0 {
        ((p95 - p50) / p50).min(1.0)
    } else if p95 > 0.0 {
        1.0
    } else {
        0.0
    };

    let components = [
        ("success", success_rate * 100.0),
        ("sla", (1.0 - sla_breach_rate) * 100.0),
        ("automation", clamp_score(100.0 / (1.0 + avg_manual))),
        ("consistency", clamp_score((1.0 - spread) * 100.0)),
    ];
    let efficiency_score = round2(clamp_score(weights.weighted_average(&components)));

    let mut bottlenecks = Vec::new();
    let mut improvement_actions = Vec::new();
    if p95 > request.sla_minutes {
        bottlenecks.push(format!(
            "95th percentile duration {:.1} min exceeds SLA of {:.1} min",
            p95, request.sla_minutes
        ));
        improvement_actions.push("Investigate slowest runs and add capacity at peak times".into());
    }
    if success_rate < TARGET_SUCCESS_RATE {
        bottlenecks.push(format!(
            "Success rate {:.1}% below {:.0}% target",
            success_rate * 100.0,
            TARGET_SUCCESS_RATE * 100.0
        ));
        improvement_actions.push("Add validation before the failing step".into());
    }
    if avg_manual > MAX_MANUAL_STEPS {
        bottlenecks.push(format!("Average {:.1} manual steps per run", avg_manual));
        improvement_actions.push("Automate repeated manual steps".into());
    }
    if components[3].1 < CONSISTENCY_FLOOR {
        bottlenecks.push(format!(
            "High duration variance (p95 is {:.1}x p50)",
            if p50 > 0.0 { p95 / p50 } else { 0.0 }
        ));
        improvement_actions.push("Standardise the process with a checklist".into());
    }
    if improvement_actions.is_empty() {
        improvement_actions.push("Maintain current process".into());
    }

    Ok(OperationalAnalysisResponse {
        metadata: AnalysisMetadata::new(weights.version.clone()),
        process_name: request.process_name.clone(),
        efficiency_score,
        success_rate: round2(success_rate),
        p50_duration_minutes: round2(p50),
        p95_duration_minutes: round2(p95),
        sla_breach_rate: round2(sla_breach_rate),
        components: components
            .iter()
            .map(|(name, score)| ScoreComponent {
                name: name.to_string(),
                score: round2(*score),
                weight: weights.weight(name),
            })
            .collect(),
        bottlenecks,
        improvement_actions,
    })
}
