//! Shared plumbing for the analysis services.

use std::future::Future;
use std::time::Instant;

use crate::infrastructure::metrics;
use crate::infrastructure::models::ModelError;

/// Analysis failures.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The request is well formed but describes an impossible situation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("model unavailable: {0}")]
    ModelUnavailable(#[from] ModelError),
}

/// Run an analysis, recording its outcome and latency.
pub(crate) async fn instrumented<T, F>(service: &'static str, analysis: F) -> Result<T, AnalysisError>
where
    F: Future<Output = Result<T, AnalysisError>>,
{
    let started = Instant::now();
    let result = analysis.await;
    let elapsed = started.elapsed().as_secs_f64();

    let outcome = match &result {
        Ok(_) => "ok",
        Err(AnalysisError::InvalidInput(reason)) => {
            tracing::info!(service, %reason, "Analysis rejected");
            "invalid"
        }
        Err(AnalysisError::ModelUnavailable(e)) => {
            tracing::warn!(service, error = %e, "Analysis failed, model unavailable");
            "unavailable"
        }
    };
    metrics::record_analysis(service, outcome, elapsed);

    result
}

/// Nearest-rank percentile of an ascending slice. `p` in 0-100.
pub(crate) fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
