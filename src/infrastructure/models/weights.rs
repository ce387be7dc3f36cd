//! Scoring model weight tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which analysis a weight table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    FraudDetection,
    RiskManagement,
    CustomerExperience,
    LeadConversion,
    PerformanceTracking,
    OperationalExcellence,
}

impl ModelKind {
    pub const ALL: [ModelKind; 6] = [
        Self::FraudDetection,
        Self::RiskManagement,
        Self::CustomerExperience,
        Self::LeadConversion,
        Self::PerformanceTracking,
        Self::OperationalExcellence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FraudDetection => "fraud_detection",
            Self::RiskManagement => "risk_management",
            Self::CustomerExperience => "customer_experience",
            Self::LeadConversion => "lead_conversion",
            Self::PerformanceTracking => "performance_tracking",
            Self::OperationalExcellence => "operational_excellence",
        }
    }

    /// File name of the weight table inside the models directory.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named-feature weight table.
///
/// ```json
/// { "version": "2024-06", "bias": -4.0, "weights": { "price_deviation": 2.5 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelWeights {
    pub version: String,
    #[serde(default)]
    pub bias: f64,
    pub weights: HashMap<String, f64>,
}

impl ModelWeights {
    pub fn new(version: impl Into<String>, bias: f64, weights: &[(&str, f64)]) -> Self {
        Self {
            version: version.into(),
            bias,
            weights: weights
                .iter()
                .map(|(name, w)| (name.to_string(), *w))
                .collect(),
        }
    }

    /// Weight of a feature, zero when the table does not mention it.
    pub fn weight(&self, feature: &str) -> f64 {
        self.weights.get(feature).copied().unwrap_or(0.0)
    }

    /// `bias + sum(weight * value)`.
    pub fn linear(&self, features: &[(&str, f64)]) -> f64 {
        features
            .iter()
            .fold(self.bias, |acc, (name, value)| acc + self.weight(name) * value)
    }

    /// Logistic probability of the linear score.
    pub fn probability(&self, features: &[(&str, f64)]) -> f64 {
        logistic(self.linear(features))
    }

    /// Weighted mean of component scores. Components without a positive
    /// weight are ignored; with no usable weights this is the plain mean.
    pub fn weighted_average(&self, components: &[(&str, f64)]) -> f64 {
        let (sum, total) = components
            .iter()
            .filter_map(|(name, score)| {
                let w = self.weight(name);
                (w > 0.0).then_some((w * score, w))
            })
            .fold((0.0, 0.0), |(s, t), (ws, w)| (s + ws, t + w));

        if total > 0.0 {
            sum / total
        } else if components.is_empty() {
            0.0
        } else {
            components.iter().map(|(_, s)| s).sum::<f64>() / components.len() as f64
        }
    }

    /// Reject tables that cannot produce finite scores.
    pub fn check(&self) -> Result<(), String> {
        if self.version.trim().is_empty() {
            return Err("version must not be empty".into());
        }
        if !self.bias.is_finite() {
            return Err("bias must be finite".into());
        }
        if let Some((name, _)) = self.weights.iter().find(|(_, w)| !w.is_finite()) {
            return Err(format!("weight '{}' must be finite", name));
        }
        Ok(())
    }

    /// Weights shipped with the service, used when no file overrides them.
    pub fn builtin(kind: ModelKind) -> Self {
        match kind {
            ModelKind::FraudDetection => Self::new(
                BUILTIN_VERSION,
                -4.0,
                &[
                    ("price_deviation", 2.5),
                    ("new_account", 1.2),
                    ("failed_payments", 2.0),
                    ("country_mismatch", 1.0),
                    ("unverified_documents", 1.5),
                    ("listing_velocity", 1.8),
                ],
            ),
            ModelKind::RiskManagement => Self::new(
                BUILTIN_VERSION,
                0.0,
                &[
                    ("pricing", 0.25),
                    ("market_time", 0.15),
                    ("credit", 0.30),
                    ("leverage", 0.20),
                    ("volatility", 0.10),
                ],
            ),
            ModelKind::CustomerExperience => Self::new(
                BUILTIN_VERSION,
                0.0,
                &[
                    ("ratings", 0.40),
                    ("responsiveness", 0.25),
                    ("resolution", 0.15),
                    ("sentiment", 0.20),
                ],
            ),
            ModelKind::LeadConversion => Self::new(
                BUILTIN_VERSION,
                -3.5,
                &[
                    ("source_quality", 1.5),
                    ("budget_fit", 2.0),
                    ("pre_approved", 1.2),
                    ("engagement", 1.5),
                    ("recency", 1.0),
                    ("interest", 0.8),
                ],
            ),
            ModelKind::PerformanceTracking => Self::new(
                BUILTIN_VERSION,
                0.0,
                &[
                    ("conversion", 0.30),
                    ("deal_attainment", 0.25),
                    ("volume_attainment", 0.25),
                    ("speed", 0.10),
                    ("satisfaction", 0.10),
                ],
            ),
            ModelKind::OperationalExcellence => Self::new(
                BUILTIN_VERSION,
                0.0,
                &[
                    ("success", 0.35),
                    ("sla", 0.35),
                    ("automation", 0.15),
                    ("consistency", 0.15),
                ],
            ),
        }
    }
}

pub const BUILTIN_VERSION: &str = "builtin-1";

pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
