//! Customer Experience Service
//!
//! Satisfaction from ratings, responsiveness, ticket resolution and the
//! sentiment of free text feedback.

use std::sync::Arc;

use async_trait::async_trait;

use super::analysis::{instrumented, mean, AnalysisError};
use crate::application::dto::{
    AnalysisMetadata, CustomerExperienceRequest, CustomerExperienceResponse, NpsCategory,
    ScoreComponent, Sentiment, SentimentLabel,
};
use crate::domain::{clamp_score, round2};
use crate::infrastructure::models::{ModelKind, ModelStore, ModelWeights};

const SERVICE: &str = "customer_experience";

/// Response times at or above this many hours score zero.
const RESPONSE_CEILING_HOURS: f64 = 48.0;

/// Components below this score get a recommendation.
const WEAK_COMPONENT: f64 = 60.0;

/// Score used when there is no data for a component.
const NEUTRAL: f64 = 50.0;

const POSITIVE_WORDS: &[&str] = &[
    "great", "excellent", "helpful", "responsive", "friendly", "professional", "easy", "smooth",
    "recommend", "happy", "quick", "love", "fantastic", "clear", "thanks",
];

const NEGATIVE_WORDS: &[&str] = &[
    "slow", "rude", "unresponsive", "difficult", "confusing", "late", "poor", "bad", "terrible",
    "ignored", "frustrating", "disappointed", "delay", "delayed", "unprofessional",
];

#[async_trait]
pub trait CustomerExperienceService: Send + Sync {
    async fn analyze(
        &self,
        request: CustomerExperienceRequest,
    ) -> Result<CustomerExperienceResponse, AnalysisError>;
}

pub struct CustomerExperienceServiceImpl {
    models: Arc<dyn ModelStore>,
}

impl CustomerExperienceServiceImpl {
    pub fn new(models: Arc<dyn ModelStore>) -> Self {
        Self { models }
    }
}

#[async_trait]
impl CustomerExperienceService for CustomerExperienceServiceImpl {
    async fn analyze(
        &self,
        request: CustomerExperienceRequest,
    ) -> Result<CustomerExperienceResponse, AnalysisError> {
        instrumented(SERVICE, async {
            let weights = self.models.load(ModelKind::CustomerExperience).await?;
            let response = score(&request, &weights);
            tracing::info!(
                customer_id = %response.customer_id,
                satisfaction = response.satisfaction_score,
                sentiment = ?response.sentiment.label,
                "Customer experience analysis completed"
            );
            Ok::<_, AnalysisError>(response)
        })
        .await
    }
}

/// Lexicon sentiment over all comments: (positive - negative) / matches.
pub fn sentiment(comments: &[String]) -> Sentiment {
    let (positive, negative) = comments
        .iter()
        .flat_map(|comment| {
            comment
                .split(|c: char| !c.is_alphabetic())
                .filter(|w| !w.is_empty())
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
        })
        .fold((0u32, 0u32), |(p, n), word| {
            if POSITIVE_WORDS.contains(&word.as_str()) {
                (p + 1, n)
            } else if NEGATIVE_WORDS.contains(&word.as_str()) {
                (p, n + 1)
            } else {
                (p, n)
            }
        });

    let matched = positive + negative;
    let score = if matched == 0 {
        0.0
    } else {
        (positive as f64 - negative as f64) / matched as f64
    };

    let label = if score > 0.2 {
        SentimentLabel::Positive
    } else if score < -0.2 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    Sentiment {
        label,
        score: round2(score),
    }
}

pub fn score(
    request: &CustomerExperienceRequest,
    weights: &ModelWeights,
) -> CustomerExperienceResponse {
    let ratings: Vec<f64> = request.ratings.iter().map(|r| *r as f64).collect();
    let mean_rating = mean(&ratings);
    let mean_response = mean(&request.response_times_hours);
    let sentiment = sentiment(&request.feedback);

    let tickets = request.open_tickets as u64 + request.resolved_tickets as u64;
    let components = [
        (
            "ratings",
            mean_rating.map_or(NEUTRAL, |m| clamp_score((m - 1.0) / 4.0 * 100.0)),
        ),
        (
            "responsiveness",
            mean_response.map_or(NEUTRAL, |h| {
                clamp_score((1.0 - h.min(RESPONSE_CEILING_HOURS) / RESPONSE_CEILING_HOURS) * 100.0)
            }),
        ),
        (
            "resolution",
            if tickets == 0 {
                100.0
            } else {
                request.resolved_tickets as f64 / tickets as f64 * 100.0
            },
        ),
        ("sentiment", clamp_score((sentiment.score + 1.0) / 2.0 * 100.0)),
    ];

    let satisfaction_score = round2(clamp_score(weights.weighted_average(&components)));

    let nps_category = match mean_rating {
        Some(m) if m >= 4.5 => NpsCategory::Promoter,
        Some(m) if m < 3.5 => NpsCategory::Detractor,
        _ => NpsCategory::Passive,
    };

    let mut recommendations: Vec<String> = components
        .iter()
        .filter(|(_, score)| *score < WEAK_COMPONENT)
        .map(|(name, _)| match *name {
            "ratings" => "Follow up with the customer to understand low ratings".to_string(),
            "responsiveness" => format!(
                "Reduce response times; average is {:.1} hours",
                mean_response.unwrap_or_default()
            ),
            "resolution" => format!("Resolve {} open support tickets", request.open_tickets),
            _ => "Review negative feedback themes with the servicing agent".to_string(),
        })
        .collect();
    if recommendations.is_empty() {
        recommendations.push(if satisfaction_score >= 80.0 {
            "Invite the customer to leave a public review".to_string()
        } else {
            "Maintain current service level".to_string()
        });
    }

    CustomerExperienceResponse {
        metadata: AnalysisMetadata::new(weights.version.clone()),
        customer_id: request.customer_id.clone(),
        satisfaction_score,
        sentiment,
        nps_category,
        components: components
            .iter()
            .map(|(name, score)| ScoreComponent {
                name: name.to_string(),
                score: round2(*score),
                weight: weights.weight(name),
            })
            .collect(),
        recommendations,
    }
}
