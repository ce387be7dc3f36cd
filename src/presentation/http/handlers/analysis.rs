//! Analysis Handlers

use axum::{extract::State, Json};

use crate::application::dto::{
    CustomerExperienceRequest, CustomerExperienceResponse, FraudAnalysisRequest,
    FraudAnalysisResponse, LeadScoringRequest, LeadScoringResponse, OperationalAnalysisRequest,
    OperationalAnalysisResponse, PerformanceEvaluationRequest, PerformanceEvaluationResponse,
    RiskAssessmentRequest, RiskAssessmentResponse,
};
use crate::presentation::http::extractors::ApiJson;
use crate::shared::error::AppError;
use crate::shared::validation::validate_request;
use crate::startup::AppState;

/// Screen a transaction for fraud
pub async fn analyze_fraud(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<FraudAnalysisRequest>,
) -> Result<Json<FraudAnalysisResponse>, AppError> {
    validate_request(&body)?;
    let response = state.fraud_detection.analyze(body).await?;
    Ok(Json(response))
}

/// Assess the risk of a property transaction
pub async fn assess_risk(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RiskAssessmentRequest>,
) -> Result<Json<RiskAssessmentResponse>, AppError> {
    validate_request(&body)?;
    let response = state.risk_management.assess(body).await?;
    Ok(Json(response))
}

/// Analyze a customer's experience
pub async fn analyze_experience(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CustomerExperienceRequest>,
) -> Result<Json<CustomerExperienceResponse>, AppError> {
    validate_request(&body)?;
    let response = state.customer_experience.analyze(body).await?;
    Ok(Json(response))
}

/// Score a buyer lead
pub async fn score_lead(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LeadScoringRequest>,
) -> Result<Json<LeadScoringResponse>, AppError> {
    validate_request(&body)?;
    let response = state.lead_conversion.score(body).await?;
    Ok(Json(response))
}

/// Evaluate an agent over a period
pub async fn evaluate_performance(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<PerformanceEvaluationRequest>,
) -> Result<Json<PerformanceEvaluationResponse>, AppError> {
    validate_request(&body)?;
    let response = state.performance_tracking.evaluate(body).await?;
    Ok(Json(response))
}

/// Analyze a business process
pub async fn analyze_operations(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<OperationalAnalysisRequest>,
) -> Result<Json<OperationalAnalysisResponse>, AppError> {
    validate_request(&body)?;
    let response = state.operational_excellence.analyze(body).await?;
    Ok(Json(response))
}
