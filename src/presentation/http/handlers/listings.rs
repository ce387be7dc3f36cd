//! Listing Handlers

use axum::{extract::State, Json};
use chrono::Utc;

use crate::application::dto::{
    EvaluateListingRequest, ListingPolicyResponse, ListingTransitionResponse,
    TransitionListingRequest,
};
use crate::presentation::http::extractors::ApiJson;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Evaluate every lifecycle policy for a listing
pub async fn evaluate_policies(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<EvaluateListingRequest>,
) -> Result<Json<ListingPolicyResponse>, AppError> {
    let as_of = body.as_of.unwrap_or_else(Utc::now);
    let response = state.listing_policies.evaluate(&body.listing, as_of).await;
    Ok(Json(response))
}

/// Move a listing to another status
pub async fn transition(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<TransitionListingRequest>,
) -> Result<Json<ListingTransitionResponse>, AppError> {
    let as_of = body.as_of.unwrap_or_else(Utc::now);
    let response = state
        .listing_policies
        .transition(body.listing, body.target_status, as_of)
        .await?;
    Ok(Json(response))
}
