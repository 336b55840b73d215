//! JSON front-end: `POST /analyze`.

use axum::{Json, Router, extract::State, extract::rejection::JsonRejection, routing::post};
use metrics::counter;

use crate::AppState;
use crate::error::ApiResult;
use crate::types::{AnalyzeResponse, FeedbackRequest};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .with_state(state)
}

#[tracing::instrument(skip(state, payload))]
async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    counter!("analyze_requests_total").increment(1);

    let Json(request) = payload.inspect_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected analyze request");
    })?;
    tracing::info!(text_len = request.text.len(), "Processing analyze request");

    let result = state
        .engine
        .classify(&request.text)
        .await
        .inspect_err(|e| {
            counter!("analyze_failures_total").increment(1);
            tracing::error!(error = %e, "Classification failed");
        })?;

    Ok(Json(AnalyzeResponse::new(request.text, result)))
}
