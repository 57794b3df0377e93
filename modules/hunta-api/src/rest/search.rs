use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use tracing::warn;

use hunta_common::{SearchQuery, ValidationError};

use super::error_response;
use crate::AppState;

fn parse_request(body: Result<Json<Value>, JsonRejection>) -> Result<SearchQuery, ValidationError> {
    let Json(body) = body.map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
    SearchQuery::from_json_field(&body)
}

/// `POST /search` with `{ "search_term": "..." }`.
///
/// 200 with a JSON array of listings, 400 for invalid input (no outbound
/// calls made), 500 with `{error, message, timestamp}` for any pipeline failure.
pub async fn api_search(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let query = match parse_request(body) {
        Ok(q) => q,
        Err(e) => {
            warn!(reason = %e, "Rejected search request");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": ValidationError::CLIENT_MESSAGE })),
            )
                .into_response();
        }
    };

    match state.pipeline.run(&query).await {
        Ok(listings) => Json(listings).into_response(),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Search failed",
            &e.to_string(),
        ),
    }
}
