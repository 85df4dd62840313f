use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::{AppState, CurrentUser};
use crate::core::shaper::FeedbackDto;
use crate::error::Result;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_feedback))
        .route("/user/all", get(user_feedback))
        .route("/{category_id}", get(category_feedback))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackRequest {
    #[serde(default)]
    category_id: String,
    #[serde(default)]
    comment: String,
}

async fn add_feedback(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let feedback = state
        .ledger
        .add_feedback(&user_id, &body.category_id, &body.comment)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Feedback submitted.",
            "data": FeedbackDto::from(&feedback),
        })),
    ))
}

async fn category_feedback(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let feedback = state.ledger.feedback_for_category(&category_id).await?;
    let data: Vec<FeedbackDto> = feedback.iter().map(FeedbackDto::from).collect();

    Ok(Json(json!({ "success": true, "data": data })))
}

async fn user_feedback(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let feedback = state.ledger.feedback_for_user(&user_id).await?;
    let data: Vec<FeedbackDto> = feedback.iter().map(FeedbackDto::from).collect();

    Ok(Json(json!({ "success": true, "data": data })))
}
