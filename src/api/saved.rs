use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::{AppState, CurrentUser};
use crate::core::shaper::{PaginationDto, SavedCategoryDto};
use crate::core::Page;
use crate::error::Result;
use crate::models::NewSavedCategory;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(save_category).get(list_saved))
        .route("/{category_id}", delete(unsave_category))
        .route("/check/{category_id}", get(check_saved))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveRequest {
    #[serde(default)]
    category_id: String,
    #[serde(default)]
    category_title: String,
    category_image_url: Option<String>,
}

async fn save_category(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<SaveRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let saved = state
        .ledger
        .save_category(NewSavedCategory {
            user_id,
            category_id: body.category_id,
            category_title: body.category_title,
            category_image_url: body.category_image_url,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Category saved successfully",
            "data": SavedCategoryDto::from(&saved),
        })),
    ))
}

async fn unsave_category(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    state.ledger.unsave_category(&user_id, &category_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Category unsaved successfully",
    })))
}

#[derive(Deserialize)]
struct PageParams {
    page: Option<i64>,
    limit: Option<i64>,
}

async fn list_saved(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<serde_json::Value>> {
    let page = Page::new(params.page, params.limit);
    let result = state.ledger.list_saved(&user_id, page).await?;
    let data: Vec<SavedCategoryDto> = result.items.iter().map(SavedCategoryDto::from).collect();

    Ok(Json(json!({
        "success": true,
        "data": data,
        "pagination": PaginationDto::from(&result),
    })))
}

async fn check_saved(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let saved = state.ledger.saved_status(&user_id, &category_id).await?;

    Ok(Json(json!({
        "success": true,
        "isSaved": saved.is_some(),
        "savedAt": saved.map(|s| s.saved_at),
    })))
}
