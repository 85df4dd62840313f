use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::{AppState, CurrentUser};
use crate::core::shaper::CategoryDto;
use crate::error::{AppError, Result};
use crate::models::BiasLabel;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/search", get(search_categories))
        .route("/bias/{bias}", get(categories_by_bias))
        .route("/{id}", get(category_by_id))
        .route("/{id}/bias-distribution", get(bias_distribution))
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let views = state.categories.list().await?;
    let data: Vec<CategoryDto> = views
        .iter()
        .map(|view| CategoryDto::from_view(view, false))
        .collect();

    Ok(Json(json!({
        "success": true,
        "count": data.len(),
        "data": data,
    })))
}

#[derive(Deserialize)]
struct CategorySearchParams {
    q: Option<String>,
    sort: Option<String>,
    bias: Option<String>,
}

async fn search_categories(
    _user: CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<CategorySearchParams>,
) -> Result<Json<serde_json::Value>> {
    let term = match params.q.as_deref() {
        Some(q) if !q.trim().is_empty() => q.trim().to_string(),
        _ => {
            return Err(AppError::Validation(
                "Search query is required".to_string(),
            ))
        }
    };

    let title_order = params.sort.as_deref() == Some("title");
    let bias = params.bias.as_deref().and_then(BiasLabel::from_param);

    let views = state.categories.search(&term, title_order, bias).await?;
    let data: Vec<CategoryDto> = views
        .iter()
        .map(|view| CategoryDto::from_view(view, true))
        .collect();

    Ok(Json(json!({
        "success": true,
        "query": term,
        "count": data.len(),
        "data": data,
    })))
}

async fn categories_by_bias(
    State(state): State<AppState>,
    Path(bias): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let bias = BiasLabel::from_param(&bias).ok_or_else(|| {
        AppError::Validation("Invalid bias parameter. Must be left, right, or center".to_string())
    })?;

    let views = state.categories.by_bias(bias).await?;
    let data: Vec<CategoryDto> = views
        .iter()
        .map(|view| CategoryDto::from_view(view, false))
        .collect();

    Ok(Json(json!({
        "success": true,
        "bias": bias.as_str(),
        "count": data.len(),
        "data": data,
    })))
}

async fn category_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let view = state
        .categories
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Categorized article not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": CategoryDto::from_view(&view, false),
    })))
}

async fn bias_distribution(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let view = state
        .categories
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Categorized article not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "categorizedArticleId": id,
        "totalArticles": view.articles.len(),
        "biasDistribution": view.distribution,
    })))
}
