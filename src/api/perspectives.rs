use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Map};

use super::AppState;
use crate::core::shaper::{PaginationDto, PerspectiveArticleDto, PerspectiveDto};
use crate::core::{Page, PageOf};
use crate::error::{AppError, Result};
use crate::models::{Article, ArticleFilter, BiasLabel, Perspective, PerspectiveType};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_perspectives))
        .route("/articles-with-perspectives", get(articles_with_perspectives))
        .route("/articles/{article_id}", get(perspectives_for_article))
        .route("/articles/{article_id}/compare", get(compare_perspectives))
        .route(
            "/articles/{article_id}/{perspective_type}",
            get(specific_perspective),
        )
}

#[derive(Deserialize)]
struct PageParams {
    page: Option<i64>,
    limit: Option<i64>,
    bias: Option<String>,
}

async fn list_perspectives(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<serde_json::Value>> {
    let page = Page::new(params.page, params.limit);
    let total = state.repo.count_perspectives().await?;
    let rows = state.repo.list_perspectives(page.skip(), page.limit).await?;

    let data: Vec<PerspectiveDto> = rows
        .iter()
        .map(|(perspective, article)| PerspectiveDto::new(perspective, article))
        .collect();
    let result = PageOf::new(data, total, page);

    Ok(Json(json!({
        "success": true,
        "data": result.items,
        "pagination": PaginationDto::from(&result),
    })))
}

async fn articles_with_perspectives(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<serde_json::Value>> {
    let filter = ArticleFilter {
        has_perspectives: Some(true),
        bias: params.bias.as_deref().and_then(BiasLabel::from_param),
        ..Default::default()
    };
    let page = Page::new(params.page, params.limit);

    let total = state.repo.count_articles(&filter).await?;
    let articles = state
        .repo
        .find_articles(&filter, crate::db::ArticleOrder::DateDesc, page.skip(), page.limit)
        .await?;

    let data: Vec<serde_json::Value> = articles
        .iter()
        .map(|article| {
            json!({
                "_id": article.id,
                "title": article.title,
                "url": article.url,
                "publication": article.publication,
                "date": article.date,
                "bias": article.bias.as_str(),
                "score": article.score,
                "image_url": article.image_url,
                "hasPerscpectives": article.has_perspectives,
                "isCategorized": article.is_categorized,
            })
        })
        .collect();
    let result = PageOf::new(data, total, page);

    Ok(Json(json!({
        "success": true,
        "data": result.items,
        "pagination": PaginationDto::from(&result),
    })))
}

/// Fetches the perspective record for an article, 404ing the way the
/// contract distinguishes a missing article from a missing perspective.
async fn perspective_with_article(
    state: &AppState,
    article_id: &str,
) -> Result<(Perspective, Article)> {
    let article = state
        .repo
        .find_article(article_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Article not found".to_string()))?;

    let perspective = state
        .repo
        .perspective_for_article(article_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No perspectives found for this article".to_string())
        })?;

    Ok((perspective, article))
}

async fn perspectives_for_article(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let (perspective, article) = perspective_with_article(&state, &article_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": PerspectiveDto::new(&perspective, &article),
    })))
}

#[derive(Deserialize)]
struct CompareParams {
    perspectives: Option<String>,
}

async fn compare_perspectives(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
    Query(params): Query<CompareParams>,
) -> Result<Json<serde_json::Value>> {
    let requested: Vec<PerspectiveType> = params
        .perspectives
        .as_deref()
        .unwrap_or("left,right,center")
        .split(',')
        .filter_map(PerspectiveType::from_param)
        .collect();

    if requested.is_empty() {
        return Err(AppError::Validation(
            "At least one valid perspective type is required".to_string(),
        ));
    }

    let (perspective, article) = perspective_with_article(&state, &article_id).await?;

    let mut versions = Map::new();
    for kind in requested {
        versions.insert(
            kind.as_str().to_string(),
            json!(perspective.version(kind)),
        );
    }

    Ok(Json(json!({
        "success": true,
        "data": {
            "_id": perspective.id,
            "original_article": PerspectiveArticleDto::new(&article, true),
            "perspectives": versions,
        },
    })))
}

async fn specific_perspective(
    State(state): State<AppState>,
    Path((article_id, perspective_type)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>> {
    let kind = PerspectiveType::from_param(&perspective_type).ok_or_else(|| {
        AppError::Validation(
            "Invalid perspective type. Must be left, right, or center".to_string(),
        )
    })?;

    let (perspective, article) = perspective_with_article(&state, &article_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "_id": perspective.id,
            "original_article": PerspectiveArticleDto::new(&article, false),
            "requestedPerspective": {
                "type": kind.as_str(),
                "content": perspective.version(kind),
            },
            "createdAt": perspective.created_at,
            "updatedAt": perspective.updated_at,
        },
    })))
}
