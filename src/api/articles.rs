use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::core::shaper::{ArticleDto, PaginationDto, RelatedArticleDto, RelatedArticlesDto};
use crate::core::{Page, RelatedArticles};
use crate::error::{AppError, Result};
use crate::models::{ArticleFilter, BiasLabel};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_articles))
        .route("/search", get(search_articles))
        .route("/stats/bias", get(bias_statistics))
        .route("/bias/{bias}", get(articles_by_bias))
        .route("/{id}", get(article_by_id))
        .route("/{id}/related", get(related_articles))
}

#[derive(Deserialize)]
struct ListParams {
    page: Option<i64>,
    limit: Option<i64>,
    bias: Option<String>,
    publication: Option<String>,
    search: Option<String>,
}

#[derive(Deserialize)]
struct SearchParams {
    query: Option<String>,
    bias: Option<String>,
    publication: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

fn parse_bias(param: Option<&str>) -> Result<Option<BiasLabel>> {
    match param {
        None => Ok(None),
        Some("") => Ok(None),
        Some(s) => BiasLabel::from_param(s).map(Some).ok_or_else(|| {
            AppError::Validation(
                "Invalid bias parameter. Must be left, right, or center".to_string(),
            )
        }),
    }
}

async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>> {
    let filter = ArticleFilter {
        bias: parse_bias(params.bias.as_deref())?,
        publication: params.publication,
        search: params.search,
        ..Default::default()
    };
    let page = Page::new(params.page, params.limit);

    let result = state.articles.list(&filter, page).await?;
    let data: Vec<ArticleDto> = result.items.iter().map(ArticleDto::from).collect();

    Ok(Json(json!({
        "success": true,
        "data": data,
        "pagination": PaginationDto::from(&result),
    })))
}

async fn search_articles(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>> {
    let term = match params.query.as_deref() {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => {
            return Err(AppError::Validation(
                "Search query is required".to_string(),
            ))
        }
    };

    // An unrecognized bias value narrows nothing here; only the path
    // parameter form rejects it.
    let filter = ArticleFilter {
        search: Some(term.clone()),
        bias: params.bias.as_deref().and_then(BiasLabel::from_param),
        publication: params.publication,
        ..Default::default()
    };
    let page = Page::new(params.page, params.limit);

    let result = state.articles.search(&filter, page).await?;
    let data: Vec<ArticleDto> = result.items.iter().map(ArticleDto::from).collect();

    Ok(Json(json!({
        "success": true,
        "query": term,
        "data": data,
        "pagination": PaginationDto::from(&result),
    })))
}

async fn bias_statistics(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let (total, stats) = state.repo.bias_stats().await?;

    let formatted: Vec<serde_json::Value> = stats
        .iter()
        .map(|stat| {
            let percentage = if total == 0 {
                0.0
            } else {
                stat.count as f64 / total as f64 * 100.0
            };
            json!({
                "bias": stat.bias.as_str(),
                "count": stat.count,
                "percentage": format!("{percentage:.2}"),
                "averageScore": format!("{:.4}", stat.avg_score),
            })
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "totalArticles": total,
        "biasDistribution": formatted,
    })))
}

async fn articles_by_bias(
    State(state): State<AppState>,
    Path(bias): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>> {
    let bias = BiasLabel::from_param(&bias).ok_or_else(|| {
        AppError::Validation("Invalid bias parameter. Must be left, right, or center".to_string())
    })?;

    let filter = ArticleFilter::bias(bias);
    let page = Page::new(params.page, params.limit);

    let result = state.articles.list(&filter, page).await?;
    let data: Vec<ArticleDto> = result.items.iter().map(ArticleDto::from).collect();

    Ok(Json(json!({
        "success": true,
        "bias": bias.as_str(),
        "data": data,
        "pagination": PaginationDto::from(&result),
    })))
}

async fn article_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let article = state
        .repo
        .find_article(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Article not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": ArticleDto::from(&article),
    })))
}

async fn related_articles(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RelatedArticlesDto>> {
    let dto = match state.resolver.related_articles(&id).await? {
        RelatedArticles::Categorized {
            category,
            distribution,
            member_count,
            siblings,
        } => RelatedArticlesDto {
            success: true,
            category_id: Some(category.id),
            category_title: Some(category.title),
            category_summary: Some(category.summary),
            article_count: Some(member_count),
            bias_percentages: Some(distribution.percentages()),
            remaining_count: siblings.len(),
            remaining_articles: siblings.iter().map(RelatedArticleDto::from).collect(),
            message: None,
        },
        RelatedArticles::Unresolved { message } => RelatedArticlesDto::unresolved(message),
    };

    Ok(Json(dto))
}
