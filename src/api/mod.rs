use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::auth::{JwtAuth, TokenVerifier};
use crate::core::{ArticleQuery, CategoryQuery, Resolver, SampleArticles};
use crate::db::Repository;
use crate::error::AppError;
use crate::ledger::Ledger;

mod accounts;
mod articles;
mod categories;
mod feedback;
mod perspectives;
mod saved;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub articles: ArticleQuery,
    pub categories: CategoryQuery,
    pub resolver: Resolver,
    pub ledger: Ledger,
    pub jwt: Arc<JwtAuth>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(
        repo: Arc<Repository>,
        samples: Arc<SampleArticles>,
        jwt: Arc<JwtAuth>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            articles: ArticleQuery::new(repo.clone(), samples),
            categories: CategoryQuery::new(repo.clone()),
            resolver: Resolver::new(repo.clone()),
            ledger: Ledger::new(repo.clone()),
            repo,
            jwt,
            verifier,
        }
    }
}

// ---------------------------------------------------------------------------
// Authenticated user extractor
// ---------------------------------------------------------------------------

/// The requesting user's id, resolved through the configured token
/// verifier. Handlers that take this extractor are auth-gated.
pub struct CurrentUser(pub String);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::Unauthorized("No token, authorization denied".to_string())
            })?;

        let user_id = state.verifier.verify(token)?;
        Ok(CurrentUser(user_id))
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", accounts::auth_router())
        .nest("/user", accounts::user_router())
        .nest("/articles", articles::router())
        .nest("/categorized-articles", categories::router())
        .nest("/perspectives", perspectives::router())
        .nest("/saved-categories", saved::router())
        .nest("/feedback", feedback::router());

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api)
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
