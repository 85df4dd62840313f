use std::sync::Arc;

use insightwire::api::{build_router, AppState};
use insightwire::auth::{JwtAuth, StaticVerifier, TokenVerifier};
use insightwire::config::Config;
use insightwire::core::SampleArticles;
use insightwire::db::Repository;
use insightwire::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    let repo = Arc::new(Repository::new(&config.db_path).await?);
    let samples = Arc::new(SampleArticles::builtin());
    let jwt = Arc::new(JwtAuth::new(&config.jwt_secret()));

    let verifier: Arc<dyn TokenVerifier> = match &config.fixture_user {
        Some(user_id) => {
            tracing::warn!(
                user_id,
                "fixture_user is set: token verification is DISABLED and every \
                 request runs as this user"
            );
            Arc::new(StaticVerifier::new(user_id.clone()))
        }
        None => jwt.clone(),
    };

    let state = AppState::new(repo, samples, jwt, verifier);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, router).await?;

    Ok(())
}
