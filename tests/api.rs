use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use insightwire::api::{build_router, AppState};
use insightwire::auth::{hash_password, JwtAuth};
use insightwire::core::SampleArticles;
use insightwire::db::Repository;
use insightwire::models::{
    AuthType, BiasLabel, NewArticle, NewCategory, NewPerspective, NewUser, User,
};

async fn test_app() -> (Router, Arc<Repository>, Arc<JwtAuth>) {
    let repo = Arc::new(Repository::open_in_memory().await.unwrap());
    let jwt = Arc::new(JwtAuth::new("test-secret"));
    let state = AppState::new(
        repo.clone(),
        Arc::new(SampleArticles::builtin()),
        jwt.clone(),
        jwt.clone(),
    );
    (build_router(state), repo, jwt)
}

async fn seed_user(repo: &Repository) -> User {
    repo.insert_user(NewUser {
        user_name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        password_hash: Some(hash_password("hunter22").unwrap()),
        profile_pic: None,
        auth_type: AuthType::Local,
        google_id: None,
        google_profile: None,
    })
    .await
    .unwrap()
}

fn article(title: &str, url: &str, bias: BiasLabel) -> NewArticle {
    NewArticle {
        title: title.to_string(),
        url: url.to_string(),
        content: format!("Body of {title}"),
        date: chrono::Utc::now(),
        publication: "The Wire".to_string(),
        bias,
        score: 0.5,
        image_url: None,
    }
}

async fn seed_perspective(repo: &Repository, article_id: &str) {
    repo.insert_perspective(NewPerspective {
        article_id: article_id.to_string(),
        left_version: "The left reading".to_string(),
        right_version: "The right reading".to_string(),
        center_version: "The center reading".to_string(),
    })
    .await
    .unwrap();
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

fn get_authed(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn post_json(path: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint_answers() {
    let (app, _, _) = test_app().await;
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn article_listing_envelope() {
    let (app, repo, _) = test_app().await;
    for i in 0..3 {
        repo.insert_article(article(
            &format!("Article {i}"),
            &format!("https://example.com/{i}"),
            BiasLabel::Center,
        ))
        .await
        .unwrap();
    }

    let response = app
        .oneshot(get("/api/articles?page=1&limit=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["totalItems"], 3);
    assert_eq!(body["pagination"]["totalPages"], 2);
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["itemsPerPage"], 2);
    // Contract key names, including the load-bearing typo
    let first = &body["data"][0];
    assert!(first.get("_id").is_some());
    assert!(first.get("hasPerscpectives").is_some());
    assert!(first.get("isCategorized").is_some());
}

#[tokio::test]
async fn absurd_page_numbers_yield_an_empty_page() {
    let (app, repo, _) = test_app().await;
    repo.insert_article(article("Only one", "https://example.com/1", BiasLabel::Center))
        .await
        .unwrap();

    let response = app
        .oneshot(get("/api/articles?page=4611686018427387903&limit=4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["pagination"]["totalItems"], 1);
}

#[tokio::test]
async fn unknown_article_is_404() {
    let (app, _, _) = test_app().await;
    let response = app.oneshot(get("/api/articles/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Article not found");
}

#[tokio::test]
async fn invalid_bias_path_is_400() {
    let (app, _, _) = test_app().await;
    let response = app.oneshot(get("/api/articles/bias/purple")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn article_search_requires_a_query() {
    let (app, _, _) = test_app().await;
    let response = app.oneshot(get("/api/articles/search")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Search query is required");
}

#[tokio::test]
async fn categorized_listing_nests_member_articles() {
    let (app, repo, _) = test_app().await;
    let a1 = repo
        .insert_article(article("Left take", "https://example.com/l", BiasLabel::Left))
        .await
        .unwrap();
    let a2 = repo
        .insert_article(article("Right take", "https://example.com/r", BiasLabel::Right))
        .await
        .unwrap();
    let category = repo
        .insert_category(NewCategory {
            title: "Energy Policy".to_string(),
            summary: "Coverage of the energy debate".to_string(),
            image_url: None,
            background: None,
            analytics: vec![],
        })
        .await
        .unwrap();
    repo.add_article_to_category(&category.id, &a1.id).await.unwrap();
    repo.add_article_to_category(&category.id, &a2.id).await.unwrap();

    let response = app.oneshot(get("/api/categorized-articles")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    let first = &body["data"][0];
    assert_eq!(first["title"], "Energy Policy");
    assert_eq!(first["articles"].as_array().unwrap().len(), 2);
    assert_eq!(first["articles"][0]["isCategorized"], true);
}

#[tokio::test]
async fn bias_distribution_for_category() {
    let (app, repo, _) = test_app().await;
    let category = repo
        .insert_category(NewCategory {
            title: "Topic".to_string(),
            summary: "s".to_string(),
            image_url: None,
            background: None,
            analytics: vec![],
        })
        .await
        .unwrap();
    for (i, bias) in [BiasLabel::Left, BiasLabel::Left, BiasLabel::Center, BiasLabel::Right]
        .iter()
        .enumerate()
    {
        let a = repo
            .insert_article(article(
                &format!("A{i}"),
                &format!("https://example.com/d{i}"),
                *bias,
            ))
            .await
            .unwrap();
        repo.add_article_to_category(&category.id, &a.id).await.unwrap();
    }

    let response = app
        .oneshot(get(&format!(
            "/api/categorized-articles/{}/bias-distribution",
            category.id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["totalArticles"], 4);
    assert_eq!(body["biasDistribution"]["left"], 2);
    assert_eq!(body["biasDistribution"]["leftPct"], 50);
}

#[tokio::test]
async fn perspective_lookup_joins_article_and_versions() {
    let (app, repo, _) = test_app().await;
    let a = repo
        .insert_article(article("Spun story", "https://example.com/spin", BiasLabel::Left))
        .await
        .unwrap();
    seed_perspective(&repo, &a.id).await;

    let response = app
        .oneshot(get(&format!("/api/perspectives/articles/{}", a.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["original_article"]["_id"], a.id);
    assert_eq!(body["data"]["original_article"]["originalBias"], "left");
    assert_eq!(body["data"]["perspectives"]["left"], "The left reading");
    assert_eq!(body["data"]["perspectives"]["right"], "The right reading");
    assert_eq!(body["data"]["perspectives"]["center"], "The center reading");
}

#[tokio::test]
async fn perspective_404s_tell_the_two_cases_apart() {
    let (app, repo, _) = test_app().await;
    let bare = repo
        .insert_article(article("No spin yet", "https://example.com/bare", BiasLabel::Center))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/perspectives/articles/nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Article not found");

    let response = app
        .oneshot(get(&format!("/api/perspectives/articles/{}", bare.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["message"],
        "No perspectives found for this article"
    );
}

#[tokio::test]
async fn compare_returns_only_the_requested_versions() {
    let (app, repo, _) = test_app().await;
    let a = repo
        .insert_article(article("Spun story", "https://example.com/spin", BiasLabel::Right))
        .await
        .unwrap();
    seed_perspective(&repo, &a.id).await;

    let response = app
        .clone()
        .oneshot(get(&format!(
            "/api/perspectives/articles/{}/compare?perspectives=left,center",
            a.id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let versions = body["data"]["perspectives"].as_object().unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions["left"], "The left reading");
    assert_eq!(versions["center"], "The center reading");
    assert!(!versions.contains_key("right"));
    // Compare includes the full original text
    assert_eq!(
        body["data"]["original_article"]["originalContent"],
        "Body of Spun story"
    );

    let response = app
        .oneshot(get(&format!(
            "/api/perspectives/articles/{}/compare?perspectives=bogus",
            a.id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "At least one valid perspective type is required"
    );
}

#[tokio::test]
async fn specific_perspective_validates_the_type() {
    let (app, repo, _) = test_app().await;
    let a = repo
        .insert_article(article("Spun story", "https://example.com/spin", BiasLabel::Center))
        .await
        .unwrap();
    seed_perspective(&repo, &a.id).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/api/perspectives/articles/{}/purple", a.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Invalid perspective type. Must be left, right, or center"
    );

    let response = app
        .oneshot(get(&format!("/api/perspectives/articles/{}/left", a.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["requestedPerspective"]["type"], "left");
    assert_eq!(body["data"]["requestedPerspective"]["content"], "The left reading");
}

#[tokio::test]
async fn saved_categories_require_auth() {
    let (app, _, _) = test_app().await;
    let response = app.oneshot(get("/api/saved-categories")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No token, authorization denied");
}

#[tokio::test]
async fn save_then_check_then_double_save() {
    let (app, repo, jwt) = test_app().await;
    let user = seed_user(&repo).await;
    let token = jwt.issue(&user).unwrap();

    let save = json!({ "categoryId": "c1", "categoryTitle": "Energy" });
    let response = app
        .clone()
        .oneshot(post_json("/api/saved-categories", Some(&token), save.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["categoryId"], "c1");

    let response = app
        .clone()
        .oneshot(get_authed("/api/saved-categories/check/c1", &token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["isSaved"], true);
    assert!(!body["savedAt"].is_null());

    let response = app
        .oneshot(post_json("/api/saved-categories", Some(&token), save))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Category is already saved");
}

#[tokio::test]
async fn signup_login_me_round_trip() {
    let (app, _, _) = test_app().await;

    let signup = json!({
        "userName": "Grace",
        "email": "grace@example.com",
        "password": "hunter22",
        "authType": "local",
    });
    let response = app
        .clone()
        .oneshot(post_json("/api/auth/signup", None, signup))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let login = json!({ "email": "grace@example.com", "password": "hunter22" });
    let response = app
        .clone()
        .oneshot(post_json("/api/auth/login", None, login))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["user"]["userName"], "Grace");

    let response = app
        .oneshot(get_authed("/api/auth/me", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], "grace@example.com");
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let (app, repo, _) = test_app().await;
    seed_user(&repo).await;

    let login = json!({ "email": "ada@example.com", "password": "wrong" });
    let response = app
        .oneshot(post_json("/api/auth/login", None, login))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn deleting_account_removes_saves() {
    let (app, repo, jwt) = test_app().await;
    let user = seed_user(&repo).await;
    let token = jwt.issue(&user).unwrap();

    let save = json!({ "categoryId": "c1", "categoryTitle": "Energy" });
    app.clone()
        .oneshot(post_json("/api/saved-categories", Some(&token), save))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/user")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(repo.user_by_id(&user.id).await.unwrap().is_none());
    assert_eq!(repo.count_saved_categories(&user.id).await.unwrap(), 0);
}
