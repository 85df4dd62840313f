use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::{AppState, CurrentUser};
use crate::auth::{hash_password, verify_password};
use crate::core::shaper::UserDto;
use crate::error::{AppError, Result};
use crate::models::{AuthType, GoogleProfile, NewUser, User};

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/me", get(current_user))
        .route("/change-password", post(change_password))
}

pub fn user_router() -> Router<AppState> {
    Router::new().route("/", delete(delete_account))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignupRequest {
    #[serde(default)]
    user_name: String,
    #[serde(default)]
    email: String,
    password: Option<String>,
    #[serde(default)]
    auth_type: String,
    google_id: Option<String>,
    google_profile: Option<GoogleProfile>,
    profile_pic: Option<String>,
}

async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    if body.email.is_empty() || body.auth_type.is_empty() || body.user_name.is_empty() {
        return Err(AppError::Validation("Missing fields".to_string()));
    }

    let auth_type = AuthType::from_str(&body.auth_type)
        .ok_or_else(|| AppError::Validation("Invalid authentication type".to_string()))?;

    let new_user = match auth_type {
        AuthType::Local => {
            let password = body.password.filter(|p| !p.is_empty()).ok_or_else(|| {
                AppError::Validation(
                    "Password is required for local authentication".to_string(),
                )
            })?;
            NewUser {
                user_name: body.user_name,
                email: body.email,
                password_hash: Some(hash_password(&password)?),
                profile_pic: body.profile_pic,
                auth_type,
                google_id: None,
                google_profile: None,
            }
        }
        AuthType::Google => {
            if body.google_id.is_none() || body.google_profile.is_none() {
                return Err(AppError::Validation(
                    "Google authentication details required".to_string(),
                ));
            }
            NewUser {
                user_name: body.user_name,
                email: body.email,
                password_hash: None,
                profile_pic: body.profile_pic,
                auth_type,
                google_id: body.google_id,
                google_profile: body.google_profile,
            }
        }
    };

    let user = state.repo.insert_user(new_user).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully",
            "data": { "user": UserDto::from(&user) },
        })),
    ))
}

#[derive(Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>> {
    if body.email.is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let user = state
        .repo
        .user_by_email(&body.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    // Google accounts carry no password hash and cannot log in here.
    let valid = user
        .password_hash
        .as_deref()
        .is_some_and(|hash| verify_password(&body.password, hash));
    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state.jwt.issue(&user)?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "token": token,
            "user": {
                "id": user.id,
                "userName": user.user_name,
                "email": user.email,
                "profilePic": user.profile_pic,
            },
        },
    })))
}

async fn require_user(state: &AppState, user_id: &str) -> Result<User> {
    state
        .repo
        .user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

async fn current_user(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let user = require_user(&state, &user_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": UserDto::from(&user),
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest {
    #[serde(default)]
    current_password: String,
    #[serde(default)]
    new_password: String,
}

async fn change_password(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    if body.current_password.is_empty() || body.new_password.is_empty() {
        return Err(AppError::Validation(
            "Current password and new password are required".to_string(),
        ));
    }
    if body.new_password.chars().count() < 6 {
        return Err(AppError::Validation(
            "New password must be at least 6 characters long".to_string(),
        ));
    }

    let user = require_user(&state, &user_id).await?;

    if user.auth_type != AuthType::Local {
        return Err(AppError::Validation(
            "Password change is only available for local accounts".to_string(),
        ));
    }

    let valid = user
        .password_hash
        .as_deref()
        .is_some_and(|hash| verify_password(&body.current_password, hash));
    if !valid {
        return Err(AppError::Validation(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_hash = hash_password(&body.new_password)?;
    state.repo.update_password(&user.id, &new_hash).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Password changed successfully",
    })))
}

async fn delete_account(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    state.repo.delete_user_cascade(&user_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Account and all related data deleted.",
    })))
}
