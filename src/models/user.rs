use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    Local,
    Google,
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::Local => "local",
            AuthType::Google => "google",
        }
    }

    pub fn from_str(s: &str) -> Option<AuthType> {
        match s {
            "local" => Some(AuthType::Local),
            "google" => Some(AuthType::Google),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Role {
        match s {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleProfile {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

/// Account record. `password_hash` is populated iff `auth_type` is local;
/// `google_id`/`google_profile` iff google.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub profile_pic: Option<String>,
    pub auth_type: AuthType,
    pub google_id: Option<String>,
    pub google_profile: Option<GoogleProfile>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub profile_pic: Option<String>,
    pub auth_type: AuthType,
    pub google_id: Option<String>,
    pub google_profile: Option<GoogleProfile>,
}
