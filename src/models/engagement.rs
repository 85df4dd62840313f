use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user's bookmark of a category. The title and image are denormalized
/// at save time so the saved list renders without a category lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCategory {
    pub id: i64,
    pub user_id: String,
    pub category_id: String,
    pub category_title: String,
    pub category_image_url: Option<String>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSavedCategory {
    pub user_id: String,
    pub category_id: String,
    pub category_title: String,
    pub category_image_url: Option<String>,
}

/// A comment left on a category. Never updated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub user_id: String,
    pub user_name: String,
    pub category_id: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub user_id: String,
    pub user_name: String,
    pub category_id: String,
    pub comment: String,
}

pub const MAX_COMMENT_LEN: usize = 1000;
