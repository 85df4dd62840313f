use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A topic cluster ("categorized article") curated over a set of scraped
/// articles. Member articles live in a join table owned by the store; an
/// article belongs to at most one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub background: String,
    /// Opaque annotation records attached by the analytics pipeline,
    /// stored and returned in insertion order.
    pub analytics: Vec<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub title: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub background: Option<String>,
    pub analytics: Vec<serde_json::Value>,
}
