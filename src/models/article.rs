use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Political leaning attached to every scraped article. The set is closed;
/// anything the scraper emits outside of it is treated as Center when read
/// back (lenient on read, strict on route parameters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasLabel {
    Left,
    Center,
    Right,
}

impl BiasLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BiasLabel::Left => "left",
            BiasLabel::Center => "center",
            BiasLabel::Right => "right",
        }
    }

    /// Strict parse for route/query parameters: anything outside the
    /// three-value set is rejected.
    pub fn from_param(s: &str) -> Option<BiasLabel> {
        match s {
            "left" => Some(BiasLabel::Left),
            "center" => Some(BiasLabel::Center),
            "right" => Some(BiasLabel::Right),
            _ => None,
        }
    }

    /// Lenient parse for stored data: a missing or unrecognized label
    /// counts as Center rather than an error.
    pub fn parse_lenient(s: &str) -> BiasLabel {
        BiasLabel::from_param(s).unwrap_or(BiasLabel::Center)
    }
}

impl std::fmt::Display for BiasLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub url: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub publication: String,
    pub bias: BiasLabel,
    pub score: f64,
    pub image_url: Option<String>,
    pub has_perspectives: bool,
    pub is_categorized: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload used by the ingestion side (and tests). The store
/// assigns the id and timestamps.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub url: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub publication: String,
    pub bias: BiasLabel,
    pub score: f64,
    pub image_url: Option<String>,
}

/// Listing filter; provided fields are AND-ed together. `search` matches
/// case-insensitively against title OR content.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub bias: Option<BiasLabel>,
    pub publication: Option<String>,
    pub search: Option<String>,
    pub has_perspectives: Option<bool>,
}

impl ArticleFilter {
    pub fn bias(bias: BiasLabel) -> Self {
        Self {
            bias: Some(bias),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_bias_reads_as_center() {
        assert_eq!(BiasLabel::parse_lenient("left"), BiasLabel::Left);
        assert_eq!(BiasLabel::parse_lenient("centre"), BiasLabel::Center);
        assert_eq!(BiasLabel::parse_lenient(""), BiasLabel::Center);
    }

    #[test]
    fn param_parse_is_strict() {
        assert_eq!(BiasLabel::from_param("right"), Some(BiasLabel::Right));
        assert_eq!(BiasLabel::from_param("Right"), None);
        assert_eq!(BiasLabel::from_param("extreme"), None);
    }
}
