use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rewritten versions of one article, one per leaning. At most one
/// perspective record exists per article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perspective {
    pub id: String,
    pub article_id: String,
    pub left_version: String,
    pub right_version: String,
    pub center_version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Perspective {
    pub fn version(&self, kind: PerspectiveType) -> &str {
        match kind {
            PerspectiveType::Left => &self.left_version,
            PerspectiveType::Right => &self.right_version,
            PerspectiveType::Center => &self.center_version,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPerspective {
    pub article_id: String,
    pub left_version: String,
    pub right_version: String,
    pub center_version: String,
}

/// Which rewritten version a client asked for. Same closed set as
/// [`super::BiasLabel`], kept distinct because it names a document field
/// rather than a stored label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerspectiveType {
    Left,
    Center,
    Right,
}

impl PerspectiveType {
    pub fn from_param(s: &str) -> Option<PerspectiveType> {
        match s.trim() {
            "left" => Some(PerspectiveType::Left),
            "center" => Some(PerspectiveType::Center),
            "right" => Some(PerspectiveType::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PerspectiveType::Left => "left",
            PerspectiveType::Center => "center",
            PerspectiveType::Right => "right",
        }
    }
}
