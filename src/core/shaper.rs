use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::bias::{BiasDistribution, BiasPercentages};
use crate::core::query::{CategoryView, PageOf};
use crate::models::{Article, Feedback, Perspective, SavedCategory, User};

/// External article shape. This module is the only place internal field
/// names become contract names; the misspelled `hasPerscpectives` key is
/// load-bearing for existing clients and kept as-is.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub url: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub publication: String,
    pub bias: String,
    pub score: f64,
    pub image_url: Option<String>,
    #[serde(rename = "hasPerscpectives")]
    pub has_perspectives: bool,
    #[serde(rename = "isCategorized")]
    pub is_categorized: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Article> for ArticleDto {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            url: article.url.clone(),
            content: article.content.clone(),
            date: article.date,
            publication: article.publication.clone(),
            bias: article.bias.as_str().to_string(),
            score: article.score,
            image_url: article.image_url.clone(),
            has_perspectives: article.has_perspectives,
            is_categorized: article.is_categorized,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// Lightweight sibling projection for the related-articles view.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedArticleDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub url: String,
    pub date: DateTime<Utc>,
    pub publication: String,
    pub bias: String,
    pub score: f64,
    pub image_url: Option<String>,
    pub snippet: String,
}

pub const SNIPPET_LEN: usize = 100;

impl From<&Article> for RelatedArticleDto {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            url: article.url.clone(),
            date: article.date,
            publication: article.publication.clone(),
            bias: article.bias.as_str().to_string(),
            score: article.score,
            image_url: article.image_url.clone(),
            snippet: snippet(&article.content, SNIPPET_LEN),
        }
    }
}

/// Truncates at a character boundary and appends an ellipsis when there is
/// more content than fits.
pub fn snippet(content: &str, max_chars: usize) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub summary: String,
    pub image_url: Option<String>,
    #[serde(rename = "Background")]
    pub background: String,
    #[serde(rename = "Analytics")]
    pub analytics: Vec<serde_json::Value>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    pub articles: Vec<ArticleDto>,
    #[serde(rename = "biasDistribution", skip_serializing_if = "Option::is_none")]
    pub bias_distribution: Option<BiasDistribution>,
}

impl CategoryDto {
    pub fn from_view(view: &CategoryView, with_distribution: bool) -> Self {
        Self {
            id: view.category.id.clone(),
            title: view.category.title.clone(),
            summary: view.category.summary.clone(),
            image_url: view.category.image_url.clone(),
            background: view.category.background.clone(),
            analytics: view.category.analytics.clone(),
            created_at: view.category.created_at,
            updated_at: view.category.updated_at,
            articles: view.articles.iter().map(ArticleDto::from).collect(),
            bias_distribution: with_distribution.then_some(view.distribution),
        }
    }
}

/// Related-articles envelope; the unresolved variant keeps success=true
/// with an empty list per the existing contract.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedArticlesDto {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bias_percentages: Option<BiasPercentages>,
    pub remaining_count: usize,
    pub remaining_articles: Vec<RelatedArticleDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RelatedArticlesDto {
    pub fn unresolved(message: &str) -> Self {
        Self {
            success: true,
            category_id: None,
            category_title: None,
            category_summary: None,
            article_count: None,
            bias_percentages: None,
            remaining_count: 0,
            remaining_articles: Vec::new(),
            message: Some(message.to_string()),
        }
    }
}

/// Pagination envelope shared by every paginated listing.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PaginationDto {
    #[serde(rename = "currentPage")]
    pub current_page: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
    #[serde(rename = "totalItems")]
    pub total_items: i64,
    #[serde(rename = "itemsPerPage")]
    pub items_per_page: i64,
}

impl<T> From<&PageOf<T>> for PaginationDto {
    fn from(page: &PageOf<T>) -> Self {
        Self {
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_items: page.total_items,
            items_per_page: page.items_per_page,
        }
    }
}

/// The article header embedded in perspective responses.
#[derive(Debug, Clone, Serialize)]
pub struct PerspectiveArticleDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub url: String,
    pub publication: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "originalBias")]
    pub original_bias: String,
    pub score: f64,
    pub image_url: Option<String>,
    #[serde(rename = "originalContent", skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
}

impl PerspectiveArticleDto {
    pub fn new(article: &Article, with_content: bool) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            url: article.url.clone(),
            publication: article.publication.clone(),
            date: article.date,
            original_bias: article.bias.as_str().to_string(),
            score: article.score,
            image_url: article.image_url.clone(),
            original_content: with_content.then(|| article.content.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PerspectiveVersionsDto {
    pub left: String,
    pub right: String,
    pub center: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerspectiveDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub original_article: PerspectiveArticleDto,
    pub perspectives: PerspectiveVersionsDto,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl PerspectiveDto {
    pub fn new(perspective: &Perspective, article: &Article) -> Self {
        Self {
            id: perspective.id.clone(),
            original_article: PerspectiveArticleDto::new(article, false),
            perspectives: PerspectiveVersionsDto {
                left: perspective.left_version.clone(),
                right: perspective.right_version.clone(),
                center: perspective.center_version.clone(),
            },
            created_at: perspective.created_at,
            updated_at: perspective.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub email: String,
    #[serde(rename = "profilePic")]
    pub profile_pic: Option<String>,
    #[serde(rename = "authType")]
    pub auth_type: String,
    pub role: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            user_name: user.user_name.clone(),
            email: user.email.clone(),
            profile_pic: user.profile_pic.clone(),
            auth_type: user.auth_type.as_str().to_string(),
            role: user.role.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedCategoryDto {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "categoryId")]
    pub category_id: String,
    #[serde(rename = "categoryTitle")]
    pub category_title: String,
    #[serde(rename = "categoryImageUrl")]
    pub category_image_url: Option<String>,
    #[serde(rename = "savedAt")]
    pub saved_at: DateTime<Utc>,
}

impl From<&SavedCategory> for SavedCategoryDto {
    fn from(saved: &SavedCategory) -> Self {
        Self {
            id: saved.id,
            user_id: saved.user_id.clone(),
            category_id: saved.category_id.clone(),
            category_title: saved.category_title.clone(),
            category_image_url: saved.category_image_url.clone(),
            saved_at: saved.saved_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackDto {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "categoryId")]
    pub category_id: String,
    pub comment: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<&Feedback> for FeedbackDto {
    fn from(feedback: &Feedback) -> Self {
        Self {
            id: feedback.id,
            user_id: feedback.user_id.clone(),
            user_name: feedback.user_name.clone(),
            category_id: feedback.category_id.clone(),
            comment: feedback.comment.clone(),
            created_at: feedback.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BiasLabel;
    use chrono::Utc;

    fn article() -> Article {
        Article {
            id: "a1".to_string(),
            title: "Title".to_string(),
            url: "https://example.com/a1".to_string(),
            content: "x".repeat(150),
            date: Utc::now(),
            publication: "Pub".to_string(),
            bias: BiasLabel::Left,
            score: 0.9,
            image_url: None,
            has_perspectives: true,
            is_categorized: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn contract_field_names_survive_serialization() {
        let dto = ArticleDto::from(&article());
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["_id"], "a1");
        assert_eq!(value["bias"], "left");
        assert_eq!(value["hasPerscpectives"], true);
        assert_eq!(value["isCategorized"], false);
        assert!(value.get("has_perspectives").is_none());
    }

    #[test]
    fn snippet_truncates_at_100_chars_with_ellipsis() {
        let dto = RelatedArticleDto::from(&article());
        assert_eq!(dto.snippet.chars().count(), 103);
        assert!(dto.snippet.ends_with("..."));

        assert_eq!(snippet("short", 100), "short");
        // Multi-byte content must not split a char
        let emoji = "é".repeat(101);
        assert_eq!(snippet(&emoji, 100).chars().count(), 103);
    }

    #[test]
    fn pagination_envelope_uses_camel_case() {
        let page = PageOf::new(vec![1, 2, 3], 25, crate::core::Page::new(Some(1), Some(10)));
        let value = serde_json::to_value(PaginationDto::from(&page)).unwrap();
        assert_eq!(value["currentPage"], 1);
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["totalItems"], 25);
        assert_eq!(value["itemsPerPage"], 10);
    }
}
