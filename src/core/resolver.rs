use std::sync::Arc;

use crate::core::bias::BiasDistribution;
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::{Article, Category};

/// Outcome of locating the category that owns an article. The two empty
/// outcomes are distinct on purpose: "not yet categorized" is normal
/// pipeline lag, while a categorized flag with no owning row is a data
/// integrity problem worth logging.
#[derive(Debug, Clone)]
pub enum Ownership {
    Owned(Category),
    NotCategorized,
    Inconsistent,
}

/// The related-articles view for one article: its owning category, the
/// distribution over the whole member set, and the sibling articles.
#[derive(Debug, Clone)]
pub enum RelatedArticles {
    Categorized {
        category: Category,
        distribution: BiasDistribution,
        member_count: usize,
        siblings: Vec<Article>,
    },
    Unresolved {
        message: &'static str,
    },
}

/// Resolves article <-> category references across the two collections.
#[derive(Clone)]
pub struct Resolver {
    repo: Arc<Repository>,
}

impl Resolver {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Finds the unique category whose member set contains the article.
    /// Short-circuits on the is_categorized flag so an uncategorized
    /// article never costs a category-store scan.
    pub async fn find_owning_category(&self, article_id: &str) -> Result<Ownership> {
        let article = self
            .repo
            .find_article(article_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Article not found".to_string()))?;

        if !article.is_categorized {
            return Ok(Ownership::NotCategorized);
        }

        match self.repo.owning_category(article_id).await? {
            Some(category) => Ok(Ownership::Owned(category)),
            None => {
                tracing::warn!(
                    article_id,
                    "article flagged categorized but no owning category exists"
                );
                Ok(Ownership::Inconsistent)
            }
        }
    }

    /// Member articles of a category, store order, dangling ids skipped.
    pub async fn resolve_members(&self, category: &Category) -> Result<Vec<Article>> {
        self.repo.member_articles(&category.id).await
    }

    /// Siblings of an article within its owning category. The bias
    /// distribution covers the full member set including the requesting
    /// article; the sibling list excludes it.
    pub async fn related_articles(&self, article_id: &str) -> Result<RelatedArticles> {
        let category = match self.find_owning_category(article_id).await? {
            Ownership::Owned(category) => category,
            Ownership::NotCategorized => {
                return Ok(RelatedArticles::Unresolved {
                    message: "Article has not been categorized yet",
                })
            }
            Ownership::Inconsistent => {
                return Ok(RelatedArticles::Unresolved {
                    message: "No related articles found for this article",
                })
            }
        };

        let members = self.resolve_members(&category).await?;
        let distribution = BiasDistribution::over_articles(&members);
        let member_count = members.len();
        let siblings: Vec<Article> = members.into_iter().filter(|a| a.id != article_id).collect();

        Ok(RelatedArticles::Categorized {
            category,
            distribution,
            member_count,
            siblings,
        })
    }
}
