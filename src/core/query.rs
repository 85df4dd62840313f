use std::sync::Arc;

use crate::core::bias::BiasDistribution;
use crate::core::fallback::SampleArticles;
use crate::db::{ArticleOrder, Repository};
use crate::error::Result;
use crate::models::{Article, ArticleFilter, BiasLabel, Category};

pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// A validated page request. Page and limit are both clamped to >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).max(1),
        }
    }

    /// Saturates instead of overflowing: page and limit come straight from
    /// the query string, and an absurd page is just an empty page.
    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the pagination arithmetic the contract exposes.
#[derive(Debug, Clone)]
pub struct PageOf<T> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub items_per_page: i64,
}

impl<T> PageOf<T> {
    pub fn new(items: Vec<T>, total_items: i64, page: Page) -> Self {
        Self {
            items,
            total_items,
            total_pages: total_pages(total_items, page.limit),
            current_page: page.page,
            items_per_page: page.limit,
        }
    }
}

fn total_pages(total_items: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    total_items.saturating_add(limit - 1) / limit
}

/// In-memory window over an already-filtered slice; a page past the end is
/// an empty list, never an error.
fn window<T: Clone>(items: &[T], page: Page) -> PageOf<T> {
    let total = items.len() as i64;
    let start = page.skip().min(total) as usize;
    let end = page.skip().saturating_add(page.limit).min(total) as usize;
    PageOf::new(items[start..end].to_vec(), total, page)
}

/// Read path over the article store: filter, sort, paginate. When the
/// store is unreachable the listing path serves a window over the injected
/// sample set instead of failing the request.
#[derive(Clone)]
pub struct ArticleQuery {
    repo: Arc<Repository>,
    samples: Arc<SampleArticles>,
}

impl ArticleQuery {
    pub fn new(repo: Arc<Repository>, samples: Arc<SampleArticles>) -> Self {
        Self { repo, samples }
    }

    /// Plain listing, newest first. Degrades to the sample set on store
    /// failure; filters still apply so the substitution is transparent.
    pub async fn list(&self, filter: &ArticleFilter, page: Page) -> Result<PageOf<Article>> {
        match self.list_from_store(filter, page).await {
            Ok(result) => Ok(result),
            Err(err) if err.is_store_unavailable() => {
                tracing::warn!("article store unavailable, serving sample data: {err}");
                Ok(self.fallback_window(filter, page))
            }
            Err(err) => Err(err),
        }
    }

    async fn list_from_store(&self, filter: &ArticleFilter, page: Page) -> Result<PageOf<Article>> {
        let total = self.repo.count_articles(filter).await?;
        let items = self
            .repo
            .find_articles(filter, ArticleOrder::DateDesc, page.skip(), page.limit)
            .await?;
        Ok(PageOf::new(items, total, page))
    }

    /// Text-search listing: title matches rank ahead of content-only
    /// matches, date descending breaks ties.
    pub async fn search(&self, filter: &ArticleFilter, page: Page) -> Result<PageOf<Article>> {
        let total = self.repo.count_articles(filter).await?;
        let items = self
            .repo
            .find_articles(filter, ArticleOrder::Relevance, page.skip(), page.limit)
            .await?;
        Ok(PageOf::new(items, total, page))
    }

    fn fallback_window(&self, filter: &ArticleFilter, page: Page) -> PageOf<Article> {
        let matching: Vec<Article> = self
            .samples
            .articles()
            .iter()
            .filter(|a| matches_filter(a, filter))
            .cloned()
            .collect();
        window(&matching, page)
    }
}

fn matches_filter(article: &Article, filter: &ArticleFilter) -> bool {
    if let Some(bias) = filter.bias {
        if article.bias != bias {
            return false;
        }
    }
    if let Some(publication) = &filter.publication {
        if &article.publication != publication {
            return false;
        }
    }
    if let Some(term) = &filter.search {
        let term = term.to_lowercase();
        if !article.title.to_lowercase().contains(&term)
            && !article.content.to_lowercase().contains(&term)
        {
            return false;
        }
    }
    if let Some(flag) = filter.has_perspectives {
        if article.has_perspectives != flag {
            return false;
        }
    }
    true
}

/// Category browsing: listings with nested member articles and, where the
/// contract asks for it, an attached bias distribution.
#[derive(Clone)]
pub struct CategoryQuery {
    repo: Arc<Repository>,
}

/// A category together with its resolved members and their distribution.
#[derive(Debug, Clone)]
pub struct CategoryView {
    pub category: Category,
    pub articles: Vec<Article>,
    pub distribution: BiasDistribution,
}

impl CategoryQuery {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    async fn resolve(&self, category: Category) -> Result<CategoryView> {
        let articles = self.repo.member_articles(&category.id).await?;
        let distribution = BiasDistribution::over_articles(&articles);
        Ok(CategoryView {
            category,
            articles,
            distribution,
        })
    }

    pub async fn list(&self) -> Result<Vec<CategoryView>> {
        let mut views = Vec::new();
        for category in self.repo.list_categories().await? {
            views.push(self.resolve(category).await?);
        }
        Ok(views)
    }

    pub async fn get(&self, id: &str) -> Result<Option<CategoryView>> {
        match self.repo.find_category(id).await? {
            Some(category) => Ok(Some(self.resolve(category).await?)),
            None => Ok(None),
        }
    }

    /// Categories holding at least one article with the given bias, with
    /// the nested articles narrowed to that bias. Categories whose members
    /// all miss the bias are dropped entirely.
    pub async fn by_bias(&self, bias: BiasLabel) -> Result<Vec<CategoryView>> {
        let mut views = Vec::new();
        for category in self.repo.categories_with_member_bias(bias).await? {
            let mut view = self.resolve(category).await?;
            view.articles.retain(|a| a.bias == bias);
            if view.articles.is_empty() {
                continue;
            }
            views.push(view);
        }
        Ok(views)
    }

    /// Substring search over title/summary/background, optionally dropping
    /// categories with no member of the requested bias.
    pub async fn search(
        &self,
        term: &str,
        title_order: bool,
        bias: Option<BiasLabel>,
    ) -> Result<Vec<CategoryView>> {
        let mut views = Vec::new();
        for category in self.repo.search_categories(term, title_order).await? {
            let view = self.resolve(category).await?;
            if let Some(bias) = bias {
                if !view.articles.iter().any(|a| a.bias == bias) {
                    continue;
                }
            }
            views.push(view);
        }
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(bias: BiasLabel, publication: &str, title: &str) -> Article {
        Article {
            id: title.to_string(),
            title: title.to_string(),
            url: format!("https://example.com/{title}"),
            content: "body text".to_string(),
            date: Utc::now(),
            publication: publication.to_string(),
            bias,
            score: 0.5,
            image_url: None,
            has_perspectives: false,
            is_categorized: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn page_clamps_to_one() {
        let page = Page::new(Some(0), Some(-3));
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 1);
        assert_eq!(Page::default().limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
    }

    #[test]
    fn extreme_page_values_saturate_instead_of_overflowing() {
        let page = Page::new(Some(i64::MAX / 2), Some(4));
        assert_eq!(page.skip(), i64::MAX);

        let page = Page::new(Some(i64::MAX), Some(i64::MAX));
        assert!(page.skip() >= 0);
        assert_eq!(total_pages(i64::MAX, i64::MAX), 1);

        // A saturated skip still windows to an empty page, not a panic
        let items: Vec<i32> = (0..3).collect();
        let result = window(&items, Page::new(Some(i64::MAX / 2), Some(4)));
        assert!(result.items.is_empty());
        assert_eq!(result.total_items, 3);
    }

    #[test]
    fn page_past_the_end_is_empty_not_an_error() {
        let items: Vec<i32> = (0..25).collect();
        let result = window(&items, Page::new(Some(4), Some(10)));
        assert!(result.items.is_empty());
        assert_eq!(result.total_items, 25);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.current_page, 4);
    }

    #[test]
    fn window_slices_the_middle_page() {
        let items: Vec<i32> = (0..25).collect();
        let result = window(&items, Page::new(Some(2), Some(10)));
        assert_eq!(result.items, (10..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn store_failure_serves_the_sample_set() {
        let repo = Arc::new(Repository::open_in_memory().await.unwrap());
        repo.execute_batch("DROP TABLE articles").await.unwrap();
        let query = ArticleQuery::new(repo, Arc::new(SampleArticles::builtin()));

        let result = query
            .list(&ArticleFilter::default(), Page::default())
            .await
            .unwrap();
        assert_eq!(result.total_items, 5);
        assert_eq!(result.items[0].title, "Tech Innovation Drives Market Growth");

        // Filters still narrow the substituted set
        let filter = ArticleFilter {
            bias: Some(BiasLabel::Left),
            ..Default::default()
        };
        let result = query.list(&filter, Page::default()).await.unwrap();
        assert_eq!(result.total_items, 2);

        // Only the plain listing degrades; search surfaces the failure
        let filter = ArticleFilter {
            search: Some("climate".to_string()),
            ..Default::default()
        };
        assert!(query.search(&filter, Page::default()).await.is_err());
    }

    #[test]
    fn filter_matching_is_case_insensitive_on_search() {
        let article = sample(BiasLabel::Left, "Green Planet News", "Climate Action Urgently Needed");
        let filter = ArticleFilter {
            search: Some("climate".to_string()),
            ..Default::default()
        };
        assert!(matches_filter(&article, &filter));

        let filter = ArticleFilter {
            search: Some("CLIMATE".to_string()),
            ..Default::default()
        };
        assert!(matches_filter(&article, &filter));

        let filter = ArticleFilter {
            search: Some("nuclear".to_string()),
            ..Default::default()
        };
        assert!(!matches_filter(&article, &filter));
    }

    #[test]
    fn filter_fields_are_anded() {
        let article = sample(BiasLabel::Left, "Green Planet News", "Climate Action");
        let filter = ArticleFilter {
            bias: Some(BiasLabel::Left),
            publication: Some("Economic Times".to_string()),
            ..Default::default()
        };
        assert!(!matches_filter(&article, &filter));

        let filter = ArticleFilter {
            bias: Some(BiasLabel::Left),
            publication: Some("Green Planet News".to_string()),
            ..Default::default()
        };
        assert!(matches_filter(&article, &filter));
    }
}
