use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tokio_rusqlite::Connection;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    Article, ArticleFilter, AuthType, BiasLabel, Category, Feedback, GoogleProfile, NewArticle,
    NewCategory, NewFeedback, NewPerspective, NewSavedCategory, NewUser, Perspective, Role,
    SavedCategory, User,
};

use super::schema::SCHEMA;

/// Per-bias slice of the corpus-wide aggregation.
#[derive(Debug, Clone)]
pub struct BiasStat {
    pub bias: BiasLabel,
    pub count: i64,
    pub avg_score: f64,
}

/// How a filtered article query is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleOrder {
    /// Newest first; the default and only ordering for plain listing.
    DateDesc,
    /// Title matches ahead of content-only matches, then newest first.
    /// Only meaningful when the filter carries a search term.
    Relevance,
}

pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::init(conn).await
    }

    /// In-memory store, used by tests.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Runs arbitrary SQL against the store; lets tests simulate failure
    /// modes such as a missing table.
    #[cfg(test)]
    pub(crate) async fn execute_batch(&self, sql: &str) -> Result<()> {
        let sql = sql.to_string();
        self.conn
            .call(move |conn| {
                conn.execute_batch(&sql)?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    // Article operations

    pub async fn insert_article(&self, article: NewArticle) -> Result<Article> {
        let id = Uuid::new_v4().to_string();
        let fetch_id = id.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO articles
                       (id, title, url, content, date, publication, bias, score, image_url)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
                    params![
                        id,
                        article.title,
                        article.url,
                        article.content,
                        article.date.to_rfc3339(),
                        article.publication,
                        article.bias.as_str(),
                        article.score,
                        article.image_url,
                    ],
                )?;
                Ok(())
            })
            .await?;

        self.find_article(&fetch_id)
            .await?
            .ok_or_else(|| AppError::Store("inserted article not found".to_string()))
    }

    pub async fn find_article(&self, id: &str) -> Result<Option<Article>> {
        let id = id.to_string();
        let article = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = ?1"
                ))?;
                let article = stmt
                    .query_row(params![id], |row| Ok(article_from_row(row)))
                    .optional()?;
                Ok(article)
            })
            .await?;
        Ok(article)
    }

    pub async fn count_articles(&self, filter: &ArticleFilter) -> Result<i64> {
        let (clause, args) = filter_clause(filter);
        let total = self
            .conn
            .call(move |conn| {
                let sql = format!("SELECT COUNT(*) FROM articles{clause}");
                let total =
                    conn.query_row(&sql, params_from_iter(args.iter()), |row| row.get(0))?;
                Ok(total)
            })
            .await?;
        Ok(total)
    }

    pub async fn find_articles(
        &self,
        filter: &ArticleFilter,
        order: ArticleOrder,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Article>> {
        let (clause, mut args) = filter_clause(filter);

        let order_sql = match (order, &filter.search) {
            (ArticleOrder::Relevance, Some(term)) => {
                args.push(like_pattern(term));
                format!(
                    " ORDER BY CASE WHEN title LIKE ?{} THEN 0 ELSE 1 END, date DESC",
                    args.len()
                )
            }
            _ => " ORDER BY date DESC".to_string(),
        };

        let articles = self
            .conn
            .call(move |conn| {
                let sql = format!(
                    "SELECT {ARTICLE_COLUMNS} FROM articles{clause}{order_sql} LIMIT {limit} OFFSET {skip}"
                );
                let mut stmt = conn.prepare(&sql)?;
                let articles = stmt
                    .query_map(params_from_iter(args.iter()), |row| {
                        Ok(article_from_row(row))
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }

    /// Corpus-wide group-count-avg over the bias label, plus the total.
    pub async fn bias_stats(&self) -> Result<(i64, Vec<BiasStat>)> {
        self.conn
            .call(|conn| {
                let total: i64 =
                    conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;

                let mut stmt = conn.prepare(
                    "SELECT bias, COUNT(*), AVG(score) FROM articles GROUP BY bias ORDER BY bias",
                )?;
                let stats = stmt
                    .query_map([], |row| {
                        Ok(BiasStat {
                            bias: BiasLabel::parse_lenient(&row.get::<_, String>(0)?),
                            count: row.get(1)?,
                            avg_score: row.get(2)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                Ok((total, stats))
            })
            .await
            .map_err(AppError::from)
    }

    // Category operations

    pub async fn insert_category(&self, category: NewCategory) -> Result<Category> {
        let id = Uuid::new_v4().to_string();
        let fetch_id = id.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO categories (id, title, summary, image_url, background, analytics)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
                    params![
                        id,
                        category.title,
                        category.summary,
                        category.image_url,
                        category.background.unwrap_or_else(|| "None".to_string()),
                        serde_json::to_string(&category.analytics).unwrap_or_else(|_| "[]".into()),
                    ],
                )?;
                Ok(())
            })
            .await?;

        self.find_category(&fetch_id)
            .await?
            .ok_or_else(|| AppError::Store("inserted category not found".to_string()))
    }

    /// Adds an article to a category's member set and flips its
    /// is_categorized flag, in one transaction. Fails with Conflict when
    /// the article is already owned by some category (join-table UNIQUE).
    pub async fn add_article_to_category(&self, category_id: &str, article_id: &str) -> Result<()> {
        let category_id = category_id.to_string();
        let article_id = article_id.to_string();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO category_articles (category_id, article_id) VALUES (?1, ?2)",
                    params![category_id, article_id],
                )?;
                tx.execute(
                    "UPDATE articles SET is_categorized = 1, updated_at = datetime('now') WHERE id = ?1",
                    params![article_id],
                )?;
                tx.execute(
                    "UPDATE categories SET updated_at = datetime('now') WHERE id = ?1",
                    params![category_id],
                )?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => {
                    AppError::Conflict("article already belongs to a category".to_string())
                }
                other => other,
            })
    }

    pub async fn find_category(&self, id: &str) -> Result<Option<Category>> {
        let id = id.to_string();
        let category = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"
                ))?;
                let category = stmt
                    .query_row(params![id], |row| Ok(category_from_row(row)))
                    .optional()?;
                Ok(category)
            })
            .await?;
        Ok(category)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let categories = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY created_at DESC"
                ))?;
                let categories = stmt
                    .query_map([], |row| Ok(category_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(categories)
            })
            .await?;
        Ok(categories)
    }

    /// Substring search over title, summary and background narrative.
    pub async fn search_categories(&self, term: &str, title_order: bool) -> Result<Vec<Category>> {
        let pattern = like_pattern(term);
        let order = if title_order {
            "title COLLATE NOCASE ASC"
        } else {
            "created_at DESC"
        };
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE title LIKE ?1 OR summary LIKE ?1 OR background LIKE ?1 \
             ORDER BY {order}"
        );
        let categories = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let categories = stmt
                    .query_map(params![pattern], |row| Ok(category_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(categories)
            })
            .await?;
        Ok(categories)
    }

    /// Categories with at least one member article carrying the given bias.
    pub async fn categories_with_member_bias(&self, bias: BiasLabel) -> Result<Vec<Category>> {
        let bias = bias.as_str();
        let categories = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT DISTINCT {CATEGORY_COLUMNS_QUALIFIED} FROM categories c \
                     JOIN category_articles ca ON ca.category_id = c.id \
                     JOIN articles a ON a.id = ca.article_id \
                     WHERE a.bias = ?1 \
                     ORDER BY c.created_at DESC"
                ))?;
                let categories = stmt
                    .query_map(params![bias], |row| Ok(category_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(categories)
            })
            .await?;
        Ok(categories)
    }

    /// Member articles of a category, in the order the store recorded them.
    /// Dangling member ids simply do not join and are skipped.
    pub async fn member_articles(&self, category_id: &str) -> Result<Vec<Article>> {
        let category_id = category_id.to_string();
        let articles = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ARTICLE_COLUMNS_QUALIFIED} FROM articles a \
                     JOIN category_articles ca ON ca.article_id = a.id \
                     WHERE ca.category_id = ?1 \
                     ORDER BY ca.id"
                ))?;
                let articles = stmt
                    .query_map(params![category_id], |row| Ok(article_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }

    /// The category whose member set contains this article, if any. The
    /// join-table UNIQUE guarantees at most one row.
    pub async fn owning_category(&self, article_id: &str) -> Result<Option<Category>> {
        let article_id = article_id.to_string();
        let category = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {CATEGORY_COLUMNS_QUALIFIED} FROM categories c \
                     JOIN category_articles ca ON ca.category_id = c.id \
                     WHERE ca.article_id = ?1"
                ))?;
                let category = stmt
                    .query_row(params![article_id], |row| Ok(category_from_row(row)))
                    .optional()?;
                Ok(category)
            })
            .await?;
        Ok(category)
    }

    // Perspective operations

    pub async fn insert_perspective(&self, perspective: NewPerspective) -> Result<Perspective> {
        let id = Uuid::new_v4().to_string();
        let article_id = perspective.article_id.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO perspectives
                       (id, article_id, left_version, right_version, center_version)
                       VALUES (?1, ?2, ?3, ?4, ?5)"#,
                    params![
                        id,
                        perspective.article_id,
                        perspective.left_version,
                        perspective.right_version,
                        perspective.center_version,
                    ],
                )?;
                conn.execute(
                    "UPDATE articles SET has_perspectives = 1, updated_at = datetime('now') WHERE id = ?1",
                    params![perspective.article_id],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => {
                    AppError::Conflict("article already has a perspective".to_string())
                }
                other => other,
            })?;

        self.perspective_for_article(&article_id)
            .await?
            .ok_or_else(|| AppError::Store("inserted perspective not found".to_string()))
    }

    pub async fn perspective_for_article(&self, article_id: &str) -> Result<Option<Perspective>> {
        let article_id = article_id.to_string();
        let perspective = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {PERSPECTIVE_COLUMNS} FROM perspectives WHERE article_id = ?1"
                ))?;
                let perspective = stmt
                    .query_row(params![article_id], |row| Ok(perspective_from_row(row)))
                    .optional()?;
                Ok(perspective)
            })
            .await?;
        Ok(perspective)
    }

    pub async fn count_perspectives(&self) -> Result<i64> {
        let total = self
            .conn
            .call(|conn| {
                let total =
                    conn.query_row("SELECT COUNT(*) FROM perspectives", [], |row| row.get(0))?;
                Ok(total)
            })
            .await?;
        Ok(total)
    }

    /// Newest perspectives first, each joined to its owning article.
    pub async fn list_perspectives(
        &self,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<(Perspective, Article)>> {
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {PERSPECTIVE_COLUMNS_QUALIFIED}, {ARTICLE_COLUMNS_QUALIFIED} \
                     FROM perspectives p \
                     JOIN articles a ON a.id = p.article_id \
                     ORDER BY p.created_at DESC LIMIT {limit} OFFSET {skip}"
                ))?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok((perspective_from_row(row), article_from_row_at(row, 7)))
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;
        Ok(rows)
    }

    // User operations

    pub async fn insert_user(&self, user: NewUser) -> Result<User> {
        let id = Uuid::new_v4().to_string();
        let fetch_id = id.clone();
        self.conn
            .call(move |conn| {
                let google_profile = user
                    .google_profile
                    .as_ref()
                    .map(|p| serde_json::to_string(p).unwrap_or_else(|_| "{}".into()));
                conn.execute(
                    r#"INSERT INTO users
                       (id, user_name, email, password_hash, profile_pic, auth_type, google_id, google_profile)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
                    params![
                        id,
                        user.user_name,
                        user.email.to_lowercase(),
                        user.password_hash,
                        user.profile_pic,
                        user.auth_type.as_str(),
                        user.google_id,
                        google_profile,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => AppError::Conflict("User already exists".to_string()),
                other => other,
            })?;

        self.user_by_id(&fetch_id)
            .await?
            .ok_or_else(|| AppError::Store("inserted user not found".to_string()))
    }

    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_lowercase();
        let user = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
                ))?;
                let user = stmt
                    .query_row(params![email], |row| Ok(user_from_row(row)))
                    .optional()?;
                Ok(user)
            })
            .await?;
        Ok(user)
    }

    pub async fn user_by_id(&self, id: &str) -> Result<Option<User>> {
        let id = id.to_string();
        let user = self
            .conn
            .call(move |conn| {
                let mut stmt =
                    conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;
                let user = stmt
                    .query_row(params![id], |row| Ok(user_from_row(row)))
                    .optional()?;
                Ok(user)
            })
            .await?;
        Ok(user)
    }

    pub async fn update_password(&self, user_id: &str, password_hash: &str) -> Result<()> {
        let user_id = user_id.to_string();
        let password_hash = password_hash.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "UPDATE users SET password_hash = ?1, updated_at = datetime('now') WHERE id = ?2",
                    params![password_hash, user_id],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// Removes a user together with all their saved categories and
    /// feedback. The three deletes commit or roll back as one unit, so no
    /// orphan ledger rows can survive a partial failure.
    pub async fn delete_user_cascade(&self, user_id: &str) -> Result<()> {
        let user_id = user_id.to_string();
        let deleted = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute("DELETE FROM feedback WHERE user_id = ?1", params![user_id])?;
                tx.execute(
                    "DELETE FROM saved_categories WHERE user_id = ?1",
                    params![user_id],
                )?;
                let deleted = tx.execute("DELETE FROM users WHERE id = ?1", params![user_id])?;
                tx.commit()?;
                Ok(deleted)
            })
            .await?;

        if deleted == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    // Saved-category operations

    pub async fn insert_saved_category(&self, save: NewSavedCategory) -> Result<SavedCategory> {
        let user_id = save.user_id.clone();
        let category_id = save.category_id.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO saved_categories
                       (user_id, category_id, category_title, category_image_url)
                       VALUES (?1, ?2, ?3, ?4)"#,
                    params![
                        save.user_id,
                        save.category_id,
                        save.category_title,
                        save.category_image_url,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => {
                    AppError::Conflict("Category is already saved".to_string())
                }
                other => other,
            })?;

        self.find_saved_category(&user_id, &category_id)
            .await?
            .ok_or_else(|| AppError::Store("inserted save not found".to_string()))
    }

    /// Returns true when a row was actually removed.
    pub async fn delete_saved_category(&self, user_id: &str, category_id: &str) -> Result<bool> {
        let user_id = user_id.to_string();
        let category_id = category_id.to_string();
        let deleted = self
            .conn
            .call(move |conn| {
                let deleted = conn.execute(
                    "DELETE FROM saved_categories WHERE user_id = ?1 AND category_id = ?2",
                    params![user_id, category_id],
                )?;
                Ok(deleted)
            })
            .await?;
        Ok(deleted > 0)
    }

    pub async fn find_saved_category(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> Result<Option<SavedCategory>> {
        let user_id = user_id.to_string();
        let category_id = category_id.to_string();
        let saved = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {SAVED_COLUMNS} FROM saved_categories \
                     WHERE user_id = ?1 AND category_id = ?2"
                ))?;
                let saved = stmt
                    .query_row(params![user_id, category_id], |row| Ok(saved_from_row(row)))
                    .optional()?;
                Ok(saved)
            })
            .await?;
        Ok(saved)
    }

    pub async fn list_saved_categories(
        &self,
        user_id: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<SavedCategory>> {
        let user_id = user_id.to_string();
        let saved = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {SAVED_COLUMNS} FROM saved_categories \
                     WHERE user_id = ?1 ORDER BY saved_at DESC, id DESC \
                     LIMIT {limit} OFFSET {skip}"
                ))?;
                let saved = stmt
                    .query_map(params![user_id], |row| Ok(saved_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(saved)
            })
            .await?;
        Ok(saved)
    }

    pub async fn count_saved_categories(&self, user_id: &str) -> Result<i64> {
        let user_id = user_id.to_string();
        let total = self
            .conn
            .call(move |conn| {
                let total = conn.query_row(
                    "SELECT COUNT(*) FROM saved_categories WHERE user_id = ?1",
                    params![user_id],
                    |row| row.get(0),
                )?;
                Ok(total)
            })
            .await?;
        Ok(total)
    }

    // Feedback operations

    pub async fn insert_feedback(&self, feedback: NewFeedback) -> Result<Feedback> {
        let feedback_id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO feedback (user_id, user_name, category_id, comment)
                       VALUES (?1, ?2, ?3, ?4)"#,
                    params![
                        feedback.user_id,
                        feedback.user_name,
                        feedback.category_id,
                        feedback.comment,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        let feedback = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE id = ?1"
                ))?;
                let feedback =
                    stmt.query_row(params![feedback_id], |row| Ok(feedback_from_row(row)))?;
                Ok(feedback)
            })
            .await?;
        Ok(feedback)
    }

    pub async fn feedback_for_category(&self, category_id: &str) -> Result<Vec<Feedback>> {
        let category_id = category_id.to_string();
        let feedback = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {FEEDBACK_COLUMNS} FROM feedback \
                     WHERE category_id = ?1 ORDER BY created_at DESC, id DESC"
                ))?;
                let feedback = stmt
                    .query_map(params![category_id], |row| Ok(feedback_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(feedback)
            })
            .await?;
        Ok(feedback)
    }

    pub async fn feedback_for_user(&self, user_id: &str) -> Result<Vec<Feedback>> {
        let user_id = user_id.to_string();
        let feedback = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {FEEDBACK_COLUMNS} FROM feedback \
                     WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
                ))?;
                let feedback = stmt
                    .query_map(params![user_id], |row| Ok(feedback_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(feedback)
            })
            .await?;
        Ok(feedback)
    }
}

// Column lists shared by the row mappers. Order matters: the mappers read
// by index.

const ARTICLE_COLUMNS: &str = "id, title, url, content, date, publication, bias, score, \
     image_url, has_perspectives, is_categorized, created_at, updated_at";
const ARTICLE_COLUMNS_QUALIFIED: &str =
    "a.id, a.title, a.url, a.content, a.date, a.publication, a.bias, a.score, \
     a.image_url, a.has_perspectives, a.is_categorized, a.created_at, a.updated_at";
const CATEGORY_COLUMNS: &str =
    "id, title, summary, image_url, background, analytics, created_at, updated_at";
const CATEGORY_COLUMNS_QUALIFIED: &str =
    "c.id, c.title, c.summary, c.image_url, c.background, c.analytics, c.created_at, c.updated_at";
const PERSPECTIVE_COLUMNS: &str =
    "id, article_id, left_version, right_version, center_version, created_at, updated_at";
const PERSPECTIVE_COLUMNS_QUALIFIED: &str =
    "p.id, p.article_id, p.left_version, p.right_version, p.center_version, p.created_at, p.updated_at";
const USER_COLUMNS: &str = "id, user_name, email, password_hash, profile_pic, auth_type, \
     google_id, google_profile, role, created_at, updated_at";
const SAVED_COLUMNS: &str =
    "id, user_id, category_id, category_title, category_image_url, saved_at";
const FEEDBACK_COLUMNS: &str = "id, user_id, user_name, category_id, comment, created_at";

/// WHERE clause + positional string parameters for an article filter.
fn filter_clause(filter: &ArticleFilter) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut args: Vec<String> = Vec::new();

    if let Some(bias) = filter.bias {
        args.push(bias.as_str().to_string());
        conditions.push(format!("bias = ?{}", args.len()));
    }
    if let Some(publication) = &filter.publication {
        args.push(publication.clone());
        conditions.push(format!("publication = ?{}", args.len()));
    }
    if let Some(term) = &filter.search {
        args.push(like_pattern(term));
        conditions.push(format!(
            "(title LIKE ?{n} OR content LIKE ?{n})",
            n = args.len()
        ));
    }
    if let Some(flag) = filter.has_perspectives {
        conditions.push(format!("has_perspectives = {}", if flag { 1 } else { 0 }));
    }

    if conditions.is_empty() {
        (String::new(), args)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), args)
    }
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn datetime_at(row: &Row, idx: usize) -> DateTime<Utc> {
    row.get::<_, String>(idx)
        .ok()
        .and_then(|s| parse_datetime(&s))
        .unwrap_or_else(Utc::now)
}

fn article_from_row(row: &Row) -> Article {
    article_from_row_at(row, 0)
}

fn article_from_row_at(row: &Row, base: usize) -> Article {
    Article {
        id: row.get(base).unwrap(),
        title: row.get(base + 1).unwrap(),
        url: row.get(base + 2).unwrap(),
        content: row.get(base + 3).unwrap(),
        date: datetime_at(row, base + 4),
        publication: row.get(base + 5).unwrap(),
        bias: BiasLabel::parse_lenient(&row.get::<_, String>(base + 6).unwrap()),
        score: row.get(base + 7).unwrap(),
        image_url: row.get(base + 8).unwrap(),
        has_perspectives: row.get::<_, i64>(base + 9).unwrap() != 0,
        is_categorized: row.get::<_, i64>(base + 10).unwrap() != 0,
        created_at: datetime_at(row, base + 11),
        updated_at: datetime_at(row, base + 12),
    }
}

fn category_from_row(row: &Row) -> Category {
    Category {
        id: row.get(0).unwrap(),
        title: row.get(1).unwrap(),
        summary: row.get(2).unwrap(),
        image_url: row.get(3).unwrap(),
        background: row.get(4).unwrap(),
        analytics: row
            .get::<_, String>(5)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default(),
        created_at: datetime_at(row, 6),
        updated_at: datetime_at(row, 7),
    }
}

fn perspective_from_row(row: &Row) -> Perspective {
    Perspective {
        id: row.get(0).unwrap(),
        article_id: row.get(1).unwrap(),
        left_version: row.get(2).unwrap(),
        right_version: row.get(3).unwrap(),
        center_version: row.get(4).unwrap(),
        created_at: datetime_at(row, 5),
        updated_at: datetime_at(row, 6),
    }
}

fn user_from_row(row: &Row) -> User {
    User {
        id: row.get(0).unwrap(),
        user_name: row.get(1).unwrap(),
        email: row.get(2).unwrap(),
        password_hash: row.get(3).unwrap(),
        profile_pic: row.get(4).unwrap(),
        auth_type: AuthType::from_str(&row.get::<_, String>(5).unwrap()).unwrap_or(AuthType::Local),
        google_id: row.get(6).unwrap(),
        google_profile: row
            .get::<_, Option<String>>(7)
            .unwrap()
            .and_then(|s| serde_json::from_str::<GoogleProfile>(&s).ok()),
        role: Role::from_str(&row.get::<_, String>(8).unwrap()),
        created_at: datetime_at(row, 9),
        updated_at: datetime_at(row, 10),
    }
}

fn saved_from_row(row: &Row) -> SavedCategory {
    SavedCategory {
        id: row.get(0).unwrap(),
        user_id: row.get(1).unwrap(),
        category_id: row.get(2).unwrap(),
        category_title: row.get(3).unwrap(),
        category_image_url: row.get(4).unwrap(),
        saved_at: datetime_at(row, 5),
    }
}

fn feedback_from_row(row: &Row) -> Feedback {
    Feedback {
        id: row.get(0).unwrap(),
        user_id: row.get(1).unwrap(),
        user_name: row.get(2).unwrap(),
        category_id: row.get(3).unwrap(),
        comment: row.get(4).unwrap(),
        created_at: datetime_at(row, 5),
    }
}
