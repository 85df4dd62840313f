use std::sync::Arc;

use crate::core::{Page, PageOf};
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::{Feedback, NewFeedback, NewSavedCategory, SavedCategory, MAX_COMMENT_LEN};

/// Per-user engagement records: saved categories and feedback comments.
/// Simple CRUD with validation; uniqueness of (user, category) saves is
/// backed by the store's unique index, the pre-check here just produces
/// the friendlier error.
#[derive(Clone)]
pub struct Ledger {
    repo: Arc<Repository>,
}

impl Ledger {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    pub async fn save_category(&self, save: NewSavedCategory) -> Result<SavedCategory> {
        if save.category_id.is_empty() || save.category_title.is_empty() {
            return Err(AppError::Validation(
                "Category ID and title are required".to_string(),
            ));
        }

        if self
            .repo
            .find_saved_category(&save.user_id, &save.category_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Category is already saved".to_string()));
        }

        self.repo.insert_saved_category(save).await
    }

    pub async fn unsave_category(&self, user_id: &str, category_id: &str) -> Result<()> {
        if !self.repo.delete_saved_category(user_id, category_id).await? {
            return Err(AppError::NotFound("Saved category not found".to_string()));
        }
        Ok(())
    }

    pub async fn saved_status(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> Result<Option<SavedCategory>> {
        self.repo.find_saved_category(user_id, category_id).await
    }

    pub async fn list_saved(&self, user_id: &str, page: Page) -> Result<PageOf<SavedCategory>> {
        let total = self.repo.count_saved_categories(user_id).await?;
        let items = self
            .repo
            .list_saved_categories(user_id, page.skip(), page.limit)
            .await?;
        Ok(PageOf::new(items, total, page))
    }

    /// Records a comment under the user's resolved display name. The
    /// caller supplies only the user id; the name comes from the account
    /// record, never from the request body.
    pub async fn add_feedback(
        &self,
        user_id: &str,
        category_id: &str,
        comment: &str,
    ) -> Result<Feedback> {
        let comment = comment.trim();
        if category_id.is_empty() || comment.is_empty() {
            return Err(AppError::Validation("All fields are required.".to_string()));
        }
        if comment.chars().count() > MAX_COMMENT_LEN {
            return Err(AppError::Validation(format!(
                "Comment must be at most {MAX_COMMENT_LEN} characters"
            )));
        }

        let user = self
            .repo
            .user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))?;

        self.repo
            .insert_feedback(NewFeedback {
                user_id: user.id,
                user_name: user.user_name,
                category_id: category_id.to_string(),
                comment: comment.to_string(),
            })
            .await
    }

    pub async fn feedback_for_category(&self, category_id: &str) -> Result<Vec<Feedback>> {
        self.repo.feedback_for_category(category_id).await
    }

    pub async fn feedback_for_user(&self, user_id: &str) -> Result<Vec<Feedback>> {
        self.repo.feedback_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthType, NewUser};

    async fn ledger_with_user() -> (Ledger, Arc<Repository>, String) {
        let repo = Arc::new(Repository::open_in_memory().await.unwrap());
        let user = repo
            .insert_user(NewUser {
                user_name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: Some("hash".to_string()),
                profile_pic: None,
                auth_type: AuthType::Local,
                google_id: None,
                google_profile: None,
            })
            .await
            .unwrap();
        (Ledger::new(repo.clone()), repo, user.id)
    }

    fn save_for(user_id: &str, category_id: &str) -> NewSavedCategory {
        NewSavedCategory {
            user_id: user_id.to_string(),
            category_id: category_id.to_string(),
            category_title: format!("Category {category_id}"),
            category_image_url: None,
        }
    }

    #[tokio::test]
    async fn double_save_conflicts() {
        let (ledger, _, user_id) = ledger_with_user().await;

        ledger.save_category(save_for(&user_id, "c1")).await.unwrap();
        let err = ledger
            .save_category(save_for(&user_id, "c1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // A different user saving the same category is fine
        ledger.save_category(save_for("someone-else", "c1")).await.unwrap();
    }

    #[tokio::test]
    async fn unsave_of_missing_save_is_not_found() {
        let (ledger, _, user_id) = ledger_with_user().await;
        let err = ledger.unsave_category(&user_id, "c9").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        ledger.save_category(save_for(&user_id, "c9")).await.unwrap();
        ledger.unsave_category(&user_id, "c9").await.unwrap();
        assert!(ledger.saved_status(&user_id, "c9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn saved_list_is_newest_first_and_paginated() {
        let (ledger, _, user_id) = ledger_with_user().await;
        for i in 0..3 {
            ledger
                .save_category(save_for(&user_id, &format!("c{i}")))
                .await
                .unwrap();
        }

        let page = ledger
            .list_saved(&user_id, Page::new(Some(1), Some(2)))
            .await
            .unwrap();
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].category_id, "c2");
    }

    #[tokio::test]
    async fn feedback_validation() {
        let (ledger, _, user_id) = ledger_with_user().await;

        let err = ledger.add_feedback(&user_id, "c1", "   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let long = "x".repeat(MAX_COMMENT_LEN + 1);
        let err = ledger.add_feedback(&user_id, "c1", &long).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let feedback = ledger
            .add_feedback(&user_id, "c1", "Great roundup")
            .await
            .unwrap();
        assert_eq!(feedback.user_name, "Ada");
        assert_eq!(feedback.comment, "Great roundup");
    }

    #[tokio::test]
    async fn user_delete_cascades_to_ledger_rows() {
        let (ledger, repo, user_id) = ledger_with_user().await;
        for i in 0..3 {
            ledger
                .save_category(save_for(&user_id, &format!("c{i}")))
                .await
                .unwrap();
        }
        ledger.add_feedback(&user_id, "c0", "first").await.unwrap();
        ledger.add_feedback(&user_id, "c1", "second").await.unwrap();

        repo.delete_user_cascade(&user_id).await.unwrap();

        assert_eq!(
            ledger
                .list_saved(&user_id, Page::default())
                .await
                .unwrap()
                .total_items,
            0
        );
        assert!(ledger.feedback_for_user(&user_id).await.unwrap().is_empty());
        assert!(repo.user_by_id(&user_id).await.unwrap().is_none());
    }
}
