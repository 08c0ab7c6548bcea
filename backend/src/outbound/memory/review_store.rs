use std::collections::BTreeSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{ReviewPersistenceError, ReviewRepository};
use crate::domain::{Comment, CommentId, MediaKind, Reply, Review, ReviewId, Username};

use super::lock;

/// In-memory [`ReviewRepository`].
#[derive(Default)]
pub struct InMemoryReviewRepository {
    reviews: Mutex<Vec<Review>>,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn modify(&self, id: &ReviewId, apply: impl FnOnce(&mut Review) -> bool) -> bool {
        let mut reviews = lock(&self.reviews);
        reviews
            .iter_mut()
            .find(|review| &review.id == id)
            .is_some_and(apply)
    }

    fn select(&self, keep: impl Fn(&Review) -> bool) -> Vec<Review> {
        let mut found: Vec<Review> = lock(&self.reviews)
            .iter()
            .filter(|review| keep(review))
            .cloned()
            .collect();
        found.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        found
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        lock(&self.reviews).push(review.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewPersistenceError> {
        Ok(lock(&self.reviews)
            .iter()
            .find(|review| &review.id == id)
            .cloned())
    }

    async fn exists_for(
        &self,
        author: &Username,
        media_type: MediaKind,
        media_id: &str,
    ) -> Result<bool, ReviewPersistenceError> {
        Ok(lock(&self.reviews).iter().any(|review| {
            &review.author == author
                && review.media_type == media_type
                && review.media_id == media_id
        }))
    }

    async fn list_for_media(
        &self,
        media_type: MediaKind,
        media_id: &str,
    ) -> Result<Vec<Review>, ReviewPersistenceError> {
        Ok(self.select(|review| review.media_type == media_type && review.media_id == media_id))
    }

    async fn list_by_author(
        &self,
        author: &Username,
    ) -> Result<Vec<Review>, ReviewPersistenceError> {
        Ok(self.select(|review| &review.author == author))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Review>, ReviewPersistenceError> {
        let mut recent = self.select(|_| true);
        recent.truncate(limit);
        Ok(recent)
    }

    async fn push_comment(
        &self,
        id: &ReviewId,
        comment: &Comment,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, ReviewPersistenceError> {
        Ok(self.modify(id, |review| {
            review.comments.push(comment.clone());
            review.updated_at = updated_at;
            true
        }))
    }

    async fn push_reply(
        &self,
        id: &ReviewId,
        comment_id: &CommentId,
        reply: &Reply,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, ReviewPersistenceError> {
        Ok(self.modify(id, |review| {
            let Some(comment) = review.find_comment_mut(comment_id) else {
                return false;
            };
            comment.replies.push(reply.clone());
            review.updated_at = updated_at;
            true
        }))
    }

    async fn set_reactions(
        &self,
        id: &ReviewId,
        likes: &BTreeSet<Username>,
        dislikes: &BTreeSet<Username>,
    ) -> Result<bool, ReviewPersistenceError> {
        Ok(self.modify(id, |review| {
            review.likes = likes.clone();
            review.dislikes = dislikes.clone();
            true
        }))
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewPersistenceError> {
        let mut reviews = lock(&self.reviews);
        let before = reviews.len();
        reviews.retain(|review| &review.id != id);
        Ok(reviews.len() != before)
    }
}
