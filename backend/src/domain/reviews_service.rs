//! Reviews domain service.
//!
//! Uniqueness per (author, media) is a check-then-insert; two concurrent
//! creates for the same pair can both pass the check.
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    ReviewPersistenceError, ReviewRepository, ReviewsCommand, ReviewsQuery, UserRepository,
};
use crate::domain::user_stats::adjust_user_stat;
use crate::domain::{
    Comment, CommentId, Error, MediaKind, NewReview, RECENT_REVIEWS_LIMIT, Reaction,
    ReactionOutcome, Reply, Review, ReviewId, ReviewSort, ReviewValidationError, StatKind,
    Username,
};

const REVIEW_NOT_FOUND: &str = "Review not found";
const COMMENT_NOT_FOUND: &str = "Comment not found";

/// Review service implementing the review driving ports.
#[derive(Clone)]
pub struct ReviewsService<R, U> {
    reviews: Arc<R>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<R, U> ReviewsService<R, U> {
    pub fn new(reviews: Arc<R>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            reviews,
            users,
            clock,
        }
    }
}

fn map_review_error(error: ReviewPersistenceError) -> Error {
    match error {
        ReviewPersistenceError::Connection { message } => {
            Error::internal(format!("review repository unavailable: {message}"))
        }
        ReviewPersistenceError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
    }
}

fn map_validation_error(error: ReviewValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

impl<R, U> ReviewsService<R, U>
where
    R: ReviewRepository,
    U: UserRepository,
{
    async fn load(&self, id: &ReviewId) -> Result<Review, Error> {
        self.reviews
            .find_by_id(id)
            .await
            .map_err(map_review_error)?
            .ok_or_else(|| Error::not_found(REVIEW_NOT_FOUND))
    }
}

#[async_trait]
impl<R, U> ReviewsCommand for ReviewsService<R, U>
where
    R: ReviewRepository,
    U: UserRepository,
{
    async fn create(&self, draft: NewReview) -> Result<Review, Error> {
        let duplicate = self
            .reviews
            .exists_for(&draft.author, draft.media_type, &draft.media_id)
            .await
            .map_err(map_review_error)?;
        if duplicate {
            return Err(Error::invalid_request("You've already reviewed this media"));
        }

        let review = Review::create(draft, self.clock.utc());
        self.reviews
            .insert(&review)
            .await
            .map_err(map_review_error)?;
        adjust_user_stat(self.users.as_ref(), &review.author, StatKind::Reviews, 1).await;
        Ok(review)
    }

    async fn comment(
        &self,
        review_id: &ReviewId,
        author: &Username,
        content: &str,
    ) -> Result<Comment, Error> {
        let now = self.clock.utc();
        let comment = Comment::new(author.clone(), content, now).map_err(map_validation_error)?;
        let stored = self
            .reviews
            .push_comment(review_id, &comment, now)
            .await
            .map_err(map_review_error)?;
        if !stored {
            return Err(Error::not_found(REVIEW_NOT_FOUND));
        }
        Ok(comment)
    }

    async fn reply(
        &self,
        review_id: &ReviewId,
        comment_id: &CommentId,
        author: &Username,
        content: &str,
    ) -> Result<Reply, Error> {
        let now = self.clock.utc();
        let reply = Reply::new(author.clone(), content, now).map_err(map_validation_error)?;
        let review = self.load(review_id).await?;
        if review.find_comment(comment_id).is_none() {
            return Err(Error::not_found(COMMENT_NOT_FOUND));
        }
        let stored = self
            .reviews
            .push_reply(review_id, comment_id, &reply, now)
            .await
            .map_err(map_review_error)?;
        if !stored {
            return Err(Error::not_found(COMMENT_NOT_FOUND));
        }
        Ok(reply)
    }

    async fn react(
        &self,
        review_id: &ReviewId,
        user: &Username,
        reaction: Reaction,
    ) -> Result<ReactionOutcome, Error> {
        let mut review = self.load(review_id).await?;
        let outcome = review.react(user, reaction);
        let stored = self
            .reviews
            .set_reactions(review_id, &outcome.likes, &outcome.dislikes)
            .await
            .map_err(map_review_error)?;
        if !stored {
            return Err(Error::not_found(REVIEW_NOT_FOUND));
        }
        Ok(outcome)
    }

    async fn delete(&self, review_id: &ReviewId, requester: &Username) -> Result<(), Error> {
        let review = self.load(review_id).await?;
        if &review.author != requester {
            return Err(Error::forbidden("Not authorized to delete this review"));
        }
        let deleted = self
            .reviews
            .delete(review_id)
            .await
            .map_err(map_review_error)?;
        if !deleted {
            return Err(Error::not_found(REVIEW_NOT_FOUND));
        }
        adjust_user_stat(self.users.as_ref(), &review.author, StatKind::Reviews, -1).await;
        Ok(())
    }
}

#[async_trait]
impl<R, U> ReviewsQuery for ReviewsService<R, U>
where
    R: ReviewRepository,
    U: UserRepository,
{
    async fn for_media(
        &self,
        media_type: MediaKind,
        media_id: &str,
        sort: ReviewSort,
    ) -> Result<Vec<Review>, Error> {
        let mut reviews = self
            .reviews
            .list_for_media(media_type, media_id.trim())
            .await
            .map_err(map_review_error)?;
        sort.apply(&mut reviews);
        Ok(reviews)
    }

    async fn by_author(&self, author: &Username) -> Result<Vec<Review>, Error> {
        self.reviews
            .list_by_author(author)
            .await
            .map_err(map_review_error)
    }

    async fn recent(&self) -> Result<Vec<Review>, Error> {
        self.reviews
            .list_recent(RECENT_REVIEWS_LIMIT)
            .await
            .map_err(map_review_error)
    }
}

#[cfg(test)]
#[path = "reviews_service_tests.rs"]
mod tests;
