//! Driving ports for reviews, comments and reactions.

use async_trait::async_trait;

use crate::domain::{
    Comment, CommentId, Error, MediaKind, NewReview, Reaction, ReactionOutcome, Reply, Review,
    ReviewId, ReviewSort, Username,
};

#[async_trait]
pub trait ReviewsCommand: Send + Sync {
    /// Create a review; one per author and media item.
    async fn create(&self, draft: NewReview) -> Result<Review, Error>;

    async fn comment(
        &self,
        review_id: &ReviewId,
        author: &Username,
        content: &str,
    ) -> Result<Comment, Error>;

    async fn reply(
        &self,
        review_id: &ReviewId,
        comment_id: &CommentId,
        author: &Username,
        content: &str,
    ) -> Result<Reply, Error>;

    /// Toggle a like or dislike.
    async fn react(
        &self,
        review_id: &ReviewId,
        user: &Username,
        reaction: Reaction,
    ) -> Result<ReactionOutcome, Error>;

    /// Delete a review the requester wrote.
    async fn delete(&self, review_id: &ReviewId, requester: &Username) -> Result<(), Error>;
}

#[async_trait]
pub trait ReviewsQuery: Send + Sync {
    async fn for_media(
        &self,
        media_type: MediaKind,
        media_id: &str,
        sort: ReviewSort,
    ) -> Result<Vec<Review>, Error>;

    async fn by_author(&self, author: &Username) -> Result<Vec<Review>, Error>;

    async fn recent(&self) -> Result<Vec<Review>, Error>;
}
