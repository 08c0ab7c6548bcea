//! Tests for the reviews service.

use std::sync::Arc;

use chrono::Duration;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockReviewRepository, MockUserRepository};
use crate::domain::service_test_support::{fixture_clock, fixture_timestamp, user};
use crate::domain::{ErrorCode, Rating};

fn make_service(
    reviews: MockReviewRepository,
    users: MockUserRepository,
) -> ReviewsService<MockReviewRepository, MockUserRepository> {
    ReviewsService::new(Arc::new(reviews), Arc::new(users), fixture_clock())
}

fn draft(author: &str, rating: i64) -> NewReview {
    NewReview::try_new(
        user(author),
        MediaKind::Movie,
        "603",
        Some("The Matrix"),
        "Still holds up",
        "Rewatched it last night.",
        Rating::new(rating).expect("valid rating"),
    )
    .expect("valid draft")
}

#[fixture]
fn review() -> Review {
    Review::create(draft("critic", 4), fixture_timestamp())
}

#[tokio::test]
async fn create_rejects_second_review_for_same_media() {
    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_exists_for()
        .withf(|author, kind, id| author.as_ref() == "critic" && *kind == MediaKind::Movie && id == "603")
        .return_once(|_, _, _| Ok(true));
    reviews.expect_insert().never();
    let service = make_service(reviews, MockUserRepository::new());

    let error = service
        .create(draft("critic", 5))
        .await
        .expect_err("duplicate");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "You've already reviewed this media");
}

#[tokio::test]
async fn create_stores_review_and_bumps_counter() {
    let mut reviews = MockReviewRepository::new();
    reviews.expect_exists_for().return_once(|_, _, _| Ok(false));
    reviews.expect_insert().times(1).return_once(|_| Ok(()));
    let mut users = MockUserRepository::new();
    users
        .expect_adjust_stat()
        .withf(|_, kind, delta| *kind == StatKind::Reviews && *delta == 1)
        .times(1)
        .return_once(|_, _, _| Ok(()));
    let service = make_service(reviews, users);

    let review = service.create(draft("critic", 5)).await.expect("created");
    assert_eq!(review.media_title, "The Matrix");
    assert_eq!(review.created_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn like_after_dislike_is_written_in_one_update(mut review: Review) {
    let fan = user("fan");
    review.dislikes.insert(fan.clone());
    let id = review.id;

    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(review)));
    reviews
        .expect_set_reactions()
        .withf(|_, likes, dislikes| likes.contains(&user("fan")) && dislikes.is_empty())
        .times(1)
        .return_once(|_, _, _| Ok(true));
    let service = make_service(reviews, MockUserRepository::new());

    let outcome = service
        .react(&id, &fan, Reaction::Like)
        .await
        .expect("reacted");
    assert_eq!(outcome.reaction, Some(Reaction::Like));
    assert!(!outcome.dislikes.contains(&fan));
}

#[rstest]
#[tokio::test]
async fn delete_by_non_author_is_forbidden(review: Review) {
    let id = review.id;
    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(review)));
    reviews.expect_delete().never();
    let service = make_service(reviews, MockUserRepository::new());

    let error = service
        .delete(&id, &user("someone"))
        .await
        .expect_err("forbidden");
    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(error.message(), "Not authorized to delete this review");
}

#[rstest]
#[tokio::test]
async fn delete_by_author_decrements_counter(review: Review) {
    let id = review.id;
    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(review)));
    reviews.expect_delete().return_once(|_| Ok(true));
    let mut users = MockUserRepository::new();
    users
        .expect_adjust_stat()
        .withf(|name, kind, delta| {
            name.as_ref() == "critic" && *kind == StatKind::Reviews && *delta == -1
        })
        .times(1)
        .return_once(|_, _, _| Ok(()));
    let service = make_service(reviews, users);

    service.delete(&id, &user("critic")).await.expect("deleted");
}

#[tokio::test]
async fn comment_on_missing_review_is_not_found() {
    let mut reviews = MockReviewRepository::new();
    reviews.expect_push_comment().return_once(|_, _, _| Ok(false));
    let service = make_service(reviews, MockUserRepository::new());

    let error = service
        .comment(&ReviewId::random(), &user("fan"), "Agreed")
        .await
        .expect_err("missing review");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn blank_comment_is_rejected_before_storage() {
    let mut reviews = MockReviewRepository::new();
    reviews.expect_push_comment().never();
    let service = make_service(reviews, MockUserRepository::new());

    let error = service
        .comment(&ReviewId::random(), &user("fan"), "   ")
        .await
        .expect_err("blank");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn reply_to_unknown_comment_is_not_found(review: Review) {
    let id = review.id;
    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(review)));
    reviews.expect_push_reply().never();
    let service = make_service(reviews, MockUserRepository::new());

    let error = service
        .reply(&id, &CommentId::random(), &user("fan"), "Me too")
        .await
        .expect_err("missing comment");
    assert_eq!(error.message(), "Comment not found");
}

#[rstest]
#[tokio::test]
async fn reply_is_appended_to_existing_comment(mut review: Review) {
    let comment = Comment::new(user("fan"), "Great take", fixture_timestamp()).expect("comment");
    let comment_id = comment.id;
    review.comments.push(comment);
    let id = review.id;

    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(review)));
    reviews
        .expect_push_reply()
        .withf(move |_, target, reply, _| *target == comment_id && reply.content == "Thanks")
        .return_once(|_, _, _, _| Ok(true));
    let service = make_service(reviews, MockUserRepository::new());

    let reply = service
        .reply(&id, &comment_id, &user("critic"), "  Thanks ")
        .await
        .expect("reply");
    assert_eq!(reply.author, user("critic"));
}

#[tokio::test]
async fn for_media_sorts_by_highest_rating() {
    let low = Review::create(draft("a", 2), fixture_timestamp());
    let high = Review::create(draft("b", 5), fixture_timestamp() + Duration::minutes(1));
    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_list_for_media()
        .return_once(move |_, _| Ok(vec![low, high]));
    let service = make_service(reviews, MockUserRepository::new());

    let sorted = service
        .for_media(MediaKind::Movie, "603", ReviewSort::Highest)
        .await
        .expect("reviews");
    assert_eq!(sorted[0].rating.value(), 5);
}

#[tokio::test]
async fn recent_uses_feed_limit() {
    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_list_recent()
        .withf(|limit| *limit == RECENT_REVIEWS_LIMIT)
        .return_once(|_| Ok(Vec::new()));
    let service = make_service(reviews, MockUserRepository::new());

    assert!(service.recent().await.expect("feed").is_empty());
}
