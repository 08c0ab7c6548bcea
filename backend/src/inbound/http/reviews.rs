//! Review endpoints: authoring, threaded comments and reactions.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Comment, CommentId, Error, NewReview, Rating, Reaction, ReactionOutcome, Reply, Review,
    ReviewId, ReviewSort,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_fields_error, parse_id, parse_media_kind, parse_username,
};

const REQUIRED_FIELDS_MISSING: &str = "Required fields missing";

/// Body for `POST /reviews`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[schema(example = "603")]
    pub media_id: Option<String>,
    #[schema(example = "movie")]
    pub media_type: Option<String>,
    pub media_title: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: Option<i64>,
}

impl CreateReviewRequest {
    fn into_draft(self, author: crate::domain::Username) -> Result<NewReview, Error> {
        let (Some(media_id), Some(media_type), Some(title), Some(content), Some(rating)) = (
            self.media_id,
            self.media_type,
            self.title,
            self.content,
            self.rating,
        ) else {
            return Err(missing_fields_error(
                FieldName::new("review"),
                REQUIRED_FIELDS_MISSING,
            ));
        };
        let kind = parse_media_kind(&media_type, FieldName::new("mediaType"))?;
        let rating = Rating::new(rating).map_err(|err| Error::invalid_request(err.to_string()))?;
        NewReview::try_new(
            author,
            kind,
            &media_id,
            self.media_title.as_deref(),
            &title,
            &content,
            rating,
        )
        .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

/// Body for comments and replies.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ContentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    id: String,
    author: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<Reply> for ReplyResponse {
    fn from(reply: Reply) -> Self {
        Self {
            id: reply.id.to_string(),
            author: reply.author.into(),
            content: reply.content,
            created_at: reply.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    id: String,
    author: String,
    content: String,
    created_at: DateTime<Utc>,
    replies: Vec<ReplyResponse>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            author: comment.author.into(),
            content: comment.content,
            created_at: comment.created_at,
            replies: comment.replies.into_iter().map(ReplyResponse::from).collect(),
        }
    }
}

/// Wire form of a review.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    id: String,
    author: String,
    media_type: String,
    media_id: String,
    media_title: String,
    title: String,
    content: String,
    rating: u8,
    comments: Vec<CommentResponse>,
    likes: Vec<String>,
    dislikes: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.to_string(),
            author: review.author.into(),
            media_type: review.media_type.as_str().to_owned(),
            media_id: review.media_id,
            media_title: review.media_title,
            title: review.title,
            content: review.content,
            rating: review.rating.value(),
            comments: review
                .comments
                .into_iter()
                .map(CommentResponse::from)
                .collect(),
            likes: review.likes.into_iter().map(String::from).collect(),
            dislikes: review.dislikes.into_iter().map(String::from).collect(),
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

fn to_responses(reviews: Vec<Review>) -> Vec<ReviewResponse> {
    reviews.into_iter().map(ReviewResponse::from).collect()
}

/// Reaction state after a like or dislike.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReactionResponse {
    likes: Vec<String>,
    dislikes: Vec<String>,
    /// `like`, `dislike` or null when the toggle cleared the reaction.
    #[schema(value_type = Option<String>, example = "like")]
    reaction: Option<Reaction>,
}

impl From<ReactionOutcome> for ReactionResponse {
    fn from(value: ReactionOutcome) -> Self {
        Self {
            likes: value.likes.into_iter().map(String::from).collect(),
            dislikes: value.dislikes.into_iter().map(String::from).collect(),
            reaction: value.reaction,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewDeletedResponse {
    message: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewSortQuery {
    /// `recent` (default), `highest` or `lowest`.
    pub sort: Option<String>,
}

fn review_id(raw: &str) -> Result<ReviewId, Error> {
    parse_id(raw, FieldName::new("id"))
}

/// Publish a review.
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Missing fields, bad rating or duplicate review", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    user: BearerUser,
    payload: web::Json<CreateReviewRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft(user.0)?;
    let review = state.reviews.create(draft).await?;
    Ok(HttpResponse::Created().json(ReviewResponse::from(review)))
}

/// The newest reviews across all users.
#[utoipa::path(
    get,
    path = "/api/v1/reviews/recent",
    responses((status = 200, description = "Recent reviews", body = [ReviewResponse])),
    tags = ["reviews"],
    operation_id = "recentReviews",
    security([])
)]
#[get("/reviews/recent")]
pub async fn recent_reviews(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ReviewResponse>>> {
    let reviews = state.reviews_query.recent().await?;
    Ok(web::Json(to_responses(reviews)))
}

/// Reviews written by `username`, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/reviews/user/{username}",
    params(("username" = String, Path, description = "Review author")),
    responses((status = 200, description = "Reviews by author", body = [ReviewResponse])),
    tags = ["reviews"],
    operation_id = "userReviews",
    security([])
)]
#[get("/reviews/user/{username}")]
pub async fn user_reviews(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ReviewResponse>>> {
    let author = parse_username(&path.into_inner(), FieldName::new("username"))?;
    let reviews = state.reviews_query.by_author(&author).await?;
    Ok(web::Json(to_responses(reviews)))
}

/// Reviews of one media item.
#[utoipa::path(
    get,
    path = "/api/v1/reviews/{mediaType}/{mediaId}",
    params(
        ("mediaType" = String, Path, description = "movie, tv, book or music"),
        ("mediaId" = String, Path, description = "Provider identifier"),
        ReviewSortQuery
    ),
    responses(
        (status = 200, description = "Reviews of the item", body = [ReviewResponse]),
        (status = 400, description = "Unknown media type", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "mediaReviews",
    security([])
)]
#[get("/reviews/{media_type}/{media_id}")]
pub async fn media_reviews(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    query: web::Query<ReviewSortQuery>,
) -> ApiResult<web::Json<Vec<ReviewResponse>>> {
    let (media_type, media_id) = path.into_inner();
    let kind = parse_media_kind(&media_type, FieldName::new("mediaType"))?;
    let sort = query
        .into_inner()
        .sort
        .as_deref()
        .map(|raw| raw.parse::<ReviewSort>().unwrap_or_default())
        .unwrap_or_default();
    let reviews = state
        .reviews_query
        .for_media(kind, &media_id, sort)
        .await?;
    Ok(web::Json(to_responses(reviews)))
}

/// Comment on a review.
#[utoipa::path(
    post,
    path = "/api/v1/reviews/{id}/comment",
    params(("id" = String, Path, description = "Review identifier")),
    request_body = ContentRequest,
    responses(
        (status = 201, description = "Comment added", body = CommentResponse),
        (status = 404, description = "Review not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "commentOnReview"
)]
#[post("/reviews/{id}/comment")]
pub async fn comment_on_review(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
    payload: web::Json<ContentRequest>,
) -> ApiResult<HttpResponse> {
    let id = review_id(&path.into_inner())?;
    let comment = state
        .reviews
        .comment(&id, user.username(), &payload.content)
        .await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

/// Reply to a comment.
#[utoipa::path(
    post,
    path = "/api/v1/reviews/{id}/comments/{commentId}/reply",
    params(
        ("id" = String, Path, description = "Review identifier"),
        ("commentId" = String, Path, description = "Comment identifier")
    ),
    request_body = ContentRequest,
    responses(
        (status = 201, description = "Reply added", body = ReplyResponse),
        (status = 404, description = "Review or comment not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "replyToComment"
)]
#[post("/reviews/{id}/comments/{comment_id}/reply")]
pub async fn reply_to_comment(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<(String, String)>,
    payload: web::Json<ContentRequest>,
) -> ApiResult<HttpResponse> {
    let (raw_review, raw_comment) = path.into_inner();
    let id = review_id(&raw_review)?;
    let comment_id: CommentId = parse_id(&raw_comment, FieldName::new("commentId"))?;
    let reply = state
        .reviews
        .reply(&id, &comment_id, user.username(), &payload.content)
        .await?;
    Ok(HttpResponse::Created().json(ReplyResponse::from(reply)))
}

async fn react(
    state: &HttpState,
    user: &BearerUser,
    raw_id: &str,
    reaction: Reaction,
) -> ApiResult<web::Json<ReactionResponse>> {
    let id = review_id(raw_id)?;
    let outcome = state.reviews.react(&id, user.username(), reaction).await?;
    Ok(web::Json(outcome.into()))
}

/// Toggle a like.
#[utoipa::path(
    post,
    path = "/api/v1/reviews/{id}/like",
    params(("id" = String, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "Reaction state", body = ReactionResponse),
        (status = 404, description = "Review not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "likeReview"
)]
#[post("/reviews/{id}/like")]
pub async fn like_review(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReactionResponse>> {
    react(&state, &user, &path.into_inner(), Reaction::Like).await
}

/// Toggle a dislike.
#[utoipa::path(
    post,
    path = "/api/v1/reviews/{id}/dislike",
    params(("id" = String, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "Reaction state", body = ReactionResponse),
        (status = 404, description = "Review not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "dislikeReview"
)]
#[post("/reviews/{id}/dislike")]
pub async fn dislike_review(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReactionResponse>> {
    react(&state, &user, &path.into_inner(), Reaction::Dislike).await
}

/// Delete a review. Author only.
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    params(("id" = String, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "Review deleted", body = ReviewDeletedResponse),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Review not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview"
)]
#[delete("/reviews/{id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReviewDeletedResponse>> {
    let id = review_id(&path.into_inner())?;
    state.reviews.delete(&id, user.username()).await?;
    Ok(web::Json(ReviewDeletedResponse {
        message: "Review deleted successfully".to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::api_scope;
    use crate::inbound::http::test_utils::{TestApp, bearer_header};
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn send<S>(app: &S, request: actix_test::TestRequest) -> (StatusCode, Value)
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let response = actix_test::call_service(app, request.to_request()).await;
        let status = response.status();
        let bytes = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn matrix_review(rating: i64) -> Value {
        json!({
            "mediaId": "603",
            "mediaType": "movie",
            "mediaTitle": "The Matrix",
            "title": "Still holds up",
            "content": "Bullet time.",
            "rating": rating,
        })
    }

    fn post_review(token: &str, body: Value) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/api/v1/reviews")
            .insert_header(bearer_header(token))
            .set_json(body)
    }

    #[rstest]
    #[actix_web::test]
    async fn second_review_of_the_same_media_is_rejected() {
        let harness = TestApp::new();
        let token = harness.sign_up("critic").await;
        let app =
            actix_test::init_service(App::new().app_data(harness.data()).service(api_scope()))
                .await;

        let (created, review) = send(&app, post_review(&token, matrix_review(5))).await;
        assert_eq!(created, StatusCode::CREATED);
        assert_eq!(review["mediaTitle"], "The Matrix");
        assert_eq!(review["rating"], 5);

        let (again, body) = send(&app, post_review(&token, matrix_review(4))).await;
        assert_eq!(again, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "You've already reviewed this media");
    }

    #[rstest]
    #[case(json!({"mediaId": "603", "mediaType": "movie", "title": "t", "content": "c"}), "Required fields missing")]
    #[case(json!({"mediaId": "603", "mediaType": "movie", "title": "t", "content": "c", "rating": 6}), "rating must be between 1 and 5")]
    #[case(json!({"mediaId": "603", "mediaType": "opera", "title": "t", "content": "c", "rating": 3}), "unknown media type: opera")]
    #[actix_web::test]
    async fn create_validates_the_payload(#[case] payload: Value, #[case] message: &str) {
        let harness = TestApp::new();
        let token = harness.sign_up("critic").await;
        let app =
            actix_test::init_service(App::new().app_data(harness.data()).service(api_scope()))
                .await;
        let (status, body) = send(&app, post_review(&token, payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], message);
    }

    #[rstest]
    #[actix_web::test]
    async fn like_then_dislike_moves_the_reaction() {
        let harness = TestApp::new();
        let author = harness.sign_up("critic").await;
        let fan = harness.sign_up("fan").await;
        let app =
            actix_test::init_service(App::new().app_data(harness.data()).service(api_scope()))
                .await;
        let (_, review) = send(&app, post_review(&author, matrix_review(5))).await;
        let id = review["id"].as_str().expect("id").to_owned();

        let react = |verb: &str| {
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/reviews/{id}/{verb}"))
                .insert_header(bearer_header(&fan))
        };
        let (_, liked) = send(&app, react("like")).await;
        assert_eq!(liked["likes"], json!(["fan"]));
        assert_eq!(liked["reaction"], "like");

        let (_, disliked) = send(&app, react("dislike")).await;
        assert_eq!(disliked["likes"], json!([]));
        assert_eq!(disliked["dislikes"], json!(["fan"]));
        assert_eq!(disliked["reaction"], "dislike");

        let (_, cleared) = send(&app, react("dislike")).await;
        assert_eq!(cleared["dislikes"], json!([]));
        assert!(cleared["reaction"].is_null());
    }

    #[rstest]
    #[actix_web::test]
    async fn comments_and_replies_thread_under_the_review() {
        let harness = TestApp::new();
        let author = harness.sign_up("critic").await;
        let fan = harness.sign_up("fan").await;
        let app =
            actix_test::init_service(App::new().app_data(harness.data()).service(api_scope()))
                .await;
        let (_, review) = send(&app, post_review(&author, matrix_review(5))).await;
        let id = review["id"].as_str().expect("id").to_owned();

        let (status, comment) = send(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/reviews/{id}/comment"))
                .insert_header(bearer_header(&fan))
                .set_json(json!({"content": "Agreed"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let comment_id = comment["id"].as_str().expect("comment id").to_owned();

        let (status, reply) = send(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/reviews/{id}/comments/{comment_id}/reply"))
                .insert_header(bearer_header(&author))
                .set_json(json!({"content": "Thanks"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(reply["author"], "critic");

        let (_, listed) = send(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/reviews/movie/603"),
        )
        .await;
        assert_eq!(listed[0]["comments"][0]["replies"][0]["content"], "Thanks");

        let (missing, body) = send(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!(
                    "/api/v1/reviews/{id}/comments/{}/reply",
                    uuid::Uuid::nil()
                ))
                .insert_header(bearer_header(&author))
                .set_json(json!({"content": "Hello?"})),
        )
        .await;
        assert_eq!(missing, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Comment not found");
    }

    #[rstest]
    #[actix_web::test]
    async fn only_the_author_deletes() {
        let harness = TestApp::new();
        let author = harness.sign_up("critic").await;
        let other = harness.sign_up("other").await;
        let app =
            actix_test::init_service(App::new().app_data(harness.data()).service(api_scope()))
                .await;
        let (_, review) = send(&app, post_review(&author, matrix_review(2))).await;
        let uri = format!("/api/v1/reviews/{}", review["id"].as_str().expect("id"));

        let (forbidden, body) = send(
            &app,
            actix_test::TestRequest::delete()
                .uri(&uri)
                .insert_header(bearer_header(&other)),
        )
        .await;
        assert_eq!(forbidden, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Not authorized to delete this review");

        let (deleted, _) = send(
            &app,
            actix_test::TestRequest::delete()
                .uri(&uri)
                .insert_header(bearer_header(&author)),
        )
        .await;
        assert_eq!(deleted, StatusCode::OK);

        let (gone, _) = send(
            &app,
            actix_test::TestRequest::delete()
                .uri(&uri)
                .insert_header(bearer_header(&author)),
        )
        .await;
        assert_eq!(gone, StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[actix_web::test]
    async fn static_review_routes_win_over_media_lookups() {
        let harness = TestApp::new();
        let author = harness.sign_up("critic").await;
        let app =
            actix_test::init_service(App::new().app_data(harness.data()).service(api_scope()))
                .await;
        send(&app, post_review(&author, matrix_review(4))).await;

        let (recent, body) = send(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/reviews/recent"),
        )
        .await;
        assert_eq!(recent, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(1));

        let (by_user, body) = send(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/reviews/user/critic"),
        )
        .await;
        assert_eq!(by_user, StatusCode::OK);
        assert_eq!(body[0]["author"], "critic");
    }
}
