//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every versioned endpoint, the health probes, the
//! request and response DTOs declared beside the handlers, and the bearer
//! security scheme. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use crate::inbound::http::accounts::{
    CheckUsernameResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    StatsResponse, UserProfileResponse, VerifyTokenResponse,
};
use crate::inbound::http::collages::{
    CollageDeletedResponse, CollageRequest, CollageResponse, CollageSavedResponse,
};
use crate::inbound::http::discover::{
    DiscoveredUser, RecommendationRequestBody, UserSearchResponse,
};
use crate::inbound::http::lists::{
    CreateListRequest, FollowResponse, ListResponse, MediaRefDto, MessageResponse,
    UpdateListRequest,
};
use crate::inbound::http::media_logs::{AddLogEntryRequest, EntryRemovedResponse, LogEntryResponse};
use crate::inbound::http::reviews::{
    CommentResponse, ContentRequest, CreateReviewRequest, ReactionResponse, ReplyResponse,
    ReviewDeletedResponse, ReviewResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "bearerAuth";

/// Adds the HS256 bearer token scheme to the generated document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /api/v1/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Encyclomedia API",
        description = "Lists, reviews, media logs and collages for films, series, books and music, \
                       plus proxied metadata search and prompt-driven recommendations."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("bearerAuth" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::check_username,
        crate::inbound::http::accounts::get_profile,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::verify_token,
        crate::inbound::http::lists::my_lists,
        crate::inbound::http::lists::shared_lists,
        crate::inbound::http::lists::followed_lists,
        crate::inbound::http::lists::user_lists,
        crate::inbound::http::lists::get_list,
        crate::inbound::http::lists::create_list,
        crate::inbound::http::lists::update_list,
        crate::inbound::http::lists::delete_list,
        crate::inbound::http::lists::follow_list,
        crate::inbound::http::lists::unfollow_list,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::recent_reviews,
        crate::inbound::http::reviews::user_reviews,
        crate::inbound::http::reviews::media_reviews,
        crate::inbound::http::reviews::comment_on_review,
        crate::inbound::http::reviews::reply_to_comment,
        crate::inbound::http::reviews::like_review,
        crate::inbound::http::reviews::dislike_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::media_logs::list_shelf,
        crate::inbound::http::media_logs::add_to_shelf,
        crate::inbound::http::media_logs::remove_from_shelf,
        crate::inbound::http::collages::user_collages,
        crate::inbound::http::collages::trending_collages,
        crate::inbound::http::collages::get_collage,
        crate::inbound::http::collages::save_collage,
        crate::inbound::http::collages::update_collage,
        crate::inbound::http::collages::delete_collage,
        crate::inbound::http::movies::search_movies,
        crate::inbound::http::movies::movie_suggestions,
        crate::inbound::http::movies::random_movie,
        crate::inbound::http::movies::movie_details,
        crate::inbound::http::tv::search_tv,
        crate::inbound::http::tv::trending_tv,
        crate::inbound::http::books::search_books,
        crate::inbound::http::books::book_suggestions,
        crate::inbound::http::books::book_details,
        crate::inbound::http::music::search_music,
        crate::inbound::http::music::track_details,
        crate::inbound::http::discover::discover_users,
        crate::inbound::http::discover::recommend,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        StatsResponse,
        UserProfileResponse,
        CheckUsernameResponse,
        VerifyTokenResponse,
        MediaRefDto,
        CreateListRequest,
        UpdateListRequest,
        ListResponse,
        FollowResponse,
        MessageResponse,
        CreateReviewRequest,
        ContentRequest,
        ReplyResponse,
        CommentResponse,
        ReviewResponse,
        ReactionResponse,
        ReviewDeletedResponse,
        AddLogEntryRequest,
        LogEntryResponse,
        EntryRemovedResponse,
        CollageRequest,
        CollageResponse,
        CollageSavedResponse,
        CollageDeletedResponse,
        DiscoveredUser,
        UserSearchResponse,
        RecommendationRequestBody,
    )),
    tags(
        (name = "accounts", description = "Registration, login and profiles"),
        (name = "lists", description = "Curated lists, sharing and follows"),
        (name = "reviews", description = "Reviews, comments and reactions"),
        (name = "logs", description = "Personal media shelves"),
        (name = "collages", description = "Poster grids built from media references"),
        (name = "movies", description = "Film metadata from TMDB"),
        (name = "tv", description = "Series metadata from TMDB"),
        (name = "books", description = "Book metadata from OpenLibrary"),
        (name = "music", description = "Track metadata from Deezer"),
        (name = "discover", description = "People search and recommendations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
