//! HTTP inbound adapter exposing the REST API.
//!
//! Handlers translate requests into driving-port calls on [`state::HttpState`]
//! and map domain errors through [`error`]. [`api_scope`] assembles every
//! versioned route; health probes sit outside it at the root.

pub mod accounts;
pub mod auth;
pub mod books;
pub mod collages;
pub mod discover;
pub mod error;
pub mod health;
pub mod lists;
pub mod media_logs;
pub mod movies;
pub mod music;
pub mod reviews;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tv;
pub mod validation;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// Prefix shared by every versioned endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// Build the `/api/v1` scope with extractor error handlers attached.
///
/// Literal segments are registered ahead of the parameterised routes that
/// would otherwise capture them (`/users/check-username` before
/// `/users/{username}`, `/lists/shared` before `/lists/{id}` and so on).
pub fn api_scope() -> Scope {
    web::scope(API_PREFIX)
        .app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        // accounts
        .service(accounts::register)
        .service(accounts::check_username)
        .service(accounts::get_profile)
        .service(accounts::login)
        .service(accounts::verify_token)
        // lists
        .service(lists::my_lists)
        .service(lists::shared_lists)
        .service(lists::followed_lists)
        .service(lists::user_lists)
        .service(lists::create_list)
        .service(lists::get_list)
        .service(lists::update_list)
        .service(lists::delete_list)
        .service(lists::follow_list)
        .service(lists::unfollow_list)
        // reviews
        .service(reviews::create_review)
        .service(reviews::recent_reviews)
        .service(reviews::user_reviews)
        .service(reviews::media_reviews)
        .service(reviews::comment_on_review)
        .service(reviews::reply_to_comment)
        .service(reviews::like_review)
        .service(reviews::dislike_review)
        .service(reviews::delete_review)
        // shelves
        .service(media_logs::list_shelf)
        .service(media_logs::add_to_shelf)
        .service(media_logs::remove_from_shelf)
        // collages
        .service(collages::user_collages)
        .service(collages::trending_collages)
        .service(collages::save_collage)
        .service(collages::get_collage)
        .service(collages::update_collage)
        .service(collages::delete_collage)
        // metadata
        .service(movies::search_movies)
        .service(movies::movie_suggestions)
        .service(movies::random_movie)
        .service(movies::movie_details)
        .service(tv::search_tv)
        .service(tv::trending_tv)
        .service(books::search_books)
        .service(books::book_suggestions)
        .service(books::book_details)
        .service(music::search_music)
        .service(music::track_details)
        // discover
        .service(discover::discover_users)
        .service(discover::recommend)
}
