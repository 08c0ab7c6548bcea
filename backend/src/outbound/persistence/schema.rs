//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts with their activity counters.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique public handle (max 32 characters).
        username -> Varchar,
        /// Unique, lowercased login address.
        email -> Varchar,
        /// PHC-encoded password hash.
        password_hash -> Text,
        /// Optional avatar URL.
        profile_picture -> Nullable<Text>,
        /// Number of lists owned.
        stat_lists -> Int4,
        /// Number of reviews written.
        stat_reviews -> Int4,
        /// Number of entries on the `log` shelf.
        stat_media -> Int4,
        /// Lists the user follows, in follow order.
        followed_lists -> Array<Uuid>,
        /// Account creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// User-curated media lists.
    lists (id) {
        id -> Uuid,
        /// Username of the list owner.
        owner -> Varchar,
        name -> Varchar,
        description -> Text,
        /// Ordered media references as a JSON array.
        items -> Jsonb,
        is_public -> Bool,
        is_collaborative -> Bool,
        /// Usernames allowed to edit when the list is collaborative.
        collaborators -> Array<Text>,
        follower_count -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reviews with their embedded comment threads.
    reviews (id) {
        id -> Uuid,
        author -> Varchar,
        /// One of `movie`, `tv`, `book` or `music`.
        media_type -> Varchar,
        media_id -> Varchar,
        media_title -> Text,
        title -> Text,
        content -> Text,
        /// Star rating between 1 and 5.
        rating -> Int2,
        /// Comments and their replies as a JSON array.
        comments -> Jsonb,
        likes -> Array<Text>,
        dislikes -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user shelves of media (`log` and `later`).
    media_log_entries (id) {
        id -> Uuid,
        owner -> Varchar,
        media_type -> Varchar,
        shelf -> Varchar,
        media_id -> Varchar,
        title -> Text,
        image_url -> Nullable<Text>,
        /// Calendar date the media was consumed.
        consumed_on -> Nullable<Date>,
        /// Personal score between 0 and 10.
        rating -> Nullable<Int2>,
        tags -> Array<Text>,
        added_at -> Timestamptz,
    }
}

diesel::table! {
    /// Saved poster collages.
    collages (id) {
        id -> Uuid,
        owner -> Varchar,
        name -> Text,
        /// One of `3x3`, `4x4` or `5x5`.
        grid_size -> Varchar,
        /// Grid tiles in display order as a JSON array.
        items -> Jsonb,
        show_titles -> Bool,
        export_format -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, lists, reviews, media_log_entries, collages);
