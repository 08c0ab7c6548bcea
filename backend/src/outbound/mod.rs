//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: mutex-guarded stores used when no database is configured
//! - **security**: Argon2 password hashing and HS256 bearer tokens
//! - **tmdb**, **openlibrary**, **deezer**: metadata provider clients
//! - **llm**: OpenAI-compatible chat completions for recommendations
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod deezer;
pub(crate) mod http_support;
pub mod llm;
pub mod memory;
pub mod openlibrary;
pub mod persistence;
pub mod security;
pub mod tmdb;
