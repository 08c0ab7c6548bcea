//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between Diesel rows and domain types; they hold no
//! business rules. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) stay private to this module.
//!
//! # Example
//!
//! ```no_run
//! use encyclomedia::outbound::persistence::{DbPool, DieselListRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/encyclomedia")).await?;
//! let lists = DieselListRepository::new(pool);
//! # let _ = lists;
//! # Ok(())
//! # }
//! ```

mod diesel_collage_repository;
mod diesel_error_mapping;
mod diesel_list_repository;
mod diesel_media_log_repository;
mod diesel_review_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;
mod sql_functions;

pub use diesel_collage_repository::DieselCollageRepository;
pub use diesel_list_repository::DieselListRepository;
pub use diesel_media_log_repository::DieselMediaLogRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
