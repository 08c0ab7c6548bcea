//! Process-local repositories used when no database is configured.
//!
//! Every store keeps its records behind a single mutex. Nothing survives a
//! restart; the stores exist for local development and the HTTP integration
//! tests.

mod collage_store;
mod list_store;
mod media_log_store;
mod review_store;
mod user_store;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use collage_store::InMemoryCollageRepository;
pub use list_store::InMemoryListRepository;
pub use media_log_store::InMemoryMediaLogRepository;
pub use review_store::InMemoryReviewRepository;
pub use user_store::InMemoryUserRepository;

/// Lock a store, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
