//! Driven port for stored collages.
use async_trait::async_trait;

use crate::domain::{Collage, CollageId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by collage adapters.
    pub enum CollagePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "collage repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "collage repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollageRepository: Send + Sync {
    async fn insert(&self, collage: &Collage) -> Result<(), CollagePersistenceError>;

    async fn find_by_id(&self, id: &CollageId)
    -> Result<Option<Collage>, CollagePersistenceError>;

    /// Collages owned by `owner` in creation order.
    async fn list_by_owner(&self, owner: &Username)
    -> Result<Vec<Collage>, CollagePersistenceError>;

    /// Overwrite a stored collage, keyed by its id.
    async fn update(&self, collage: &Collage) -> Result<(), CollagePersistenceError>;

    /// Delete a collage the owner holds. Returns `false` when nothing matched.
    async fn delete_owned(
        &self,
        owner: &Username,
        id: &CollageId,
    ) -> Result<bool, CollagePersistenceError>;

    /// Most recently updated collages across all users.
    async fn recently_updated(&self, limit: usize)
    -> Result<Vec<Collage>, CollagePersistenceError>;
}
