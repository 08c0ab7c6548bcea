//! Driving ports for collage editing and browsing.

use async_trait::async_trait;

use crate::domain::{Collage, CollageId, CollageLayout, Error, Username};

#[async_trait]
pub trait CollagesCommand: Send + Sync {
    async fn save(&self, owner: Username, layout: CollageLayout) -> Result<Collage, Error>;

    /// Replace the layout of a collage the requester owns.
    async fn update(
        &self,
        requester: &Username,
        id: &CollageId,
        layout: CollageLayout,
    ) -> Result<Collage, Error>;

    async fn delete(&self, requester: &Username, id: &CollageId) -> Result<(), Error>;
}

#[async_trait]
pub trait CollagesQuery: Send + Sync {
    async fn get(&self, id: &CollageId) -> Result<Collage, Error>;

    async fn by_owner(&self, owner: &Username) -> Result<Vec<Collage>, Error>;

    /// Newest edits first, at most `limit` collages.
    async fn trending(&self, limit: usize) -> Result<Vec<Collage>, Error>;
}
