use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{CollagePersistenceError, CollageRepository};
use crate::domain::{Collage, CollageId, Username};

use super::lock;

/// In-memory [`CollageRepository`]. Collages keep insertion order.
#[derive(Default)]
pub struct InMemoryCollageRepository {
    collages: Mutex<Vec<Collage>>,
}

impl InMemoryCollageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollageRepository for InMemoryCollageRepository {
    async fn insert(&self, collage: &Collage) -> Result<(), CollagePersistenceError> {
        lock(&self.collages).push(collage.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &CollageId,
    ) -> Result<Option<Collage>, CollagePersistenceError> {
        Ok(lock(&self.collages)
            .iter()
            .find(|collage| &collage.id == id)
            .cloned())
    }

    async fn list_by_owner(
        &self,
        owner: &Username,
    ) -> Result<Vec<Collage>, CollagePersistenceError> {
        Ok(lock(&self.collages)
            .iter()
            .filter(|collage| &collage.owner == owner)
            .cloned()
            .collect())
    }

    async fn update(&self, collage: &Collage) -> Result<(), CollagePersistenceError> {
        let mut collages = lock(&self.collages);
        if let Some(slot) = collages.iter_mut().find(|stored| stored.id == collage.id) {
            *slot = collage.clone();
        }
        Ok(())
    }

    async fn delete_owned(
        &self,
        owner: &Username,
        id: &CollageId,
    ) -> Result<bool, CollagePersistenceError> {
        let mut collages = lock(&self.collages);
        let before = collages.len();
        collages.retain(|collage| !(&collage.id == id && &collage.owner == owner));
        Ok(collages.len() != before)
    }

    async fn recently_updated(
        &self,
        limit: usize,
    ) -> Result<Vec<Collage>, CollagePersistenceError> {
        let mut collages = lock(&self.collages).clone();
        collages.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        collages.truncate(limit);
        Ok(collages)
    }
}
