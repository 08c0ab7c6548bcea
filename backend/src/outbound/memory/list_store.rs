use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{ListPersistenceError, ListRepository};
use crate::domain::{List, ListId, ListPatch, Username};

use super::lock;

/// In-memory [`ListRepository`].
#[derive(Default)]
pub struct InMemoryListRepository {
    lists: Mutex<Vec<List>>,
}

impl InMemoryListRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut lists: Vec<List>) -> Vec<List> {
    lists.sort_by(|left, right| right.created_at.cmp(&left.created_at));
    lists
}

#[async_trait]
impl ListRepository for InMemoryListRepository {
    async fn insert(&self, list: &List) -> Result<(), ListPersistenceError> {
        lock(&self.lists).push(list.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ListId) -> Result<Option<List>, ListPersistenceError> {
        Ok(lock(&self.lists).iter().find(|list| &list.id == id).cloned())
    }

    async fn list_by_owner(&self, owner: &Username) -> Result<Vec<List>, ListPersistenceError> {
        let owned = lock(&self.lists)
            .iter()
            .filter(|list| &list.owner == owner)
            .cloned()
            .collect();
        Ok(newest_first(owned))
    }

    async fn list_shared_with(
        &self,
        collaborator: &Username,
    ) -> Result<Vec<List>, ListPersistenceError> {
        let shared = lock(&self.lists)
            .iter()
            .filter(|list| list.is_collaborative && list.collaborators.contains(collaborator))
            .cloned()
            .collect();
        Ok(newest_first(shared))
    }

    async fn find_many(&self, ids: &[ListId]) -> Result<Vec<List>, ListPersistenceError> {
        Ok(lock(&self.lists)
            .iter()
            .filter(|list| ids.contains(&list.id))
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: &ListId,
        patch: &ListPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<List>, ListPersistenceError> {
        let mut lists = lock(&self.lists);
        Ok(lists.iter_mut().find(|list| &list.id == id).map(|list| {
            list.apply(patch.clone(), updated_at);
            list.clone()
        }))
    }

    async fn delete(&self, id: &ListId) -> Result<bool, ListPersistenceError> {
        let mut lists = lock(&self.lists);
        let before = lists.len();
        lists.retain(|list| &list.id != id);
        Ok(lists.len() != before)
    }

    async fn adjust_follower_count(
        &self,
        id: &ListId,
        delta: i32,
    ) -> Result<Option<u32>, ListPersistenceError> {
        let mut lists = lock(&self.lists);
        Ok(lists.iter_mut().find(|list| &list.id == id).map(|list| {
            list.follower_count = list.follower_count.saturating_add_signed(delta);
            list.follower_count
        }))
    }
}
