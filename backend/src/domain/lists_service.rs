//! Lists domain service: visibility-gated reads, partial updates and the
//! follow counters.
//!
//! Follow and unfollow touch two records (the follower's set and the list's
//! counter) with independent writes and no rollback. The counter moves on
//! every call, so repeated follows by the same user inflate it.
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::warn;

use crate::domain::ports::{
    FollowOutcome, ListPersistenceError, ListRepository, ListsCommand, ListsQuery,
    UserPersistenceError, UserRepository,
};
use crate::domain::user_stats::adjust_user_stat;
use crate::domain::{
    Error, List, ListAccess, ListId, ListPatch, NewList, StatKind, User, Username,
};

const LIST_NOT_FOUND: &str = "List not found";

/// List service implementing the list driving ports.
#[derive(Clone)]
pub struct ListsService<L, U> {
    lists: Arc<L>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<L, U> ListsService<L, U> {
    pub fn new(lists: Arc<L>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            lists,
            users,
            clock,
        }
    }
}

fn map_list_error(error: ListPersistenceError) -> Error {
    match error {
        ListPersistenceError::Connection { message } => {
            Error::internal(format!("list repository unavailable: {message}"))
        }
        ListPersistenceError::Query { message } => {
            Error::internal(format!("list repository error: {message}"))
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    Error::internal(format!("user repository error: {error}"))
}

impl<L, U> ListsService<L, U>
where
    L: ListRepository,
    U: UserRepository,
{
    /// Load a list and resolve the requester's tier. Missing and denied
    /// lists are indistinguishable to the caller.
    async fn load_with_access(
        &self,
        id: &ListId,
        requester: Option<&Username>,
    ) -> Result<(List, ListAccess), Error> {
        let list = self
            .lists
            .find_by_id(id)
            .await
            .map_err(map_list_error)?
            .ok_or_else(|| Error::not_found(LIST_NOT_FOUND))?;
        let access = list.access_for(requester);
        if !access.can_read() {
            return Err(Error::not_found(LIST_NOT_FOUND));
        }
        Ok((list, access))
    }

    async fn require_user(&self, username: &Username) -> Result<User, Error> {
        self.users
            .find_by_username(username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[async_trait]
impl<L, U> ListsCommand for ListsService<L, U>
where
    L: ListRepository,
    U: UserRepository,
{
    async fn create(&self, draft: NewList) -> Result<List, Error> {
        let list = List::create(draft, self.clock.utc());
        self.lists.insert(&list).await.map_err(map_list_error)?;
        adjust_user_stat(self.users.as_ref(), &list.owner, StatKind::Lists, 1).await;
        Ok(list)
    }

    async fn update(
        &self,
        requester: &Username,
        id: &ListId,
        patch: ListPatch,
    ) -> Result<List, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request("No data provided"));
        }
        let (list, access) = self.load_with_access(id, Some(requester)).await?;
        if !access.can_edit() {
            return Err(Error::forbidden("Not authorized to update this list"));
        }
        if patch.touches_sharing() && !access.can_manage() {
            return Err(Error::forbidden(
                "Only the owner can change visibility or collaborators",
            ));
        }

        let patch = patch.normalised_for(&list.owner);
        self.lists
            .update(id, &patch, self.clock.utc())
            .await
            .map_err(map_list_error)?
            .ok_or_else(|| Error::not_found(LIST_NOT_FOUND))
    }

    async fn delete(&self, requester: &Username, id: &ListId) -> Result<(), Error> {
        let (list, access) = self.load_with_access(id, Some(requester)).await?;
        if !access.can_manage() {
            return Err(Error::forbidden("Not authorized to delete this list"));
        }
        let deleted = self.lists.delete(id).await.map_err(map_list_error)?;
        if !deleted {
            return Err(Error::not_found(LIST_NOT_FOUND));
        }
        adjust_user_stat(self.users.as_ref(), &list.owner, StatKind::Lists, -1).await;
        Ok(())
    }

    async fn follow(&self, requester: &Username, id: &ListId) -> Result<FollowOutcome, Error> {
        self.load_with_access(id, Some(requester)).await?;
        self.users
            .add_followed_list(requester, id)
            .await
            .map_err(map_user_error)?;
        // The counter moves even when the set already held the id.
        let follower_count = self
            .lists
            .adjust_follower_count(id, 1)
            .await
            .map_err(map_list_error)?
            .ok_or_else(|| Error::not_found(LIST_NOT_FOUND))?;
        Ok(FollowOutcome {
            following: true,
            follower_count,
        })
    }

    async fn unfollow(&self, requester: &Username, id: &ListId) -> Result<FollowOutcome, Error> {
        // Unfollowing stays possible after a list is made private.
        if self
            .lists
            .find_by_id(id)
            .await
            .map_err(map_list_error)?
            .is_none()
        {
            return Err(Error::not_found(LIST_NOT_FOUND));
        }
        self.users
            .remove_followed_list(requester, id)
            .await
            .map_err(map_user_error)?;
        let follower_count = self
            .lists
            .adjust_follower_count(id, -1)
            .await
            .map_err(map_list_error)?
            .ok_or_else(|| Error::not_found(LIST_NOT_FOUND))?;
        Ok(FollowOutcome {
            following: false,
            follower_count,
        })
    }
}

#[async_trait]
impl<L, U> ListsQuery for ListsService<L, U>
where
    L: ListRepository,
    U: UserRepository,
{
    async fn owned(&self, requester: &Username) -> Result<Vec<List>, Error> {
        self.lists
            .list_by_owner(requester)
            .await
            .map_err(map_list_error)
    }

    async fn shared_with(&self, requester: &Username) -> Result<Vec<List>, Error> {
        self.lists
            .list_shared_with(requester)
            .await
            .map_err(map_list_error)
    }

    async fn followed(&self, requester: &Username) -> Result<Vec<List>, Error> {
        let user = self.require_user(requester).await?;
        let mut found = self
            .lists
            .find_many(&user.followed_lists)
            .await
            .map_err(map_list_error)?;

        let dangling = user.followed_lists.len().saturating_sub(found.len());
        if dangling > 0 {
            warn!(user = %requester, dangling, "skipping followed lists that no longer exist");
        }

        found.retain(|list| list.access_for(Some(requester)).can_read());
        found.sort_by_key(|list| {
            user.followed_lists
                .iter()
                .position(|followed| followed == &list.id)
        });
        Ok(found)
    }

    async fn by_owner(
        &self,
        owner: &Username,
        requester: Option<&Username>,
    ) -> Result<Vec<List>, Error> {
        self.require_user(owner).await?;
        let mut lists = self
            .lists
            .list_by_owner(owner)
            .await
            .map_err(map_list_error)?;
        lists.retain(|list| list.access_for(requester).can_read());
        Ok(lists)
    }

    async fn get(&self, id: &ListId, requester: Option<&Username>) -> Result<List, Error> {
        self.load_with_access(id, requester)
            .await
            .map(|(list, _)| list)
    }
}

#[cfg(test)]
#[path = "lists_service_tests.rs"]
mod tests;
