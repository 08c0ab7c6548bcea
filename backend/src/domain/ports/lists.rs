//! Driving ports for list management and list reads.

use async_trait::async_trait;

use crate::domain::{Error, List, ListId, ListPatch, NewList, Username};

/// Result of a follow or unfollow call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowOutcome {
    pub following: bool,
    pub follower_count: u32,
}

#[async_trait]
pub trait ListsCommand: Send + Sync {
    async fn create(&self, draft: NewList) -> Result<List, Error>;

    /// Apply a partial update after checking the requester's access tier.
    async fn update(
        &self,
        requester: &Username,
        id: &ListId,
        patch: ListPatch,
    ) -> Result<List, Error>;

    async fn delete(&self, requester: &Username, id: &ListId) -> Result<(), Error>;

    async fn follow(&self, requester: &Username, id: &ListId) -> Result<FollowOutcome, Error>;

    async fn unfollow(&self, requester: &Username, id: &ListId) -> Result<FollowOutcome, Error>;
}

#[async_trait]
pub trait ListsQuery: Send + Sync {
    /// Lists the requester owns.
    async fn owned(&self, requester: &Username) -> Result<Vec<List>, Error>;

    /// Collaborative lists the requester was invited to.
    async fn shared_with(&self, requester: &Username) -> Result<Vec<List>, Error>;

    /// Followed lists that still exist and remain readable.
    async fn followed(&self, requester: &Username) -> Result<Vec<List>, Error>;

    /// `owner`'s lists filtered to those `requester` may read.
    async fn by_owner(
        &self,
        owner: &Username,
        requester: Option<&Username>,
    ) -> Result<Vec<List>, Error>;

    /// A single list behind the visibility gate.
    async fn get(&self, id: &ListId, requester: Option<&Username>) -> Result<List, Error>;
}
