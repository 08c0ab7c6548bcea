//! Collage domain service.
//!
//! Reads are public; writes are limited to the collage's owner, and a
//! collage someone else owns looks the same as a missing one.
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    CollagePersistenceError, CollageRepository, CollagesCommand, CollagesQuery,
};
use crate::domain::{Collage, CollageId, CollageLayout, Error, Username};

const COLLAGE_NOT_FOUND: &str = "Collage not found";
const COLLAGE_NOT_DELETABLE: &str = "Collage not found or unauthorized";

/// Collage service implementing the collage driving ports.
#[derive(Clone)]
pub struct CollagesService<C> {
    collages: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C> CollagesService<C> {
    pub fn new(collages: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { collages, clock }
    }
}

fn map_collage_error(error: CollagePersistenceError) -> Error {
    match error {
        CollagePersistenceError::Connection { message } => {
            Error::internal(format!("collage repository unavailable: {message}"))
        }
        CollagePersistenceError::Query { message } => {
            Error::internal(format!("collage repository error: {message}"))
        }
    }
}

impl<C: CollageRepository> CollagesService<C> {
    async fn load(&self, id: &CollageId) -> Result<Collage, Error> {
        self.collages
            .find_by_id(id)
            .await
            .map_err(map_collage_error)?
            .ok_or_else(|| Error::not_found(COLLAGE_NOT_FOUND))
    }
}

#[async_trait]
impl<C: CollageRepository> CollagesCommand for CollagesService<C> {
    async fn save(&self, owner: Username, layout: CollageLayout) -> Result<Collage, Error> {
        let collage = Collage::create(owner, layout, self.clock.utc());
        self.collages
            .insert(&collage)
            .await
            .map_err(map_collage_error)?;
        Ok(collage)
    }

    async fn update(
        &self,
        requester: &Username,
        id: &CollageId,
        layout: CollageLayout,
    ) -> Result<Collage, Error> {
        let mut collage = self.load(id).await?;
        if &collage.owner != requester {
            return Err(Error::not_found(COLLAGE_NOT_FOUND));
        }
        collage.replace_layout(layout, self.clock.utc());
        self.collages
            .update(&collage)
            .await
            .map_err(map_collage_error)?;
        Ok(collage)
    }

    async fn delete(&self, requester: &Username, id: &CollageId) -> Result<(), Error> {
        let deleted = self
            .collages
            .delete_owned(requester, id)
            .await
            .map_err(map_collage_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(COLLAGE_NOT_DELETABLE))
        }
    }
}

#[async_trait]
impl<C: CollageRepository> CollagesQuery for CollagesService<C> {
    async fn get(&self, id: &CollageId) -> Result<Collage, Error> {
        self.load(id).await
    }

    async fn by_owner(&self, owner: &Username) -> Result<Vec<Collage>, Error> {
        self.collages
            .list_by_owner(owner)
            .await
            .map_err(map_collage_error)
    }

    async fn trending(&self, limit: usize) -> Result<Vec<Collage>, Error> {
        self.collages
            .recently_updated(limit)
            .await
            .map_err(map_collage_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockCollageRepository;
    use crate::domain::service_test_support::{fixture_clock, fixture_timestamp, user};
    use crate::domain::{CollageDraft, ErrorCode, GridSize, MediaKind, MediaRef};
    use chrono::Duration;
    use rstest::rstest;

    fn make_service(collages: MockCollageRepository) -> CollagesService<MockCollageRepository> {
        CollagesService::new(Arc::new(collages), fixture_clock())
    }

    fn layout(name: &str) -> CollageLayout {
        CollageLayout::try_new(CollageDraft {
            name,
            grid_size: "3x3",
            items: vec![MediaRef::new(MediaKind::Movie, "603").expect("valid item")],
            ..CollageDraft::default()
        })
        .expect("valid layout")
    }

    fn stored(owner: &str) -> Collage {
        let mut collage = Collage::create(
            user(owner),
            layout("Originals"),
            fixture_timestamp() - Duration::days(3),
        );
        collage.grid_size = GridSize::Four;
        collage
    }

    #[rstest]
    #[tokio::test]
    async fn save_stamps_both_timestamps() {
        let mut collages = MockCollageRepository::new();
        collages.expect_insert().times(1).return_once(|_| Ok(()));
        let service = make_service(collages);

        let collage = service
            .save(user("curator"), layout("Summer"))
            .await
            .expect("saved");
        assert_eq!(collage.created_at, fixture_timestamp());
        assert_eq!(collage.updated_at, fixture_timestamp());
        assert_eq!(collage.owner, user("curator"));
    }

    #[rstest]
    #[tokio::test]
    async fn update_replaces_layout_and_keeps_creation_time() {
        let existing = stored("curator");
        let created_at = existing.created_at;
        let id = existing.id;
        let mut collages = MockCollageRepository::new();
        collages
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        collages
            .expect_update()
            .withf(|collage| collage.name == "Renamed" && collage.grid_size == GridSize::Three)
            .times(1)
            .return_once(|_| Ok(()));
        let service = make_service(collages);

        let updated = service
            .update(&user("curator"), &id, layout("Renamed"))
            .await
            .expect("updated");
        assert_eq!(updated.created_at, created_at);
        assert_eq!(updated.updated_at, fixture_timestamp());
    }

    #[rstest]
    #[case::stranger(Some(stored("curator")))]
    #[case::missing(None)]
    #[tokio::test]
    async fn update_hides_collages_the_caller_cannot_edit(#[case] found: Option<Collage>) {
        let mut collages = MockCollageRepository::new();
        collages.expect_find_by_id().return_once(move |_| Ok(found));
        collages.expect_update().never();
        let service = make_service(collages);

        let error = service
            .update(&user("intruder"), &CollageId::random(), layout("Mine now"))
            .await
            .expect_err("rejected");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), COLLAGE_NOT_FOUND);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_without_match_is_not_found() {
        let mut collages = MockCollageRepository::new();
        collages
            .expect_delete_owned()
            .return_once(|_, _| Ok(false));
        let service = make_service(collages);

        let error = service
            .delete(&user("intruder"), &CollageId::random())
            .await
            .expect_err("rejected");
        assert_eq!(error.message(), COLLAGE_NOT_DELETABLE);
    }

    #[rstest]
    #[tokio::test]
    async fn repository_failures_are_internal() {
        let mut collages = MockCollageRepository::new();
        collages
            .expect_recently_updated()
            .withf(|limit| *limit == 5)
            .return_once(|_| Err(CollagePersistenceError::connection("pool exhausted")));
        let service = make_service(collages);

        let error = service.trending(5).await.expect_err("failure surfaces");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
