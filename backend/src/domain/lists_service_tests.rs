//! Tests for the lists service.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockListRepository, MockUserRepository};
use crate::domain::service_test_support::{fixture_clock, fixture_timestamp, user};
use crate::domain::{EmailAddress, ErrorCode, ListName, MediaKind, MediaRef};

fn make_service(
    lists: MockListRepository,
    users: MockUserRepository,
) -> ListsService<MockListRepository, MockUserRepository> {
    ListsService::new(Arc::new(lists), Arc::new(users), fixture_clock())
}

#[fixture]
fn shared_list() -> List {
    List::create(
        NewList {
            owner: user("owner"),
            name: ListName::new("Noir marathon").expect("valid name"),
            description: String::new(),
            items: Vec::new(),
            is_public: false,
            is_collaborative: true,
            collaborators: vec![user("collab")],
        },
        fixture_timestamp(),
    )
}

fn lists_returning(list: List) -> MockListRepository {
    let mut lists = MockListRepository::new();
    lists
        .expect_find_by_id()
        .returning(move |_| Ok(Some(list.clone())));
    lists
}

#[rstest]
#[case::stranger(Some("stranger"))]
#[case::anonymous(None)]
#[tokio::test]
async fn private_list_is_hidden_from_outsiders(shared_list: List, #[case] requester: Option<&str>) {
    let id = shared_list.id;
    let service = make_service(lists_returning(shared_list), MockUserRepository::new());
    let requester = requester.map(user);

    let error = service
        .get(&id, requester.as_ref())
        .await
        .expect_err("hidden");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "List not found");
}

#[rstest]
#[tokio::test]
async fn public_list_is_visible_to_anonymous_readers(mut shared_list: List) {
    shared_list.is_public = true;
    let id = shared_list.id;
    let service = make_service(lists_returning(shared_list), MockUserRepository::new());

    let list = service.get(&id, None).await.expect("visible");
    assert_eq!(list.id, id);
}

#[rstest]
#[tokio::test]
async fn collaborator_may_edit_content(shared_list: List) {
    let id = shared_list.id;
    let item = MediaRef::new(MediaKind::Book, "OL1W").expect("valid item");
    let mut updated = shared_list.clone();
    updated.items = vec![item.clone()];

    let mut lists = lists_returning(shared_list);
    lists
        .expect_update()
        .withf(|_, patch, at| patch.items.is_some() && *at == fixture_timestamp())
        .times(1)
        .return_once(move |_, _, _| Ok(Some(updated)));
    let service = make_service(lists, MockUserRepository::new());

    let patch = ListPatch {
        items: Some(vec![item.clone()]),
        description: Some("now with books".into()),
        ..ListPatch::default()
    };
    let list = service
        .update(&user("collab"), &id, patch)
        .await
        .expect("collaborator edit");
    assert_eq!(list.items, vec![item]);
}

#[rstest]
#[case::visibility(ListPatch { is_public: Some(true), ..ListPatch::default() })]
#[case::collaborators(ListPatch { collaborators: Some(Vec::new()), ..ListPatch::default() })]
#[case::collaborative_flag(ListPatch { is_collaborative: Some(false), ..ListPatch::default() })]
#[tokio::test]
async fn collaborator_cannot_change_sharing(shared_list: List, #[case] patch: ListPatch) {
    let id = shared_list.id;
    let mut lists = lists_returning(shared_list);
    lists.expect_update().never();
    let service = make_service(lists, MockUserRepository::new());

    let error = service
        .update(&user("collab"), &id, patch)
        .await
        .expect_err("forbidden");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn owner_patch_drops_self_from_collaborators(shared_list: List) {
    let id = shared_list.id;
    let stored = shared_list.clone();
    let mut lists = lists_returning(shared_list);
    lists
        .expect_update()
        .withf(|_, patch, _| patch.collaborators == Some(vec![user("friend")]))
        .times(1)
        .return_once(move |_, _, _| Ok(Some(stored)));
    let service = make_service(lists, MockUserRepository::new());

    let patch = ListPatch {
        collaborators: Some(vec![user("owner"), user("friend"), user("friend")]),
        ..ListPatch::default()
    };
    service
        .update(&user("owner"), &id, patch)
        .await
        .expect("owner update");
}

#[rstest]
#[tokio::test]
async fn empty_patch_is_rejected(shared_list: List) {
    let service = make_service(MockListRepository::new(), MockUserRepository::new());
    let error = service
        .update(&user("owner"), &shared_list.id, ListPatch::default())
        .await
        .expect_err("empty patch");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "No data provided");
}

#[rstest]
#[tokio::test]
async fn collaborator_cannot_delete(shared_list: List) {
    let id = shared_list.id;
    let mut lists = lists_returning(shared_list);
    lists.expect_delete().never();
    let service = make_service(lists, MockUserRepository::new());

    let error = service
        .delete(&user("collab"), &id)
        .await
        .expect_err("forbidden");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn create_bumps_owner_list_counter(shared_list: List) {
    let draft = NewList {
        owner: shared_list.owner.clone(),
        name: ListName::new("Fresh").expect("valid name"),
        description: String::new(),
        items: Vec::new(),
        is_public: true,
        is_collaborative: false,
        collaborators: Vec::new(),
    };
    let mut lists = MockListRepository::new();
    lists.expect_insert().times(1).return_once(|_| Ok(()));
    let mut users = MockUserRepository::new();
    users
        .expect_adjust_stat()
        .withf(|name, kind, delta| name.as_ref() == "owner" && *kind == StatKind::Lists && *delta == 1)
        .times(1)
        .return_once(|_, _, _| Ok(()));
    let service = make_service(lists, users);

    let list = service.create(draft).await.expect("created");
    assert_eq!(list.created_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn repeated_follow_inflates_counter(mut shared_list: List) {
    shared_list.is_public = true;
    let id = shared_list.id;
    let counter = Arc::new(AtomicU32::new(0));
    let counter_handle = Arc::clone(&counter);

    let mut lists = lists_returning(shared_list);
    lists
        .expect_adjust_follower_count()
        .times(2)
        .returning(move |_, delta| {
            let step = u32::try_from(delta).expect("positive delta");
            Ok(Some(counter_handle.fetch_add(step, Ordering::SeqCst) + step))
        });
    let mut users = MockUserRepository::new();
    users
        .expect_add_followed_list()
        .times(2)
        .returning(|_, _| Ok(()));
    let service = make_service(lists, users);

    let fan = user("fan");
    service.follow(&fan, &id).await.expect("first follow");
    let second = service.follow(&fan, &id).await.expect("second follow");

    // Known drift: the counter moves on every call, not only the first.
    assert_eq!(second.follower_count, 2);
    assert!(second.following);
}

#[rstest]
#[tokio::test]
async fn follow_requires_read_access(shared_list: List) {
    let id = shared_list.id;
    let mut users = MockUserRepository::new();
    users.expect_add_followed_list().never();
    let service = make_service(lists_returning(shared_list), users);

    let error = service
        .follow(&user("stranger"), &id)
        .await
        .expect_err("hidden list");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn unfollow_decrements_counter(shared_list: List) {
    let id = shared_list.id;
    let mut lists = lists_returning(shared_list);
    lists
        .expect_adjust_follower_count()
        .withf(|_, delta| *delta == -1)
        .return_once(|_, _| Ok(Some(0)));
    let mut users = MockUserRepository::new();
    users
        .expect_remove_followed_list()
        .times(1)
        .return_once(|_, _| Ok(()));
    let service = make_service(lists, users);

    let outcome = service
        .unfollow(&user("stranger"), &id)
        .await
        .expect("unfollow");
    assert_eq!(outcome.follower_count, 0);
    assert!(!outcome.following);
}

#[rstest]
#[tokio::test]
async fn followed_skips_missing_and_hidden_lists(mut shared_list: List) {
    shared_list.is_public = true;
    let mut hidden = shared_list.clone();
    hidden.id = ListId::random();
    hidden.is_public = false;
    let missing = ListId::random();

    let mut reader = User::new(
        user("reader"),
        EmailAddress::new("reader@example.com").expect("valid email"),
        fixture_timestamp(),
    );
    reader.followed_lists = vec![missing, hidden.id, shared_list.id];
    let visible_id = shared_list.id;

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .return_once(move |_| Ok(Some(reader)));
    let mut lists = MockListRepository::new();
    lists
        .expect_find_many()
        .withf(|ids| ids.len() == 3)
        .return_once(move |_| Ok(vec![hidden, shared_list]));
    let service = make_service(lists, users);

    let followed = service.followed(&user("reader")).await.expect("followed");
    let ids: Vec<ListId> = followed.iter().map(|list| list.id).collect();
    assert_eq!(ids, vec![visible_id]);
}

#[rstest]
#[tokio::test]
async fn by_owner_filters_unreadable_lists(shared_list: List) {
    let mut public = shared_list.clone();
    public.id = ListId::random();
    public.is_public = true;
    let public_id = public.id;

    let mut users = MockUserRepository::new();
    users.expect_find_by_username().return_once(|name| {
        Ok(Some(User::new(
            name.clone(),
            EmailAddress::new("owner@example.com").expect("valid email"),
            fixture_timestamp(),
        )))
    });
    let mut lists = MockListRepository::new();
    lists
        .expect_list_by_owner()
        .return_once(move |_| Ok(vec![shared_list, public]));
    let service = make_service(lists, users);

    let visible = service
        .by_owner(&user("owner"), None)
        .await
        .expect("lists");
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, public_id);
}
