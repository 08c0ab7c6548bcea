//! Curated media lists and their sharing rules.
//!
//! A list is owned by one user. Owners may open it to everyone
//! (`is_public`) and may invite collaborators who can edit its content while
//! the list is collaborative. Sharing settings stay with the owner.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MediaRef, Username};

/// Maximum list name length in characters.
pub const LIST_NAME_MAX: usize = 100;

/// Stable list identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(Uuid);

impl ListId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ListId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Validation errors for list fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListValidationError {
    #[error("List name is required")]
    EmptyName,
    #[error("list name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Non-blank list title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListName(String);

impl ListName {
    pub fn new(value: impl Into<String>) -> Result<Self, ListValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ListValidationError::EmptyName);
        }
        if trimmed.chars().count() > LIST_NAME_MAX {
            return Err(ListValidationError::NameTooLong { max: LIST_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ListName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ListName> for String {
    fn from(value: ListName) -> Self {
        value.0
    }
}

/// A user-curated, ordered collection of media references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub id: ListId,
    pub owner: Username,
    pub name: String,
    pub description: String,
    pub items: Vec<MediaRef>,
    pub is_public: bool,
    pub is_collaborative: bool,
    pub collaborators: Vec<Username>,
    pub follower_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl List {
    /// Materialise a new list from a creation request.
    pub fn create(draft: NewList, now: DateTime<Utc>) -> Self {
        let collaborators = normalise_collaborators(draft.collaborators, &draft.owner);
        Self {
            id: ListId::random(),
            owner: draft.owner,
            name: draft.name.into(),
            description: draft.description,
            items: draft.items,
            is_public: draft.is_public,
            is_collaborative: draft.is_collaborative,
            collaborators,
            follower_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the present fields of `patch` and bump `updated_at`.
    pub fn apply(&mut self, patch: ListPatch, now: DateTime<Utc>) {
        let ListPatch {
            name,
            description,
            items,
            is_public,
            is_collaborative,
            collaborators,
        } = patch;
        if let Some(name) = name {
            self.name = name.into();
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(items) = items {
            self.items = items;
        }
        if let Some(is_public) = is_public {
            self.is_public = is_public;
        }
        if let Some(is_collaborative) = is_collaborative {
            self.is_collaborative = is_collaborative;
        }
        if let Some(collaborators) = collaborators {
            self.collaborators = normalise_collaborators(collaborators, &self.owner);
        }
        self.updated_at = now;
    }

    /// Resolve the access tier `requester` holds on this list.
    pub fn access_for(&self, requester: Option<&Username>) -> ListAccess {
        ListAccess::resolve(self, requester)
    }
}

/// Deduplicate collaborators and drop the owner, keeping first-seen order.
pub fn normalise_collaborators(collaborators: Vec<Username>, owner: &Username) -> Vec<Username> {
    let mut seen = Vec::with_capacity(collaborators.len());
    for name in collaborators {
        if &name != owner && !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

/// Fields supplied when creating a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewList {
    pub owner: Username,
    pub name: ListName,
    pub description: String,
    pub items: Vec<MediaRef>,
    pub is_public: bool,
    pub is_collaborative: bool,
    pub collaborators: Vec<Username>,
}

/// Access tier a requester holds on a list.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use encyclomedia::domain::{List, ListAccess, ListName, NewList, Username};
///
/// let owner = Username::new("ada").unwrap();
/// let list = List::create(
///     NewList {
///         owner: owner.clone(),
///         name: ListName::new("Favourites").unwrap(),
///         description: String::new(),
///         items: Vec::new(),
///         is_public: false,
///         is_collaborative: false,
///         collaborators: Vec::new(),
///     },
///     Utc::now(),
/// );
/// assert_eq!(list.access_for(Some(&owner)), ListAccess::Owner);
/// assert_eq!(list.access_for(None), ListAccess::Denied);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAccess {
    Owner,
    Collaborator,
    PublicViewer,
    Denied,
}

impl ListAccess {
    /// Evaluate the visibility gate.
    ///
    /// Collaborator rights only apply while the list is collaborative; a
    /// former collaborator on a public list falls back to a public viewer.
    pub fn resolve(list: &List, requester: Option<&Username>) -> Self {
        match requester {
            Some(user) if user == &list.owner => Self::Owner,
            Some(user) if list.is_collaborative && list.collaborators.contains(user) => {
                Self::Collaborator
            }
            _ if list.is_public => Self::PublicViewer,
            _ => Self::Denied,
        }
    }

    pub const fn can_read(self) -> bool {
        !matches!(self, Self::Denied)
    }

    pub const fn can_edit(self) -> bool {
        matches!(self, Self::Owner | Self::Collaborator)
    }

    /// Sharing settings and deletion are reserved to the owner.
    pub const fn can_manage(self) -> bool {
        matches!(self, Self::Owner)
    }
}

/// Typed partial update for a list. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPatch {
    pub name: Option<ListName>,
    pub description: Option<String>,
    pub items: Option<Vec<MediaRef>>,
    pub is_public: Option<bool>,
    pub is_collaborative: Option<bool>,
    pub collaborators: Option<Vec<Username>>,
}

impl ListPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether the patch changes visibility or collaborator settings.
    pub fn touches_sharing(&self) -> bool {
        self.is_public.is_some() || self.is_collaborative.is_some() || self.collaborators.is_some()
    }

    /// Normalise the collaborator set against the list owner.
    #[must_use]
    pub fn normalised_for(mut self, owner: &Username) -> Self {
        self.collaborators = self
            .collaborators
            .map(|names| normalise_collaborators(names, owner));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MediaKind;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn user(name: &str) -> Username {
        Username::new(name).expect("valid username")
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn private_list() -> List {
        List::create(
            NewList {
                owner: user("owner"),
                name: ListName::new("Weekend watch").expect("valid name"),
                description: "Films for Saturday".into(),
                items: Vec::new(),
                is_public: false,
                is_collaborative: true,
                collaborators: vec![user("collab"), user("owner"), user("collab")],
            },
            at(9),
        )
    }

    #[rstest]
    fn create_drops_owner_and_duplicate_collaborators(private_list: List) {
        assert_eq!(private_list.collaborators, vec![user("collab")]);
        assert_eq!(private_list.follower_count, 0);
        assert_eq!(private_list.created_at, private_list.updated_at);
    }

    #[rstest]
    #[case(Some("owner"), false, true, ListAccess::Owner)]
    #[case(Some("collab"), false, true, ListAccess::Collaborator)]
    #[case(Some("collab"), true, false, ListAccess::PublicViewer)]
    #[case(Some("collab"), false, false, ListAccess::Denied)]
    #[case(Some("stranger"), false, true, ListAccess::Denied)]
    #[case(Some("stranger"), true, true, ListAccess::PublicViewer)]
    #[case(None, true, false, ListAccess::PublicViewer)]
    #[case(None, false, true, ListAccess::Denied)]
    fn resolves_access_tiers(
        mut private_list: List,
        #[case] requester: Option<&str>,
        #[case] is_public: bool,
        #[case] is_collaborative: bool,
        #[case] expected: ListAccess,
    ) {
        private_list.is_public = is_public;
        private_list.is_collaborative = is_collaborative;
        let requester = requester.map(user);
        assert_eq!(private_list.access_for(requester.as_ref()), expected);
    }

    #[rstest]
    #[case(ListAccess::Owner, true, true, true)]
    #[case(ListAccess::Collaborator, true, true, false)]
    #[case(ListAccess::PublicViewer, true, false, false)]
    #[case(ListAccess::Denied, false, false, false)]
    fn access_capabilities(
        #[case] access: ListAccess,
        #[case] read: bool,
        #[case] edit: bool,
        #[case] manage: bool,
    ) {
        assert_eq!(
            (access.can_read(), access.can_edit(), access.can_manage()),
            (read, edit, manage)
        );
    }

    #[rstest]
    fn apply_only_touches_present_fields(mut private_list: List) {
        let item = MediaRef::new(MediaKind::Movie, "603").expect("valid item");
        private_list.apply(
            ListPatch {
                items: Some(vec![item.clone()]),
                ..ListPatch::default()
            },
            at(10),
        );
        assert_eq!(private_list.items, vec![item]);
        assert_eq!(private_list.name, "Weekend watch");
        assert_eq!(private_list.description, "Films for Saturday");
        assert!(!private_list.is_public);
        assert_eq!(private_list.updated_at, at(10));
    }

    #[rstest]
    fn patch_classifies_sharing_fields() {
        let content = ListPatch {
            description: Some("new".into()),
            ..ListPatch::default()
        };
        let sharing = ListPatch {
            is_public: Some(true),
            ..ListPatch::default()
        };
        assert!(!content.touches_sharing());
        assert!(sharing.touches_sharing());
        assert!(ListPatch::default().is_empty());
        assert!(!content.is_empty());
    }

    #[rstest]
    #[case("", ListValidationError::EmptyName)]
    #[case("   ", ListValidationError::EmptyName)]
    fn rejects_blank_names(#[case] raw: &str, #[case] expected: ListValidationError) {
        assert_eq!(ListName::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_long_names() {
        assert_eq!(
            ListName::new("x".repeat(LIST_NAME_MAX + 1)),
            Err(ListValidationError::NameTooLong { max: LIST_NAME_MAX })
        );
    }
}
