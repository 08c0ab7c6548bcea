//! PostgreSQL-backed `UserRepository`.
//!
//! Counters and the followed-list set are updated with single statements so
//! concurrent requests never lose each other's writes.

use async_trait::async_trait;
use diesel::dsl::not;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    EmailAddress, ListId, PasswordHash, StatKind, User, UserAccount, UserStats, Username,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, unique_violation};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;
use super::sql_functions::{array_append, array_remove, greatest};

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Which user field a unique constraint protects.
fn duplicate_field(constraint: &str) -> &'static str {
    if constraint.contains("email") {
        "email"
    } else {
        "username"
    }
}

fn counter(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let username = Username::new(row.username)
        .map_err(|err| UserPersistenceError::query(format!("stored username is invalid: {err}")))?;
    let email = EmailAddress::new(row.email)
        .map_err(|err| UserPersistenceError::query(format!("stored email is invalid: {err}")))?;
    let user = User {
        id: row.id,
        username,
        email,
        profile_picture: row.profile_picture,
        stats: UserStats {
            lists: counter(row.stat_lists),
            reviews: counter(row.stat_reviews),
            media: counter(row.stat_media),
        },
        followed_lists: row
            .followed_lists
            .into_iter()
            .map(ListId::from_uuid)
            .collect(),
        created_at: row.created_at,
    };
    Ok(UserAccount {
        user,
        password_hash: PasswordHash::new(row.password_hash),
    })
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    row_to_account(row).map(|account| account.user)
}

/// Escape `LIKE` wildcards so a search fragment matches literally.
fn like_pattern(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len() + 2);
    escaped.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let user = &account.user;
        let followed: Vec<Uuid> = user
            .followed_lists
            .iter()
            .map(|id| *id.as_uuid())
            .collect();
        let row = NewUserRow {
            id: user.id,
            username: user.username.as_ref(),
            email: user.email.as_ref(),
            password_hash: account.password_hash.as_str(),
            profile_picture: user.profile_picture.as_deref(),
            followed_lists: &followed,
            created_at: user.created_at,
        };

        let result = diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(err) => match unique_violation(&err).map(duplicate_field) {
                Some(field) => Err(UserPersistenceError::duplicate(field)),
                None => Err(map_error(err)),
            },
        }
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_account).transpose()
    }

    async fn search(&self, fragment: &str) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let fragment = fragment.trim();
        let mut query = users::table
            .select(UserRow::as_select())
            .order(users::username.asc())
            .into_boxed();
        if !fragment.is_empty() {
            query = query.filter(users::username.ilike(like_pattern(fragment)));
        }
        let rows: Vec<UserRow> = query.load(&mut conn).await.map_err(map_error)?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn adjust_stat(
        &self,
        username: &Username,
        kind: StatKind,
        delta: i32,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let target = diesel::update(users::table.filter(users::username.eq(username.as_ref())));
        let result = match kind {
            StatKind::Lists => {
                target
                    .set(users::stat_lists.eq(greatest(users::stat_lists + delta, 0)))
                    .execute(&mut conn)
                    .await
            }
            StatKind::Reviews => {
                target
                    .set(users::stat_reviews.eq(greatest(users::stat_reviews + delta, 0)))
                    .execute(&mut conn)
                    .await
            }
            StatKind::Media => {
                target
                    .set(users::stat_media.eq(greatest(users::stat_media + delta, 0)))
                    .execute(&mut conn)
                    .await
            }
        };
        result.map(|_| ()).map_err(map_error)
    }

    async fn add_followed_list(
        &self,
        username: &Username,
        list_id: &ListId,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let id = *list_id.as_uuid();
        diesel::update(
            users::table
                .filter(users::username.eq(username.as_ref()))
                .filter(not(users::followed_lists.contains(vec![id]))),
        )
        .set(users::followed_lists.eq(array_append(users::followed_lists, id)))
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(map_error)
    }

    async fn remove_followed_list(
        &self,
        username: &Username,
        list_id: &ListId,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        diesel::update(users::table.filter(users::username.eq(username.as_ref())))
            .set(users::followed_lists.eq(array_remove(users::followed_lists, *list_id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn row(username: &str, stat_lists: i32) -> UserRow {
        UserRow {
            id: Uuid::nil(),
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$v=19$stub".to_owned(),
            profile_picture: None,
            stat_lists,
            stat_reviews: 2,
            stat_media: 0,
            followed_lists: vec![Uuid::from_u128(7)],
            created_at: Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).single().expect("timestamp"),
        }
    }

    #[rstest]
    #[case("ab%c_d", "%ab\\%c\\_d%")]
    #[case("plain", "%plain%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn like_pattern_escapes_wildcards(#[case] fragment: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(fragment), expected);
    }

    #[rstest]
    #[case("users_email_key", "email")]
    #[case("users_username_key", "username")]
    fn duplicate_field_follows_constraint(#[case] constraint: &str, #[case] field: &str) {
        assert_eq!(duplicate_field(constraint), field);
    }

    #[rstest]
    fn row_maps_to_account() {
        let account = row_to_account(row("ada", 3)).expect("valid row");
        assert_eq!(account.user.username.as_ref(), "ada");
        assert_eq!(account.user.stats.lists, 3);
        assert_eq!(account.user.stats.reviews, 2);
        assert_eq!(
            account.user.followed_lists,
            vec![ListId::from_uuid(Uuid::from_u128(7))]
        );
        assert_eq!(account.password_hash.as_str(), "$argon2id$v=19$stub");
    }

    #[rstest]
    fn negative_counters_read_as_zero() {
        let user = row_to_user(row("ada", -4)).expect("valid row");
        assert_eq!(user.stats.lists, 0);
    }

    #[rstest]
    fn corrupt_username_is_a_query_error() {
        let error = row_to_user(row("not valid", 0)).expect_err("invalid username");
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }
}
