//! Account endpoints: registration, login, token checks and public profiles.
//!
//! ```text
//! POST /api/v1/users {"username":"ada","email":"ada@example.com","password":"..."}
//! POST /api/v1/auth/login {"email":"ada@example.com","password":"..."}
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{Error, ErrorCode, LoginCredentials, LoginValidationError, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_username, require};

/// Sign-up payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada")]
    pub username: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let username = require(value.username, FieldName::new("username"))?;
        let email = require(value.email, FieldName::new("email"))?;
        let password = value
            .password
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| missing_field_error(FieldName::new("password")))?;
        Self::try_from_parts(&username, &email, &password)
            .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "User created")]
    message: String,
    id: Uuid,
}

/// Login payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful")]
    message: String,
    token: String,
}

/// Activity counters shown on a profile.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct StatsResponse {
    lists: u32,
    reviews: u32,
    media: u32,
}

/// Public view of a user. The email is only included for the caller's own
/// account.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    id: Uuid,
    username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    profile_picture: Option<String>,
    stats: StatsResponse,
    created_at: DateTime<Utc>,
}

impl UserProfileResponse {
    pub fn public(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username.into(),
            email: None,
            profile_picture: user.profile_picture,
            stats: StatsResponse {
                lists: user.stats.lists,
                reviews: user.stats.reviews,
                media: user.stats.media,
            },
            created_at: user.created_at,
        }
    }

    fn own(user: User) -> Self {
        let email = user.email.to_string();
        Self {
            email: Some(email),
            ..Self::public(user)
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CheckUsernameQuery {
    pub username: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckUsernameResponse {
    is_unique: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyTokenResponse {
    valid: bool,
    user: UserProfileResponse,
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username or email already exists", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User created".to_owned(),
        id: user.id,
    }))
}

/// Report whether a username is still free.
#[utoipa::path(
    get,
    path = "/api/v1/users/check-username",
    params(CheckUsernameQuery),
    responses(
        (status = 200, description = "Availability", body = CheckUsernameResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "checkUsername",
    security([])
)]
#[get("/users/check-username")]
pub async fn check_username(
    state: web::Data<HttpState>,
    query: web::Query<CheckUsernameQuery>,
) -> ApiResult<web::Json<CheckUsernameResponse>> {
    let field = FieldName::new("username");
    let raw = require(query.into_inner().username, field)?;
    let username = parse_username(&raw, field)?;
    let is_unique = state.accounts_query.is_username_available(&username).await?;
    Ok(web::Json(CheckUsernameResponse { is_unique }))
}

/// Public profile for `username`.
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}",
    params(("username" = String, Path, description = "Account name")),
    responses(
        (status = 200, description = "Profile", body = UserProfileResponse),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "getProfile",
    security([])
)]
#[get("/users/{username}")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserProfileResponse>> {
    let username = parse_username(&path.into_inner(), FieldName::new("username"))?;
    let user = state.accounts_query.profile(&username).await?;
    Ok(web::Json(UserProfileResponse::public(user)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let outcome = state.accounts.login(credentials).await?;
    Ok(web::Json(LoginResponse {
        message: "Login successful".to_owned(),
        token: outcome.token.as_str().to_owned(),
    }))
}

/// Confirm the bearer token and return the caller's account.
#[utoipa::path(
    get,
    path = "/api/v1/auth/verify-token",
    responses(
        (status = 200, description = "Token is valid", body = VerifyTokenResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "verifyToken"
)]
#[get("/auth/verify-token")]
pub async fn verify_token(
    state: web::Data<HttpState>,
    user: BearerUser,
) -> ApiResult<web::Json<VerifyTokenResponse>> {
    let account = state
        .accounts_query
        .profile(user.username())
        .await
        .map_err(|err| match err.code() {
            ErrorCode::NotFound => Error::unauthorized("Invalid token"),
            _ => err,
        })?;
    Ok(web::Json(VerifyTokenResponse {
        valid: true,
        user: UserProfileResponse::own(account),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::api_scope;
    use crate::inbound::http::test_utils::{TEST_PASSWORD, TestApp, bearer_header};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[actix_web::test]
    async fn register_then_login_then_verify() {
        let harness = TestApp::new();
        let app = actix_test::init_service(
            App::new().app_data(harness.data()).service(api_scope()),
        )
        .await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(json!({
                    "username": "ada",
                    "email": "Ada@Example.com",
                    "password": TEST_PASSWORD,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(created).await;
        assert_eq!(body["message"], "User created");
        assert!(body["id"].is_string());

        let login_body: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({"email": "ada@example.com", "password": TEST_PASSWORD}))
                .to_request(),
        )
        .await;
        assert_eq!(login_body["message"], "Login successful");
        let token = login_body["token"].as_str().expect("token string").to_owned();

        let verified: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/auth/verify-token")
                .insert_header(bearer_header(&token))
                .to_request(),
        )
        .await;
        assert_eq!(verified["valid"], true);
        assert_eq!(verified["user"]["username"], "ada");
        assert_eq!(verified["user"]["email"], "ada@example.com");
        assert!(verified["user"].get("passwordHash").is_none());
    }

    #[rstest]
    #[case(json!({"email": "a@example.com", "password": TEST_PASSWORD}), "missing required field: username")]
    #[case(json!({"username": "ada", "password": TEST_PASSWORD}), "missing required field: email")]
    #[case(json!({"username": "ada", "email": "a@example.com"}), "missing required field: password")]
    #[actix_web::test]
    async fn register_requires_every_field(#[case] payload: Value, #[case] message: &str) {
        let harness = TestApp::new();
        let app = actix_test::init_service(
            App::new().app_data(harness.data()).service(api_scope()),
        )
        .await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(payload)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["error"], message);
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_username_conflicts() {
        let harness = TestApp::new();
        harness.sign_up("ada").await;
        let app = actix_test::init_service(
            App::new().app_data(harness.data()).service(api_scope()),
        )
        .await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(json!({
                    "username": "ada",
                    "email": "other@example.com",
                    "password": TEST_PASSWORD,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[rstest]
    #[actix_web::test]
    async fn wrong_password_is_unauthorised() {
        let harness = TestApp::new();
        harness.sign_up("ada").await;
        let app = actix_test::init_service(
            App::new().app_data(harness.data()).service(api_scope()),
        )
        .await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({"email": "ada@example.com", "password": "not the password"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[rstest]
    #[actix_web::test]
    async fn check_username_and_profile() {
        let harness = TestApp::new();
        harness.sign_up("ada").await;
        let app = actix_test::init_service(
            App::new().app_data(harness.data()).service(api_scope()),
        )
        .await;

        let taken: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/check-username?username=ada")
                .to_request(),
        )
        .await;
        assert_eq!(taken["isUnique"], false);

        let free: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/check-username?username=grace")
                .to_request(),
        )
        .await;
        assert_eq!(free["isUnique"], true);

        let profile: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/ada")
                .to_request(),
        )
        .await;
        assert_eq!(profile["username"], "ada");
        assert_eq!(profile["stats"]["lists"], 0);
        assert!(profile.get("email").is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn check_username_requires_the_parameter() {
        let harness = TestApp::new();
        let app = actix_test::init_service(
            App::new().app_data(harness.data()).service(api_scope()),
        )
        .await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/check-username")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_profile_is_not_found() {
        let harness = TestApp::new();
        let app = actix_test::init_service(
            App::new().app_data(harness.data()).service(api_scope()),
        )
        .await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/nobody")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
