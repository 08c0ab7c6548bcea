//! Bearer-token extractors used by HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! header parsing and identity derivation here. Token verification itself is
//! delegated to the [`Authenticator`](crate::domain::ports::Authenticator)
//! port held in [`HttpState`].

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};

use crate::domain::{Error, Username};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Caller identity proven by a valid bearer token. Rejects the request with
/// `401` when the header is absent or the token does not verify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerUser(pub Username);

impl BearerUser {
    pub fn username(&self) -> &Username {
        &self.0
    }
}

/// Identity for endpoints that serve anonymous callers too.
///
/// A missing `Authorization` header yields `None`; a present but invalid
/// token is still rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalBearer(pub Option<Username>);

impl OptionalBearer {
    pub fn username(&self) -> Option<&Username> {
        self.0.as_ref()
    }
}

/// Pull the raw token out of the `Authorization` header, if one was sent.
fn bearer_token(req: &HttpRequest) -> Result<Option<String>, Error> {
    let Some(value) = req.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| Error::unauthorized("Invalid token"))?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("Invalid token"))?;
    Ok(Some(token.to_owned()))
}

fn verify(req: &HttpRequest, token: &str) -> Result<Username, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))?;
    state.authenticator.authenticate(token)
}

impl FromRequest for BearerUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let outcome = bearer_token(req).and_then(|token| {
            let token = token.ok_or_else(|| Error::unauthorized("Missing bearer token"))?;
            verify(req, &token).map(Self)
        });
        ready(outcome)
    }
}

impl FromRequest for OptionalBearer {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let outcome = bearer_token(req).and_then(|token| match token {
            Some(token) => verify(req, &token).map(|user| Self(Some(user))),
            None => Ok(Self(None)),
        });
        ready(outcome)
    }
}
