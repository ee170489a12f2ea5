//! Resolves the requester from the session issued by the sign-in flow.
//!
//! The token is read from an `Authorization: Bearer` header, or from the
//! `session` cookie when no such header is present.

use crate::server::ServerError;
use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    http::{StatusCode, request::Parts},
};
use axum_extra::{TypedHeader, extract::CookieJar};
use headers::{Authorization, authorization::Bearer};
use std::sync::Arc;
use storyshare_common::model::{Id, auth::SessionToken, user::UserMarker};
use storyshare_db::store::Store;
use time::UtcDateTime;

pub const SESSION_COOKIE: &str = "session";

type AuthorizationHeader = TypedHeader<Authorization<Bearer>>;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct AuthenticatedUser {
    id: Id<UserMarker>,
}

impl AuthenticatedUser {
    #[must_use]
    pub fn user_id(self) -> Id<UserMarker> {
        self.id
    }
}

async fn request_token<S>(parts: &mut Parts, state: &S) -> Result<String, ServerError>
where
    S: Send + Sync,
{
    let header = <AuthorizationHeader as OptionalFromRequestParts<S>>::from_request_parts(
        parts, state,
    )
    .await
    .map_err(ServerError::InvalidAuthorizationHeader)?;

    if let Some(TypedHeader(authorization)) = header {
        return Ok(authorization.token().to_owned());
    }

    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .ok_or(ServerError::MissingSession)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<dyn Store>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let request_token: SessionToken = request_token(parts, state).await?.parse()?;
        let token_hash = request_token.hash()?;

        let session = Arc::<dyn Store>::from_ref(state)
            .fetch_session(&token_hash)
            .await?
            .ok_or(ServerError::InvalidSession)?;

        if session.user != request_token.user_id || session.is_expired_at(UtcDateTime::now()) {
            return Err(ServerError::InvalidSession);
        }

        Ok(Self { id: session.user })
    }
}

/// `None` for anonymous requests. Infrastructure failures are still errors.
impl<S> OptionalFromRequestParts<S> for AuthenticatedUser
where
    Arc<dyn Store>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <Self as FromRequestParts<S>>::from_request_parts(parts, state).await {
            Ok(user) => Ok(Some(user)),
            Err(err) if err.status() == StatusCode::UNAUTHORIZED => Ok(None),
            Err(err) => Err(err),
        }
    }
}
