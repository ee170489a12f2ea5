use crate::views;
use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{FormRejection, PathRejection, QueryRejection},
    },
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::typed_header::TypedHeaderRejection;
use std::sync::Arc;
use storyshare_common::model::{
    Id,
    auth::{SessionTokenDecodeError, SessionTokenHashError},
    story::StoryMarker,
    user::UserMarker,
};
use storyshare_db::store::{DbError, Store};
use thiserror::Error;
use tower::util::MapRequest;
use tower_http::trace::TraceLayer;
use tracing::error;

pub mod auth;
mod extract;
mod method_override;
mod routes;
#[cfg(test)]
mod test_util;

pub type ServerRouter = Router<ServerState>;

/// The fully assembled service: routes, tracing and method override.
pub type App = MapRequest<Router, fn(Request) -> Request>;

#[derive(Clone, FromRef)]
pub struct ServerState {
    pub store: Arc<dyn Store>,
}

pub fn routes() -> ServerRouter {
    routes::routes()
        .fallback(fallback)
        .method_not_allowed_fallback(method_not_allowed)
}

/// Method override has to run before routing, so it wraps the router
/// instead of being one of its layers.
pub fn app(state: ServerState) -> App {
    let router = routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    MapRequest::new(
        router,
        method_override::override_method as fn(Request) -> Request,
    )
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub async fn method_not_allowed(request: Request) -> ServerError {
    let (parts, _) = request.into_parts();
    ServerError::MethodNotAllowed(parts.method, parts.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Method {0} is not allowed for {1}")]
    MethodNotAllowed(Method, Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Submitted form rejected: {0}")]
    FormRejection(#[from] FormRejection),
    #[error("Query string rejected: {0}")]
    QueryRejection(#[from] QueryRejection),
    #[error("Authorization header was invalid: {0}")]
    InvalidAuthorizationHeader(TypedHeaderRejection),
    #[error("No session token was provided")]
    MissingSession,
    #[error("The provided session token could not be decoded: {0}")]
    InvalidSessionToken(#[from] SessionTokenDecodeError),
    #[error("The session token could not be hashed: {0}")]
    SessionTokenHash(#[from] SessionTokenHashError),
    #[error("Provided session was unknown or expired")]
    InvalidSession,
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("Story with id {0} was not found.")]
    StoryByIdNotFound(Id<StoryMarker>),
    #[error("User with id {0} was not found.")]
    UserByIdNotFound(Id<UserMarker>),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PathRejection(_)
            | ServerError::StoryByIdNotFound(_)
            | ServerError::UserByIdNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidAuthorizationHeader(_)
            | ServerError::MissingSession
            | ServerError::InvalidSessionToken(_)
            | ServerError::InvalidSession => StatusCode::UNAUTHORIZED,
            ServerError::FormRejection(_) | ServerError::QueryRejection(_) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::MethodNotAllowed(..) => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::Database(_) | ServerError::SessionTokenHash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Unauthenticated requests go back to the landing page. Everything else
/// gets either the not found page or the generic failure page, so bad input
/// and broken infrastructure look the same to the user.
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        match status {
            StatusCode::UNAUTHORIZED => Redirect::to(&routes::IndexPath.to_string()).into_response(),
            StatusCode::NOT_FOUND => (status, views::errors::not_found()).into_response(),
            _ => (status, views::errors::server_error()).into_response(),
        }
    }
}
