use crate::server::ServerError;
use axum::extract::{FromRequest, FromRequestParts};

/// [`axum::Form`] with rejections turned into [`ServerError`].
#[derive(FromRequest, Debug, Clone, Copy, Default)]
#[from_request(via(axum::Form), rejection(ServerError))]
pub struct Form<T>(pub T);

/// [`axum::extract::Query`] with rejections turned into [`ServerError`].
#[derive(FromRequestParts, Debug, Clone, Copy, Default)]
#[from_request(via(axum::extract::Query), rejection(ServerError))]
pub struct Query<T>(pub T);
