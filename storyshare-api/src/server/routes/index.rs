use crate::{
    server::{Result, ServerError, ServerRouter, auth::AuthenticatedUser},
    views,
};
use axum::{extract::State, response::Redirect};
use axum_extra::{
    either::Either,
    routing::{RouterExt, TypedPath},
};
use maud::Markup;
use std::sync::Arc;
use storyshare_db::store::Store;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(landing)
        .typed_get(dashboard)
}

#[derive(TypedPath)]
#[typed_path("/")]
pub struct IndexPath;

/// Signed-in users have no business on the landing page.
async fn landing(_: IndexPath, user: Option<AuthenticatedUser>) -> Either<Markup, Redirect> {
    match user {
        Some(_) => Either::E2(Redirect::to(&DashboardPath.to_string())),
        None => Either::E1(views::landing()),
    }
}

#[derive(TypedPath)]
#[typed_path("/dashboard")]
pub struct DashboardPath;

async fn dashboard(
    _: DashboardPath,
    user: AuthenticatedUser,
    State(store): State<Arc<dyn Store>>,
) -> Result<Markup> {
    let user_id = user.user_id();
    let user = store
        .fetch_user(user_id)
        .await?
        .ok_or(ServerError::UserByIdNotFound(user_id))?;
    let stories = store.fetch_user_stories(user_id).await?;

    Ok(views::dashboard(&user, &stories))
}
