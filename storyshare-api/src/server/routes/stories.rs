//! The story resource.
//!
//! Every handler requires a session, checked before any path parameter is
//! looked at. Private stories look exactly like
//! missing ones to anyone but their owner, and attempts to change someone
//! else's story are answered with a redirect to the story list.

use crate::{
    server::{
        Result, ServerError, ServerRouter,
        auth::AuthenticatedUser,
        extract::{Form, Query},
        routes::DashboardPath,
    },
    views,
};
use axum::{extract::State, response::Redirect};
use axum_extra::{
    either::Either,
    routing::{RouterExt, TypedPath},
};
use maud::Markup;
use serde::Deserialize;
use std::sync::Arc;
use storyshare_common::model::{
    Id,
    story::{PartialStory, StoryFields, StoryMarker},
    user::UserMarker,
};
use storyshare_db::store::Store;
use tracing::{debug, info};

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(add_story_form)
        .typed_get(list_public_stories)
        .typed_post(create_story)
        .typed_get(show_story)
        .typed_put(update_story)
        .typed_delete(delete_story)
        .typed_get(edit_story_form)
        .typed_get(list_user_stories)
        .typed_get(search_stories)
        .typed_get(search_stories_form)
}

fn to_dashboard() -> Redirect {
    Redirect::to(&DashboardPath.to_string())
}

fn to_story_list() -> Redirect {
    Redirect::to(&StoriesPath.to_string())
}

/// Loads a story the requester is about to change. Someone else's story
/// yields `None`, which callers answer with a redirect.
async fn fetch_owned_story(
    store: &dyn Store,
    id: Id<StoryMarker>,
    user: AuthenticatedUser,
) -> Result<Option<PartialStory>> {
    let story = store
        .fetch_partial_story(id)
        .await?
        .ok_or(ServerError::StoryByIdNotFound(id))?;

    if story.owned_by(user.user_id()) {
        Ok(Some(story))
    } else {
        debug!(story = %id, requester = %user.user_id(), "Requester does not own story");
        Ok(None)
    }
}

#[derive(TypedPath)]
#[typed_path("/stories/add")]
struct AddStoryPath;

async fn add_story_form(_: AddStoryPath, _: AuthenticatedUser) -> Markup {
    views::stories::add()
}

#[derive(TypedPath)]
#[typed_path("/stories")]
pub struct StoriesPath;

async fn list_public_stories(
    _: StoriesPath,
    user: AuthenticatedUser,
    State(store): State<Arc<dyn Store>>,
) -> Result<Markup> {
    let stories = store.fetch_public_stories().await?;

    Ok(views::stories::index("Stories", None, &stories, user.user_id()))
}

async fn create_story(
    _: StoriesPath,
    user: AuthenticatedUser,
    State(store): State<Arc<dyn Store>>,
    Form(fields): Form<StoryFields>,
) -> Result<Redirect> {
    let story = store.create_story(&fields, user.user_id()).await?;
    info!(story = %story.id, author = %story.author_id, "Created story");

    Ok(to_dashboard())
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/stories/{id}", rejection(ServerError))]
struct StoryPath {
    id: Id<StoryMarker>,
}

async fn show_story(
    path: Result<StoryPath>,
    user: AuthenticatedUser,
    State(store): State<Arc<dyn Store>>,
) -> Result<Markup> {
    let StoryPath { id } = path?;
    let story = store
        .fetch_story(id)
        .await?
        .filter(|story| story.readable_by(user.user_id()))
        .ok_or(ServerError::StoryByIdNotFound(id))?;

    Ok(views::stories::show(&story, user.user_id()))
}

/// Fields are only looked at once ownership is settled, so someone else's
/// story is never touched, whatever was submitted.
async fn update_story(
    path: Result<StoryPath>,
    user: AuthenticatedUser,
    State(store): State<Arc<dyn Store>>,
    form: Result<Form<StoryFields>>,
) -> Result<Redirect> {
    let StoryPath { id } = path?;
    if fetch_owned_story(&*store, id, user).await?.is_none() {
        return Ok(to_story_list());
    }

    let Form(fields) = form?;
    store
        .update_story(id, &fields)
        .await?
        .ok_or(ServerError::StoryByIdNotFound(id))?;
    info!(story = %id, "Updated story");

    Ok(to_dashboard())
}

async fn delete_story(
    path: Result<StoryPath>,
    user: AuthenticatedUser,
    State(store): State<Arc<dyn Store>>,
) -> Result<Redirect> {
    let StoryPath { id } = path?;
    if fetch_owned_story(&*store, id, user).await?.is_none() {
        return Ok(to_story_list());
    }

    if store.delete_story(id).await? {
        info!(story = %id, "Deleted story");
    }

    Ok(to_dashboard())
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/stories/edit/{id}", rejection(ServerError))]
struct EditStoryPath {
    id: Id<StoryMarker>,
}

async fn edit_story_form(
    path: Result<EditStoryPath>,
    user: AuthenticatedUser,
    State(store): State<Arc<dyn Store>>,
) -> Result<Either<Markup, Redirect>> {
    let EditStoryPath { id } = path?;
    let response = match fetch_owned_story(&*store, id, user).await? {
        Some(story) => Either::E1(views::stories::edit(&story)),
        None => Either::E2(to_story_list()),
    };

    Ok(response)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/stories/user/{user_id}", rejection(ServerError))]
struct UserStoriesPath {
    user_id: Id<UserMarker>,
}

/// Only ever the user's public stories, even for the user themself.
async fn list_user_stories(
    path: Result<UserStoriesPath>,
    user: AuthenticatedUser,
    State(store): State<Arc<dyn Store>>,
) -> Result<Markup> {
    let UserStoriesPath { user_id } = path?;
    let stories = store.fetch_user_public_stories(user_id).await?;
    let heading = stories.first().map_or_else(
        || "Stories".to_owned(),
        |story| format!("Stories by {}", story.author.display_name.get()),
    );

    Ok(views::stories::index(&heading, None, &stories, user.user_id()))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/stories/search/{query}", rejection(ServerError))]
struct SearchStoriesPath {
    query: String,
}

/// No matches is an empty list, not a missing page.
async fn search_stories(
    path: Result<SearchStoriesPath>,
    user: AuthenticatedUser,
    State(store): State<Arc<dyn Store>>,
) -> Result<Markup> {
    let SearchStoriesPath { query } = path?;
    search(&*store, &query, user).await
}

#[derive(TypedPath)]
#[typed_path("/stories/search")]
struct SearchFormPath;

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
}

/// Without a query this is just the search form.
async fn search_stories_form(
    _: SearchFormPath,
    user: AuthenticatedUser,
    State(store): State<Arc<dyn Store>>,
    Query(SearchParams { query }): Query<SearchParams>,
) -> Result<Markup> {
    if query.trim().is_empty() {
        return Ok(views::stories::search());
    }

    search(&*store, &query, user).await
}

async fn search(store: &dyn Store, query: &str, user: AuthenticatedUser) -> Result<Markup> {
    let stories = store.search_public_stories(query).await?;
    debug!(query, matches = stories.len(), "Searched stories");

    Ok(views::stories::index(
        &format!("Results for \"{query}\""),
        Some(query),
        &stories,
        user.user_id(),
    ))
}
