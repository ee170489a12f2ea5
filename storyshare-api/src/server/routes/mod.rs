use crate::server::ServerRouter;
use axum::Router;

mod index;
mod stories;

pub use index::{DashboardPath, IndexPath};

pub fn routes() -> ServerRouter {
    Router::new().merge(index::routes()).merge(stories::routes())
}
