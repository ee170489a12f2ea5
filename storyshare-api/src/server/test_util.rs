use crate::server::{App, ServerState, app};
use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, Response, header},
};
use std::sync::Arc;
use storyshare_common::model::{
    Id,
    auth::{Session, SessionToken},
    story::{PartialStory, StoryBody, StoryFields, StoryStatus, StoryTitle},
    user::{CreateUser, DisplayName, User, UserMarker},
};
use storyshare_db::{memory::MemoryStore, store::Store};
use time::UtcDateTime;
use tower::ServiceExt;

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    app: App,
}

pub fn story_fields(title: &str, status: StoryStatus) -> StoryFields {
    StoryFields {
        title: StoryTitle::new(title.to_owned()).unwrap(),
        body: StoryBody::new(format!("<p>Once upon a time, {title}.</p>")).unwrap(),
        status,
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let app = app(ServerState {
            store: store.clone(),
        });

        Self { store, app }
    }

    pub fn service(&self) -> App {
        self.app.clone()
    }

    /// Creates a user with a fresh session, returning the bearer token.
    pub async fn sign_in(&self, name: &str) -> (User, String) {
        let user = self
            .store
            .create_user(&CreateUser {
                display_name: DisplayName::new(name.to_owned()).unwrap(),
            })
            .await
            .unwrap();
        let token = SessionToken::generate_random(user.id);
        self.store
            .create_session(&Session {
                user: user.id,
                token_hash: token.hash().unwrap(),
                created_at: UtcDateTime::now(),
                expires_after: None,
            })
            .await
            .unwrap();

        (user, token.as_token_str())
    }

    pub async fn story(
        &self,
        author: Id<UserMarker>,
        title: &str,
        status: StoryStatus,
    ) -> PartialStory {
        self.store
            .create_story(&story_fields(title, status), author)
            .await
            .unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        form: Option<&str>,
    ) -> Response<Body> {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match form {
            Some(form) => {
                request =
                    request.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form.to_owned())
            }
            None => Body::empty(),
        };

        self.service()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.send(Method::GET, uri, token, None).await
    }
}
