use async_trait::async_trait;
use storyshare_common::{
    model::{
        Id, ModelValidationError,
        auth::{Session, SessionTokenHash},
        story::{PartialStory, Story, StoryFields, StoryMarker},
        user::{CreateUser, User, UserMarker},
    },
    snowflake::SnowflakeTimestampError,
};
use thiserror::Error;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error("Could not generate an id: {0}")]
    Snowflake(#[from] SnowflakeTimestampError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("Running migrations failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("User with id {0} does not exist")]
    MissingUser(Id<UserMarker>),
}

/// Every listing is ordered newest first; equal timestamps fall back to the
/// newer id first.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn fetch_user(&self, user_id: Id<UserMarker>) -> Result<Option<User>>;

    async fn create_user(&self, user: &CreateUser) -> Result<User>;

    async fn fetch_session(&self, token_hash: &SessionTokenHash) -> Result<Option<Session>>;

    async fn create_session(&self, session: &Session) -> Result<()>;

    async fn create_story(
        &self,
        fields: &StoryFields,
        author_id: Id<UserMarker>,
    ) -> Result<PartialStory>;

    /// The story joined with its owner.
    async fn fetch_story(&self, story_id: Id<StoryMarker>) -> Result<Option<Story>>;

    async fn fetch_partial_story(&self, story_id: Id<StoryMarker>)
    -> Result<Option<PartialStory>>;

    /// Replaces all user-editable fields. `None` if the story no longer exists.
    async fn update_story(
        &self,
        story_id: Id<StoryMarker>,
        fields: &StoryFields,
    ) -> Result<Option<PartialStory>>;

    /// Whether a story was removed.
    async fn delete_story(&self, story_id: Id<StoryMarker>) -> Result<bool>;

    async fn fetch_public_stories(&self) -> Result<Vec<Story>>;

    async fn fetch_user_public_stories(&self, user_id: Id<UserMarker>) -> Result<Vec<Story>>;

    /// Public and private stories alike, for the owner's own dashboard.
    async fn fetch_user_stories(&self, user_id: Id<UserMarker>) -> Result<Vec<PartialStory>>;

    /// Public stories whose title contains `query`, ignoring case.
    async fn search_public_stories(&self, query: &str) -> Result<Vec<Story>>;
}
