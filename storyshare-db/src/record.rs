use sqlx::FromRow;
use storyshare_common::model::{
    ModelValidationError,
    auth::Session,
    story::{PartialStory, Story, StoryBody, StoryFields, StoryTitle},
    user::{DisplayName, User},
};
use time::{Duration, PrimitiveDateTime, UtcDateTime};

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct UserRecord {
    pub user_snowflake: i64,
    pub display_name: String,
    pub created_at: PrimitiveDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct PartialStoryRecord {
    pub story_snowflake: i64,
    pub title: String,
    pub body: String,
    pub status: String,
    pub user_snowflake: i64,
    pub created_at: PrimitiveDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct FullStoryRecord {
    #[sqlx(flatten)]
    pub story: PartialStoryRecord,
    pub display_name: String,
    pub user_created_at: PrimitiveDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct SessionRecord {
    pub user_snowflake: i64,
    pub token_hash: Vec<u8>,
    pub created_at: PrimitiveDateTime,
    pub expires_after_seconds: Option<i64>,
}

/// Timestamps are stored as UTC without a zone.
pub(crate) fn to_primitive(time: UtcDateTime) -> PrimitiveDateTime {
    PrimitiveDateTime::new(time.date(), time.time())
}

fn from_primitive(time: PrimitiveDateTime) -> UtcDateTime {
    UtcDateTime::new(time.date(), time.time())
}

impl TryFrom<UserRecord> for User {
    type Error = ModelValidationError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.user_snowflake.cast_unsigned().into(),
            display_name: DisplayName::new(value.display_name)?,
            created_at: from_primitive(value.created_at),
        })
    }
}

impl TryFrom<PartialStoryRecord> for PartialStory {
    type Error = ModelValidationError;

    fn try_from(value: PartialStoryRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.story_snowflake.cast_unsigned().into(),
            author_id: value.user_snowflake.cast_unsigned().into(),
            fields: StoryFields {
                title: StoryTitle::new(value.title)?,
                body: StoryBody::new(value.body)?,
                status: value.status.parse()?,
            },
            created_at: from_primitive(value.created_at),
        })
    }
}

impl TryFrom<FullStoryRecord> for Story {
    type Error = ModelValidationError;

    fn try_from(value: FullStoryRecord) -> Result<Self, Self::Error> {
        let author = User {
            id: value.story.user_snowflake.cast_unsigned().into(),
            display_name: DisplayName::new(value.display_name)?,
            created_at: from_primitive(value.user_created_at),
        };

        Ok(PartialStory::try_from(value.story)?.with_author(author))
    }
}

impl TryFrom<SessionRecord> for Session {
    type Error = ModelValidationError;

    fn try_from(value: SessionRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            user: value.user_snowflake.cast_unsigned().into(),
            token_hash: value.token_hash.into_boxed_slice().try_into()?,
            created_at: from_primitive(value.created_at),
            expires_after: value
                .expires_after_seconds
                .map(|seconds| Duration::seconds(seconds).try_into())
                .transpose()?,
        })
    }
}
