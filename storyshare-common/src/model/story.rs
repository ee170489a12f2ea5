use crate::model::{
    Id,
    user::{User, UserMarker},
};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};
use thiserror::Error;
use time::UtcDateTime;

pub const STORY_TITLE_MAX_LEN: usize = 120;
pub const STORY_BODY_MAX_LEN: usize = 100_000;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct StoryMarker;

/// Controls whether anyone but the owner may read a story.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StoryStatus {
    #[default]
    Public,
    Private,
}

impl StoryStatus {
    pub const ALL: [StoryStatus; 2] = [StoryStatus::Public, StoryStatus::Private];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StoryStatus::Public => "public",
            StoryStatus::Private => "private",
        }
    }
}

impl Display for StoryStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Unknown story status: {0:?}")]
pub struct InvalidStoryStatusError(String);

impl FromStr for StoryStatus {
    type Err = InvalidStoryStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(StoryStatus::Public),
            "private" => Ok(StoryStatus::Private),
            other => Err(InvalidStoryStatusError(other.to_owned())),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct StoryTitle(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The story title is invalid: {0:?}")]
pub struct InvalidStoryTitleError(String);

impl StoryTitle {
    pub fn new(title: String) -> Result<Self, InvalidStoryTitleError> {
        let trimmed = title.trim();
        if trimmed.is_empty() || trimmed.chars().count() > STORY_TITLE_MAX_LEN {
            return Err(InvalidStoryTitleError(title));
        }

        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for StoryTitle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        StoryTitle::new(inner)
            .map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"StoryTitle"))
    }
}

/// Story text. Kept verbatim, so it may contain markup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct StoryBody(String);

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum InvalidStoryBodyError {
    #[error("The story body is empty")]
    Empty,
    #[error("The story body has {0} characters, more than the allowed 100000")]
    TooLong(usize),
}

impl StoryBody {
    pub fn new(body: String) -> Result<Self, InvalidStoryBodyError> {
        if body.trim().is_empty() {
            return Err(InvalidStoryBodyError::Empty);
        }

        let length = body.chars().count();
        if length > STORY_BODY_MAX_LEN {
            return Err(InvalidStoryBodyError::TooLong(length));
        }

        Ok(Self(body))
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for StoryBody {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        StoryBody::new(inner).map_err(|err| match err {
            InvalidStoryBodyError::Empty => Error::invalid_value(
                Unexpected::Other("a blank string"),
                &"a non-empty StoryBody",
            ),
            InvalidStoryBodyError::TooLong(length) => {
                Error::invalid_length(length, &"a StoryBody of at most 100000 characters")
            }
        })
    }
}

/// Everything a user may set on a story. Updates replace all of it.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct StoryFields {
    pub title: StoryTitle,
    pub body: StoryBody,
    #[serde(default)]
    pub status: StoryStatus,
}

/// A story joined with its owner.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Story {
    pub id: Id<StoryMarker>,
    pub author: User,
    pub fields: StoryFields,
    pub created_at: UtcDateTime,
}

/// A story as stored, with only the owner's id.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct PartialStory {
    pub id: Id<StoryMarker>,
    pub author_id: Id<UserMarker>,
    pub fields: StoryFields,
    pub created_at: UtcDateTime,
}

fn readable(status: StoryStatus, owner: Id<UserMarker>, requester: Id<UserMarker>) -> bool {
    status == StoryStatus::Public || owner == requester
}

impl Story {
    #[must_use]
    pub fn owned_by(&self, requester: Id<UserMarker>) -> bool {
        self.author.id == requester
    }

    /// Private stories are visible to their owner only.
    #[must_use]
    pub fn readable_by(&self, requester: Id<UserMarker>) -> bool {
        readable(self.fields.status, self.author.id, requester)
    }
}

impl PartialStory {
    #[must_use]
    pub fn owned_by(&self, requester: Id<UserMarker>) -> bool {
        self.author_id == requester
    }

    #[must_use]
    pub fn readable_by(&self, requester: Id<UserMarker>) -> bool {
        readable(self.fields.status, self.author_id, requester)
    }

    #[must_use]
    pub fn with_author(self, author: User) -> Story {
        Story {
            id: self.id,
            author,
            fields: self.fields,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{
        Id,
        story::{
            InvalidStoryBodyError, PartialStory, STORY_BODY_MAX_LEN, STORY_TITLE_MAX_LEN,
            StoryBody, StoryFields, StoryStatus, StoryTitle,
        },
    };
    use serde::{
        Deserialize,
        de::{IntoDeserializer, value},
    };
    use time::macros::utc_datetime;

    fn story(status: StoryStatus) -> PartialStory {
        PartialStory {
            id: Id::from(7_u64),
            author_id: Id::from(1_u64),
            fields: StoryFields {
                title: StoryTitle::new("Winter Tale".to_owned()).unwrap(),
                body: StoryBody::new("Snow.".to_owned()).unwrap(),
                status,
            },
            created_at: utc_datetime!(2025-06-01 12:00),
        }
    }

    #[test]
    fn public_story_is_readable_by_anyone() {
        let story = story(StoryStatus::Public);

        assert!(story.readable_by(Id::from(1_u64)));
        assert!(story.readable_by(Id::from(2_u64)));
    }

    #[test]
    fn private_story_is_readable_by_owner_only() {
        let story = story(StoryStatus::Private);

        assert!(story.readable_by(Id::from(1_u64)));
        assert!(!story.readable_by(Id::from(2_u64)));
    }

    #[test]
    fn ownership_ignores_status() {
        for status in StoryStatus::ALL {
            let story = story(status);
            assert!(story.owned_by(Id::from(1_u64)));
            assert!(!story.owned_by(Id::from(2_u64)));
        }
    }

    #[test]
    fn status_names() {
        for status in StoryStatus::ALL {
            assert_eq!(status.as_str().parse::<StoryStatus>(), Ok(status));
        }
        assert!("Public".parse::<StoryStatus>().is_err());
        assert_eq!(StoryStatus::default(), StoryStatus::Public);
    }

    #[test]
    fn title_validation() {
        assert_eq!(
            StoryTitle::new(" A title ".to_owned()).unwrap().get(),
            "A title"
        );
        assert!(StoryTitle::new(String::new()).is_err());
        assert!(StoryTitle::new("x".repeat(STORY_TITLE_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn body_keeps_markup() {
        let body = StoryBody::new("<p>Hello</p>\n".to_owned()).unwrap();

        assert_eq!(body.get(), "<p>Hello</p>\n");
        assert!(StoryBody::new(" \n ".to_owned()).is_err());
    }

    fn deserialize_body(body: &str) -> Result<StoryBody, value::Error> {
        StoryBody::deserialize(body.into_deserializer())
    }

    #[test]
    fn body_errors_name_the_problem() {
        let long = "a".repeat(STORY_BODY_MAX_LEN + 1);
        assert_eq!(
            StoryBody::new(long.clone()),
            Err(InvalidStoryBodyError::TooLong(STORY_BODY_MAX_LEN + 1))
        );
        assert_eq!(
            StoryBody::new("   ".to_owned()),
            Err(InvalidStoryBodyError::Empty)
        );

        assert_eq!(
            deserialize_body(&long).unwrap_err().to_string(),
            "invalid length 100001, expected a StoryBody of at most 100000 characters"
        );
        assert_eq!(
            deserialize_body(" ").unwrap_err().to_string(),
            "invalid value: a blank string, expected a non-empty StoryBody"
        );
        assert_eq!(deserialize_body("fine").unwrap().get(), "fine");
    }
}
