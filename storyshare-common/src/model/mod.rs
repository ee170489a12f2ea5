pub mod auth;
pub mod story;
pub mod user;

use crate::{
    model::{
        auth::InvalidSessionTokenHashError,
        story::{InvalidStoryBodyError, InvalidStoryStatusError, InvalidStoryTitleError},
        user::InvalidDisplayNameError,
    },
    snowflake::{Epoch, Snowflake, SnowflakeGenerator},
    util::NonPositiveDurationError,
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, marker::PhantomData};
use thiserror::Error;
use time::{UtcDateTime, macros::utc_datetime};

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error(transparent)]
    DisplayName(#[from] InvalidDisplayNameError),
    #[error(transparent)]
    StoryTitle(#[from] InvalidStoryTitleError),
    #[error(transparent)]
    StoryBody(#[from] InvalidStoryBodyError),
    #[error(transparent)]
    StoryStatus(#[from] InvalidStoryStatusError),
    #[error(transparent)]
    NonPositiveDuration(#[from] NonPositiveDurationError),
    #[error(transparent)]
    TokenHash(#[from] InvalidSessionTokenHashError),
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct StoryshareEpoch;
impl Epoch for StoryshareEpoch {
    const EPOCH_TIME: UtcDateTime = utc_datetime!(2025-01-01 00:00);
}

pub type StoryshareSnowflake = Snowflake<StoryshareEpoch>;
pub type StoryshareSnowflakeGenerator = SnowflakeGenerator<StoryshareEpoch>;

/// An entity id, tagged with the kind of entity it points to.
///
/// Ids of different kinds never compare equal at the type level, so an
/// ownership check can only ever compare a user id against a user id.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Id<Marker>(StoryshareSnowflake, #[serde(skip)] PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(snowflake: StoryshareSnowflake) -> Self {
        Self(snowflake, PhantomData)
    }

    #[must_use]
    pub fn snowflake(self) -> StoryshareSnowflake {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<StoryshareSnowflake> for Id<Marker> {
    fn from(value: StoryshareSnowflake) -> Self {
        Self::new(value)
    }
}

impl<Marker> From<u64> for Id<Marker> {
    fn from(value: u64) -> Self {
        Id::new(StoryshareSnowflake::new(value))
    }
}

impl<Marker> From<Id<Marker>> for u64 {
    fn from(value: Id<Marker>) -> Self {
        value.snowflake().get()
    }
}
