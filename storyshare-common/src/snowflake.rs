//! Time-ordered 64-bit identifiers.
//!
//! Bit layout, most significant first: 42 bits of milliseconds since the
//! epoch, 5 bits worker id, 5 bits process id, 12 bits increment.
//! See <https://discord.com/developers/docs/reference#snowflakes>

use derive_where::derive_where;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::{
    fmt::{Display, Formatter},
    marker::PhantomData,
};
use thiserror::Error;
use time::{Duration, UtcDateTime};

pub const TIMESTAMP_OFFSET: u32 = 22;
pub const TIMESTAMP_LENGTH: u32 = 42;
pub const WORKER_ID_OFFSET: u32 = 17;
pub const WORKER_ID_LENGTH: u32 = 5;
pub const PROCESS_ID_OFFSET: u32 = 12;
pub const PROCESS_ID_LENGTH: u32 = 5;
pub const INCREMENT_LENGTH: u32 = 12;

const fn low_bits(length: u32) -> u64 {
    (1 << length) - 1
}

pub trait Epoch {
    const EPOCH_TIME: UtcDateTime;
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Error)]
pub enum SnowflakeTimestampError {
    #[error("Specified time was before the snowflake epoch.")]
    TimeBeforeEpoch,
    #[error("Resulting timestamp uses too many bits.")]
    TimestampTooLarge,
}

macro_rules! snowflake_part {
    ($name:ident, $length:ident) => {
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
        pub struct $name(u8);

        impl $name {
            #[must_use]
            pub fn new(id: u8) -> Option<Self> {
                (u64::from(id) <= low_bits($length)).then_some(Self(id))
            }

            #[must_use]
            pub fn get(self) -> u8 {
                self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let inner = u8::deserialize(deserializer)?;
                Self::new(inner).ok_or_else(|| {
                    Error::invalid_value(Unexpected::Unsigned(inner.into()), &stringify!($name))
                })
            }
        }
    };
}

snowflake_part!(WorkerId, WORKER_ID_LENGTH);
snowflake_part!(ProcessId, PROCESS_ID_LENGTH);

/// Milliseconds between the epoch and `time`, checked against the 42 bit field.
pub fn timestamp_millis<SnowflakeEpoch: Epoch>(
    time: UtcDateTime,
) -> Result<u64, SnowflakeTimestampError> {
    let millis = (time - SnowflakeEpoch::EPOCH_TIME).whole_milliseconds();
    if millis < 0 {
        return Err(SnowflakeTimestampError::TimeBeforeEpoch);
    }

    u64::try_from(millis)
        .ok()
        .filter(|millis| *millis <= low_bits(TIMESTAMP_LENGTH))
        .ok_or(SnowflakeTimestampError::TimestampTooLarge)
}

#[derive_where(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Debug,
    Default,
    Hash,
    Serialize,
    Deserialize
)]
#[serde(transparent)]
pub struct Snowflake<SnowflakeEpoch>(u64, #[serde(skip)] PhantomData<SnowflakeEpoch>);

impl<SnowflakeEpoch> Snowflake<SnowflakeEpoch> {
    #[must_use]
    pub fn new(inner: u64) -> Self {
        Self(inner, PhantomData)
    }

    /// `increment` is truncated to its 12 bits.
    #[must_use]
    pub fn from_parts(
        timestamp_millis: u64,
        worker_id: WorkerId,
        process_id: ProcessId,
        increment: u16,
    ) -> Self {
        let snowflake = (timestamp_millis & low_bits(TIMESTAMP_LENGTH)) << TIMESTAMP_OFFSET
            | u64::from(worker_id.get()) << WORKER_ID_OFFSET
            | u64::from(process_id.get()) << PROCESS_ID_OFFSET
            | u64::from(increment) & low_bits(INCREMENT_LENGTH);

        Self::new(snowflake)
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn timestamp_millis(self) -> u64 {
        self.0 >> TIMESTAMP_OFFSET
    }

    #[must_use]
    pub fn created_at(self) -> UtcDateTime
    where
        SnowflakeEpoch: Epoch,
    {
        // 42 bits always fit an i64.
        #[allow(clippy::cast_possible_wrap)]
        let millis = self.timestamp_millis() as i64;
        SnowflakeEpoch::EPOCH_TIME + Duration::milliseconds(millis)
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn worker_id(self) -> WorkerId {
        WorkerId(((self.0 >> WORKER_ID_OFFSET) & low_bits(WORKER_ID_LENGTH)) as u8)
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn process_id(self) -> ProcessId {
        ProcessId(((self.0 >> PROCESS_ID_OFFSET) & low_bits(PROCESS_ID_LENGTH)) as u8)
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn increment(self) -> u16 {
        (self.0 & low_bits(INCREMENT_LENGTH)) as u16
    }
}

impl<SnowflakeEpoch> Display for Snowflake<SnowflakeEpoch> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<SnowflakeEpoch> From<u64> for Snowflake<SnowflakeEpoch> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<SnowflakeEpoch> From<Snowflake<SnowflakeEpoch>> for u64 {
    fn from(value: Snowflake<SnowflakeEpoch>) -> Self {
        value.get()
    }
}

#[derive_where(Copy, Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct SnowflakeGenerator<SnowflakeEpoch> {
    worker_id: WorkerId,
    process_id: ProcessId,
    next_increment: u16,
    phantom_data: PhantomData<SnowflakeEpoch>,
}

impl<SnowflakeEpoch: Epoch> SnowflakeGenerator<SnowflakeEpoch> {
    #[must_use]
    pub fn new(worker_id: WorkerId, process_id: ProcessId) -> Self {
        Self {
            worker_id,
            process_id,
            next_increment: 0,
            phantom_data: PhantomData,
        }
    }

    pub fn generate_at(
        &mut self,
        time: UtcDateTime,
    ) -> Result<Snowflake<SnowflakeEpoch>, SnowflakeTimestampError> {
        let millis = timestamp_millis::<SnowflakeEpoch>(time)?;

        let increment = self.next_increment;
        self.next_increment = (increment + 1) & 0x0FFF;

        Ok(Snowflake::from_parts(
            millis,
            self.worker_id,
            self.process_id,
            increment,
        ))
    }

    pub fn generate(&mut self) -> Result<Snowflake<SnowflakeEpoch>, SnowflakeTimestampError> {
        self.generate_at(UtcDateTime::now())
    }
}
