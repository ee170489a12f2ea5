//! Session tokens issued by the external sign-in flow.
//!
//! Only the argon2 hash of a token is ever stored; the plain token lives in
//! the browser cookie or the `Authorization` header.

use crate::{
    model::{Id, user::UserMarker},
    util::PositiveDuration,
};
use argon2::{Argon2, Params};
use base64::{DecodeError, Engine, display::Base64Display, prelude::BASE64_STANDARD};
use std::{
    fmt::{Debug, Formatter},
    num::ParseIntError,
    str::FromStr,
};
use thiserror::Error;
use time::UtcDateTime;

pub const SESSION_TOKEN_CORE_LEN: usize = 24;
pub const SESSION_TOKEN_SALT_LEN: usize = 18;
pub const SESSION_TOKEN_HASH_LEN: usize = Params::DEFAULT_OUTPUT_LEN;

#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("Hashing session token failed: {0}")]
pub struct SessionTokenHashError(argon2::Error);

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum SessionTokenDecodeError {
    #[error("Not enough parts separated by ':'")]
    NotEnoughParts,
    #[error("Invalid user id: {0}")]
    InvalidUserId(ParseIntError),
    #[error("Decoding base64 failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("The length of the core part is incorrect")]
    InvalidCoreLength,
    #[error("The length of the salt part is incorrect")]
    InvalidSaltLength,
}

#[derive(Clone, Eq, PartialEq, Hash)]
pub struct SessionToken {
    pub user_id: Id<UserMarker>,
    pub core: [u8; SESSION_TOKEN_CORE_LEN],
    pub salt: [u8; SESSION_TOKEN_SALT_LEN],
}

#[derive(Clone, Eq, PartialEq, Hash)]
pub struct SessionTokenHash(pub Box<[u8; SESSION_TOKEN_HASH_LEN]>);

/// A stored session: whose it is, and until when it is valid.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Session {
    pub user: Id<UserMarker>,
    pub token_hash: SessionTokenHash,
    pub created_at: UtcDateTime,
    pub expires_after: Option<PositiveDuration>,
}

impl Session {
    #[must_use]
    pub fn is_expired_at(&self, now: UtcDateTime) -> bool {
        self.expires_after
            .is_some_and(|expires_after| self.created_at + expires_after.get() < now)
    }
}

impl SessionToken {
    #[must_use]
    pub fn generate_random(user_id: Id<UserMarker>) -> Self {
        Self {
            user_id,
            core: rand::random(),
            salt: rand::random(),
        }
    }

    #[must_use]
    pub fn as_token_str(&self) -> String {
        let user_id = self.user_id;
        let encoded_core = Base64Display::new(&self.core, &BASE64_STANDARD);
        let encoded_salt = Base64Display::new(&self.salt, &BASE64_STANDARD);

        format!("{user_id}:{encoded_core}:{encoded_salt}")
    }

    pub fn hash(&self) -> Result<SessionTokenHash, SessionTokenHashError> {
        let mut hash = Box::new([0; SESSION_TOKEN_HASH_LEN]);
        Argon2::default()
            .hash_password_into(&self.core, &self.salt, &mut *hash)
            .map_err(SessionTokenHashError)?;

        Ok(SessionTokenHash(hash))
    }
}

impl FromStr for SessionToken {
    type Err = SessionTokenDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');

        let user_id_part = parts.next().ok_or(Self::Err::NotEnoughParts)?;
        let core_part = parts.next().ok_or(Self::Err::NotEnoughParts)?;
        let salt_part = parts.next().ok_or(Self::Err::NotEnoughParts)?;

        let user_id = u64::from_str(user_id_part)
            .map_err(Self::Err::InvalidUserId)?
            .into();
        let core = BASE64_STANDARD
            .decode(core_part)?
            .try_into()
            .map_err(|_| Self::Err::InvalidCoreLength)?;
        let salt = BASE64_STANDARD
            .decode(salt_part)?
            .try_into()
            .map_err(|_| Self::Err::InvalidSaltLength)?;

        Ok(Self {
            user_id,
            core,
            salt,
        })
    }
}

impl Debug for SessionToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field("user_id", &self.user_id)
            .field("core", &"[redacted]")
            .field("salt", &"[redacted]")
            .finish()
    }
}

impl Debug for SessionTokenHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionTokenHash").field(&"[redacted]").finish()
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The session token hash had an invalid length")]
pub struct InvalidSessionTokenHashError;

impl TryFrom<Box<[u8]>> for SessionTokenHash {
    type Error = InvalidSessionTokenHashError;

    fn try_from(value: Box<[u8]>) -> Result<Self, Self::Error> {
        Ok(Self(
            value.try_into().map_err(|_| InvalidSessionTokenHashError)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::{
            Id,
            auth::{Session, SessionToken, SessionTokenDecodeError},
        },
        util::PositiveDuration,
    };
    use time::{Duration, macros::utc_datetime};

    #[test]
    fn token_string_parses_back() {
        let token = SessionToken::generate_random(Id::from(42_u64));
        let parsed: SessionToken = token.as_token_str().parse().unwrap();

        assert_eq!(parsed, token);
        assert_eq!(parsed.hash().unwrap(), token.hash().unwrap());
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert_eq!(
            "42:abc".parse::<SessionToken>(),
            Err(SessionTokenDecodeError::NotEnoughParts)
        );
        assert!(matches!(
            "alice:AAAA:AAAA".parse::<SessionToken>(),
            Err(SessionTokenDecodeError::InvalidUserId(_))
        ));
        assert_eq!(
            "42:AAAA:AAAA".parse::<SessionToken>(),
            Err(SessionTokenDecodeError::InvalidCoreLength)
        );
    }

    #[test]
    fn session_expiry() {
        let token = SessionToken::generate_random(Id::from(1_u64));
        let created_at = utc_datetime!(2025-03-01 08:00);
        let mut session = Session {
            user: token.user_id,
            token_hash: token.hash().unwrap(),
            created_at,
            expires_after: None,
        };
        assert!(!session.is_expired_at(created_at + Duration::days(3650)));

        session.expires_after = PositiveDuration::new(Duration::hours(1));
        assert!(!session.is_expired_at(created_at + Duration::minutes(59)));
        assert!(session.is_expired_at(created_at + Duration::minutes(61)));
    }
}
