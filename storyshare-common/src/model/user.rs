use crate::model::Id;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use thiserror::Error;
use time::UtcDateTime;

pub const DISPLAY_NAME_MAX_LEN: usize = 100;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct UserMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct User {
    pub id: Id<UserMarker>,
    pub display_name: DisplayName,
    pub created_at: UtcDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct CreateUser {
    pub display_name: DisplayName,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct DisplayName(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The display name is invalid: {0:?}")]
pub struct InvalidDisplayNameError(String);

impl DisplayName {
    /// Surrounding whitespace is dropped before validation.
    pub fn new(name: String) -> Result<Self, InvalidDisplayNameError> {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.chars().count() > DISPLAY_NAME_MAX_LEN {
            return Err(InvalidDisplayNameError(name));
        }

        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for DisplayName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        DisplayName::new(inner)
            .map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"DisplayName"))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::user::{DISPLAY_NAME_MAX_LEN, DisplayName};

    #[test]
    fn display_name_is_trimmed() {
        assert_eq!(
            DisplayName::new("  Ada Lovelace ".to_owned()).unwrap().get(),
            "Ada Lovelace"
        );
    }

    #[test]
    fn display_name_bounds() {
        assert!(DisplayName::new("   ".to_owned()).is_err());
        assert!(DisplayName::new("é".repeat(DISPLAY_NAME_MAX_LEN)).is_ok());
        assert!(DisplayName::new("é".repeat(DISPLAY_NAME_MAX_LEN + 1)).is_err());
    }
}
