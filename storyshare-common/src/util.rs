use thiserror::Error;
use time::Duration;

/// A duration strictly greater than zero, used for session lifetimes.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Default, Hash)]
pub struct PositiveDuration(Duration);

impl PositiveDuration {
    #[must_use]
    pub fn new(duration: Duration) -> Option<Self> {
        duration.is_positive().then_some(Self(duration))
    }

    #[must_use]
    pub fn get(&self) -> Duration {
        self.0
    }

    #[must_use]
    pub fn whole_seconds(&self) -> i64 {
        self.0.whole_seconds()
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The duration is not positive: {0}")]
pub struct NonPositiveDurationError(Duration);

impl TryFrom<Duration> for PositiveDuration {
    type Error = NonPositiveDurationError;

    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(NonPositiveDurationError(value))
    }
}

#[cfg(test)]
mod tests {
    use crate::util::PositiveDuration;
    use time::Duration;

    #[test]
    fn rejects_zero_and_negative() {
        assert!(PositiveDuration::new(Duration::ZERO).is_none());
        assert!(PositiveDuration::try_from(Duration::seconds(-5)).is_err());
        assert_eq!(
            PositiveDuration::new(Duration::hours(1)).map(|duration| duration.whole_seconds()),
            Some(3600)
        );
    }
}
