use std::{
    fmt,
    time::{Duration, SystemTime},
};

/**
A point in time, measured from the Unix epoch.
*/
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Duration);

impl Timestamp {
    pub fn new(unix_time: Duration) -> Self {
        Timestamp(unix_time)
    }

    pub fn from_unix_nanos(nanos: u64) -> Self {
        Timestamp(Duration::from_nanos(nanos))
    }

    pub fn as_unix_time(&self) -> &Duration {
        &self.0
    }

    /**
    The number of nanoseconds since the Unix epoch, saturating at `u64::MAX`.
    */
    pub fn to_unix_nanos(&self) -> u64 {
        u64::try_from(self.0.as_nanos()).unwrap_or(u64::MAX)
    }

    pub fn checked_sub(self, duration: Duration) -> Option<Self> {
        self.0.checked_sub(duration).map(Timestamp)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.to_unix_nanos())
    }
}

/**
A source of the current time.

Exporters take the time from a clock so that timestamps synthesized during
an export can be fixed in tests.
*/
pub trait Clock {
    fn now(&self) -> Timestamp;
}

impl<'a, T: Clock + ?Sized> Clock for &'a T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<T: Clock + ?Sized> Clock for Box<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/**
A [`Clock`] that reads the system time.
*/
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(
            SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .unwrap_or_default(),
        )
    }
}

/**
A [`Clock`] that always returns the same time.
*/
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_nanos_roundtrip() {
        let ts = Timestamp::from_unix_nanos(1_700_000_000_123_456_789);

        assert_eq!(1_700_000_000_123_456_789, ts.to_unix_nanos());
    }

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.now().to_unix_nanos() > 0);
    }
}
