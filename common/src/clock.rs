//! [`Clock`] abstraction over the wall-clock time.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use crate::DateTime;

/// Source of the current [`DateTime`].
pub trait Clock: fmt::Debug + Send + Sync {
    /// Returns the current [`DateTime`].
    fn now(&self) -> DateTime;
}

/// [`Clock`] reading the system wall-clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime {
        DateTime::now()
    }
}

/// [`Clock`] returning a manually controlled [`DateTime`].
///
/// Clones share the same underlying time.
#[derive(Clone, Debug)]
pub struct ManualClock(Arc<Mutex<DateTime>>);

impl ManualClock {
    /// Creates a new [`ManualClock`] stopped at the provided [`DateTime`].
    #[must_use]
    pub fn new(at: DateTime) -> Self {
        Self(Arc::new(Mutex::new(at)))
    }

    /// Moves this [`ManualClock`] to the provided [`DateTime`].
    pub fn set(&self, at: DateTime) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }

    /// Moves this [`ManualClock`] forward by the provided [`Duration`].
    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use super::{Clock as _, ManualClock};
    use crate::DateTime;

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let start = DateTime::from_rfc3339("2025-01-31T23:00:00Z").unwrap();
        let clock = ManualClock::new(start);
        let other = clock.clone();

        clock.advance(Duration::from_secs(3600));
        assert_eq!(
            other.now(),
            DateTime::from_rfc3339("2025-02-01T00:00:00Z").unwrap(),
        );

        other.set(start);
        assert_eq!(clock.now(), start);
    }
}
