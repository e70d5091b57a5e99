//! [`Period`] definitions.

use std::fmt;

use time::{util::days_in_year_month, Month};

use crate::Date;

/// Calendar month of a specific year.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Period {
    /// Year of this [`Period`].
    ///
    /// Declared first, so the derived ordering is chronological.
    year: i32,

    /// Month of this [`Period`] in `1..=12` range.
    month: u8,
}

impl Period {
    /// Creates a new [`Period`].
    ///
    /// [`None`] is returned if the `month` is outside of `1..=12` range, or
    /// the `year` is outside of `1..=9999` range.
    #[must_use]
    pub fn new(month: u8, year: i32) -> Option<Self> {
        ((1..=12).contains(&month) && (1..=9999).contains(&year))
            .then_some(Self { year, month })
    }

    /// Returns the [`Period`] the provided [`Date`] belongs to.
    #[must_use]
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the month of this [`Period`] in `1..=12` range.
    #[must_use]
    pub fn month(self) -> u8 {
        self.month
    }

    /// Returns the year of this [`Period`].
    #[must_use]
    pub fn year(self) -> i32 {
        self.year
    }

    /// Returns the first [`Date`] of this [`Period`].
    #[expect(clippy::missing_panics_doc, reason = "invariants checked")]
    #[must_use]
    pub fn first_day(self) -> Date {
        Date::new(self.year, self.month, 1).expect("valid `Period`")
    }

    /// Returns the last [`Date`] of this [`Period`].
    #[expect(clippy::missing_panics_doc, reason = "invariants checked")]
    #[must_use]
    pub fn last_day(self) -> Date {
        let month = Month::try_from(self.month).expect("valid `Period`");
        let days = days_in_year_month(self.year, month);
        Date::new(self.year, self.month, days).expect("valid `Period`")
    }

    /// Indicates whether the provided [`Date`] falls into this [`Period`].
    #[must_use]
    pub fn contains(self, date: Date) -> bool {
        Self::of(date) == self
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

#[cfg(test)]
mod spec {
    use super::{Date, Period};

    #[test]
    fn validates_components() {
        assert!(Period::new(1, 2025).is_some());
        assert!(Period::new(12, 2025).is_some());
        assert!(Period::new(0, 2025).is_none());
        assert!(Period::new(13, 2025).is_none());
        assert!(Period::new(1, 0).is_none());
    }

    #[test]
    fn bounds() {
        let feb = Period::new(2, 2024).unwrap();
        assert_eq!(feb.first_day(), Date::new(2024, 2, 1).unwrap());
        assert_eq!(feb.last_day(), Date::new(2024, 2, 29).unwrap());

        let feb = Period::new(2, 2025).unwrap();
        assert_eq!(feb.last_day(), Date::new(2025, 2, 28).unwrap());
        assert!(feb.contains(Date::new(2025, 2, 28).unwrap()));
        assert!(!feb.contains(Date::new(2025, 3, 1).unwrap()));
        assert!(!feb.contains(Date::new(2024, 2, 10).unwrap()));
    }

    #[test]
    fn orders_chronologically() {
        assert!(Period::new(12, 2024).unwrap() < Period::new(1, 2025).unwrap());
        assert_eq!(Period::new(3, 2025).unwrap().to_string(), "03/2025");
    }
}
