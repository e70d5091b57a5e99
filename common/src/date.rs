//! Calendar [`Date`] definitions.

use std::{fmt, str::FromStr};

#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use time::Month;

use crate::Period;

/// Calendar date without a time-of-day, in the installation time zone.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] from the provided calendar components.
    ///
    /// [`None`] is returned if the components do not form a valid date, or
    /// the year is outside of `1..=9999`.
    #[must_use]
    pub fn new(year: i32, month: u8, day: u8) -> Option<Self> {
        if !(1..=9999).contains(&year) {
            return None;
        }
        let month = Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Returns the year of this [`Date`].
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Returns the month of this [`Date`] in `1..=12` range.
    #[must_use]
    pub fn month(self) -> u8 {
        self.0.month().into()
    }

    /// Returns the day of month of this [`Date`].
    #[must_use]
    pub fn day(self) -> u8 {
        self.0.day()
    }

    /// Returns the [`Period`] this [`Date`] belongs to.
    #[must_use]
    pub fn period(self) -> Period {
        Period::of(self)
    }

    /// Returns the number of days in the inclusive range `[self, end]`.
    ///
    /// [`None`] is returned if `end` precedes this [`Date`].
    #[must_use]
    pub fn days_through(self, end: Self) -> Option<u32> {
        let days = (end.0 - self.0).whole_days();
        u32::try_from(days + 1).ok().filter(|d| *d > 0)
    }

    /// Returns the same calendar day in the following year.
    ///
    /// 29 February maps onto 28 February of the non-leap following year.
    #[must_use]
    pub fn next_year(self) -> Option<Self> {
        let year = self.year() + 1;
        Self::new(year, self.month(), self.day())
            .or_else(|| Self::new(year, self.month(), self.day() - 1))
    }
}

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.year(),
            self.month(),
            self.day(),
        )
    }
}

impl FromStr for Date {
    type Err = &'static str;

    /// Parses an ISO 8601 calendar date (`YYYY-MM-DD`).
    ///
    /// Two-digit years and zeroed sentinels (`0000-00-00`) are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-');
        let (Some(year), Some(month), Some(day), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err("expected `YYYY-MM-DD` format");
        };
        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return Err("expected `YYYY-MM-DD` format");
        }
        if ![year, month, day]
            .iter()
            .all(|p| p.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err("date components must be digits");
        }

        let year = year.parse().map_err(|_| "invalid year")?;
        let month = month.parse().map_err(|_| "invalid month")?;
        let day = day.parse().map_err(|_| "invalid day")?;
        Self::new(year, month, day).ok_or("invalid calendar date")
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use std::str::FromStr as _;

    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use super::Date;

    impl Serialize for Date {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Date {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let raw = String::deserialize(d)?;
            Self::from_str(&raw).map_err(|e| {
                de::Error::custom(format!("cannot parse `Date`: {e}"))
            })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::Date;

    fn date(s: &str) -> Date {
        Date::from_str(s).unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(date("2025-01-10"), Date::new(2025, 1, 10).unwrap());
        assert_eq!(date("2024-02-29"), Date::new(2024, 2, 29).unwrap());

        assert!(Date::from_str("0000-00-00").is_err());
        assert!(Date::from_str("0000-01-01").is_err());
        assert!(Date::from_str("25-01-10").is_err());
        assert!(Date::from_str("2025-1-10").is_err());
        assert!(Date::from_str("2025-02-30").is_err());
        assert!(Date::from_str("2025-13-01").is_err());
        assert!(Date::from_str("2025-01-10T00:00").is_err());
        assert!(Date::from_str("+025-01-10").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(date("2025-03-01").to_string(), "2025-03-01");
        assert_eq!(Date::new(987, 12, 31).unwrap().to_string(), "0987-12-31");
    }

    #[test]
    fn counts_days_inclusively() {
        assert_eq!(date("2025-03-01").days_through(date("2025-03-10")), Some(10));
        assert_eq!(date("2025-03-06").days_through(date("2025-03-06")), Some(1));
        assert_eq!(date("2025-02-28").days_through(date("2025-03-01")), Some(2));
        assert_eq!(date("2025-03-10").days_through(date("2025-03-01")), None);
    }

    #[test]
    fn next_year() {
        assert_eq!(date("2025-01-15").next_year(), Some(date("2026-01-15")));
        assert_eq!(date("2024-02-29").next_year(), Some(date("2025-02-28")));
    }
}
