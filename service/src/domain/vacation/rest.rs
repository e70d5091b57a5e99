//! [`Rest`] definitions.

use common::{Date, Money};

use crate::domain::define_id;

use super::Vacation;

define_id! {
    #[doc = "ID of a [`Rest`]."]
    Id
}

/// Concrete window of days taken from a [`Vacation`].
///
/// Lifecycle: pending → approved → paid. Days are subtracted from the
/// [`Vacation`] on approval only, though pending [`Rest`]s reserve them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rest {
    /// ID of this [`Rest`].
    pub id: Id,

    /// ID of the [`Vacation`] this [`Rest`] consumes.
    pub vacation_id: super::Id,

    /// First day of this [`Rest`].
    pub start: Date,

    /// Last day of this [`Rest`] (inclusive).
    pub end: Date,

    /// Number of days in `[start, end]`.
    pub days: u16,

    /// Value of this [`Rest`].
    pub value: Money,

    /// Indicates whether this [`Rest`] is approved.
    pub is_approved: bool,

    /// Indicates whether this [`Rest`] is paid.
    pub is_paid: bool,
}

impl Rest {
    /// Creates a new pending [`Rest`] of the provided [`Vacation`].
    ///
    /// [`None`] is returned if `end` precedes `start`.
    #[must_use]
    pub fn pending(vacation: &Vacation, start: Date, end: Date) -> Option<Self> {
        let days = days_between(start, end)?;
        Some(Self {
            id: Id::default(),
            vacation_id: vacation.id,
            start,
            end,
            days,
            value: vacation.rest_value(days),
            is_approved: false,
            is_paid: false,
        })
    }

    /// Indicates whether this [`Rest`] awaits approval.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.is_approved
    }
}

/// Returns the number of days in the inclusive `[start, end]` range.
///
/// [`None`] is returned if `end` precedes `start`.
#[must_use]
pub fn days_between(start: Date, end: Date) -> Option<u16> {
    start
        .days_through(end)
        .map(|d| u16::try_from(d).unwrap_or(u16::MAX))
}
