//! [`Vacation`] definitions.

pub mod rest;

use common::{Date, Money};
use rust_decimal::Decimal;

use super::{define_id, employee};
#[cfg(doc)]
use super::Employee;

pub use self::rest::Rest;

define_id! {
    #[doc = "ID of a [`Vacation`]."]
    Id
}

/// Number of days the monthly reference salary is spread over.
const DAYS_IN_MONTH: u16 = 30;

/// Annual entitlement of an [`Employee`] to paid rest days, with a one-third
/// monetary bonus.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Vacation {
    /// ID of this [`Vacation`].
    pub id: Id,

    /// ID of the entitled [`Employee`].
    pub employee_id: employee::Id,

    /// [`Date`] the entitlement starts at.
    pub start: Date,

    /// [`Date`] the entitlement is due at, one year after the start.
    pub due_date: Date,

    /// Number of entitled days.
    pub total_days: u16,

    /// Number of days not yet consumed by approved [`Rest`]s.
    pub remaining_days: u16,

    /// Value of all the entitled days.
    pub base_value: Money,

    /// One-third bonus paid on top of the [`Vacation::base_value`].
    pub one_third_value: Money,

    /// Indicates whether this [`Vacation`] is expired.
    pub is_expired: bool,

    /// Indicates whether the one-third bonus is paid.
    pub is_one_third_paid: bool,

    /// Indicates whether this [`Vacation`] is fully settled.
    pub is_paid: bool,
}

impl Vacation {
    /// Creates a new [`Vacation`] entitlement valued after the provided
    /// monthly reference salary.
    ///
    /// [`None`] is returned if `total_days` is zero, the salary is not
    /// positive, or the due date is not representable.
    #[must_use]
    pub fn entitle(
        employee_id: employee::Id,
        start: Date,
        total_days: u16,
        reference_salary: Money,
    ) -> Option<Self> {
        if total_days == 0 || !reference_salary.is_positive() {
            return None;
        }
        Some(Self {
            id: Id::default(),
            employee_id,
            start,
            due_date: start.next_year()?,
            total_days,
            remaining_days: total_days,
            base_value: reference_salary.prorate(total_days, DAYS_IN_MONTH)?,
            one_third_value: reference_salary.prorate(1, 3)?,
            is_expired: false,
            is_one_third_paid: false,
            is_paid: false,
        })
    }

    /// Returns the value of a [`Rest`] lasting the provided number of days.
    #[must_use]
    pub fn rest_value(&self, days: u16) -> Money {
        if self.total_days == 0 {
            return Money::ZERO;
        }
        let daily = self.base_value.amount() / Decimal::from(self.total_days);
        Money::new(daily * Decimal::from(days))
    }

    /// Indicates whether a new [`Rest`] of the provided number of days fits
    /// into this [`Vacation`], given the days already reserved by its
    /// pending [`Rest`]s.
    #[must_use]
    pub fn can_reserve(&self, days: u16, pending: &[&Rest]) -> bool {
        let reserved: u32 = pending.iter().map(|r| u32::from(r.days)).sum();
        u32::from(days) + reserved <= u32::from(self.remaining_days)
    }

    /// Approves the provided pending [`Rest`], consuming its days.
    ///
    /// Returns `false` if the [`Rest`] is already approved, leaving both
    /// untouched.
    ///
    /// # Errors
    ///
    /// If the [`Rest`] lasts longer than the remaining days.
    pub fn approve(&mut self, rest: &mut Rest) -> Result<bool, u16> {
        if rest.is_approved {
            return Ok(false);
        }
        self.remaining_days = self
            .remaining_days
            .checked_sub(rest.days)
            .ok_or(self.remaining_days)?;
        rest.is_approved = true;
        Ok(true)
    }

    /// Marks this [`Vacation`] as paid if it's fully settled: every day is
    /// consumed, the one-third bonus is paid and all its [`Rest`]s are paid.
    ///
    /// Returns whether this [`Vacation`] became paid.
    pub fn settle(&mut self, rests: &[Rest]) -> bool {
        if self.is_paid {
            return false;
        }
        let is_settled = self.remaining_days == 0
            && self.is_one_third_paid
            && rests.iter().all(|r| r.is_paid);
        if is_settled {
            self.is_paid = true;
        }
        is_settled
    }

    /// Checks the day-conservation invariant against the provided [`Rest`]s
    /// of this [`Vacation`].
    #[must_use]
    pub fn is_conserved(&self, rests: &[Rest]) -> bool {
        let approved: u32 = rests
            .iter()
            .filter(|r| r.is_approved)
            .map(|r| u32::from(r.days))
            .sum();
        self.remaining_days <= self.total_days
            && u32::from(self.remaining_days) + approved
                == u32::from(self.total_days)
    }
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};

    use super::{Rest, Vacation};

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn vacation(total_days: u16, salary: &str) -> Vacation {
        Vacation::entitle(1.into(), date("2025-01-01"), total_days, money(salary))
            .unwrap()
    }

    fn rest(start: &str, end: &str, vacation: &Vacation) -> Rest {
        Rest::pending(vacation, date(start), date(end)).unwrap()
    }

    #[test]
    fn values_entitlement() {
        let v = vacation(30, "3000.00");
        assert_eq!(v.base_value, money("3000.00"));
        assert_eq!(v.one_third_value, money("1000.00"));
        assert_eq!(v.due_date, date("2026-01-01"));
        assert_eq!(v.remaining_days, 30);

        let v = vacation(20, "2500.00");
        assert_eq!(v.base_value, money("1666.67"));
        assert_eq!(v.one_third_value, money("833.33"));
    }

    #[test]
    fn rejects_invalid_entitlement() {
        assert!(Vacation::entitle(
            1.into(),
            date("2025-01-01"),
            0,
            money("3000.00"),
        )
        .is_none());
        assert!(Vacation::entitle(
            1.into(),
            date("2025-01-01"),
            30,
            Money::ZERO,
        )
        .is_none());
    }

    #[test]
    fn values_rests_by_daily_rate() {
        let v = vacation(30, "3000.00");
        assert_eq!(v.rest_value(1), money("100.00"));
        assert_eq!(v.rest_value(10), money("1000.00"));

        let v = vacation(20, "2500.00");
        assert_eq!(v.rest_value(20), money("1666.67"));
        assert_eq!(v.rest_value(3), money("250.00"));
    }

    #[test]
    fn pending_rests_reserve_days() {
        let mut v = vacation(30, "3000.00");
        v.remaining_days = 5;
        let first = rest("2025-03-01", "2025-03-05", &v);

        assert!(!v.can_reserve(10, &[]));
        assert!(v.can_reserve(5, &[]));
        assert!(!v.can_reserve(1, &[&first]));
    }

    #[test]
    fn approval_consumes_days_once() {
        let mut v = vacation(30, "3000.00");
        let mut r = rest("2025-03-01", "2025-03-10", &v);

        assert_eq!(v.approve(&mut r), Ok(true));
        assert_eq!(v.remaining_days, 20);
        assert_eq!(v.approve(&mut r), Ok(false));
        assert_eq!(v.remaining_days, 20);
        assert!(v.is_conserved(&[r]));
    }

    #[test]
    fn approval_cannot_overrun() {
        let mut v = vacation(30, "3000.00");
        v.remaining_days = 3;
        v.total_days = 3;
        let mut r = rest("2025-03-01", "2025-03-05", &v);

        assert_eq!(v.approve(&mut r), Err(3));
        assert!(!r.is_approved);
        assert_eq!(v.remaining_days, 3);
    }

    #[test]
    fn settles_only_when_everything_is_paid() {
        let mut v = vacation(2, "3000.00");
        let mut a = rest("2025-03-01", "2025-03-01", &v);
        let mut b = rest("2025-03-02", "2025-03-02", &v);
        assert_eq!(v.approve(&mut a), Ok(true));
        assert_eq!(v.approve(&mut b), Ok(true));

        v.is_one_third_paid = true;
        a.is_paid = true;
        assert!(!v.settle(&[a.clone(), b.clone()]));
        assert!(!v.is_paid);

        b.is_paid = true;
        assert!(v.settle(&[a.clone(), b.clone()]));
        assert!(v.is_paid);
        assert!(!v.settle(&[a, b]));
    }
}
