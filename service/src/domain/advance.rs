//! [`Advance`] definitions.

use common::{Date, Money, Period};

use super::{define_id, employee};
#[cfg(doc)]
use super::Employee;

define_id! {
    #[doc = "ID of an [`Advance`]."]
    Id
}

/// Out-of-cycle cash disbursement to an [`Employee`], later deducted from
/// the salary.
///
/// Lifecycle: created → approved → paid. May be deactivated (soft-deleted)
/// before being paid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Advance {
    /// ID of this [`Advance`].
    pub id: Id,

    /// ID of the [`Employee`] receiving this [`Advance`].
    pub employee_id: employee::Id,

    /// [`Date`] of this [`Advance`].
    pub date: Date,

    /// Disbursed amount.
    pub amount: Money,

    /// Indicates whether this [`Advance`] is approved.
    pub is_approved: bool,

    /// Indicates whether this [`Advance`] is paid.
    pub is_paid: bool,

    /// Indicates whether this [`Advance`] is active (not soft-deleted).
    pub is_active: bool,
}

impl Advance {
    /// Indicates whether this [`Advance`] awaits disbursement on an advance
    /// sheet.
    #[must_use]
    pub fn is_approved_unpaid(&self) -> bool {
        self.is_active && self.is_approved && !self.is_paid
    }

    /// Indicates whether this [`Advance`] was disbursed within the provided
    /// [`Period`], and so is deducted from that month's salary.
    #[must_use]
    pub fn is_disbursed_in(&self, period: Period) -> bool {
        self.is_active
            && self.is_approved
            && self.is_paid
            && period.contains(self.date)
    }
}
