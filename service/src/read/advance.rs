//! [`Advance`] read models definitions.

#[cfg(doc)]
use crate::domain::{payroll, Advance};

/// Wrapper around [`Advance`] indicating that it
/// [`is_approved_unpaid()`], so awaits a [`payroll::Kind::Advance`] sheet.
///
/// [`is_approved_unpaid()`]: Advance::is_approved_unpaid
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ApprovedUnpaid<T>(pub T);

/// Wrapper around [`Advance`] indicating that it [`is_disbursed_in()`] the
/// selected month, so is deducted from that month's salary.
///
/// [`is_disbursed_in()`]: Advance::is_disbursed_in
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Disbursed<T>(pub T);
