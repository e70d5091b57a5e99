//! [`Query`] collection related to [`Advance`]s.

use common::{operations::By, Period};

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{advance, employee, Advance},
    read::advance::{ApprovedUnpaid, Disbursed},
};

use super::DatabaseQuery;

/// Queries an [`Advance`] by its [`advance::Id`].
pub type ById = DatabaseQuery<By<Option<Advance>, advance::Id>>;

/// Queries [`Advance`]s of an [`Employee`].
///
/// [`Employee`]: crate::domain::Employee
pub type OfEmployee = DatabaseQuery<By<Vec<Advance>, employee::Id>>;

/// Queries [`Advance`]s awaiting an advance sheet.
pub type ApprovedUnpaidList = DatabaseQuery<By<Vec<ApprovedUnpaid<Advance>>, ()>>;

/// Queries [`Advance`]s of an [`Employee`] deducted from the salary of a
/// [`Period`].
///
/// [`Employee`]: crate::domain::Employee
pub type DisbursedIn =
    DatabaseQuery<By<Vec<Disbursed<Advance>>, (employee::Id, Period)>>;
