//! [`Query`] collection related to [`Employee`]s and their payroll inputs.

use common::{operations::By, Period};

#[cfg(doc)]
use crate::Query;
use crate::{
    domain::{employee, Absence, EffectiveSalary, Employee},
    read::{employee::Active, salary::Current},
};

use super::DatabaseQuery;

/// Queries an [`Employee`] by its [`employee::Id`].
pub type ById = DatabaseQuery<By<Option<Employee>, employee::Id>>;

/// Queries every active [`Employee`].
pub type ListActive = DatabaseQuery<By<Vec<Active<Employee>>, ()>>;

/// Queries the current [`EffectiveSalary`] of an [`Employee`].
pub type CurrentSalary =
    DatabaseQuery<By<Option<Current<EffectiveSalary>>, employee::Id>>;

/// Queries the whole [`EffectiveSalary`] history of an [`Employee`], ordered
/// by start.
pub type SalaryHistory = DatabaseQuery<By<Vec<EffectiveSalary>, employee::Id>>;

/// Queries the [`Absence`]s of an [`Employee`] in a [`Period`].
pub type AbsenceIn = DatabaseQuery<By<Option<Absence>, (employee::Id, Period)>>;
