//! [`Query`] collection related to payroll [`Sheet`]s.

use common::{operations::By, Period};

#[cfg(doc)]
use crate::Query;
use crate::domain::{
    payroll::{self, payment},
    Payment, Sheet,
};

use super::DatabaseQuery;

/// Queries a [`Sheet`] by its [`payroll::Id`].
pub type ById = DatabaseQuery<By<Option<Sheet>, payroll::Id>>;

/// Queries a [`Sheet`] by its [`Period`] and [`payroll::Kind`].
pub type ByPeriod = DatabaseQuery<By<Option<Sheet>, (Period, payroll::Kind)>>;

/// Queries every [`Sheet`], in chronological order.
pub type List = DatabaseQuery<By<Vec<Sheet>, ()>>;

/// Queries a [`Payment`] by its [`payment::Id`].
pub type PaymentById = DatabaseQuery<By<Option<Payment>, payment::Id>>;

/// Queries [`Payment`]s of a [`Sheet`].
pub type Payments = DatabaseQuery<By<Vec<Payment>, payroll::Id>>;
