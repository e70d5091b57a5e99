//! [`Query`] collection related to [`Vacation`]s and their [`Rest`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::domain::{
    employee,
    vacation::{self, rest},
    Rest, Vacation,
};

use super::DatabaseQuery;

/// Queries a [`Vacation`] by its [`vacation::Id`].
pub type ById = DatabaseQuery<By<Option<Vacation>, vacation::Id>>;

/// Queries [`Vacation`]s of an [`Employee`].
///
/// [`Employee`]: crate::domain::Employee
pub type OfEmployee = DatabaseQuery<By<Vec<Vacation>, employee::Id>>;

/// Queries a [`Rest`] by its [`rest::Id`].
pub type RestById = DatabaseQuery<By<Option<Rest>, rest::Id>>;

/// Queries [`Rest`]s of a [`Vacation`].
pub type Rests = DatabaseQuery<By<Vec<Rest>, vacation::Id>>;
