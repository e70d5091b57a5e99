//! Error classification shared by every [`Command`] and [`Query`].
//!
//! [`Command`]: crate::Command
//! [`Query`]: crate::Query

use derive_more::Display;
use tracerr::Traced;

use crate::infra::database;

/// Stable tag of an error, independent from the operation that raised it.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Kind {
    /// Referenced entity does not exist.
    NotFound,

    /// Argument violates a declared precondition.
    InvalidInput,

    /// Date range ends before it starts.
    InvalidRange,

    /// Rest would overrun the remaining days of its vacation.
    InsufficientDays,

    /// Transition is forbidden from the current state.
    IllegalState,

    /// Entity with the same identity already exists.
    AlreadyExists,

    /// Concurrent modification was detected by the database.
    ///
    /// Retryable once by the caller.
    Conflict,

    /// Acting user lacks the required role.
    Forbidden,

    /// Infrastructure failure.
    Internal,
}

/// Classification of an error into its [`Kind`].
pub trait Classify {
    /// Returns the [`Kind`] of this error.
    fn kind(&self) -> Kind;
}

impl<E: Classify> Classify for Traced<E> {
    fn kind(&self) -> Kind {
        self.as_ref().kind()
    }
}

impl Classify for database::Error {
    fn kind(&self) -> Kind {
        if self.is_conflict() {
            Kind::Conflict
        } else {
            Kind::Internal
        }
    }
}
