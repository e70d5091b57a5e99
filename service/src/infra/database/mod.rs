//! [`Database`]-related implementations.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

pub use self::memory::Memory;
#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Memory`] error.
    Memory(memory::Error),

    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),
}

impl Error {
    /// Indicates whether this [`Error`] is caused by a concurrent
    /// modification, so the failed operation may be retried.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Memory(e) => e.is_conflict(),
            #[cfg(feature = "postgres")]
            Self::Postgres(e) => e.is_conflict(),
        }
    }
}
