//! Postgres [`Database`] implementation.

mod client;
pub mod connection;
mod impls;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::{error::SqlState, NoTls};
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use refinery::embed_migrations;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
};

pub use deadpool_postgres::Config;

/// Postgres [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Postgres<T = NonTx>(T);

impl Postgres {
    /// Creates a new [`Postgres`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to create a new [`Postgres`] client.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self(NonTx::from_pool(pool)))
    }
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// [`Connection`] error.
    #[display("`Connection` error: {_0}")]
    Connection(connection::Error),

    /// Error of creating a new [`connection::Pool`].
    #[display("Failed to create a new `connection::Pool`: {_0}")]
    PoolCreation(connection::PoolCreationError),

    /// [`connection::Pool`] error.
    #[display("`connection::Pool` error: {_0}")]
    Pool(connection::PoolError),

    /// [`Tx`] is already committed.
    #[display("Transaction is already committed")]
    #[from(ignore)]
    Finished,

    /// Column value doesn't fit the domain type.
    #[display("Malformed `{_0}` column")]
    #[from(ignore)]
    Malformed(#[error(not(source))] &'static str),
}

impl Error {
    /// Indicates whether this [`Error`] is caused by a concurrent
    /// modification: a serialization failure, a deadlock or a unique
    /// violation.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Connection(e) => e.code().is_some_and(|c| {
                [
                    &SqlState::T_R_SERIALIZATION_FAILURE,
                    &SqlState::T_R_DEADLOCK_DETECTED,
                    &SqlState::UNIQUE_VIOLATION,
                ]
                .contains(&c)
            }),
            Self::PoolCreation(..)
            | Self::Pool(..)
            | Self::Finished
            | Self::Malformed(..) => false,
        }
    }
}
