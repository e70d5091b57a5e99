//! [`Database`] implementations.

#![allow(
    clippy::items_after_statements,
    reason = "`const SQL` after statements"
)]

mod advance;
mod audit;
mod employee;
mod payroll;
mod vacation;

use async_trait::async_trait;
use common::{
    operations::{Commit, Transact},
    Period,
};
use refinery_core::{
    traits::r#async::{AsyncQuery, AsyncTransaction},
    AsyncMigrate, Migration,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::infra::{database, postgres, Database};

use super::{NonTx, Postgres, Tx};

impl Database<Transact> for Postgres<NonTx> {
    type Ok = Postgres<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Postgres(self.begin().await.map_err(tracerr::wrap!())?))
    }
}

impl Database<Transact> for Postgres<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Postgres<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().await.map_err(tracerr::wrap!())
    }
}

/// Decoding of a domain value from a [`Row`].
trait FromRow: Sized {
    /// Decodes the provided [`Row`].
    fn from_row(row: &Row) -> Result<Self, postgres::Error>;
}

/// Decodes every one of the provided [`Row`]s.
fn decode_all<T: FromRow>(
    rows: &[Row],
) -> Result<Vec<T>, Traced<database::Error>> {
    rows.iter()
        .map(T::from_row)
        .collect::<Result<_, _>>()
        .map_err(tracerr::from_and_wrap!())
}

/// Decodes the provided [`Row`], if any.
fn decode_opt<T: FromRow>(
    row: Option<&Row>,
) -> Result<Option<T>, Traced<database::Error>> {
    row.map(T::from_row)
        .transpose()
        .map_err(tracerr::from_and_wrap!())
}

/// Reads a non-negative count out of an `INT4` `column`.
fn count(row: &Row, column: &'static str) -> Result<u16, postgres::Error> {
    u16::try_from(row.try_get::<_, i32>(column)?)
        .map_err(|_| postgres::Error::Malformed(column))
}

/// Reads a [`Period`] out of the `month` and `year` columns.
fn period(row: &Row) -> Result<Period, postgres::Error> {
    let month = row.try_get::<_, i16>("month")?;
    let year = row.try_get::<_, i32>("year")?;
    u8::try_from(month)
        .ok()
        .and_then(|m| Period::new(m, year))
        .ok_or(postgres::Error::Malformed("month"))
}

/// Returns the `month` column value of the provided [`Period`].
fn month(period: Period) -> i16 {
    i16::from(period.month())
}

#[async_trait]
impl AsyncTransaction for Postgres {
    type Error = Traced<database::Error>;

    async fn execute(
        &mut self,
        queries: &[&str],
    ) -> Result<usize, Self::Error> {
        let mut conn = self.connection().await.map_err(tracerr::wrap!())?;
        AsyncTransaction::execute(&mut **conn, queries)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

#[async_trait]
impl AsyncQuery<Vec<Migration>> for Postgres {
    async fn query(
        &mut self,
        query: &str,
    ) -> Result<Vec<Migration>, <Self as AsyncTransaction>::Error> {
        let mut conn = self.connection().await.map_err(tracerr::wrap!())?;
        AsyncQuery::query(&mut **conn, query)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}

impl AsyncMigrate for Postgres {}
