//! [`Vacation`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        employee,
        vacation::{self, rest},
        Rest, Vacation,
    },
    infra::{
        database::{
            self,
            postgres::{self, Connection},
            Postgres,
        },
        Database,
    },
};

use super::{count, decode_all, decode_opt, FromRow};

impl FromRow for Vacation {
    fn from_row(row: &Row) -> Result<Self, postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            employee_id: row.try_get("employee_id")?,
            start: row.try_get("start_date")?,
            due_date: row.try_get("due_date")?,
            total_days: count(row, "total_days")?,
            remaining_days: count(row, "remaining_days")?,
            base_value: row.try_get("base_value")?,
            one_third_value: row.try_get("one_third_value")?,
            is_expired: row.try_get("is_expired")?,
            is_one_third_paid: row.try_get("is_one_third_paid")?,
            is_paid: row.try_get("is_paid")?,
        })
    }
}

impl FromRow for Rest {
    fn from_row(row: &Row) -> Result<Self, postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            vacation_id: row.try_get("vacation_id")?,
            start: row.try_get("start_date")?,
            end: row.try_get("end_date")?,
            days: count(row, "days")?,
            value: row.try_get("value")?,
            is_approved: row.try_get("is_approved")?,
            is_paid: row.try_get("is_paid")?,
        })
    }
}

/// Columns of the `vacations` table.
const VACATION_COLUMNS: &str = "\
    id, employee_id, start_date, due_date, \
    total_days, remaining_days, \
    base_value, one_third_value, \
    is_expired, is_one_third_paid, is_paid";

/// Columns of the `rests` table.
const REST_COLUMNS: &str = "\
    id, vacation_id, start_date, end_date, \
    days, value, is_approved, is_paid";

impl<C> Database<Select<By<Option<Vacation>, vacation::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Vacation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Vacation>, vacation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: vacation::Id = by.into_inner();

        let sql =
            format!("SELECT {VACATION_COLUMNS} FROM vacations WHERE id = $1::INT8");
        let row = self
            .query_opt(sql.as_str(), &[&id])
            .await
            .map_err(tracerr::wrap!())?;
        decode_opt(row.as_ref())
    }
}

impl<C> Database<Select<By<Vec<Vacation>, employee::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Vacation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Vacation>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let employee_id: employee::Id = by.into_inner();

        let sql = format!(
            "SELECT {VACATION_COLUMNS} FROM vacations \
             WHERE employee_id = $1::INT8 \
             ORDER BY start_date",
        );
        let rows = self
            .query(sql.as_str(), &[&employee_id])
            .await
            .map_err(tracerr::wrap!())?;
        decode_all(&rows)
    }
}

impl<C> Database<Insert<Vacation>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vacation;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut vacation): Insert<Vacation>,
    ) -> Result<Self::Ok, Self::Err> {
        let Vacation {
            id: _,
            employee_id,
            start,
            due_date,
            total_days,
            remaining_days,
            base_value,
            one_third_value,
            is_expired,
            is_one_third_paid,
            is_paid,
        } = &vacation;

        const SQL: &str = "\
            INSERT INTO vacations (\
                employee_id, start_date, due_date, \
                total_days, remaining_days, \
                base_value, one_third_value, \
                is_expired, is_one_third_paid, is_paid\
            ) \
            VALUES (\
                $1::INT8, $2::DATE, $3::DATE, \
                $4::INT4, $5::INT4, \
                $6::NUMERIC, $7::NUMERIC, \
                $8::BOOLEAN, $9::BOOLEAN, $10::BOOLEAN\
            ) \
            RETURNING id";
        vacation.id = self
            .query_opt(
                SQL,
                &[
                    employee_id,
                    start,
                    due_date,
                    &i32::from(*total_days),
                    &i32::from(*remaining_days),
                    base_value,
                    one_third_value,
                    is_expired,
                    is_one_third_paid,
                    is_paid,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .ok_or(postgres::Error::Malformed("id"))
            .and_then(|row| row.try_get("id").map_err(Into::into))
            .map_err(tracerr::from_and_wrap!())?;
        Ok(vacation)
    }
}

impl<C> Database<Update<Vacation>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(vacation): Update<Vacation>,
    ) -> Result<Self::Ok, Self::Err> {
        let Vacation {
            id,
            employee_id,
            start,
            due_date,
            total_days,
            remaining_days,
            base_value,
            one_third_value,
            is_expired,
            is_one_third_paid,
            is_paid,
        } = vacation;

        const SQL: &str = "\
            UPDATE vacations \
            SET employee_id = $2::INT8, \
                start_date = $3::DATE, \
                due_date = $4::DATE, \
                total_days = $5::INT4, \
                remaining_days = $6::INT4, \
                base_value = $7::NUMERIC, \
                one_third_value = $8::NUMERIC, \
                is_expired = $9::BOOLEAN, \
                is_one_third_paid = $10::BOOLEAN, \
                is_paid = $11::BOOLEAN \
            WHERE id = $1::INT8";
        self.exec(
            SQL,
            &[
                &id,
                &employee_id,
                &start,
                &due_date,
                &i32::from(total_days),
                &i32::from(remaining_days),
                &base_value,
                &one_third_value,
                &is_expired,
                &is_one_third_paid,
                &is_paid,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Vacation, vacation::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Vacation, vacation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: vacation::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM vacations \
            WHERE id = $1::INT8 \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Vacation, vacation::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vacation, vacation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: vacation::Id = by.into_inner();

        // `Rest`s are removed by the `ON DELETE CASCADE` constraint.
        const SQL: &str = "\
            DELETE FROM vacations \
            WHERE id = $1::INT8";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Option<Rest>, rest::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Rest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rest>, rest::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: rest::Id = by.into_inner();

        let sql = format!("SELECT {REST_COLUMNS} FROM rests WHERE id = $1::INT8");
        let row = self
            .query_opt(sql.as_str(), &[&id])
            .await
            .map_err(tracerr::wrap!())?;
        decode_opt(row.as_ref())
    }
}

impl<C> Database<Select<By<Vec<Rest>, vacation::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Rest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rest>, vacation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let vacation_id: vacation::Id = by.into_inner();

        let sql = format!(
            "SELECT {REST_COLUMNS} FROM rests \
             WHERE vacation_id = $1::INT8 \
             ORDER BY start_date",
        );
        let rows = self
            .query(sql.as_str(), &[&vacation_id])
            .await
            .map_err(tracerr::wrap!())?;
        decode_all(&rows)
    }
}

impl<C> Database<Insert<Rest>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Rest;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut rest): Insert<Rest>,
    ) -> Result<Self::Ok, Self::Err> {
        let Rest {
            id: _,
            vacation_id,
            start,
            end,
            days,
            value,
            is_approved,
            is_paid,
        } = &rest;

        const SQL: &str = "\
            INSERT INTO rests (\
                vacation_id, start_date, end_date, \
                days, value, is_approved, is_paid\
            ) \
            VALUES (\
                $1::INT8, $2::DATE, $3::DATE, \
                $4::INT4, $5::NUMERIC, $6::BOOLEAN, $7::BOOLEAN\
            ) \
            RETURNING id";
        rest.id = self
            .query_opt(
                SQL,
                &[
                    vacation_id,
                    start,
                    end,
                    &i32::from(*days),
                    value,
                    is_approved,
                    is_paid,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .ok_or(postgres::Error::Malformed("id"))
            .and_then(|row| row.try_get("id").map_err(Into::into))
            .map_err(tracerr::from_and_wrap!())?;
        Ok(rest)
    }
}

impl<C> Database<Update<Rest>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rest): Update<Rest>,
    ) -> Result<Self::Ok, Self::Err> {
        let Rest {
            id,
            vacation_id,
            start,
            end,
            days,
            value,
            is_approved,
            is_paid,
        } = rest;

        const SQL: &str = "\
            UPDATE rests \
            SET vacation_id = $2::INT8, \
                start_date = $3::DATE, \
                end_date = $4::DATE, \
                days = $5::INT4, \
                value = $6::NUMERIC, \
                is_approved = $7::BOOLEAN, \
                is_paid = $8::BOOLEAN \
            WHERE id = $1::INT8";
        self.exec(
            SQL,
            &[
                &id,
                &vacation_id,
                &start,
                &end,
                &i32::from(days),
                &value,
                &is_approved,
                &is_paid,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Rest, rest::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Rest, rest::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: rest::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM rests \
            WHERE id = $1::INT8";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
