//! [`Advance`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Lock, Select, Update},
    Period,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{advance, employee, Advance},
    infra::{
        database::{
            self,
            postgres::{self, Connection},
            Postgres,
        },
        Database,
    },
    read::advance::{ApprovedUnpaid, Disbursed},
};

use super::{decode_all, decode_opt, FromRow};

impl FromRow for Advance {
    fn from_row(row: &Row) -> Result<Self, postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            employee_id: row.try_get("employee_id")?,
            date: row.try_get("date")?,
            amount: row.try_get("amount")?,
            is_approved: row.try_get("is_approved")?,
            is_paid: row.try_get("is_paid")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

impl<C> Database<Select<By<Option<Advance>, advance::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Advance>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Advance>, advance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: advance::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, employee_id, date, amount, \
                   is_approved, is_paid, is_active \
            FROM advances \
            WHERE id = $1::INT8";
        let row = self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?;
        decode_opt(row.as_ref())
    }
}

impl<C> Database<Select<By<Vec<Advance>, employee::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Advance>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Advance>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let employee_id: employee::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, employee_id, date, amount, \
                   is_approved, is_paid, is_active \
            FROM advances \
            WHERE employee_id = $1::INT8 \
            ORDER BY date, id";
        let rows = self
            .query(SQL, &[&employee_id])
            .await
            .map_err(tracerr::wrap!())?;
        decode_all(&rows)
    }
}

impl<C> Database<Select<By<Vec<ApprovedUnpaid<Advance>>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<ApprovedUnpaid<Advance>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<ApprovedUnpaid<Advance>>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, employee_id, date, amount, \
                   is_approved, is_paid, is_active \
            FROM advances \
            WHERE is_approved AND NOT is_paid AND is_active \
            ORDER BY date, id";
        let rows = self.query(SQL, &[]).await.map_err(tracerr::wrap!())?;
        Ok(decode_all(&rows)?.into_iter().map(ApprovedUnpaid).collect())
    }
}

impl<C>
    Database<Select<By<Vec<Disbursed<Advance>>, (employee::Id, Period)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Disbursed<Advance>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Disbursed<Advance>>, (employee::Id, Period)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (employee_id, period): (employee::Id, Period) = by.into_inner();

        const SQL: &str = "\
            SELECT id, employee_id, date, amount, \
                   is_approved, is_paid, is_active \
            FROM advances \
            WHERE employee_id = $1::INT8 \
                  AND date BETWEEN $2::DATE AND $3::DATE \
                  AND is_approved AND is_paid AND is_active \
            ORDER BY date, id";
        let rows = self
            .query(
                SQL,
                &[&employee_id, &period.first_day(), &period.last_day()],
            )
            .await
            .map_err(tracerr::wrap!())?;
        Ok(decode_all(&rows)?.into_iter().map(Disbursed).collect())
    }
}

impl<C> Database<Insert<Advance>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Advance;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut advance): Insert<Advance>,
    ) -> Result<Self::Ok, Self::Err> {
        let Advance {
            id: _,
            employee_id,
            date,
            amount,
            is_approved,
            is_paid,
            is_active,
        } = &advance;

        const SQL: &str = "\
            INSERT INTO advances (\
                employee_id, date, amount, \
                is_approved, is_paid, is_active\
            ) \
            VALUES (\
                $1::INT8, $2::DATE, $3::NUMERIC, \
                $4::BOOLEAN, $5::BOOLEAN, $6::BOOLEAN\
            ) \
            RETURNING id";
        advance.id = self
            .query_opt(
                SQL,
                &[employee_id, date, amount, is_approved, is_paid, is_active],
            )
            .await
            .map_err(tracerr::wrap!())?
            .ok_or(postgres::Error::Malformed("id"))
            .and_then(|row| row.try_get("id").map_err(Into::into))
            .map_err(tracerr::from_and_wrap!())?;
        Ok(advance)
    }
}

impl<C> Database<Update<Advance>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(advance): Update<Advance>,
    ) -> Result<Self::Ok, Self::Err> {
        let Advance {
            id,
            employee_id,
            date,
            amount,
            is_approved,
            is_paid,
            is_active,
        } = advance;

        const SQL: &str = "\
            UPDATE advances \
            SET employee_id = $2::INT8, \
                date = $3::DATE, \
                amount = $4::NUMERIC, \
                is_approved = $5::BOOLEAN, \
                is_paid = $6::BOOLEAN, \
                is_active = $7::BOOLEAN \
            WHERE id = $1::INT8";
        self.exec(
            SQL,
            &[
                &id,
                &employee_id,
                &date,
                &amount,
                &is_approved,
                &is_paid,
                &is_active,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Advance, advance::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Advance, advance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: advance::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM advances \
            WHERE id = $1::INT8 \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Advance, advance::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Advance, advance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: advance::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM advances \
            WHERE id = $1::INT8";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
