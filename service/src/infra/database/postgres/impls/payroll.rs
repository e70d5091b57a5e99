//! Payroll [`Sheet`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Lock, Select, Update},
    Period,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        payroll::{self, payment},
        Payment, Sheet,
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

use super::{decode_all, decode_opt, month, period, FromRow};

impl FromRow for Sheet {
    fn from_row(row: &Row) -> Result<Self, postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            period: period(row)?,
            kind: row.try_get("kind")?,
            generated_at: row.try_get("generated_at")?,
            total: row.try_get("total")?,
            is_closed: row.try_get("is_closed")?,
        })
    }
}

impl FromRow for Payment {
    fn from_row(row: &Row) -> Result<Self, postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            sheet_id: row.try_get("sheet_id")?,
            employee_id: row.try_get("employee_id")?,
            base_salary: row.try_get("base_salary")?,
            bonus: row.try_get("bonus")?,
            inss_deduction: row.try_get("inss_deduction")?,
            family_salary: row.try_get("family_salary")?,
            advance_deduction: row.try_get("advance_deduction")?,
            absence_deduction: row.try_get("absence_deduction")?,
            final_amount: row.try_get("final_amount")?,
            is_paid: row.try_get("is_paid")?,
        })
    }
}

impl<C> Database<Select<By<Option<Sheet>, payroll::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Sheet>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Sheet>, payroll::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: payroll::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, month, year, kind, generated_at, total, is_closed \
            FROM payroll_sheets \
            WHERE id = $1::INT8";
        let row = self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?;
        decode_opt(row.as_ref())
    }
}

impl<C> Database<Select<By<Option<Sheet>, (Period, payroll::Kind)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Sheet>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Sheet>, (Period, payroll::Kind)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (period, kind): (Period, payroll::Kind) = by.into_inner();

        const SQL: &str = "\
            SELECT id, month, year, kind, generated_at, total, is_closed \
            FROM payroll_sheets \
            WHERE month = $1::INT2 \
                  AND year = $2::INT4 \
                  AND kind = $3::INT2";
        let row = self
            .query_opt(SQL, &[&month(period), &period.year(), &kind])
            .await
            .map_err(tracerr::wrap!())?;
        decode_opt(row.as_ref())
    }
}

impl<C> Database<Select<By<Vec<Sheet>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Sheet>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Sheet>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, month, year, kind, generated_at, total, is_closed \
            FROM payroll_sheets \
            ORDER BY year, month, kind";
        let rows = self.query(SQL, &[]).await.map_err(tracerr::wrap!())?;
        decode_all(&rows)
    }
}

impl<C> Database<Insert<Sheet>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Sheet;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut sheet): Insert<Sheet>,
    ) -> Result<Self::Ok, Self::Err> {
        let Sheet {
            id: _,
            period,
            kind,
            generated_at,
            total,
            is_closed,
        } = &sheet;

        const SQL: &str = "\
            INSERT INTO payroll_sheets (\
                month, year, kind, generated_at, total, is_closed\
            ) \
            VALUES (\
                $1::INT2, $2::INT4, $3::INT2, \
                $4::TIMESTAMPTZ, $5::NUMERIC, $6::BOOLEAN\
            ) \
            RETURNING id";
        sheet.id = self
            .query_opt(
                SQL,
                &[
                    &month(*period),
                    &period.year(),
                    kind,
                    generated_at,
                    total,
                    is_closed,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .ok_or(postgres::Error::Malformed("id"))
            .and_then(|row| row.try_get("id").map_err(Into::into))
            .map_err(tracerr::from_and_wrap!())?;
        Ok(sheet)
    }
}

impl<C> Database<Update<Sheet>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(sheet): Update<Sheet>,
    ) -> Result<Self::Ok, Self::Err> {
        let Sheet {
            id,
            period,
            kind,
            generated_at,
            total,
            is_closed,
        } = sheet;

        const SQL: &str = "\
            UPDATE payroll_sheets \
            SET month = $2::INT2, \
                year = $3::INT4, \
                kind = $4::INT2, \
                generated_at = $5::TIMESTAMPTZ, \
                total = $6::NUMERIC, \
                is_closed = $7::BOOLEAN \
            WHERE id = $1::INT8";
        self.exec(
            SQL,
            &[
                &id,
                &month(period),
                &period.year(),
                &kind,
                &generated_at,
                &total,
                &is_closed,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Sheet, payroll::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Sheet, payroll::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: payroll::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM payroll_sheets \
            WHERE id = $1::INT8 \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Sheet, payroll::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Sheet, payroll::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: payroll::Id = by.into_inner();

        // `Payment`s are removed by the `ON DELETE CASCADE` constraint.
        const SQL: &str = "\
            DELETE FROM payroll_sheets \
            WHERE id = $1::INT8";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

/// Columns of the `payments` table.
const PAYMENT_COLUMNS: &str = "\
    id, sheet_id, employee_id, \
    base_salary, bonus, inss_deduction, family_salary, \
    advance_deduction, absence_deduction, final_amount, is_paid";

impl<C> Database<Select<By<Option<Payment>, payment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: payment::Id = by.into_inner();

        let sql =
            format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1::INT8");
        let row = self
            .query_opt(sql.as_str(), &[&id])
            .await
            .map_err(tracerr::wrap!())?;
        decode_opt(row.as_ref())
    }
}

impl<C> Database<Select<By<Vec<Payment>, payroll::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Payment>, payroll::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sheet_id: payroll::Id = by.into_inner();

        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments \
             WHERE sheet_id = $1::INT8 \
             ORDER BY id",
        );
        let rows = self
            .query(sql.as_str(), &[&sheet_id])
            .await
            .map_err(tracerr::wrap!())?;
        decode_all(&rows)
    }
}

impl<C> Database<Insert<Payment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Payment;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Payment {
            id: _,
            sheet_id,
            employee_id,
            base_salary,
            bonus,
            inss_deduction,
            family_salary,
            advance_deduction,
            absence_deduction,
            final_amount,
            is_paid,
        } = &payment;

        const SQL: &str = "\
            INSERT INTO payments (\
                sheet_id, employee_id, \
                base_salary, bonus, inss_deduction, family_salary, \
                advance_deduction, absence_deduction, final_amount, \
                is_paid\
            ) \
            VALUES (\
                $1::INT8, $2::INT8, \
                $3::NUMERIC, $4::NUMERIC, $5::NUMERIC, $6::NUMERIC, \
                $7::NUMERIC, $8::NUMERIC, $9::NUMERIC, \
                $10::BOOLEAN\
            ) \
            RETURNING id";
        payment.id = self
            .query_opt(
                SQL,
                &[
                    sheet_id,
                    employee_id,
                    base_salary,
                    bonus,
                    inss_deduction,
                    family_salary,
                    advance_deduction,
                    absence_deduction,
                    final_amount,
                    is_paid,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .ok_or(postgres::Error::Malformed("id"))
            .and_then(|row| row.try_get("id").map_err(Into::into))
            .map_err(tracerr::from_and_wrap!())?;
        Ok(payment)
    }
}

impl<C> Database<Update<Payment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(payment): Update<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Payment {
            id,
            sheet_id,
            employee_id,
            base_salary,
            bonus,
            inss_deduction,
            family_salary,
            advance_deduction,
            absence_deduction,
            final_amount,
            is_paid,
        } = payment;

        const SQL: &str = "\
            UPDATE payments \
            SET sheet_id = $2::INT8, \
                employee_id = $3::INT8, \
                base_salary = $4::NUMERIC, \
                bonus = $5::NUMERIC, \
                inss_deduction = $6::NUMERIC, \
                family_salary = $7::NUMERIC, \
                advance_deduction = $8::NUMERIC, \
                absence_deduction = $9::NUMERIC, \
                final_amount = $10::NUMERIC, \
                is_paid = $11::BOOLEAN \
            WHERE id = $1::INT8";
        self.exec(
            SQL,
            &[
                &id,
                &sheet_id,
                &employee_id,
                &base_salary,
                &bonus,
                &inss_deduction,
                &family_salary,
                &advance_deduction,
                &absence_deduction,
                &final_amount,
                &is_paid,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Vec<Payment>, payroll::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<Payment>, payroll::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sheet_id: payroll::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM payments \
            WHERE sheet_id = $1::INT8";
        self.exec(SQL, &[&sheet_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
