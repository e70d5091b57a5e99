//! [`Employee`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Period,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{employee, Absence, EffectiveSalary, Employee},
    infra::{
        database::{
            self,
            postgres::{self, Connection},
            Postgres,
        },
        Database,
    },
    read::{employee::Active, salary::Current},
};

use super::{count, decode_all, decode_opt, month, period, FromRow};

impl FromRow for Employee {
    fn from_row(row: &Row) -> Result<Self, postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            person_id: row.try_get("person_id")?,
            admission_date: row.try_get("admission_date")?,
            termination_date: row.try_get("termination_date")?,
        })
    }
}

impl FromRow for EffectiveSalary {
    fn from_row(row: &Row) -> Result<Self, postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            employee_id: row.try_get("employee_id")?,
            start: row.try_get("start_date")?,
            end: row.try_get("end_date")?,
            amount: row.try_get("amount")?,
        })
    }
}

impl FromRow for Absence {
    fn from_row(row: &Row) -> Result<Self, postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            employee_id: row.try_get("employee_id")?,
            period: period(row)?,
            count: count(row, "count")?,
        })
    }
}

impl<C> Database<Select<By<Option<Employee>, employee::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Employee>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: employee::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, person_id, admission_date, termination_date \
            FROM employees \
            WHERE id = $1::INT8";
        let row = self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?;
        decode_opt(row.as_ref())
    }
}

impl<C> Database<Select<By<Vec<Active<Employee>>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Active<Employee>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Active<Employee>>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, person_id, admission_date, termination_date \
            FROM employees \
            WHERE termination_date IS NULL \
            ORDER BY id";
        let rows = self.query(SQL, &[]).await.map_err(tracerr::wrap!())?;
        Ok(decode_all(&rows)?.into_iter().map(Active).collect())
    }
}

impl<C> Database<Insert<Employee>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Employee;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut employee): Insert<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        let Employee {
            id: _,
            person_id,
            admission_date,
            termination_date,
        } = &employee;

        const SQL: &str = "\
            INSERT INTO employees (\
                person_id, admission_date, termination_date\
            ) \
            VALUES ($1::INT8, $2::DATE, $3::DATE) \
            RETURNING id";
        employee.id = self
            .query_opt(SQL, &[person_id, admission_date, termination_date])
            .await
            .map_err(tracerr::wrap!())?
            .ok_or(postgres::Error::Malformed("id"))
            .and_then(|row| row.try_get("id").map_err(Into::into))
            .map_err(tracerr::from_and_wrap!())?;
        Ok(employee)
    }
}

impl<C> Database<Update<Employee>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(employee): Update<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        let Employee {
            id,
            person_id,
            admission_date,
            termination_date,
        } = employee;

        const SQL: &str = "\
            UPDATE employees \
            SET person_id = $2::INT8, \
                admission_date = $3::DATE, \
                termination_date = $4::DATE \
            WHERE id = $1::INT8";
        self.exec(
            SQL,
            &[&id, &person_id, &admission_date, &termination_date],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Employee, employee::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Employee, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: employee::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM employees \
            WHERE id = $1::INT8 \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Option<Current<EffectiveSalary>>, employee::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Current<EffectiveSalary>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Current<EffectiveSalary>>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let employee_id: employee::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, employee_id, start_date, end_date, amount \
            FROM effective_salaries \
            WHERE employee_id = $1::INT8 \
                  AND end_date IS NULL";
        let row = self
            .query_opt(SQL, &[&employee_id])
            .await
            .map_err(tracerr::wrap!())?;
        Ok(decode_opt(row.as_ref())?.map(Current))
    }
}

impl<C> Database<Select<By<Vec<EffectiveSalary>, employee::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<EffectiveSalary>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<EffectiveSalary>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let employee_id: employee::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, employee_id, start_date, end_date, amount \
            FROM effective_salaries \
            WHERE employee_id = $1::INT8 \
            ORDER BY start_date";
        let rows = self
            .query(SQL, &[&employee_id])
            .await
            .map_err(tracerr::wrap!())?;
        decode_all(&rows)
    }
}

impl<C> Database<Insert<EffectiveSalary>> for Postgres<C>
where
    C: Connection,
{
    type Ok = EffectiveSalary;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut salary): Insert<EffectiveSalary>,
    ) -> Result<Self::Ok, Self::Err> {
        let EffectiveSalary {
            id: _,
            employee_id,
            start,
            end,
            amount,
        } = &salary;

        const SQL: &str = "\
            INSERT INTO effective_salaries (\
                employee_id, start_date, end_date, amount\
            ) \
            VALUES ($1::INT8, $2::DATE, $3::DATE, $4::NUMERIC) \
            RETURNING id";
        salary.id = self
            .query_opt(SQL, &[employee_id, start, end, amount])
            .await
            .map_err(tracerr::wrap!())?
            .ok_or(postgres::Error::Malformed("id"))
            .and_then(|row| row.try_get("id").map_err(Into::into))
            .map_err(tracerr::from_and_wrap!())?;
        Ok(salary)
    }
}

impl<C> Database<Update<EffectiveSalary>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(salary): Update<EffectiveSalary>,
    ) -> Result<Self::Ok, Self::Err> {
        let EffectiveSalary {
            id,
            employee_id,
            start,
            end,
            amount,
        } = salary;

        const SQL: &str = "\
            UPDATE effective_salaries \
            SET employee_id = $2::INT8, \
                start_date = $3::DATE, \
                end_date = $4::DATE, \
                amount = $5::NUMERIC \
            WHERE id = $1::INT8";
        self.exec(SQL, &[&id, &employee_id, &start, &end, &amount])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Option<Absence>, (employee::Id, Period)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Absence>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Absence>, (employee::Id, Period)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (employee_id, period): (employee::Id, Period) = by.into_inner();

        const SQL: &str = "\
            SELECT id, employee_id, month, year, count \
            FROM absences \
            WHERE employee_id = $1::INT8 \
                  AND month = $2::INT2 \
                  AND year = $3::INT4";
        let row = self
            .query_opt(SQL, &[&employee_id, &month(period), &period.year()])
            .await
            .map_err(tracerr::wrap!())?;
        decode_opt(row.as_ref())
    }
}

impl<C> Database<Insert<Absence>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Absence;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut absence): Insert<Absence>,
    ) -> Result<Self::Ok, Self::Err> {
        let Absence {
            id: _,
            employee_id,
            period,
            count,
        } = &absence;

        const SQL: &str = "\
            INSERT INTO absences (employee_id, month, year, count) \
            VALUES ($1::INT8, $2::INT2, $3::INT4, $4::INT4) \
            RETURNING id";
        absence.id = self
            .query_opt(
                SQL,
                &[
                    employee_id,
                    &month(*period),
                    &period.year(),
                    &i32::from(*count),
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .ok_or(postgres::Error::Malformed("id"))
            .and_then(|row| row.try_get("id").map_err(Into::into))
            .map_err(tracerr::from_and_wrap!())?;
        Ok(absence)
    }
}

impl<C> Database<Update<Absence>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(absence): Update<Absence>,
    ) -> Result<Self::Ok, Self::Err> {
        let Absence {
            id,
            employee_id,
            period,
            count,
        } = absence;

        const SQL: &str = "\
            UPDATE absences \
            SET employee_id = $2::INT8, \
                month = $3::INT2, \
                year = $4::INT4, \
                count = $5::INT4 \
            WHERE id = $1::INT8";
        self.exec(
            SQL,
            &[
                &id,
                &employee_id,
                &month(period),
                &period.year(),
                &i32::from(count),
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
