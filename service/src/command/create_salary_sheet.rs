//! [`Command`] for generating a monthly salary [`Sheet`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted, Update},
    Money, Period,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        audit, employee,
        payroll::{self, payment::SalaryInputs},
        user, Absence, Advance, EffectiveSalary, Employee, Payment, Sheet,
    },
    error::{self, Classify},
    infra::{database, Database},
    read::{advance::Disbursed, employee::Active, salary::Current},
    Service,
};

use super::Command;

/// [`Command`] for generating a monthly salary [`Sheet`].
///
/// Every active [`Employee`] having a current [`EffectiveSalary`] gets a
/// [`Payment`] without any adjustments.
#[derive(Clone, Copy, Debug)]
pub struct CreateSalarySheet {
    /// [`Period`] of the new [`Sheet`].
    pub period: Period,

    /// [`user::Actor`] generating the [`Sheet`].
    pub initiator: user::Actor,
}

impl<Db> Command<CreateSalarySheet> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<Insert<audit::Entry>, Ok = (), Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Sheet>, (Period, payroll::Kind)>>,
            Ok = Option<Sheet>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Active<Employee>>, ()>>,
            Ok = Vec<Active<Employee>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Current<EffectiveSalary>>, employee::Id>>,
            Ok = Option<Current<EffectiveSalary>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Absence>, (employee::Id, Period)>>,
            Ok = Option<Absence>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Disbursed<Advance>>, (employee::Id, Period)>>,
            Ok = Vec<Disbursed<Advance>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Sheet>, Ok = Sheet, Err = Traced<database::Error>>
        + Database<Update<Sheet>, Err = Traced<database::Error>>
        + Database<Insert<Payment>, Ok = Payment, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Sheet;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateSalarySheet,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateSalarySheet { period, initiator } = cmd;
        let kind = payroll::Kind::Salary;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let existing = tx
            .execute(Select(By::<Option<Sheet>, _>::new((period, kind))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(sheet) = existing {
            return Err(tracerr::new!(E::SheetExists(sheet.id)));
        }

        let mut sheet = tx
            .execute(Insert(Sheet::open(period, kind, self.now().coerce())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let inputs = salary_inputs(&tx, period)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let mut payments = Vec::with_capacity(inputs.len());
        for (employee_id, inputs) in inputs {
            let payment = tx
                .execute(Insert(Payment::salary(sheet.id, employee_id, inputs)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            payments.push(payment);
        }

        sheet.sum_up(&payments);
        tx.execute(Update(sheet.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.audit(
            audit::Kind::Create,
            initiator,
            format!(
                "{kind} `Sheet(id: {})` of {period} with {} payment(s)",
                sheet.id,
                payments.len(),
            ),
        )
        .await;

        Ok(sheet)
    }
}

/// Collects [`SalaryInputs`] of every active [`Employee`] having a current
/// [`EffectiveSalary`], in the provided [`Period`].
pub(super) async fn salary_inputs<Db>(
    db: &Db,
    period: Period,
) -> Result<Vec<(employee::Id, SalaryInputs)>, Traced<database::Error>>
where
    Db: Database<
            Select<By<Vec<Active<Employee>>, ()>>,
            Ok = Vec<Active<Employee>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Current<EffectiveSalary>>, employee::Id>>,
            Ok = Option<Current<EffectiveSalary>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Absence>, (employee::Id, Period)>>,
            Ok = Option<Absence>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Disbursed<Advance>>, (employee::Id, Period)>>,
            Ok = Vec<Disbursed<Advance>>,
            Err = Traced<database::Error>,
        >,
{
    let employees = db
        .execute(Select(By::<Vec<Active<Employee>>, _>::new(())))
        .await
        .map_err(tracerr::wrap!())?;

    let mut inputs = Vec::with_capacity(employees.len());
    for Active(employee) in employees {
        let salary = db
            .execute(Select(By::<Option<Current<EffectiveSalary>>, _>::new(
                employee.id,
            )))
            .await
            .map_err(tracerr::wrap!())?;
        let Some(Current(salary)) = salary else {
            // Not on payroll yet.
            continue;
        };

        let absences = db
            .execute(Select(By::<Option<Absence>, _>::new((
                employee.id,
                period,
            ))))
            .await
            .map_err(tracerr::wrap!())?
            .map_or(0, |a| a.count);
        let advances = db
            .execute(Select(By::<Vec<Disbursed<Advance>>, _>::new((
                employee.id,
                period,
            ))))
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|Disbursed(a)| a.amount)
            .sum::<Money>();

        inputs.push((
            employee.id,
            SalaryInputs {
                base_salary: salary.amount,
                absences,
                advances,
            },
        ));
    }
    Ok(inputs)
}

/// Error of [`CreateSalarySheet`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    ///
    /// A [`Sheet`] of the same [`Period`] and kind inserted concurrently by
    /// another creation is reported here as a conflict, not as
    /// [`ExecutionError::SheetExists`].
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Sheet`] of the same [`Period`] and kind exists already.
    #[display("`Sheet(id: {_0})` exists already")]
    SheetExists(#[error(not(source))] payroll::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::SheetExists(_) => error::Kind::AlreadyExists,
        }
    }
}
