//! [`Command`] for recomputing an open salary [`Sheet`].

use std::collections::HashMap;

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    Period,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        audit, employee, payroll, user, Absence, Advance, EffectiveSalary,
        Employee, Payment, Sheet,
    },
    error::{self, Classify},
    infra::{database, Database},
    read::{advance::Disbursed, employee::Active, salary::Current},
    Service,
};

use super::{create_salary_sheet::salary_inputs, Command};

/// [`Command`] for recomputing an open salary [`Sheet`].
///
/// Base salaries and deductions are refreshed, while operator adjustments
/// are kept. Newly active [`Employee`]s get a new [`Payment`], and
/// [`Payment`]s of no longer active ones stay untouched.
#[derive(Clone, Copy, Debug)]
pub struct RecomputeSalarySheet {
    /// ID of the [`Sheet`] to be recomputed.
    pub sheet_id: payroll::Id,

    /// [`user::Actor`] recomputing the [`Sheet`].
    pub initiator: user::Actor,
}

impl<Db> Command<RecomputeSalarySheet> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<Insert<audit::Entry>, Ok = (), Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Sheet, payroll::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Sheet>, payroll::Id>>,
            Ok = Option<Sheet>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Payment>, payroll::Id>>,
            Ok = Vec<Payment>,
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
        > + Database<Update<Sheet>, Err = Traced<database::Error>>
        + Database<Insert<Payment>, Ok = Payment, Err = Traced<database::Error>>
        + Database<Update<Payment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Sheet;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecomputeSalarySheet,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecomputeSalarySheet {
            sheet_id,
            initiator,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(sheet_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut sheet = tx
            .execute(Select(By::<Option<Sheet>, _>::new(sheet_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SheetNotExists(sheet_id))
            .map_err(tracerr::wrap!())?;
        if sheet.is_closed {
            return Err(tracerr::new!(E::SheetClosed(sheet_id)));
        }
        if sheet.kind != payroll::Kind::Salary {
            return Err(tracerr::new!(E::NotSalarySheet(sheet_id)));
        }

        let mut payments = tx
            .execute(Select(By::<Vec<Payment>, _>::new(sheet_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .into_iter()
            .map(|p| (p.employee_id, p))
            .collect::<HashMap<_, _>>();

        let inputs = salary_inputs(&tx, sheet.period)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let (mut refreshed, mut added) = (0_usize, 0_usize);
        for (employee_id, inputs) in inputs {
            if let Some(payment) = payments.get_mut(&employee_id) {
                let before = payment.clone();
                payment.refresh(inputs);
                if *payment != before {
                    tx.execute(Update(payment.clone()))
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))
                        .map(drop)?;
                    refreshed += 1;
                }
            } else {
                let payment = tx
                    .execute(Insert(Payment::salary(
                        sheet_id,
                        employee_id,
                        inputs,
                    )))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;
                _ = payments.insert(employee_id, payment);
                added += 1;
            }
        }

        let total = sheet.total;
        sheet.sum_up(payments.values());
        if sheet.total != total {
            tx.execute(Update(sheet.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!(
            "`Sheet(id: {sheet_id})` recomputed: {refreshed} payment(s) \
             refreshed, {added} added",
        );
        self.audit(
            audit::Kind::Update,
            initiator,
            format!("`Sheet(id: {sheet_id})` recomputed, total {}", sheet.total),
        )
        .await;

        Ok(sheet)
    }
}

/// Error of [`RecomputeSalarySheet`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Sheet`] is not a [`payroll::Kind::Salary`] one.
    #[display("`Sheet(id: {_0})` is not a salary sheet")]
    NotSalarySheet(#[error(not(source))] payroll::Id),

    /// [`Sheet`] is closed.
    #[display("`Sheet(id: {_0})` is closed")]
    SheetClosed(#[error(not(source))] payroll::Id),

    /// [`Sheet`] with the provided ID does not exist.
    #[display("`Sheet(id: {_0})` does not exist")]
    SheetNotExists(#[error(not(source))] payroll::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotSalarySheet(_) => error::Kind::InvalidInput,
            Self::SheetClosed(_) => error::Kind::IllegalState,
            Self::SheetNotExists(_) => error::Kind::NotFound,
        }
    }
}
