//! [`Command`] for changing the [`EffectiveSalary`] of an [`Employee`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{audit, employee, salary, user, EffectiveSalary, Employee},
    error::{self, Classify},
    infra::{database, Database},
    read::salary::Current,
    Service,
};

use super::Command;

/// [`Command`] for changing the [`EffectiveSalary`] of an [`Employee`].
///
/// The current [`EffectiveSalary`] is closed today and a new one starts
/// today. The very first [`EffectiveSalary`] starts at the admission date.
#[derive(Clone, Copy, Debug)]
pub struct ChangeEffectiveSalary {
    /// ID of the [`Employee`] whose salary changes.
    pub employee_id: employee::Id,

    /// New monthly amount.
    pub amount: Money,

    /// [`user::Actor`] changing the salary.
    pub initiator: user::Actor,
}

impl<Db> Command<ChangeEffectiveSalary> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<Insert<audit::Entry>, Ok = (), Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Employee, employee::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Employee>, employee::Id>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Current<EffectiveSalary>>, employee::Id>>,
            Ok = Option<Current<EffectiveSalary>>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<EffectiveSalary>,
            Ok = EffectiveSalary,
            Err = Traced<database::Error>,
        > + Database<Update<EffectiveSalary>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = EffectiveSalary;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ChangeEffectiveSalary,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ChangeEffectiveSalary {
            employee_id,
            amount,
            initiator,
        } = cmd;

        if !amount.is_positive() {
            return Err(tracerr::new!(E::NonPositiveAmount(amount)));
        }
        let today = self.today();

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serializes salary changes of the same `Employee`.
        tx.execute(Lock(By::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let employee = tx
            .execute(Select(By::<Option<Employee>, _>::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EmployeeNotExists(employee_id))
            .map_err(tracerr::wrap!())?;
        if !employee.is_active() {
            return Err(tracerr::new!(E::EmployeeInactive(employee_id)));
        }

        let current = tx
            .execute(Select(
                By::<Option<Current<EffectiveSalary>>, _>::new(employee_id),
            ))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let salary = match current {
            Some(Current(mut same_day)) if same_day.start >= today => {
                same_day.amount = amount;
                tx.execute(Update(same_day.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
                same_day
            }
            Some(Current(mut previous)) => {
                previous.end = Some(today);
                tx.execute(Update(previous))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
                tx.execute(Insert(EffectiveSalary {
                    id: salary::Id::default(),
                    employee_id,
                    start: today,
                    end: None,
                    amount,
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
            }
            None => tx
                .execute(Insert(EffectiveSalary {
                    id: salary::Id::default(),
                    employee_id,
                    start: employee.admission_date,
                    end: None,
                    amount,
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?,
        };

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.audit(
            audit::Kind::Update,
            initiator,
            format!(
                "`Employee(id: {employee_id})` salary set to {amount} \
                 since {}",
                salary.start,
            ),
        )
        .await;

        Ok(salary)
    }
}

/// Error of [`ChangeEffectiveSalary`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Employee`] is terminated.
    #[display("`Employee(id: {_0})` is terminated")]
    EmployeeInactive(#[error(not(source))] employee::Id),

    /// [`Employee`] with the provided ID does not exist.
    #[display("`Employee(id: {_0})` does not exist")]
    EmployeeNotExists(#[error(not(source))] employee::Id),

    /// Salary amount is not positive.
    #[display("Salary amount `{_0}` is not positive")]
    NonPositiveAmount(#[error(not(source))] Money),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::EmployeeInactive(_) => error::Kind::IllegalState,
            Self::EmployeeNotExists(_) => error::Kind::NotFound,
            Self::NonPositiveAmount(_) => error::Kind::InvalidInput,
        }
    }
}
