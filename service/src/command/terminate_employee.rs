//! [`Command`] for terminating an [`Employee`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{audit, employee, user, Employee},
    error::{self, Classify},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for terminating an [`Employee`].
#[derive(Clone, Copy, Debug)]
pub struct TerminateEmployee {
    /// ID of the [`Employee`] to be terminated.
    pub employee_id: employee::Id,

    /// [`Date`] the [`Employee`] is terminated at.
    pub termination_date: Date,

    /// [`user::Actor`] terminating the [`Employee`].
    pub initiator: user::Actor,
}

impl<Db> Command<TerminateEmployee> for Service<Db>
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
        > + Database<Update<Employee>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Employee;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: TerminateEmployee,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let TerminateEmployee {
            employee_id,
            termination_date,
            initiator,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut employee = tx
            .execute(Select(By::<Option<Employee>, _>::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EmployeeNotExists(employee_id))
            .map_err(tracerr::wrap!())?;
        if !employee.is_active() {
            return Err(tracerr::new!(E::EmployeeAlreadyTerminated(
                employee_id
            )));
        }
        if termination_date < employee.admission_date {
            return Err(tracerr::new!(E::TerminationBeforeAdmission(
                termination_date
            )));
        }

        employee.termination_date = Some(termination_date);
        tx.execute(Update(employee.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.audit(
            audit::Kind::Update,
            initiator,
            format!(
                "`Employee(id: {employee_id})` terminated at {termination_date}",
            ),
        )
        .await;

        Ok(employee)
    }
}

/// Error of [`TerminateEmployee`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Employee`] is terminated already.
    #[display("`Employee(id: {_0})` is terminated already")]
    EmployeeAlreadyTerminated(#[error(not(source))] employee::Id),

    /// [`Employee`] with the provided ID does not exist.
    #[display("`Employee(id: {_0})` does not exist")]
    EmployeeNotExists(#[error(not(source))] employee::Id),

    /// Termination [`Date`] precedes the admission one.
    #[display("Termination date `{_0}` precedes the admission")]
    TerminationBeforeAdmission(#[error(not(source))] Date),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::EmployeeAlreadyTerminated(_) => error::Kind::IllegalState,
            Self::EmployeeNotExists(_) => error::Kind::NotFound,
            Self::TerminationBeforeAdmission(_) => error::Kind::InvalidInput,
        }
    }
}
