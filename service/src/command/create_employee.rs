//! [`Command`] for creating a new [`Employee`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
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

/// [`Command`] for creating a new [`Employee`].
#[derive(Clone, Copy, Debug)]
pub struct CreateEmployee {
    /// ID of the person being employed.
    pub person_id: employee::PersonId,

    /// [`Date`] the new [`Employee`] is admitted at.
    pub admission_date: Date,

    /// [`user::Actor`] creating the [`Employee`].
    pub initiator: user::Actor,
}

impl<Db> Command<CreateEmployee> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<Insert<audit::Entry>, Ok = (), Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Insert<Employee>,
            Ok = Employee,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Employee;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateEmployee,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateEmployee {
            person_id,
            admission_date,
            initiator,
        } = cmd;

        if admission_date > self.today() {
            return Err(tracerr::new!(E::AdmissionInFuture(admission_date)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let employee = tx
            .execute(Insert(Employee {
                id: employee::Id::default(),
                person_id,
                admission_date,
                termination_date: None,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.audit(
            audit::Kind::Create,
            initiator,
            format!("`Employee(id: {})` admitted", employee.id),
        )
        .await;

        Ok(employee)
    }
}

/// Error of [`CreateEmployee`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Admission [`Date`] is in the future.
    #[display("Admission date `{_0}` is in the future")]
    AdmissionInFuture(#[error(not(source))] Date),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::AdmissionInFuture(_) => error::Kind::InvalidInput,
            Self::Db(e) => e.kind(),
        }
    }
}
