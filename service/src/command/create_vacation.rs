//! [`Command`] for entitling an [`Employee`] to a new [`Vacation`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Date, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{audit, employee, user, Employee, Vacation},
    error::{self, Classify},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for entitling an [`Employee`] to a new [`Vacation`].
#[derive(Clone, Copy, Debug)]
pub struct CreateVacation {
    /// ID of the entitled [`Employee`].
    pub employee_id: employee::Id,

    /// [`Date`] the entitlement starts at.
    pub start: Date,

    /// Number of entitled days.
    pub total_days: u16,

    /// Monthly salary the [`Vacation`] is valued by.
    pub reference_salary: Money,

    /// [`user::Actor`] creating the [`Vacation`].
    pub initiator: user::Actor,
}

impl<Db> Command<CreateVacation> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<Insert<audit::Entry>, Ok = (), Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Employee>, employee::Id>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<Vacation>,
            Ok = Vacation,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vacation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateVacation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateVacation {
            employee_id,
            start,
            total_days,
            reference_salary,
            initiator,
        } = cmd;

        let vacation =
            Vacation::entitle(employee_id, start, total_days, reference_salary)
                .ok_or(E::InvalidEntitlement {
                    total_days,
                    reference_salary,
                })
                .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        _ = tx
            .execute(Select(By::<Option<Employee>, _>::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EmployeeNotExists(employee_id))
            .map_err(tracerr::wrap!())?;

        let vacation = tx
            .execute(Insert(vacation))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.audit(
            audit::Kind::Create,
            initiator,
            format!(
                "`Vacation(id: {})` of {total_days} day(s) for \
                 `Employee(id: {employee_id})`",
                vacation.id,
            ),
        )
        .await;

        Ok(vacation)
    }
}

/// Error of [`CreateVacation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Employee`] with the provided ID does not exist.
    #[display("`Employee(id: {_0})` does not exist")]
    EmployeeNotExists(#[error(not(source))] employee::Id),

    /// Entitlement has no days or no positive reference salary.
    #[display(
        "Cannot entitle {total_days} day(s) valued by {reference_salary}"
    )]
    InvalidEntitlement {
        /// Requested number of days.
        total_days: u16,

        /// Requested reference salary.
        reference_salary: Money,
    },
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::EmployeeNotExists(_) => error::Kind::NotFound,
            Self::InvalidEntitlement { .. } => error::Kind::InvalidInput,
        }
    }
}
