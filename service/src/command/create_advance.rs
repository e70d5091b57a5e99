//! [`Command`] for requesting a new [`Advance`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Date, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{advance, audit, employee, user, Advance, Employee},
    error::{self, Classify},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for requesting a new [`Advance`].
#[derive(Clone, Copy, Debug)]
pub struct CreateAdvance {
    /// ID of the [`Employee`] requesting the [`Advance`].
    pub employee_id: employee::Id,

    /// Requested amount.
    pub amount: Money,

    /// [`Date`] of the [`Advance`].
    pub date: Date,

    /// [`user::Actor`] registering the [`Advance`].
    pub initiator: user::Actor,
}

impl<Db> Command<CreateAdvance> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<Insert<audit::Entry>, Ok = (), Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Employee>, employee::Id>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<Insert<Advance>, Ok = Advance, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Advance;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateAdvance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateAdvance {
            employee_id,
            amount,
            date,
            initiator,
        } = cmd;

        if !amount.is_positive() {
            return Err(tracerr::new!(E::NonPositiveAmount(amount)));
        }

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

        let advance = tx
            .execute(Insert(Advance {
                id: advance::Id::default(),
                employee_id,
                date,
                amount,
                is_approved: false,
                is_paid: false,
                is_active: true,
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
            format!(
                "`Advance(id: {})` of {amount} for \
                 `Employee(id: {employee_id})`",
                advance.id,
            ),
        )
        .await;

        Ok(advance)
    }
}

/// Error of [`CreateAdvance`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Employee`] with the provided ID does not exist.
    #[display("`Employee(id: {_0})` does not exist")]
    EmployeeNotExists(#[error(not(source))] employee::Id),

    /// [`Advance`] amount is not positive.
    #[display("`Advance` amount `{_0}` is not positive")]
    NonPositiveAmount(#[error(not(source))] Money),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::EmployeeNotExists(_) => error::Kind::NotFound,
            Self::NonPositiveAmount(_) => error::Kind::InvalidInput,
        }
    }
}
