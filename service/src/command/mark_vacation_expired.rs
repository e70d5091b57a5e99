//! [`Command`] for marking a [`Vacation`] as expired.

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{audit, user, vacation, Vacation},
    error::{self, Classify},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for marking a [`Vacation`] as expired.
///
/// Expiration is only recorded: it neither blocks nor alters any other
/// [`Vacation`] transition.
#[derive(Clone, Copy, Debug)]
pub struct MarkVacationExpired {
    /// ID of the expired [`Vacation`].
    pub vacation_id: vacation::Id,

    /// [`user::Actor`] marking the [`Vacation`].
    pub initiator: user::Actor,
}

impl<Db> Command<MarkVacationExpired> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<Insert<audit::Entry>, Ok = (), Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Vacation, vacation::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Vacation>, vacation::Id>>,
            Ok = Option<Vacation>,
            Err = Traced<database::Error>,
        > + Database<Update<Vacation>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vacation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: MarkVacationExpired,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let MarkVacationExpired {
            vacation_id,
            initiator,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut vacation = tx
            .execute(Select(By::<Option<Vacation>, _>::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VacationNotExists(vacation_id))
            .map_err(tracerr::wrap!())?;
        if vacation.is_expired {
            return Ok(vacation);
        }
        vacation.is_expired = true;

        tx.execute(Update(vacation.clone()))
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
            format!("`Vacation(id: {vacation_id})` expired"),
        )
        .await;

        Ok(vacation)
    }
}

/// Error of [`MarkVacationExpired`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Vacation`] with the provided ID does not exist.
    #[display("`Vacation(id: {_0})` does not exist")]
    VacationNotExists(#[error(not(source))] vacation::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::VacationNotExists(_) => error::Kind::NotFound,
        }
    }
}
