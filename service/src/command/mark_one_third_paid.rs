//! [`Command`] for marking the one-third bonus of a [`Vacation`] as paid.

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{audit, user, vacation, Rest, Vacation},
    error::{self, Classify},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for marking the one-third bonus of a [`Vacation`] as paid.
///
/// Settles the [`Vacation`] once everything of it is paid.
#[derive(Clone, Copy, Debug)]
pub struct MarkOneThirdPaid {
    /// ID of the [`Vacation`] whose bonus is paid.
    pub vacation_id: vacation::Id,

    /// [`user::Actor`] paying the bonus.
    pub initiator: user::Actor,
}

impl<Db> Command<MarkOneThirdPaid> for Service<Db>
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
        > + Database<
            Select<By<Vec<Rest>, vacation::Id>>,
            Ok = Vec<Rest>,
            Err = Traced<database::Error>,
        > + Database<Update<Vacation>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vacation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: MarkOneThirdPaid,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let MarkOneThirdPaid {
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
        if vacation.is_one_third_paid {
            return Ok(vacation);
        }
        vacation.is_one_third_paid = true;

        let rests = tx
            .execute(Select(By::<Vec<Rest>, _>::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if vacation.settle(&rests) {
            log::debug!("`Vacation(id: {vacation_id})` is settled");
        }

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
            format!("`Vacation(id: {vacation_id})` one-third bonus paid"),
        )
        .await;

        Ok(vacation)
    }
}

/// Error of [`MarkOneThirdPaid`] [`Command`] execution.
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
