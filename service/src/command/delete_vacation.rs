//! [`Command`] for deleting an untouched [`Vacation`].

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{audit, user, vacation, Rest, Vacation},
    error::{self, Classify},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Vacation`] none of whose [`Rest`]s is
/// approved.
///
/// Pending [`Rest`]s are deleted along.
#[derive(Clone, Copy, Debug)]
pub struct DeleteVacation {
    /// ID of the [`Vacation`] to be deleted.
    pub vacation_id: vacation::Id,

    /// [`user::Actor`] deleting the [`Vacation`].
    pub initiator: user::Actor,
}

impl<Db> Command<DeleteVacation> for Service<Db>
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
        > + Database<
            Delete<By<Vacation, vacation::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vacation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteVacation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteVacation {
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

        let vacation = tx
            .execute(Select(By::<Option<Vacation>, _>::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VacationNotExists(vacation_id))
            .map_err(tracerr::wrap!())?;

        let rests = tx
            .execute(Select(By::<Vec<Rest>, _>::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(approved) = rests.iter().find(|r| r.is_approved) {
            return Err(tracerr::new!(E::RestApproved(approved.id)));
        }

        tx.execute(Delete(By::<Vacation, _>::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.audit(
            audit::Kind::Delete,
            initiator,
            format!(
                "`Vacation(id: {vacation_id})` deleted with {} pending \
                 rest(s)",
                rests.len(),
            ),
        )
        .await;

        Ok(vacation)
    }
}

/// Error of [`DeleteVacation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Vacation`] has an approved [`Rest`].
    #[display("`Rest(id: {_0})` of the `Vacation` is approved")]
    RestApproved(#[error(not(source))] vacation::rest::Id),

    /// [`Vacation`] with the provided ID does not exist.
    #[display("`Vacation(id: {_0})` does not exist")]
    VacationNotExists(#[error(not(source))] vacation::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::RestApproved(_) => error::Kind::IllegalState,
            Self::VacationNotExists(_) => error::Kind::NotFound,
        }
    }
}
