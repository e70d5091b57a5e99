//! [`Command`] for deleting a pending [`Rest`].

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        audit, user,
        vacation::{self, rest},
        Rest, Vacation,
    },
    error::{self, Classify},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a pending [`Rest`], releasing its reserved days.
#[derive(Clone, Copy, Debug)]
pub struct DeleteRest {
    /// ID of the [`Rest`] to be deleted.
    pub rest_id: rest::Id,

    /// [`user::Actor`] deleting the [`Rest`].
    pub initiator: user::Actor,
}

impl<Db> Command<DeleteRest> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Rest>, rest::Id>>,
            Ok = Option<Rest>,
            Err = Traced<database::Error>,
        > + Database<Insert<audit::Entry>, Ok = (), Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Vacation, vacation::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Rest>, rest::Id>>,
            Ok = Option<Rest>,
            Err = Traced<database::Error>,
        > + Database<Delete<By<Rest, rest::Id>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rest;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteRest) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteRest { rest_id, initiator } = cmd;

        let vacation_id = self
            .database()
            .execute(Select(By::<Option<Rest>, _>::new(rest_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RestNotExists(rest_id))
            .map_err(tracerr::wrap!())?
            .vacation_id;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoids racing with an approval of the same `Rest`.
        tx.execute(Lock(By::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let rest = tx
            .execute(Select(By::<Option<Rest>, _>::new(rest_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RestNotExists(rest_id))
            .map_err(tracerr::wrap!())?;
        if !rest.is_pending() {
            return Err(tracerr::new!(E::RestApproved(rest_id)));
        }

        tx.execute(Delete(By::<Rest, _>::new(rest_id)))
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
            format!("`Rest(id: {rest_id})` deleted"),
        )
        .await;

        Ok(rest)
    }
}

/// Error of [`DeleteRest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Rest`] is approved already, so cannot be deleted.
    #[display("`Rest(id: {_0})` is approved already")]
    RestApproved(#[error(not(source))] rest::Id),

    /// [`Rest`] with the provided ID does not exist.
    #[display("`Rest(id: {_0})` does not exist")]
    RestNotExists(#[error(not(source))] rest::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::RestApproved(_) => error::Kind::IllegalState,
            Self::RestNotExists(_) => error::Kind::NotFound,
        }
    }
}
