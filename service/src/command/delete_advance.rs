//! [`Command`] for hard-deleting an [`Advance`].

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{advance, audit, user, Advance},
    error::{self, Classify},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for hard-deleting an [`Advance`].
///
/// Allowed to [`user::Role::Admin`]s only.
#[derive(Clone, Copy, Debug)]
pub struct DeleteAdvance {
    /// ID of the [`Advance`] to be deleted.
    pub advance_id: advance::Id,

    /// [`user::Actor`] deleting the [`Advance`].
    pub initiator: user::Actor,
}

impl<Db> Command<DeleteAdvance> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<Insert<audit::Entry>, Ok = (), Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Advance, advance::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Advance>, advance::Id>>,
            Ok = Option<Advance>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Advance, advance::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Advance;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteAdvance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteAdvance {
            advance_id,
            initiator,
        } = cmd;

        if !initiator.is_admin() {
            return Err(tracerr::new!(E::NotAdmin(initiator.id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(advance_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let advance = tx
            .execute(Select(By::<Option<Advance>, _>::new(advance_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::AdvanceNotExists(advance_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<Advance, _>::new(advance_id)))
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
            format!("`Advance(id: {advance_id})` deleted"),
        )
        .await;

        Ok(advance)
    }
}

/// Error of [`DeleteAdvance`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Advance`] with the provided ID does not exist.
    #[display("`Advance(id: {_0})` does not exist")]
    AdvanceNotExists(#[error(not(source))] advance::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Acting user is not an administrator.
    #[display("`User(id: {_0})` is not an administrator")]
    NotAdmin(#[error(not(source))] user::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::AdvanceNotExists(_) => error::Kind::NotFound,
            Self::Db(e) => e.kind(),
            Self::NotAdmin(_) => error::Kind::Forbidden,
        }
    }
}
