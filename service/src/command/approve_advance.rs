//! [`Command`] for approving an [`Advance`].

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
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

/// [`Command`] for approving an [`Advance`].
#[derive(Clone, Copy, Debug)]
pub struct ApproveAdvance {
    /// ID of the [`Advance`] to be approved.
    pub advance_id: advance::Id,

    /// [`user::Actor`] approving the [`Advance`].
    pub initiator: user::Actor,
}

impl<Db> Command<ApproveAdvance> for Service<Db>
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
        > + Database<Update<Advance>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Advance;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ApproveAdvance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ApproveAdvance {
            advance_id,
            initiator,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(advance_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut advance = tx
            .execute(Select(By::<Option<Advance>, _>::new(advance_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::AdvanceNotExists(advance_id))
            .map_err(tracerr::wrap!())?;
        if !advance.is_active {
            return Err(tracerr::new!(E::AdvanceInactive(advance_id)));
        }
        if advance.is_approved {
            return Ok(advance);
        }
        advance.is_approved = true;

        tx.execute(Update(advance.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.audit(
            audit::Kind::Approve,
            initiator,
            format!("`Advance(id: {advance_id})` approved"),
        )
        .await;

        Ok(advance)
    }
}

/// Error of [`ApproveAdvance`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Advance`] is deactivated.
    #[display("`Advance(id: {_0})` is deactivated")]
    AdvanceInactive(#[error(not(source))] advance::Id),

    /// [`Advance`] with the provided ID does not exist.
    #[display("`Advance(id: {_0})` does not exist")]
    AdvanceNotExists(#[error(not(source))] advance::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::AdvanceInactive(_) => error::Kind::IllegalState,
            Self::AdvanceNotExists(_) => error::Kind::NotFound,
            Self::Db(e) => e.kind(),
        }
    }
}
