//! [`Command`] for deactivating (soft-deleting) an unpaid [`Advance`].

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

/// [`Command`] for deactivating (soft-deleting) an unpaid [`Advance`].
#[derive(Clone, Copy, Debug)]
pub struct DeactivateAdvance {
    /// ID of the [`Advance`] to be deactivated.
    pub advance_id: advance::Id,

    /// [`user::Actor`] deactivating the [`Advance`].
    pub initiator: user::Actor,
}

impl<Db> Command<DeactivateAdvance> for Service<Db>
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
        cmd: DeactivateAdvance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeactivateAdvance {
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
        if advance.is_paid {
            return Err(tracerr::new!(E::AdvancePaid(advance_id)));
        }
        if !advance.is_active {
            return Ok(advance);
        }
        advance.is_active = false;

        tx.execute(Update(advance.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.audit(
            audit::Kind::Deny,
            initiator,
            format!("`Advance(id: {advance_id})` deactivated"),
        )
        .await;

        Ok(advance)
    }
}

/// Error of [`DeactivateAdvance`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Advance`] with the provided ID does not exist.
    #[display("`Advance(id: {_0})` does not exist")]
    AdvanceNotExists(#[error(not(source))] advance::Id),

    /// [`Advance`] is paid already.
    #[display("`Advance(id: {_0})` is paid already")]
    AdvancePaid(#[error(not(source))] advance::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::AdvanceNotExists(_) => error::Kind::NotFound,
            Self::AdvancePaid(_) => error::Kind::IllegalState,
            Self::Db(e) => e.kind(),
        }
    }
}
