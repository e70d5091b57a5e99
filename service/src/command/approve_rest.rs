//! [`Command`] for approving a pending [`Rest`].

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
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

/// [`Command`] for approving a pending [`Rest`].
///
/// Approval subtracts the [`Rest`] days from its [`Vacation`]. Approving an
/// approved [`Rest`] changes nothing.
#[derive(Clone, Copy, Debug)]
pub struct ApproveRest {
    /// ID of the [`Rest`] to be approved.
    pub rest_id: rest::Id,

    /// [`user::Actor`] approving the [`Rest`].
    pub initiator: user::Actor,
}

impl<Db> Command<ApproveRest> for Service<Db>
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
            Select<By<Option<Vacation>, vacation::Id>>,
            Ok = Option<Vacation>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Rest>, rest::Id>>,
            Ok = Option<Rest>,
            Err = Traced<database::Error>,
        > + Database<Update<Vacation>, Err = Traced<database::Error>>
        + Database<Update<Rest>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rest;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: ApproveRest) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ApproveRest { rest_id, initiator } = cmd;

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

        // Serializes `remaining_days` modifications.
        tx.execute(Lock(By::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut vacation = tx
            .execute(Select(By::<Option<Vacation>, _>::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RestNotExists(rest_id))
            .map_err(tracerr::wrap!())?;
        let mut rest = tx
            .execute(Select(By::<Option<Rest>, _>::new(rest_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RestNotExists(rest_id))
            .map_err(tracerr::wrap!())?;

        let is_approved = vacation
            .approve(&mut rest)
            .map_err(|remaining| E::InsufficientDays {
                requested: rest.days,
                remaining,
            })
            .map_err(tracerr::wrap!())?;
        if !is_approved {
            return Ok(rest);
        }

        tx.execute(Update(rest.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Update(vacation))
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
            format!("`Rest(id: {rest_id})` of {} day(s) approved", rest.days),
        )
        .await;

        Ok(rest)
    }
}

/// Error of [`ApproveRest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Rest`] needs more days than the [`Vacation`] has left.
    #[display("{requested} day(s) requested, but only {remaining} remain")]
    InsufficientDays {
        /// Number of requested days.
        requested: u16,

        /// Number of remaining days of the [`Vacation`].
        remaining: u16,
    },

    /// [`Rest`] with the provided ID does not exist.
    #[display("`Rest(id: {_0})` does not exist")]
    RestNotExists(#[error(not(source))] rest::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::InsufficientDays { .. } => error::Kind::InsufficientDays,
            Self::RestNotExists(_) => error::Kind::NotFound,
        }
    }
}
