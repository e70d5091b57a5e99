//! [`Command`] for re-dating a pending [`Rest`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    Date,
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

/// [`Command`] for re-dating a pending [`Rest`].
#[derive(Clone, Copy, Debug)]
pub struct UpdateRest {
    /// ID of the [`Rest`] to be re-dated.
    pub rest_id: rest::Id,

    /// New first day of the [`Rest`].
    pub start: Date,

    /// New last day of the [`Rest`] (inclusive).
    pub end: Date,

    /// [`user::Actor`] re-dating the [`Rest`].
    pub initiator: user::Actor,
}

impl<Db> Command<UpdateRest> for Service<Db>
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
            Select<By<Vec<Rest>, vacation::Id>>,
            Ok = Vec<Rest>,
            Err = Traced<database::Error>,
        > + Database<Update<Rest>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rest;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateRest) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRest {
            rest_id,
            start,
            end,
            initiator,
        } = cmd;

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

        tx.execute(Lock(By::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let vacation = tx
            .execute(Select(By::<Option<Vacation>, _>::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RestNotExists(rest_id))
            .map_err(tracerr::wrap!())?;
        let rests = tx
            .execute(Select(By::<Vec<Rest>, _>::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let current = rests
            .iter()
            .find(|r| r.id == rest_id)
            .ok_or(E::RestNotExists(rest_id))
            .map_err(tracerr::wrap!())?;
        if !current.is_pending() {
            return Err(tracerr::new!(E::RestApproved(rest_id)));
        }

        let mut rest = Rest::pending(&vacation, start, end)
            .ok_or(E::InvalidRange { start, end })
            .map_err(tracerr::wrap!())?;
        rest.id = rest_id;

        let others = rests
            .iter()
            .filter(|r| r.is_pending() && r.id != rest_id)
            .collect::<Vec<_>>();
        if !vacation.can_reserve(rest.days, &others) {
            return Err(tracerr::new!(E::InsufficientDays {
                requested: rest.days,
                remaining: vacation.remaining_days,
            }));
        }

        tx.execute(Update(rest.clone()))
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
            format!("`Rest(id: {rest_id})` moved to {start}..={end}"),
        )
        .await;

        Ok(rest)
    }
}

/// Error of [`UpdateRest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Rest`] needs more days than the [`Vacation`] has left.
    #[display(
        "{requested} day(s) requested, but only {remaining} remain \
         (other pending rests included)"
    )]
    InsufficientDays {
        /// Number of requested days.
        requested: u16,

        /// Number of remaining days of the [`Vacation`].
        remaining: u16,
    },

    /// [`Rest`] ends before it starts.
    #[display("`{end}` precedes `{start}`")]
    InvalidRange {
        /// First day of the range.
        start: Date,

        /// Last day of the range.
        end: Date,
    },

    /// [`Rest`] is approved already, so cannot be edited.
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
            Self::InsufficientDays { .. } => error::Kind::InsufficientDays,
            Self::InvalidRange { .. } => error::Kind::InvalidRange,
            Self::RestApproved(_) => error::Kind::IllegalState,
            Self::RestNotExists(_) => error::Kind::NotFound,
        }
    }
}
