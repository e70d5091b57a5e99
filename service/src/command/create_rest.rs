//! [`Command`] for scheduling a new [`Rest`] out of a [`Vacation`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    Date,
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

/// [`Command`] for scheduling a new [`Rest`] out of a [`Vacation`].
///
/// The new [`Rest`] is pending and reserves its days until approved.
#[derive(Clone, Copy, Debug)]
pub struct CreateRest {
    /// ID of the [`Vacation`] the [`Rest`] is taken from.
    pub vacation_id: vacation::Id,

    /// First day of the [`Rest`].
    pub start: Date,

    /// Last day of the [`Rest`] (inclusive).
    pub end: Date,

    /// [`user::Actor`] scheduling the [`Rest`].
    pub initiator: user::Actor,
}

impl<Db> Command<CreateRest> for Service<Db>
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
        > + Database<Insert<Rest>, Ok = Rest, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rest;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRest) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRest {
            vacation_id,
            start,
            end,
            initiator,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serializes reservations of the same `Vacation` days.
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
        if vacation.is_paid {
            return Err(tracerr::new!(E::VacationPaid(vacation_id)));
        }

        let rest = Rest::pending(&vacation, start, end)
            .ok_or(E::InvalidRange { start, end })
            .map_err(tracerr::wrap!())?;

        let rests = tx
            .execute(Select(By::<Vec<Rest>, _>::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let pending = rests.iter().filter(|r| r.is_pending()).collect::<Vec<_>>();
        if !vacation.can_reserve(rest.days, &pending) {
            return Err(tracerr::new!(E::InsufficientDays {
                requested: rest.days,
                remaining: vacation.remaining_days,
            }));
        }

        let rest = tx
            .execute(Insert(rest))
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
                "`Rest(id: {})` from {start} to {end} out of \
                 `Vacation(id: {vacation_id})`",
                rest.id,
            ),
        )
        .await;

        Ok(rest)
    }
}

/// Error of [`CreateRest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Rest`] needs more days than the [`Vacation`] has left.
    #[display(
        "{requested} day(s) requested, but only {remaining} remain \
         (pending rests included)"
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

    /// [`Vacation`] with the provided ID does not exist.
    #[display("`Vacation(id: {_0})` does not exist")]
    VacationNotExists(#[error(not(source))] vacation::Id),

    /// [`Vacation`] is paid already.
    #[display("`Vacation(id: {_0})` is paid already")]
    VacationPaid(#[error(not(source))] vacation::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::InsufficientDays { .. } => error::Kind::InsufficientDays,
            Self::InvalidRange { .. } => error::Kind::InvalidRange,
            Self::VacationNotExists(_) => error::Kind::NotFound,
            Self::VacationPaid(_) => error::Kind::IllegalState,
        }
    }
}
