//! [`Command`] for paying an approved [`Rest`].

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

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

/// [`Command`] for paying an approved [`Rest`].
///
/// Settles the [`Vacation`] once everything of it is paid.
#[derive(Clone, Copy, Debug)]
pub struct PayRest {
    /// ID of the [`Rest`] to be paid.
    pub rest_id: rest::Id,

    /// [`user::Actor`] paying the [`Rest`].
    pub initiator: user::Actor,
}

impl<Db> Command<PayRest> for Service<Db>
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
        > + Database<Update<Vacation>, Err = Traced<database::Error>>
        + Database<Update<Rest>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rest;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: PayRest) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let PayRest { rest_id, initiator } = cmd;

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

        let mut vacation = tx
            .execute(Select(By::<Option<Vacation>, _>::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RestNotExists(rest_id))
            .map_err(tracerr::wrap!())?;
        let mut rests = tx
            .execute(Select(By::<Vec<Rest>, _>::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let rest = rests
            .iter_mut()
            .find(|r| r.id == rest_id)
            .ok_or(E::RestNotExists(rest_id))
            .map_err(tracerr::wrap!())?;
        if !rest.is_approved {
            return Err(tracerr::new!(E::RestNotApproved(rest_id)));
        }
        if rest.is_paid {
            return Ok(rest.clone());
        }
        rest.is_paid = true;
        let rest = rest.clone();

        tx.execute(Update(rest.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let is_settled = vacation.settle(&rests);
        if is_settled {
            tx.execute(Update(vacation))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if is_settled {
            log::debug!("`Vacation(id: {vacation_id})` is settled");
        }
        self.audit(
            audit::Kind::Update,
            initiator,
            format!("`Rest(id: {rest_id})` paid"),
        )
        .await;

        Ok(rest)
    }
}

/// Error of [`PayRest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Rest`] is not approved yet.
    #[display("`Rest(id: {_0})` is not approved")]
    RestNotApproved(#[error(not(source))] rest::Id),

    /// [`Rest`] with the provided ID does not exist.
    #[display("`Rest(id: {_0})` does not exist")]
    RestNotExists(#[error(not(source))] rest::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::RestNotApproved(_) => error::Kind::IllegalState,
            Self::RestNotExists(_) => error::Kind::NotFound,
        }
    }
}
