//! [`Command`] for deleting an open [`Sheet`].

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{audit, payroll, user, Sheet},
    error::{self, Classify},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting an open [`Sheet`] along with its
/// [`Payment`]s.
///
/// [`Payment`]: crate::domain::Payment
#[derive(Clone, Copy, Debug)]
pub struct DeleteSheet {
    /// ID of the [`Sheet`] to be deleted.
    pub sheet_id: payroll::Id,

    /// [`user::Actor`] deleting the [`Sheet`].
    pub initiator: user::Actor,
}

impl<Db> Command<DeleteSheet> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<Insert<audit::Entry>, Ok = (), Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Sheet, payroll::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Sheet>, payroll::Id>>,
            Ok = Option<Sheet>,
            Err = Traced<database::Error>,
        > + Database<Delete<By<Sheet, payroll::Id>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Sheet;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteSheet) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteSheet {
            sheet_id,
            initiator,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(sheet_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let sheet = tx
            .execute(Select(By::<Option<Sheet>, _>::new(sheet_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SheetNotExists(sheet_id))
            .map_err(tracerr::wrap!())?;
        if sheet.is_closed {
            return Err(tracerr::new!(E::SheetClosed(sheet_id)));
        }

        tx.execute(Delete(By::<Sheet, _>::new(sheet_id)))
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
                "{} `Sheet(id: {sheet_id})` of {} deleted",
                sheet.kind, sheet.period,
            ),
        )
        .await;

        Ok(sheet)
    }
}

/// Error of [`DeleteSheet`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Sheet`] is closed.
    #[display("`Sheet(id: {_0})` is closed")]
    SheetClosed(#[error(not(source))] payroll::Id),

    /// [`Sheet`] with the provided ID does not exist.
    #[display("`Sheet(id: {_0})` does not exist")]
    SheetNotExists(#[error(not(source))] payroll::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::SheetClosed(_) => error::Kind::IllegalState,
            Self::SheetNotExists(_) => error::Kind::NotFound,
        }
    }
}
