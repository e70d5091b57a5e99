//! [`Command`] for rebuilding an open advance [`Sheet`].

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{audit, payroll, user, Advance, Payment, Sheet},
    error::{self, Classify},
    infra::{database, Database},
    read::advance::ApprovedUnpaid,
    Service,
};

use super::Command;

/// [`Command`] for rebuilding an open advance [`Sheet`] out of the
/// currently approved, unpaid and active [`Advance`]s.
#[derive(Clone, Copy, Debug)]
pub struct RecomputeAdvanceSheet {
    /// ID of the [`Sheet`] to be rebuilt.
    pub sheet_id: payroll::Id,

    /// [`user::Actor`] rebuilding the [`Sheet`].
    pub initiator: user::Actor,
}

impl<Db> Command<RecomputeAdvanceSheet> for Service<Db>
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
        > + Database<
            Select<By<Vec<ApprovedUnpaid<Advance>>, ()>>,
            Ok = Vec<ApprovedUnpaid<Advance>>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Vec<Payment>, payroll::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Sheet>, Err = Traced<database::Error>>
        + Database<Insert<Payment>, Ok = Payment, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Sheet;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecomputeAdvanceSheet,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecomputeAdvanceSheet {
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

        let mut sheet = tx
            .execute(Select(By::<Option<Sheet>, _>::new(sheet_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SheetNotExists(sheet_id))
            .map_err(tracerr::wrap!())?;
        if sheet.is_closed {
            return Err(tracerr::new!(E::SheetClosed(sheet_id)));
        }
        if sheet.kind != payroll::Kind::Advance {
            return Err(tracerr::new!(E::NotAdvanceSheet(sheet_id)));
        }

        tx.execute(Delete(By::<Vec<Payment>, _>::new(sheet_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let advances = tx
            .execute(Select(By::<Vec<ApprovedUnpaid<Advance>>, _>::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let mut payments = Vec::with_capacity(advances.len());
        for ApprovedUnpaid(advance) in advances {
            let payment = tx
                .execute(Insert(Payment::advance(sheet_id, &advance)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            payments.push(payment);
        }

        sheet.sum_up(&payments);
        tx.execute(Update(sheet.clone()))
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
            format!(
                "`Sheet(id: {sheet_id})` rebuilt with {} payment(s), \
                 total {}",
                payments.len(),
                sheet.total,
            ),
        )
        .await;

        Ok(sheet)
    }
}

/// Error of [`RecomputeAdvanceSheet`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Sheet`] is not a [`payroll::Kind::Advance`] one.
    #[display("`Sheet(id: {_0})` is not an advance sheet")]
    NotAdvanceSheet(#[error(not(source))] payroll::Id),

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
            Self::NotAdvanceSheet(_) => error::Kind::InvalidInput,
            Self::SheetClosed(_) => error::Kind::IllegalState,
            Self::SheetNotExists(_) => error::Kind::NotFound,
        }
    }
}
