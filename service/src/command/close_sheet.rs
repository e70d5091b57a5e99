//! [`Command`] for closing an open [`Sheet`].

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use itertools::Itertools as _;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{advance, audit, payroll, user, Advance, Payment, Sheet},
    error::{self, Classify},
    infra::{database, Database},
    read::advance::ApprovedUnpaid,
    Service,
};

use super::Command;

/// [`Command`] for closing an open [`Sheet`].
///
/// Every [`Payment`] of the [`Sheet`] becomes paid and its total is frozen.
/// Closing a [`payroll::Kind::Advance`] sheet additionally pays every
/// approved, unpaid and active [`Advance`].
#[derive(Clone, Copy, Debug)]
pub struct CloseSheet {
    /// ID of the [`Sheet`] to be closed.
    pub sheet_id: payroll::Id,

    /// [`user::Actor`] closing the [`Sheet`].
    pub initiator: user::Actor,
}

impl<Db> Command<CloseSheet> for Service<Db>
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
            Select<By<Vec<Payment>, payroll::Id>>,
            Ok = Vec<Payment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<ApprovedUnpaid<Advance>>, ()>>,
            Ok = Vec<ApprovedUnpaid<Advance>>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Advance, advance::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Advance>, Err = Traced<database::Error>>
        + Database<Update<Sheet>, Err = Traced<database::Error>>
        + Database<Update<Payment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Sheet;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CloseSheet) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CloseSheet {
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
            return Err(tracerr::new!(E::AlreadyClosed(sheet_id)));
        }

        let payments = tx
            .execute(Select(By::<Vec<Payment>, _>::new(sheet_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for mut payment in payments.iter().filter(|p| !p.is_paid).cloned() {
            payment.is_paid = true;
            tx.execute(Update(payment))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        let mut paid_advances = Vec::new();
        if sheet.kind == payroll::Kind::Advance {
            let advances = tx
                .execute(Select(By::<Vec<ApprovedUnpaid<Advance>>, _>::new(())))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            for ApprovedUnpaid(mut advance) in advances {
                tx.execute(Lock(By::new(advance.id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
                advance.is_paid = true;
                paid_advances.push(advance.id);
                tx.execute(Update(advance))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
        }

        sheet.sum_up(&payments);
        sheet.is_closed = true;
        tx.execute(Update(sheet.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if !paid_advances.is_empty() {
            log::info!(
                "`Sheet(id: {sheet_id})` closure paid advances: {}",
                paid_advances.iter().join(", "),
            );
        }
        self.audit(
            audit::Kind::Update,
            initiator,
            format!(
                "`Sheet(id: {sheet_id})` closed with total {}",
                sheet.total,
            ),
        )
        .await;

        Ok(sheet)
    }
}

/// Error of [`CloseSheet`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Sheet`] is closed already.
    #[display("`Sheet(id: {_0})` is closed already")]
    AlreadyClosed(#[error(not(source))] payroll::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Sheet`] with the provided ID does not exist.
    #[display("`Sheet(id: {_0})` does not exist")]
    SheetNotExists(#[error(not(source))] payroll::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::AlreadyClosed(_) => error::Kind::IllegalState,
            Self::Db(e) => e.kind(),
            Self::SheetNotExists(_) => error::Kind::NotFound,
        }
    }
}
