//! [`Command`] for generating a monthly advance [`Sheet`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted, Update},
    Period,
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

/// [`Command`] for generating a monthly advance [`Sheet`].
///
/// Every approved, unpaid and active [`Advance`] gets a [`Payment`],
/// regardless of its date.
#[derive(Clone, Copy, Debug)]
pub struct CreateAdvanceSheet {
    /// [`Period`] of the new [`Sheet`].
    pub period: Period,

    /// [`user::Actor`] generating the [`Sheet`].
    pub initiator: user::Actor,
}

impl<Db> Command<CreateAdvanceSheet> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<Insert<audit::Entry>, Ok = (), Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Sheet>, (Period, payroll::Kind)>>,
            Ok = Option<Sheet>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<ApprovedUnpaid<Advance>>, ()>>,
            Ok = Vec<ApprovedUnpaid<Advance>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Sheet>, Ok = Sheet, Err = Traced<database::Error>>
        + Database<Update<Sheet>, Err = Traced<database::Error>>
        + Database<Insert<Payment>, Ok = Payment, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Sheet;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateAdvanceSheet,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateAdvanceSheet { period, initiator } = cmd;
        let kind = payroll::Kind::Advance;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let existing = tx
            .execute(Select(By::<Option<Sheet>, _>::new((period, kind))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(sheet) = existing {
            return Err(tracerr::new!(E::SheetExists(sheet.id)));
        }

        let mut sheet = tx
            .execute(Insert(Sheet::open(period, kind, self.now().coerce())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let advances = tx
            .execute(Select(By::<Vec<ApprovedUnpaid<Advance>>, _>::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let mut payments = Vec::with_capacity(advances.len());
        for ApprovedUnpaid(advance) in advances {
            let payment = tx
                .execute(Insert(Payment::advance(sheet.id, &advance)))
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
            audit::Kind::Create,
            initiator,
            format!(
                "{kind} `Sheet(id: {})` of {period} with {} payment(s)",
                sheet.id,
                payments.len(),
            ),
        )
        .await;

        Ok(sheet)
    }
}

/// Error of [`CreateAdvanceSheet`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    ///
    /// A [`Sheet`] of the same [`Period`] and kind inserted concurrently by
    /// another creation is reported here as a conflict, not as
    /// [`ExecutionError::SheetExists`].
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Sheet`] of the same [`Period`] and kind exists already.
    #[display("`Sheet(id: {_0})` exists already")]
    SheetExists(#[error(not(source))] payroll::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::SheetExists(_) => error::Kind::AlreadyExists,
        }
    }
}
