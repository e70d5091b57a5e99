//! [`Command`] for adjusting a [`Payment`] of an open [`Sheet`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        audit,
        payroll::{self, payment},
        user, Payment, Sheet,
    },
    error::{self, Classify},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adjusting a [`Payment`] of an open [`Sheet`].
///
/// Replaces the operator-provided [`payment::Adjustments`], keeping the
/// stored deductions, and re-totals the [`Sheet`].
#[derive(Clone, Copy, Debug)]
pub struct UpdatePayment {
    /// ID of the [`Payment`] to be adjusted.
    pub payment_id: payment::Id,

    /// New [`payment::Adjustments`].
    pub adjustments: payment::Adjustments,

    /// [`user::Actor`] adjusting the [`Payment`].
    pub initiator: user::Actor,
}

impl<Db> Command<UpdatePayment> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Payment>, payment::Id>>,
            Ok = Option<Payment>,
            Err = Traced<database::Error>,
        > + Database<Insert<audit::Entry>, Ok = (), Err = Traced<database::Error>>,
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
        > + Database<Update<Sheet>, Err = Traced<database::Error>>
        + Database<Update<Payment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Payment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdatePayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdatePayment {
            payment_id,
            adjustments,
            initiator,
        } = cmd;

        let payment::Adjustments {
            bonus,
            inss_deduction,
            family_salary,
        } = adjustments;
        if let Some(negative) = [bonus, inss_deduction, family_salary]
            .into_iter()
            .find(|m| *m < Money::ZERO)
        {
            return Err(tracerr::new!(E::NegativeAdjustment(negative)));
        }

        let sheet_id = self
            .database()
            .execute(Select(By::<Option<Payment>, _>::new(payment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PaymentNotExists(payment_id))
            .map_err(tracerr::wrap!())?
            .sheet_id;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // The `Sheet` total depends on every of its `Payment`s.
        tx.execute(Lock(By::new(sheet_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut sheet = tx
            .execute(Select(By::<Option<Sheet>, _>::new(sheet_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PaymentNotExists(payment_id))
            .map_err(tracerr::wrap!())?;
        if sheet.is_closed {
            return Err(tracerr::new!(E::SheetClosed(sheet_id)));
        }

        let mut payments = tx
            .execute(Select(By::<Vec<Payment>, _>::new(sheet_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let payment = payments
            .iter_mut()
            .find(|p| p.id == payment_id)
            .ok_or(E::PaymentNotExists(payment_id))
            .map_err(tracerr::wrap!())?;
        payment.adjust(adjustments);
        let payment = payment.clone();

        tx.execute(Update(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        sheet.sum_up(&payments);
        tx.execute(Update(sheet))
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
                "`Payment(id: {payment_id})` adjusted: bonus {bonus}, \
                 INSS {inss_deduction}, family salary {family_salary}",
            ),
        )
        .await;

        Ok(payment)
    }
}

/// Error of [`UpdatePayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Adjustment amount is negative.
    #[display("Adjustment `{_0}` is negative")]
    NegativeAdjustment(#[error(not(source))] Money),

    /// [`Payment`] with the provided ID does not exist.
    #[display("`Payment(id: {_0})` does not exist")]
    PaymentNotExists(#[error(not(source))] payment::Id),

    /// [`Sheet`] of the [`Payment`] is closed.
    #[display("`Sheet(id: {_0})` is closed")]
    SheetClosed(#[error(not(source))] payroll::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NegativeAdjustment(_) => error::Kind::InvalidInput,
            Self::PaymentNotExists(_) => error::Kind::NotFound,
            Self::SheetClosed(_) => error::Kind::IllegalState,
        }
    }
}
