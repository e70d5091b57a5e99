//! Payroll [`Sheet`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Lock, Select, Update},
    Period,
};
use tracerr::Traced;

use crate::{
    domain::{
        payroll::{self, payment},
        Payment, Sheet,
    },
    infra::{
        database::{
            self,
            memory::{self, Access},
            Memory,
        },
        Database,
    },
};

impl<C> Database<Select<By<Option<Sheet>, payroll::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Option<Sheet>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Sheet>, payroll::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.sheets.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<Sheet>, (Period, payroll::Kind)>>>
    for Memory<C>
where
    C: Access,
{
    type Ok = Option<Sheet>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Sheet>, (Period, payroll::Kind)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (period, kind) = by.into_inner();
        self.read(|s| {
            s.sheets
                .values()
                .find(|sh| sh.period == period && sh.kind == kind)
                .cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Sheet>, ()>>> for Memory<C>
where
    C: Access,
{
    type Ok = Vec<Sheet>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Sheet>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read(|s| {
            let mut sheets = s.sheets.values().cloned().collect::<Vec<_>>();
            sheets.sort_by_key(|sh| (sh.period, sh.kind.u8()));
            sheets
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Sheet>> for Memory<C>
where
    C: Access,
{
    type Ok = Sheet;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut sheet): Insert<Sheet>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            let is_duplicate = s
                .sheets
                .values()
                .any(|sh| sh.period == sheet.period && sh.kind == sheet.kind);
            if is_duplicate {
                return Err(memory::Error::Duplicate("Sheet"));
            }
            sheet.id = s.next_id();
            _ = s.sheets.insert(sheet.id, sheet.clone());
            Ok(sheet)
        })
        .await
        .map_err(tracerr::wrap!())?
        .map_err(tracerr::from_and_wrap!())
    }
}

impl<C> Database<Update<Sheet>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(sheet): Update<Sheet>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            _ = s.sheets.insert(sheet.id, sheet);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Lock<By<Sheet, payroll::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Sheet, payroll::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl<C> Database<Delete<By<Sheet, payroll::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Sheet, payroll::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.write(|s| {
            s.payments.retain(|_, p| p.sheet_id != id);
            _ = s.sheets.remove(&id);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<Payment>, payment::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.payments.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Payment>, payroll::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Vec<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Payment>, payroll::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sheet_id = by.into_inner();
        self.read(|s| {
            s.payments
                .values()
                .filter(|p| p.sheet_id == sheet_id)
                .cloned()
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Payment>> for Memory<C>
where
    C: Access,
{
    type Ok = Payment;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            payment.id = s.next_id();
            _ = s.payments.insert(payment.id, payment.clone());
            payment
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Payment>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(payment): Update<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            _ = s.payments.insert(payment.id, payment);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Delete<By<Vec<Payment>, payroll::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<Payment>, payroll::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sheet_id = by.into_inner();
        self.write(|s| s.payments.retain(|_, p| p.sheet_id != sheet_id))
            .await
            .map_err(tracerr::wrap!())
    }
}
