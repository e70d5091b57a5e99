//! [`Advance`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Lock, Select, Update},
    Period,
};
use tracerr::Traced;

use crate::{
    domain::{advance, employee, Advance},
    infra::{
        database::{self, memory::Access, Memory},
        Database,
    },
    read::advance::{ApprovedUnpaid, Disbursed},
};

impl<C> Database<Select<By<Option<Advance>, advance::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Option<Advance>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Advance>, advance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.advances.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Advance>, employee::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Vec<Advance>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Advance>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let employee_id = by.into_inner();
        self.read(|s| {
            s.advances
                .values()
                .filter(|a| a.employee_id == employee_id)
                .cloned()
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<ApprovedUnpaid<Advance>>, ()>>> for Memory<C>
where
    C: Access,
{
    type Ok = Vec<ApprovedUnpaid<Advance>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<ApprovedUnpaid<Advance>>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read(|s| {
            s.advances
                .values()
                .filter(|a| a.is_approved_unpaid())
                .cloned()
                .map(ApprovedUnpaid)
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Disbursed<Advance>>, (employee::Id, Period)>>>
    for Memory<C>
where
    C: Access,
{
    type Ok = Vec<Disbursed<Advance>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Disbursed<Advance>>, (employee::Id, Period)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (employee_id, period) = by.into_inner();
        self.read(|s| {
            s.advances
                .values()
                .filter(|a| {
                    a.employee_id == employee_id && a.is_disbursed_in(period)
                })
                .cloned()
                .map(Disbursed)
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Advance>> for Memory<C>
where
    C: Access,
{
    type Ok = Advance;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut advance): Insert<Advance>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            advance.id = s.next_id();
            _ = s.advances.insert(advance.id, advance.clone());
            advance
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Advance>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(advance): Update<Advance>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            _ = s.advances.insert(advance.id, advance);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Lock<By<Advance, advance::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Advance, advance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl<C> Database<Delete<By<Advance, advance::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Advance, advance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.write(|s| {
            _ = s.advances.remove(&id);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
