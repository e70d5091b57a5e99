//! [`Vacation`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{
        employee,
        vacation::{self, rest},
        Rest, Vacation,
    },
    infra::{
        database::{self, memory::Access, Memory},
        Database,
    },
};

impl<C> Database<Select<By<Option<Vacation>, vacation::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Option<Vacation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Vacation>, vacation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.vacations.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Vacation>, employee::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Vec<Vacation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Vacation>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let employee_id = by.into_inner();
        self.read(|s| {
            s.vacations
                .values()
                .filter(|v| v.employee_id == employee_id)
                .cloned()
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Vacation>> for Memory<C>
where
    C: Access,
{
    type Ok = Vacation;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut vacation): Insert<Vacation>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            vacation.id = s.next_id();
            _ = s.vacations.insert(vacation.id, vacation.clone());
            vacation
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Vacation>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(vacation): Update<Vacation>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            _ = s.vacations.insert(vacation.id, vacation);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Lock<By<Vacation, vacation::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Vacation, vacation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl<C> Database<Delete<By<Vacation, vacation::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vacation, vacation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.write(|s| {
            s.rests.retain(|_, r| r.vacation_id != id);
            _ = s.vacations.remove(&id);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<Rest>, rest::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Option<Rest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rest>, rest::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.rests.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Rest>, vacation::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Vec<Rest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rest>, vacation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let vacation_id = by.into_inner();
        self.read(|s| {
            s.rests
                .values()
                .filter(|r| r.vacation_id == vacation_id)
                .cloned()
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Rest>> for Memory<C>
where
    C: Access,
{
    type Ok = Rest;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut rest): Insert<Rest>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            rest.id = s.next_id();
            _ = s.rests.insert(rest.id, rest.clone());
            rest
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Rest>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rest): Update<Rest>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            _ = s.rests.insert(rest.id, rest);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Delete<By<Rest, rest::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Rest, rest::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.write(|s| {
            _ = s.rests.remove(&id);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
