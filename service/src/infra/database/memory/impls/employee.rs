//! [`Employee`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Period,
};
use tracerr::Traced;

use crate::{
    domain::{employee, Absence, EffectiveSalary, Employee},
    infra::{
        database::{
            self,
            memory::{self, Access},
            Memory,
        },
        Database,
    },
    read::{employee::Active, salary::Current},
};

impl<C> Database<Select<By<Option<Employee>, employee::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Option<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Employee>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.employees.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Active<Employee>>, ()>>> for Memory<C>
where
    C: Access,
{
    type Ok = Vec<Active<Employee>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Active<Employee>>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read(|s| {
            s.employees
                .values()
                .filter(|e| e.is_active())
                .cloned()
                .map(Active)
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Employee>> for Memory<C>
where
    C: Access,
{
    type Ok = Employee;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut employee): Insert<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            employee.id = s.next_id();
            _ = s.employees.insert(employee.id, employee.clone());
            employee
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Employee>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(employee): Update<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            _ = s.employees.insert(employee.id, employee);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Lock<By<Employee, employee::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Employee, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // The whole `Store` is locked by a `Tx` already.
        Ok(())
    }
}

impl<C> Database<Select<By<Option<Current<EffectiveSalary>>, employee::Id>>>
    for Memory<C>
where
    C: Access,
{
    type Ok = Option<Current<EffectiveSalary>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Current<EffectiveSalary>>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let employee_id = by.into_inner();
        self.read(|s| {
            s.salaries
                .values()
                .find(|r| r.employee_id == employee_id && r.is_current())
                .cloned()
                .map(Current)
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<EffectiveSalary>, employee::Id>>> for Memory<C>
where
    C: Access,
{
    type Ok = Vec<EffectiveSalary>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<EffectiveSalary>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let employee_id = by.into_inner();
        self.read(|s| {
            let mut history = s
                .salaries
                .values()
                .filter(|r| r.employee_id == employee_id)
                .cloned()
                .collect::<Vec<_>>();
            history.sort_by_key(|r| r.start);
            history
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<EffectiveSalary>> for Memory<C>
where
    C: Access,
{
    type Ok = EffectiveSalary;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut salary): Insert<EffectiveSalary>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            salary.id = s.next_id();
            _ = s.salaries.insert(salary.id, salary.clone());
            salary
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<EffectiveSalary>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(salary): Update<EffectiveSalary>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            _ = s.salaries.insert(salary.id, salary);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<Absence>, (employee::Id, Period)>>>
    for Memory<C>
where
    C: Access,
{
    type Ok = Option<Absence>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Absence>, (employee::Id, Period)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (employee_id, period) = by.into_inner();
        self.read(|s| {
            s.absences
                .values()
                .find(|a| a.employee_id == employee_id && a.period == period)
                .cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Absence>> for Memory<C>
where
    C: Access,
{
    type Ok = Absence;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut absence): Insert<Absence>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            let is_duplicate = s.absences.values().any(|a| {
                a.employee_id == absence.employee_id
                    && a.period == absence.period
            });
            if is_duplicate {
                return Err(memory::Error::Duplicate("Absence"));
            }
            absence.id = s.next_id();
            _ = s.absences.insert(absence.id, absence.clone());
            Ok(absence)
        })
        .await
        .map_err(tracerr::wrap!())?
        .map_err(tracerr::from_and_wrap!())
    }
}

impl<C> Database<Update<Absence>> for Memory<C>
where
    C: Access,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(absence): Update<Absence>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(move |s| {
            _ = s.absences.insert(absence.id, absence);
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
