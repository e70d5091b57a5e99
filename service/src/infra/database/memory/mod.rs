//! In-memory [`Database`] implementation.
//!
//! Holds the whole dataset behind a single lock. A [`Tx`] owns that lock for
//! its lifetime and works on a staged copy of the [`Store`], which replaces
//! the shared one on [`Commit`] only. Dropping an uncommitted [`Tx`] discards
//! the staged copy.

mod impls;

use std::{collections::BTreeMap, future::Future, sync::Arc};

use common::operations::{Commit, Transact};
use derive_more::{Deref, Display, Error as StdError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracerr::Traced;

use crate::{
    domain::{
        absence, advance, audit, employee, payroll, salary, vacation, Absence,
        Advance, EffectiveSalary, Employee, Payment, Rest, Sheet, Vacation,
    },
    infra::{database, Database},
};

/// In-memory [`Database`] client.
#[derive(Clone, Debug, Default, Deref)]
pub struct Memory<T = NonTx>(T);

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Non-transactional [`Memory`] client.
///
/// Every operation locks the shared [`Store`] for its own duration only.
#[derive(Clone, Debug, Default)]
pub struct NonTx {
    /// Shared [`Store`] of committed data.
    store: Arc<Mutex<Store>>,
}

/// Transactional [`Memory`] client.
#[derive(Clone, Debug)]
pub struct Tx(Arc<Mutex<Option<Staged>>>);

/// Pending changes of a [`Tx`].
#[derive(Debug)]
struct Staged {
    /// Exclusively owned committed [`Store`].
    committed: OwnedMutexGuard<Store>,

    /// Copy of the committed [`Store`] the [`Tx`] works on.
    store: Store,
}

/// Dataset of a [`Memory`] database.
#[derive(Clone, Debug, Default)]
pub struct Store {
    /// Last assigned ID, shared by all the tables.
    last_id: i64,

    /// [`Employee`]s by their IDs.
    employees: BTreeMap<employee::Id, Employee>,

    /// [`EffectiveSalary`]s by their IDs.
    salaries: BTreeMap<salary::Id, EffectiveSalary>,

    /// [`Absence`]s by their IDs.
    absences: BTreeMap<absence::Id, Absence>,

    /// [`Vacation`]s by their IDs.
    vacations: BTreeMap<vacation::Id, Vacation>,

    /// [`Rest`]s by their IDs.
    rests: BTreeMap<vacation::rest::Id, Rest>,

    /// [`Advance`]s by their IDs.
    advances: BTreeMap<advance::Id, Advance>,

    /// Payroll [`Sheet`]s by their IDs.
    sheets: BTreeMap<payroll::Id, Sheet>,

    /// [`Payment`]s by their IDs.
    payments: BTreeMap<payroll::payment::Id, Payment>,

    /// Append-only audit log.
    audit: Vec<audit::Entry>,
}

impl Store {
    /// Assigns a new unique ID.
    fn next_id<I: From<i64>>(&mut self) -> I {
        self.last_id += 1;
        I::from(self.last_id)
    }
}

/// Access to a [`Store`].
pub trait Access {
    /// Runs the provided function over a shared [`Store`] reference.
    ///
    /// # Errors
    ///
    /// If the [`Store`] is not accessible anymore.
    fn read<R>(
        &self,
        f: impl FnOnce(&Store) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;

    /// Runs the provided function over an exclusive [`Store`] reference.
    ///
    /// # Errors
    ///
    /// If the [`Store`] is not accessible anymore.
    fn write<R>(
        &self,
        f: impl FnOnce(&mut Store) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;
}

impl Access for NonTx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&Store) -> R,
    ) -> Result<R, Traced<database::Error>> {
        Ok(f(&*self.store.lock().await))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut Store) -> R,
    ) -> Result<R, Traced<database::Error>> {
        Ok(f(&mut *self.store.lock().await))
    }
}

impl Access for Tx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&Store) -> R,
    ) -> Result<R, Traced<database::Error>> {
        let staged = self.0.lock().await;
        let staged = staged
            .as_ref()
            .ok_or(Error::Finished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        Ok(f(&staged.store))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut Store) -> R,
    ) -> Result<R, Traced<database::Error>> {
        let mut staged = self.0.lock().await;
        let staged = staged
            .as_mut()
            .ok_or(Error::Finished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        Ok(f(&mut staged.store))
    }
}

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        let committed = Arc::clone(&self.0.store).lock_owned().await;
        let store = Store::clone(&committed);
        Ok(Memory(Tx(Arc::new(Mutex::new(Some(Staged {
            committed,
            store,
        }))))))
    }
}

impl Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        let Tx(staged) = &self.0;
        let Staged {
            mut committed,
            store,
        } = staged
            .lock()
            .await
            .take()
            .ok_or(Error::Finished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        *committed = store;
        Ok(())
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Tx`] is already committed.
    #[display("Transaction is already committed")]
    Finished,

    /// Written row duplicates the identity of an existing one.
    #[display("Duplicate `{_0}` row")]
    Duplicate(#[error(not(source))] &'static str),
}

impl Error {
    /// Indicates whether this [`Error`] is caused by a concurrent
    /// modification.
    #[must_use]
    pub fn is_conflict(self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Commit, Insert, Select, Transact},
        Date, DateTime, Period,
    };

    use crate::{
        domain::{employee, payroll, Employee, Sheet},
        error::{Classify as _, Kind},
        infra::Database as _,
    };

    use super::Memory;

    fn employee() -> Employee {
        Employee {
            id: employee::Id::default(),
            person_id: 7.into(),
            admission_date: Date::new(2024, 1, 15).unwrap(),
            termination_date: None,
        }
    }

    #[tokio::test]
    async fn commits_staged_changes() {
        let db = Memory::new();

        let tx = db.execute(Transact).await.unwrap();
        let inserted = tx.execute(Insert(employee())).await.unwrap();
        assert!(inserted.id.is_assigned());
        tx.execute(Commit).await.unwrap();

        let found = db
            .execute(Select(By::<Option<Employee>, _>::new(inserted.id)))
            .await
            .unwrap();
        assert_eq!(found, Some(inserted));
    }

    #[tokio::test]
    async fn rolls_back_on_drop() {
        let db = Memory::new();

        let tx = db.execute(Transact).await.unwrap();
        let inserted = tx.execute(Insert(employee())).await.unwrap();
        drop(tx);

        let found = db
            .execute(Select(By::<Option<Employee>, _>::new(inserted.id)))
            .await
            .unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn fails_after_commit() {
        let db = Memory::new();

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Commit).await.unwrap();

        assert!(tx.execute(Insert(employee())).await.is_err());
        assert!(tx.execute(Commit).await.is_err());
    }

    #[tokio::test]
    async fn reports_duplicate_sheet_as_conflict() {
        let db = Memory::new();
        let sheet = || {
            Sheet::open(
                Period::new(1, 2025).unwrap(),
                payroll::Kind::Salary,
                DateTime::now().coerce(),
            )
        };

        let first = db.execute(Insert(sheet())).await.unwrap();
        let err = db.execute(Insert(sheet())).await.unwrap_err();
        assert!(err.as_ref().is_conflict());
        assert_eq!(err.kind(), Kind::Conflict);

        let found = db
            .execute(Select(By::<Option<Sheet>, _>::new(first.id)))
            .await
            .unwrap();
        assert_eq!(found, Some(first));
    }
}
