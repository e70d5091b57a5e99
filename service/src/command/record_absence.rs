//! [`Command`] for recording monthly [`Absence`]s of an [`Employee`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    Period,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{absence, audit, employee, user, Absence, Employee},
    error::{self, Classify},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recording monthly [`Absence`]s of an [`Employee`].
///
/// Replaces the count of an already recorded [`Period`].
#[derive(Clone, Copy, Debug)]
pub struct RecordAbsence {
    /// ID of the absent [`Employee`].
    pub employee_id: employee::Id,

    /// [`Period`] of the [`Absence`]s.
    pub period: Period,

    /// Number of absent days.
    pub count: u16,

    /// [`user::Actor`] recording the [`Absence`]s.
    pub initiator: user::Actor,
}

impl<Db> Command<RecordAbsence> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<Insert<audit::Entry>, Ok = (), Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Employee, employee::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Employee>, employee::Id>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Absence>, (employee::Id, Period)>>,
            Ok = Option<Absence>,
            Err = Traced<database::Error>,
        > + Database<Insert<Absence>, Ok = Absence, Err = Traced<database::Error>>
        + Database<Update<Absence>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Absence;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecordAbsence,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecordAbsence {
            employee_id,
            period,
            count,
            initiator,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        _ = tx
            .execute(Select(By::<Option<Employee>, _>::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EmployeeNotExists(employee_id))
            .map_err(tracerr::wrap!())?;

        let existing = tx
            .execute(Select(By::<Option<Absence>, _>::new((
                employee_id,
                period,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let (absence, kind) = match existing {
            Some(mut absence) => {
                absence.count = count;
                tx.execute(Update(absence.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
                (absence, audit::Kind::Update)
            }
            None if count == 0 => {
                return Err(tracerr::new!(E::NothingToRecord(period)));
            }
            None => {
                let absence = tx
                    .execute(Insert(Absence {
                        id: absence::Id::default(),
                        employee_id,
                        period,
                        count,
                    }))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;
                (absence, audit::Kind::Create)
            }
        };

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.audit(
            kind,
            initiator,
            format!(
                "`Employee(id: {employee_id})` absent {count} day(s) \
                 in {period}",
            ),
        )
        .await;

        Ok(absence)
    }
}

/// Error of [`RecordAbsence`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Employee`] with the provided ID does not exist.
    #[display("`Employee(id: {_0})` does not exist")]
    EmployeeNotExists(#[error(not(source))] employee::Id),

    /// Zero [`Absence`]s are recorded for a [`Period`] without any.
    #[display("No absences to record in {_0}")]
    NothingToRecord(#[error(not(source))] Period),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::EmployeeNotExists(_) => error::Kind::NotFound,
            Self::NothingToRecord(_) => error::Kind::InvalidInput,
        }
    }
}
