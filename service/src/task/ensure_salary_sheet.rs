//! [`EnsureSalarySheet`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::{
    operations::{By, Perform, Select, Start},
    Date, Period,
};
use derive_more::{Display, Error as StdError, From};
use smart_default::SmartDefault;
use tokio::time::{interval, timeout};
use tracerr::Traced;
use tracing as log;

use crate::{
    command::{
        create_salary_sheet, recompute_salary_sheet, CreateSalarySheet,
        RecomputeSalarySheet,
    },
    domain::{payroll, user, Sheet},
    error::{self, Classify},
    infra::{database, Database},
    Service,
};

use super::Task;

/// Configuration for [`EnsureSalarySheet`] [`Task`].
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Interval between checks of the current month salary [`Sheet`].
    #[default(time::Duration::from_secs(60 * 60 * 24))]
    pub interval: time::Duration,

    /// Maximum duration of a single check.
    #[default(time::Duration::from_secs(60))]
    pub timeout: time::Duration,
}

/// [`Task`] keeping the salary [`Sheet`] of the current month up to date.
///
/// Generates the [`Sheet`] when it's missing, recomputes it while it's open,
/// and leaves a closed one untouched.
#[derive(Clone, Copy, Debug)]
pub struct EnsureSalarySheet<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<S> EnsureSalarySheet<S> {
    /// Creates a new [`EnsureSalarySheet`] [`Task`] over the provided
    /// [`Service`].
    #[must_use]
    pub fn new(config: Config, service: S) -> Self {
        Self { config, service }
    }
}

impl<Db> Task<Start<By<EnsureSalarySheet<Self>, Config>>> for Service<Db>
where
    EnsureSalarySheet<Service<Db>>:
        Task<Perform<Date>, Ok = Outcome, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<EnsureSalarySheet<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let task = EnsureSalarySheet::new(by.into_inner(), self.clone());

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;

            let today = self.today();
            match timeout(task.config.timeout, task.execute(Perform(today)))
                .await
            {
                Ok(Ok(outcome)) => {
                    log::debug!(
                        "`task::EnsureSalarySheet` for {}: {outcome}",
                        today.period(),
                    );
                }
                Ok(Err(e)) => {
                    log::error!("`task::EnsureSalarySheet` failed: {e}");
                }
                Err(_) => {
                    log::error!(
                        "`task::EnsureSalarySheet` timed out after {:?}",
                        task.config.timeout,
                    );
                }
            }
        }
    }
}

impl<Db> Task<Perform<Date>> for EnsureSalarySheet<Service<Db>>
where
    Db: Database<
        Select<By<Option<Sheet>, (Period, payroll::Kind)>>,
        Ok = Option<Sheet>,
        Err = Traced<database::Error>,
    >,
    Service<Db>: Task<
            CreateSalarySheet,
            Ok = Sheet,
            Err = Traced<create_salary_sheet::ExecutionError>,
        > + Task<
            RecomputeSalarySheet,
            Ok = Sheet,
            Err = Traced<recompute_salary_sheet::ExecutionError>,
        >,
{
    type Ok = Outcome;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Perform(today): Perform<Date>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let period = today.period();
        let existing = self
            .service
            .database()
            .execute(Select(By::<Option<Sheet>, _>::new((
                period,
                payroll::Kind::Salary,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(match existing {
            None => Outcome::Created(
                self.service
                    .execute(CreateSalarySheet {
                        period,
                        initiator: user::Actor::SYSTEM,
                    })
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?,
            ),
            Some(sheet) if sheet.is_closed => Outcome::Closed(sheet),
            Some(sheet) => Outcome::Recomputed(
                self.service
                    .execute(RecomputeSalarySheet {
                        sheet_id: sheet.id,
                        initiator: user::Actor::SYSTEM,
                    })
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?,
            ),
        })
    }
}

/// Result of a single [`EnsureSalarySheet`] run.
#[derive(Clone, Debug, Display)]
pub enum Outcome {
    /// Missing [`Sheet`] has been generated.
    #[display("`Sheet(id: {})` generated", _0.id)]
    Created(Sheet),

    /// Open [`Sheet`] has been recomputed.
    #[display("`Sheet(id: {})` recomputed", _0.id)]
    Recomputed(Sheet),

    /// [`Sheet`] is closed, so nothing has been done.
    #[display("`Sheet(id: {})` is closed", _0.id)]
    Closed(Sheet),
}

impl Outcome {
    /// Returns the [`Sheet`] this [`Outcome`] is about.
    #[must_use]
    pub fn sheet(&self) -> &Sheet {
        match self {
            Self::Created(s) | Self::Recomputed(s) | Self::Closed(s) => s,
        }
    }
}

/// Error of [`EnsureSalarySheet`] execution.
#[derive(Debug, Display, From, StdError)]
pub enum ExecutionError {
    /// Generating the [`Sheet`] failed.
    #[display("Generating salary `Sheet` failed: {_0}")]
    Create(create_salary_sheet::ExecutionError),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Recomputing the [`Sheet`] failed.
    #[display("Recomputing salary `Sheet` failed: {_0}")]
    Recompute(recompute_salary_sheet::ExecutionError),
}

impl Classify for ExecutionError {
    fn kind(&self) -> error::Kind {
        match self {
            Self::Create(e) => e.kind(),
            Self::Db(e) => e.kind(),
            Self::Recompute(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{
        clock::ManualClock,
        operations::{By, Perform, Select},
        Date, DateTime, Money, Period,
    };
    use rust_decimal::Decimal;

    use crate::{
        command::{
            ChangeEffectiveSalary, CloseSheet, Command as _, CreateEmployee,
        },
        domain::{payroll, user, Payment},
        infra::{Database as _, Memory},
        Config, Service,
    };

    use super::{EnsureSalarySheet, Outcome, Task as _};

    fn service() -> (Service<Memory>, ManualClock) {
        let clock = ManualClock::new(
            DateTime::from_rfc3339("2025-03-10T12:00:00Z").unwrap(),
        );
        let (service, _) = Service::with_clock(
            Config::default(),
            Memory::new(),
            clock.clone(),
        );
        (service, clock)
    }

    #[tokio::test]
    async fn generates_then_recomputes_then_skips_closed() {
        let (service, _) = service();
        let employee = service
            .execute(CreateEmployee {
                person_id: 1.into(),
                admission_date: Date::new(2025, 1, 1).unwrap(),
                initiator: user::Actor::SYSTEM,
            })
            .await
            .unwrap();
        _ = service
            .execute(ChangeEffectiveSalary {
                employee_id: employee.id,
                amount: Money::new(Decimal::new(3000, 0)),
                initiator: user::Actor::SYSTEM,
            })
            .await
            .unwrap();

        let task = EnsureSalarySheet::new(
            service.config().ensure_salary_sheet,
            service.clone(),
        );
        let today = Date::new(2025, 3, 10).unwrap();

        let created = task.execute(Perform(today)).await.unwrap();
        assert!(matches!(created, Outcome::Created(_)), "{created}");
        let sheet = created.sheet().clone();
        assert_eq!(sheet.period, Period::new(3, 2025).unwrap());
        assert_eq!(sheet.kind, payroll::Kind::Salary);
        assert_eq!(sheet.total, Money::new(Decimal::new(3000, 0)));

        let recomputed = task.execute(Perform(today)).await.unwrap();
        assert!(matches!(recomputed, Outcome::Recomputed(_)), "{recomputed}");
        assert_eq!(recomputed.sheet().id, sheet.id);
        assert_eq!(recomputed.sheet().total, sheet.total);

        let payments = service
            .database()
            .execute(Select(By::<Vec<Payment>, _>::new(sheet.id)))
            .await
            .unwrap();
        assert_eq!(payments.len(), 1);

        _ = service
            .execute(CloseSheet {
                sheet_id: sheet.id,
                initiator: user::Actor::SYSTEM,
            })
            .await
            .unwrap();
        let skipped = task.execute(Perform(today)).await.unwrap();
        assert!(matches!(skipped, Outcome::Closed(_)), "{skipped}");
    }
}
