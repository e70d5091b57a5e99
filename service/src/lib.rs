//! Service contains the payroll business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod error;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use std::{error::Error, sync::Arc};

use common::{
    clock::SystemClock,
    operations::{By, Insert, Start},
    Clock, Date, DateTime,
};
use derive_more::Debug;
use smart_default::SmartDefault;
use time::UtcOffset;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{audit, user},
    infra::{database, Database},
};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// UTC offset of the installation time zone, used to derive calendar
    /// dates from the [`Clock`].
    #[default(UtcOffset::UTC)]
    pub utc_offset: UtcOffset,

    /// [`task::EnsureSalarySheet`] configuration.
    pub ensure_salary_sheet: task::ensure_salary_sheet::Config,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Clock`] of this [`Service`].
    clock: Arc<dyn Clock>,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] reading the system wall-clock.
    pub fn new(config: Config, database: Db) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::EnsureSalarySheet<Self>,
                        task::ensure_salary_sheet::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        Self::with_clock(config, database, SystemClock)
    }

    /// Creates a new [`Service`] with the provided [`Clock`].
    pub fn with_clock(
        config: Config,
        database: Db,
        clock: impl Clock + 'static,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::EnsureSalarySheet<Self>,
                        task::ensure_salary_sheet::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Service {
            config,
            database,
            clock: Arc::new(clock),
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn("ensure_salary_sheet", async move {
            svc.execute(Start(By::new(svc.config().ensure_salary_sheet)))
                .await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns the current [`DateTime`] according to the [`Clock`] of this
    /// [`Service`].
    #[must_use]
    pub fn now(&self) -> DateTime {
        self.clock.now()
    }

    /// Returns the current calendar [`Date`] in the installation time zone.
    #[must_use]
    pub fn today(&self) -> Date {
        self.now().date(self.config.utc_offset)
    }

    /// Appends a new [`audit::Entry`] describing a successful mutation.
    ///
    /// Failures are logged and never propagated.
    async fn audit(
        &self,
        kind: audit::Kind,
        actor: user::Actor,
        detail: impl Into<String>,
    ) where
        Db: Database<
            Insert<audit::Entry>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
    {
        let entry = audit::Entry {
            kind,
            actor_id: actor.id,
            at: self.now().coerce(),
            detail: detail.into(),
        };
        if let Err(e) = self.database().execute(Insert(entry)).await {
            log::warn!("failed to record `audit::Entry`: {e}");
        }
    }
}
