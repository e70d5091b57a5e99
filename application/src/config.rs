//! [`Config`]-related definitions.

use std::time::Duration;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use derive_more::{Display, Error};
use serde::Deserialize;
use smart_default::SmartDefault;
use time::{macros::format_description, UtcOffset};

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Service configuration.
    pub service: Service,

    /// Postgres configuration.
    pub postgres: Postgres,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the `CONF__`-prefixed environment variables (if
    ///   any), where `__` separates nested keys;
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("CONF")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

/// Service configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// UTC offset of the installation time zone, like `-03:00`.
    #[default("+00:00".to_owned())]
    pub utc_offset: String,

    /// Service tasks configuration.
    pub tasks: Tasks,
}

impl TryFrom<Service> for service::Config {
    type Error = InvalidUtcOffset;

    fn try_from(value: Service) -> Result<Self, Self::Error> {
        let Service {
            utc_offset,
            tasks: Tasks {
                ensure_salary_sheet,
            },
        } = value;

        let utc_offset = UtcOffset::parse(
            &utc_offset,
            format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
        )
        .map_err(|_| InvalidUtcOffset(utc_offset))?;

        Ok(Self {
            utc_offset,
            ensure_salary_sheet: service::task::ensure_salary_sheet::Config {
                interval: ensure_salary_sheet.interval,
                timeout: ensure_salary_sheet.timeout,
            },
        })
    }
}

/// Error of parsing the [`Service::utc_offset`].
#[derive(Clone, Debug, Display, Error)]
#[display("`{_0}` is not a valid UTC offset, expected `±HH:MM`")]
pub struct InvalidUtcOffset(#[error(not(source))] pub String);

/// Service tasks configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Tasks {
    /// `EnsureSalarySheet` task configuration.
    pub ensure_salary_sheet: Task,
}

/// Service task configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Task {
    /// Task execution interval.
    #[default(Duration::from_secs(60 * 60 * 24))]
    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    /// Maximum duration of a single task execution.
    #[default(Duration::from_secs(60))]
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

/// Postgres configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Host to connect to.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port to connect to.
    #[default(5432)]
    pub port: u16,

    /// User to connect as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password to connect with.
    #[default("postgres".to_owned())]
    pub password: String,

    /// Database name to connect to.
    #[default("payroll".to_owned())]
    pub dbname: String,
}

impl From<Postgres> for service::infra::postgres::Config {
    fn from(value: Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
        } = value;

        Self {
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            dbname: Some(dbname),
            ..Self::default()
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use super::{Config, Service};

    #[test]
    fn falls_back_to_defaults() {
        let config = Config::new("does-not-exist").unwrap();

        assert_eq!(config.service.utc_offset, "+00:00");
        assert_eq!(
            config.service.tasks.ensure_salary_sheet.interval,
            Duration::from_secs(86_400),
        );
        assert_eq!(
            config.service.tasks.ensure_salary_sheet.timeout,
            Duration::from_secs(60),
        );
        assert_eq!(config.postgres.port, 5432);
    }

    #[test]
    fn parses_utc_offset() {
        let conf = service::Config::try_from(Service {
            utc_offset: "-03:00".to_owned(),
            ..Service::default()
        })
        .unwrap();
        assert_eq!(conf.utc_offset.whole_hours(), -3);

        let err = service::Config::try_from(Service {
            utc_offset: "Brasilia".to_owned(),
            ..Service::default()
        })
        .unwrap_err();
        assert_eq!(err.0, "Brasilia");
    }
}
