//! [`Error`]-related definitions.

use std::fmt;

use derive_more::Error as StdError;
use itertools::Itertools as _;
use service::error::{Classify, Kind};
use tracerr::{Trace, Traced};

/// Error exposed to the HTTP layer.
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Creates a new [`Error`] of the provided [`Kind`].
    #[must_use]
    pub fn new(kind: Kind, msg: &impl ToString) -> Self {
        Self {
            code: code(kind),
            status_code: status_code(kind),
            message: msg.to_string(),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Returns the stable [`Code`] of the provided [`Kind`].
#[must_use]
pub fn code(kind: Kind) -> Code {
    match kind {
        Kind::NotFound => "NOT_FOUND",
        Kind::InvalidInput => "INVALID_INPUT",
        Kind::InvalidRange => "INVALID_RANGE",
        Kind::InsufficientDays => "INSUFFICIENT_DAYS",
        Kind::IllegalState => "ILLEGAL_STATE",
        Kind::AlreadyExists => "ALREADY_EXISTS",
        Kind::Conflict => "CONFLICT",
        Kind::Forbidden => "FORBIDDEN",
        Kind::Internal => "INTERNAL_SERVER_ERROR",
    }
}

/// Returns the [`http::StatusCode`] the provided [`Kind`] is reported with.
#[must_use]
pub fn status_code(kind: Kind) -> http::StatusCode {
    use http::StatusCode as S;

    match kind {
        Kind::NotFound => S::NOT_FOUND,
        Kind::InvalidInput | Kind::InvalidRange | Kind::InsufficientDays => {
            S::BAD_REQUEST
        }
        Kind::IllegalState | Kind::AlreadyExists | Kind::Conflict => {
            S::CONFLICT
        }
        Kind::Forbidden => S::FORBIDDEN,
        Kind::Internal => S::INTERNAL_SERVER_ERROR,
    }
}

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error;

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: Sized,
    {
        self.as_error()
    }
}

impl<E: Classify + fmt::Display> AsError for Traced<E> {
    fn as_error(&self) -> Error {
        let kind = self.as_ref().kind();
        let mut error = Error::new(kind, self.as_ref());
        // Infrastructure details are not exposed.
        if kind == Kind::Internal {
            error.message = "Internal server error".to_owned();
        }
        error.backtrace = Some(self.trace().clone());
        error
    }
}

#[cfg(test)]
mod spec {
    use derive_more::{Display, Error as StdError};
    use service::error::{Classify, Kind};

    use super::{status_code, AsError as _};

    #[derive(Debug, Display, StdError)]
    #[display("`Rest(id: 3)` is approved")]
    struct RestApproved;

    impl Classify for RestApproved {
        fn kind(&self) -> Kind {
            Kind::IllegalState
        }
    }

    #[test]
    fn maps_kinds_to_status_codes() {
        for (kind, status) in [
            (Kind::NotFound, 404),
            (Kind::InvalidInput, 400),
            (Kind::InvalidRange, 400),
            (Kind::InsufficientDays, 400),
            (Kind::IllegalState, 409),
            (Kind::AlreadyExists, 409),
            (Kind::Conflict, 409),
            (Kind::Forbidden, 403),
            (Kind::Internal, 500),
        ] {
            assert_eq!(status_code(kind).as_u16(), status, "{kind}");
        }
    }

    #[test]
    fn keeps_message_and_trace_of_traced_error() {
        let err = tracerr::new!(RestApproved).as_error();

        assert_eq!(err.code, "ILLEGAL_STATE");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);
        assert_eq!(err.message, "`Rest(id: 3)` is approved");
        assert!(err.backtrace.is_some());
    }
}
