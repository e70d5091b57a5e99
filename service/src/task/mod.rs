//! [`Task`] definition.

mod background;
pub mod ensure_salary_sheet;

/// [`Task`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Task;

pub use self::{
    background::{Background, Failure},
    ensure_salary_sheet::EnsureSalarySheet,
};
