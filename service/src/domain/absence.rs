//! [`Absence`] definitions.

use common::Period;

use super::{define_id, employee};
#[cfg(doc)]
use super::Employee;

define_id! {
    #[doc = "ID of an [`Absence`] record."]
    Id
}

/// Monthly count of unjustified absences of an [`Employee`].
///
/// At most one [`Absence`] exists per [`Employee`] and [`Period`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Absence {
    /// ID of this [`Absence`].
    pub id: Id,

    /// ID of the absent [`Employee`].
    pub employee_id: employee::Id,

    /// [`Period`] the absences happened in.
    pub period: Period,

    /// Number of absent days.
    pub count: u16,
}
