//! [`Employee`] definitions.

use common::Date;

use super::define_id;

define_id! {
    #[doc = "ID of an [`Employee`]."]
    Id
}

define_id! {
    #[doc = "ID of the person an [`Employee`] record belongs to."]
    PersonId
}

/// Contractual record of employment tied to a person.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Employee {
    /// ID of this [`Employee`].
    pub id: Id,

    /// ID of the employed person.
    pub person_id: PersonId,

    /// [`Date`] this [`Employee`] was admitted.
    pub admission_date: Date,

    /// [`Date`] this [`Employee`] was terminated, if any.
    pub termination_date: Option<Date>,
}

impl Employee {
    /// Indicates whether this [`Employee`] is active.
    ///
    /// An [`Employee`] is active until a termination [`Date`] is recorded.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.termination_date.is_none()
    }
}
