//! Platform user definitions.
//!
//! Users are authenticated outside of this crate, so only their identity and
//! role reach the payroll core.

use common::define_kind;

use super::define_id;

define_id! {
    #[doc = "ID of a platform user."]
    Id
}

define_kind! {
    #[doc = "Role granting permissions to a platform user."]
    enum Role {
        #[doc = "Administrator, allowed to hard-delete records."]
        Admin = 1,

        #[doc = "Regular back-office operator."]
        User = 2,
    }
}

/// Principal performing an operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Actor {
    /// ID of the acting user.
    pub id: Id,

    /// [`Role`] of the acting user.
    pub role: Role,
}

impl Actor {
    /// [`Actor`] on behalf of which background tasks run.
    pub const SYSTEM: Self = Self {
        id: Id(0),
        role: Role::Admin,
    };

    /// Indicates whether this [`Actor`] has the [`Role::Admin`] role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
