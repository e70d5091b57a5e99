//! Audit log [`Entry`] definitions.

use common::{define_kind, unit, DateTimeOf};

use super::user;

/// Record of a successful mutation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    /// [`Kind`] of the recorded event.
    pub kind: Kind,

    /// ID of the user who performed the mutation.
    pub actor_id: user::Id,

    /// [`DateTime`] of the mutation.
    ///
    /// [`DateTime`]: common::DateTime
    pub at: CreationDateTime,

    /// Human-readable description of the mutation.
    pub detail: String,
}

define_kind! {
    #[doc = "Kind of an audit [`Entry`]."]
    enum Kind {
        #[doc = "Entity was created."]
        Create = 1,

        #[doc = "Entity was updated."]
        Update = 2,

        #[doc = "Entity was deleted."]
        Delete = 3,

        #[doc = "Entity was approved."]
        Approve = 4,

        #[doc = "Entity was denied."]
        Deny = 5,
    }
}

/// [`DateTime`] when an [`Entry`] was recorded.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Entry, unit::Creation)>;
