//! Domain definitions.

pub mod absence;
pub mod advance;
pub mod audit;
pub mod employee;
pub mod payroll;
pub mod salary;
pub mod user;
pub mod vacation;

pub use self::{
    absence::Absence,
    advance::Advance,
    employee::Employee,
    payroll::{Payment, Sheet},
    salary::EffectiveSalary,
    user::Actor,
    vacation::{Rest, Vacation},
};

/// Defines a new identifier type assigned by the [`Database`] on first
/// persist.
///
/// [`Database`]: crate::infra::Database
macro_rules! define_id {
    (#[doc = $doc:literal] $name:ident) => {
        #[doc = $doc]
        ///
        /// [`Default`] value is unassigned and gets replaced on insertion.
        #[derive(
            Clone,
            Copy,
            Debug,
            Default,
            ::serde::Deserialize,
            ::derive_more::Display,
            Eq,
            ::derive_more::From,
            ::derive_more::FromStr,
            Hash,
            ::derive_more::Into,
            Ord,
            PartialEq,
            PartialOrd,
            ::serde::Serialize,
        )]
        #[cfg_attr(
            feature = "postgres",
            derive(::postgres_types::ToSql, ::postgres_types::FromSql),
            postgres(transparent)
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new ID out of its raw value.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Indicates whether this ID was assigned by a [`Database`].
            ///
            /// [`Database`]: crate::infra::Database
            #[must_use]
            pub const fn is_assigned(self) -> bool {
                self.0 != 0
            }
        }
    };
}
pub(crate) use define_id;
