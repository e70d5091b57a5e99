//! [`Database`] implementations.
//!
//! [`Database`]: crate::infra::Database

mod advance;
mod audit;
mod employee;
mod payroll;
mod vacation;
