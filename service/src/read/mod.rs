//! Read entities definitions.

pub mod advance;
pub mod employee;
pub mod salary;
