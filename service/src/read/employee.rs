//! [`Employee`] read model definition.

#[cfg(doc)]
use crate::domain::Employee;

/// Wrapper around [`Employee`] indicating that it [`is_active()`].
///
/// [`is_active()`]: Employee::is_active
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Active<T>(pub T);
