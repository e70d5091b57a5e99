//! [`EffectiveSalary`] read model definition.

#[cfg(doc)]
use crate::domain::EffectiveSalary;

/// Wrapper around [`EffectiveSalary`] indicating that it [`is_current()`].
///
/// [`is_current()`]: EffectiveSalary::is_current
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Current<T>(pub T);
