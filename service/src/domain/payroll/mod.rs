//! Payroll [`Sheet`] definitions.

pub mod payment;

use common::{define_kind, unit, DateTimeOf, Money, Period};

use super::define_id;

pub use self::payment::Payment;

define_id! {
    #[doc = "ID of a payroll [`Sheet`]."]
    Id
}

/// Monthly aggregate of [`Payment`]s.
///
/// A [`Sheet`] is uniquely identified by its [`Period`] and [`Kind`]. It's
/// recomputed while open, and frozen forever once closed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sheet {
    /// ID of this [`Sheet`].
    pub id: Id,

    /// [`Period`] this [`Sheet`] pays for.
    pub period: Period,

    /// [`Kind`] of this [`Sheet`].
    pub kind: Kind,

    /// [`DateTime`] this [`Sheet`] was generated at.
    ///
    /// [`DateTime`]: common::DateTime
    pub generated_at: GenerationDateTime,

    /// Sum of the final amounts of all the [`Payment`]s of this [`Sheet`].
    pub total: Money,

    /// Indicates whether this [`Sheet`] is closed.
    pub is_closed: bool,
}

impl Sheet {
    /// Creates a new open [`Sheet`] with no [`Payment`]s.
    #[must_use]
    pub fn open(
        period: Period,
        kind: Kind,
        generated_at: GenerationDateTime,
    ) -> Self {
        Self {
            id: Id::default(),
            period,
            kind,
            generated_at,
            total: Money::ZERO,
            is_closed: false,
        }
    }

    /// Returns the [`Status`] of this [`Sheet`].
    #[must_use]
    pub fn status(&self) -> Status {
        if self.is_closed {
            Status::Closed
        } else {
            Status::Open
        }
    }

    /// Sets the total of this [`Sheet`] to the sum of the provided
    /// [`Payment`]s.
    pub fn sum_up<'p>(&mut self, payments: impl IntoIterator<Item = &'p Payment>) {
        self.total = payments.into_iter().map(|p| p.final_amount).sum();
    }
}

define_kind! {
    #[doc = "Kind of a payroll [`Sheet`]."]
    enum Kind {
        #[doc = "Monthly salaries of active employees."]
        Salary = 1,

        #[doc = "Approved advances awaiting disbursement."]
        Advance = 2,
    }
}

/// Status of a payroll [`Sheet`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    /// [`Sheet`] accepts recomputes and [`Payment`] updates.
    Open,

    /// [`Sheet`] is frozen (terminal).
    Closed,
}

/// [`DateTime`] when a [`Sheet`] was generated.
///
/// [`DateTime`]: common::DateTime
pub type GenerationDateTime = DateTimeOf<(Sheet, unit::Creation)>;
