//! [`Payment`] definitions.

use common::Money;

use crate::domain::{define_id, employee, Advance};
#[cfg(doc)]
use crate::domain::{Employee, Sheet};

define_id! {
    #[doc = "ID of a [`Payment`]."]
    Id
}

/// Number of days a monthly salary is spread over.
const DAYS_IN_MONTH: u16 = 30;

/// Line of a single [`Employee`] on a payroll [`Sheet`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Payment {
    /// ID of this [`Payment`].
    pub id: Id,

    /// ID of the [`Sheet`] this [`Payment`] belongs to.
    pub sheet_id: super::Id,

    /// ID of the paid [`Employee`].
    pub employee_id: employee::Id,

    /// Base amount: the effective salary, or the advance amount.
    pub base_salary: Money,

    /// Operator-entered bonus.
    pub bonus: Money,

    /// Operator-entered INSS deduction.
    pub inss_deduction: Money,

    /// Operator-entered family salary.
    pub family_salary: Money,

    /// Sum of the advances disbursed within the month.
    pub advance_deduction: Money,

    /// Deduction for the unjustified absences within the month.
    pub absence_deduction: Money,

    /// Amount to be paid.
    ///
    /// Derived by [`Payment::final_amount()`] while the [`Sheet`] is open.
    pub final_amount: Money,

    /// Indicates whether this [`Payment`] is paid.
    pub is_paid: bool,
}

/// Operator-entered fields of a [`Payment`], preserved by salary sheet
/// recomputes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Adjustments {
    /// Bonus on top of the base salary.
    pub bonus: Money,

    /// INSS deduction.
    pub inss_deduction: Money,

    /// Family salary.
    pub family_salary: Money,
}

/// Inputs of a salary [`Payment`] read from the other ledgers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SalaryInputs {
    /// Current effective salary.
    pub base_salary: Money,

    /// Number of unjustified absences within the month.
    pub absences: u16,

    /// Sum of the advances disbursed within the month.
    pub advances: Money,
}

impl SalaryInputs {
    /// Returns the deduction for the absences of these [`SalaryInputs`].
    #[expect(clippy::missing_panics_doc, reason = "non-zero denominator")]
    #[must_use]
    pub fn absence_deduction(&self) -> Money {
        self.base_salary
            .prorate(self.absences, DAYS_IN_MONTH)
            .expect("non-zero denominator")
    }
}

impl Payment {
    /// Creates a new salary [`Payment`] without any [`Adjustments`].
    #[must_use]
    pub fn salary(
        sheet_id: super::Id,
        employee_id: employee::Id,
        inputs: SalaryInputs,
    ) -> Self {
        let mut payment = Self {
            id: Id::default(),
            sheet_id,
            employee_id,
            base_salary: Money::ZERO,
            bonus: Money::ZERO,
            inss_deduction: Money::ZERO,
            family_salary: Money::ZERO,
            advance_deduction: Money::ZERO,
            absence_deduction: Money::ZERO,
            final_amount: Money::ZERO,
            is_paid: false,
        };
        payment.refresh(inputs);
        payment
    }

    /// Creates a new [`Payment`] disbursing the provided [`Advance`].
    #[must_use]
    pub fn advance(sheet_id: super::Id, advance: &Advance) -> Self {
        Self {
            id: Id::default(),
            sheet_id,
            employee_id: advance.employee_id,
            base_salary: advance.amount,
            bonus: Money::ZERO,
            inss_deduction: Money::ZERO,
            family_salary: Money::ZERO,
            advance_deduction: Money::ZERO,
            absence_deduction: Money::ZERO,
            final_amount: advance.amount,
            is_paid: false,
        }
    }

    /// Replaces the base salary and deductions of this [`Payment`] with the
    /// provided [`SalaryInputs`], keeping its [`Adjustments`].
    pub fn refresh(&mut self, inputs: SalaryInputs) {
        self.base_salary = inputs.base_salary;
        self.advance_deduction = inputs.advances;
        self.absence_deduction = inputs.absence_deduction();
        self.final_amount = self.final_amount();
    }

    /// Replaces the [`Adjustments`] of this [`Payment`], keeping the stored
    /// deductions.
    pub fn adjust(&mut self, adjustments: Adjustments) {
        let Adjustments {
            bonus,
            inss_deduction,
            family_salary,
        } = adjustments;
        self.bonus = bonus;
        self.inss_deduction = inss_deduction;
        self.family_salary = family_salary;
        self.final_amount = self.final_amount();
    }

    /// Returns the [`Adjustments`] of this [`Payment`].
    #[must_use]
    pub fn adjustments(&self) -> Adjustments {
        Adjustments {
            bonus: self.bonus,
            inss_deduction: self.inss_deduction,
            family_salary: self.family_salary,
        }
    }

    /// Computes the final amount out of the other fields of this
    /// [`Payment`].
    ///
    /// Additions go first, then subtractions, left to right.
    #[must_use]
    pub fn final_amount(&self) -> Money {
        self.base_salary + self.bonus + self.family_salary
            - self.inss_deduction
            - self.advance_deduction
            - self.absence_deduction
    }
}

#[cfg(test)]
mod spec {
    use common::Money;

    use super::{Adjustments, Payment, SalaryInputs};

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn inputs(base: &str, absences: u16, advances: &str) -> SalaryInputs {
        SalaryInputs {
            base_salary: money(base),
            absences,
            advances: money(advances),
        }
    }

    #[test]
    fn deducts_absences_and_advances() {
        let p = Payment::salary(1.into(), 2.into(), inputs("3000.00", 0, "0.00"));
        assert_eq!(p.final_amount, money("3000.00"));

        let p = Payment::salary(1.into(), 2.into(), inputs("3000.00", 3, "0.00"));
        assert_eq!(p.absence_deduction, money("300.00"));
        assert_eq!(p.final_amount, money("2700.00"));

        let p =
            Payment::salary(1.into(), 2.into(), inputs("3000.00", 0, "500.00"));
        assert_eq!(p.advance_deduction, money("500.00"));
        assert_eq!(p.final_amount, money("2500.00"));
    }

    #[test]
    fn rounds_absence_deduction_half_to_even() {
        // 1234.56 × 1 ÷ 30 = 41.152
        let p = Payment::salary(1.into(), 2.into(), inputs("1234.56", 1, "0.00"));
        assert_eq!(p.absence_deduction, money("41.15"));
        assert_eq!(p.final_amount, money("1193.41"));
    }

    #[test]
    fn refresh_keeps_adjustments() {
        let mut p =
            Payment::salary(1.into(), 2.into(), inputs("3000.00", 0, "500.00"));
        p.adjust(Adjustments {
            bonus: money("150.00"),
            inss_deduction: money("330.00"),
            family_salary: money("60.00"),
        });
        assert_eq!(p.final_amount, money("2380.00"));

        p.refresh(inputs("3000.00", 5, "700.00"));
        assert_eq!(p.bonus, money("150.00"));
        assert_eq!(p.absence_deduction, money("500.00"));
        assert_eq!(p.final_amount, money("1680.00"));
        assert_eq!(p.final_amount, p.final_amount());
    }
}
