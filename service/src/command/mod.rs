//! [`Command`] definition.

pub mod approve_advance;
pub mod approve_rest;
pub mod change_effective_salary;
pub mod close_sheet;
pub mod create_advance;
pub mod create_advance_sheet;
pub mod create_employee;
pub mod create_rest;
pub mod create_salary_sheet;
pub mod create_vacation;
pub mod deactivate_advance;
pub mod delete_advance;
pub mod delete_rest;
pub mod delete_sheet;
pub mod delete_vacation;
pub mod mark_one_third_paid;
pub mod mark_payment_paid;
pub mod mark_vacation_expired;
pub mod pay_advance;
pub mod pay_rest;
pub mod recompute_advance_sheet;
pub mod recompute_salary_sheet;
pub mod record_absence;
pub mod terminate_employee;
pub mod update_payment;
pub mod update_rest;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    approve_advance::ApproveAdvance, approve_rest::ApproveRest,
    change_effective_salary::ChangeEffectiveSalary, close_sheet::CloseSheet,
    create_advance::CreateAdvance, create_advance_sheet::CreateAdvanceSheet,
    create_employee::CreateEmployee, create_rest::CreateRest,
    create_salary_sheet::CreateSalarySheet, create_vacation::CreateVacation,
    deactivate_advance::DeactivateAdvance, delete_advance::DeleteAdvance,
    delete_rest::DeleteRest, delete_sheet::DeleteSheet,
    delete_vacation::DeleteVacation, mark_one_third_paid::MarkOneThirdPaid,
    mark_payment_paid::MarkPaymentPaid,
    mark_vacation_expired::MarkVacationExpired, pay_advance::PayAdvance,
    pay_rest::PayRest, recompute_advance_sheet::RecomputeAdvanceSheet,
    recompute_salary_sheet::RecomputeSalarySheet,
    record_absence::RecordAbsence, terminate_employee::TerminateEmployee,
    update_payment::UpdatePayment, update_rest::UpdateRest,
};
