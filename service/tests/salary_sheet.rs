mod support;

use common::Period;
use service::{
    command::{
        create_salary_sheet, ApproveAdvance, CloseSheet, CreateAdvance,
        CreateSalarySheet, DeleteSheet, MarkPaymentPaid, PayAdvance,
        RecomputeSalarySheet, RecordAbsence, TerminateEmployee, UpdatePayment,
    },
    domain::{
        audit, employee,
        payroll::{self, payment},
        Payment, Sheet,
    },
    error::{Classify as _, Kind},
    infra::Memory,
    query, Command as _, Query as _, Service,
};

use self::support::{date, hire, money, service, OPERATOR};

const NOW: &str = "2025-01-31T12:00:00Z";

fn january() -> Period {
    Period::new(1, 2025).unwrap()
}

async fn payments(service: &Service<Memory>, sheet: &Sheet) -> Vec<Payment> {
    service
        .execute(query::sheet::Payments::by(sheet.id))
        .await
        .unwrap()
}

async fn disburse(
    service: &Service<Memory>,
    employee_id: employee::Id,
    amount: &str,
    on: &str,
) {
    let advance = service
        .execute(CreateAdvance {
            employee_id,
            amount: money(amount),
            date: date(on),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    _ = service
        .execute(ApproveAdvance {
            advance_id: advance.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    _ = service
        .execute(PayAdvance {
            advance_id: advance.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
}

async fn record_absences(
    service: &Service<Memory>,
    employee_id: employee::Id,
    count: u16,
) {
    _ = service
        .execute(RecordAbsence {
            employee_id,
            period: january(),
            count,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn pays_full_salary_without_deductions() {
    let (service, _) = service(NOW);
    let employee = hire(&service, "2024-06-01", "3000.00").await;

    let sheet = service
        .execute(CreateSalarySheet {
            period: january(),
            initiator: OPERATOR,
        })
        .await
        .unwrap();

    assert_eq!(sheet.kind, payroll::Kind::Salary);
    assert!(!sheet.is_closed);
    assert_eq!(sheet.total, money("3000.00"));

    let payments = payments(&service, &sheet).await;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].employee_id, employee.id);
    assert_eq!(payments[0].base_salary, money("3000.00"));
    assert_eq!(payments[0].final_amount, money("3000.00"));
    assert!(!payments[0].is_paid);
}

#[tokio::test]
async fn deducts_absences() {
    let (service, _) = service(NOW);
    let employee = hire(&service, "2024-06-01", "3000.00").await;
    record_absences(&service, employee.id, 3).await;

    let sheet = service
        .execute(CreateSalarySheet {
            period: january(),
            initiator: OPERATOR,
        })
        .await
        .unwrap();

    let payment = &payments(&service, &sheet).await[0];
    assert_eq!(payment.absence_deduction, money("300.00"));
    assert_eq!(payment.final_amount, money("2700.00"));
    assert_eq!(sheet.total, money("2700.00"));
}

#[tokio::test]
async fn recompute_refreshes_advances_and_absences() {
    let (service, _) = service(NOW);
    let employee = hire(&service, "2024-06-01", "3000.00").await;
    disburse(&service, employee.id, "500.00", "2025-01-10").await;

    let sheet = service
        .execute(CreateSalarySheet {
            period: january(),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    let payment = &payments(&service, &sheet).await[0];
    assert_eq!(payment.advance_deduction, money("500.00"));
    assert_eq!(payment.final_amount, money("2200.00"));

    record_absences(&service, employee.id, 5).await;
    disburse(&service, employee.id, "200.00", "2025-01-20").await;
    // Disbursed in another month, so never deducted from January.
    disburse(&service, employee.id, "100.00", "2025-02-03").await;

    let sheet = service
        .execute(RecomputeSalarySheet {
            sheet_id: sheet.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();

    let payment = &payments(&service, &sheet).await[0];
    assert_eq!(payment.absence_deduction, money("500.00"));
    assert_eq!(payment.advance_deduction, money("700.00"));
    assert_eq!(payment.final_amount, money("1800.00"));
    assert_eq!(sheet.total, money("1800.00"));
}

#[tokio::test]
async fn recompute_is_idempotent_and_keeps_adjustments() {
    let (service, _) = service(NOW);
    let employee = hire(&service, "2024-06-01", "3000.00").await;
    record_absences(&service, employee.id, 3).await;

    let sheet = service
        .execute(CreateSalarySheet {
            period: january(),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    let payment_id = payments(&service, &sheet).await[0].id;

    let adjusted = service
        .execute(UpdatePayment {
            payment_id,
            adjustments: payment::Adjustments {
                bonus: money("100.00"),
                inss_deduction: money("50.00"),
                family_salary: money("20.00"),
            },
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    // 3000.00 + 100.00 + 20.00 - 50.00 - 0.00 - 300.00
    assert_eq!(adjusted.final_amount, money("2770.00"));

    let before = payments(&service, &sheet).await;
    for _ in 0..2 {
        let recomputed = service
            .execute(RecomputeSalarySheet {
                sheet_id: sheet.id,
                initiator: OPERATOR,
            })
            .await
            .unwrap();
        assert_eq!(recomputed.total, money("2770.00"));
        assert_eq!(payments(&service, &sheet).await, before);
    }
}

#[tokio::test]
async fn recompute_keeps_payments_of_terminated_employees() {
    let (service, _) = service(NOW);
    let leaving = hire(&service, "2024-06-01", "3000.00").await;
    let staying = hire(&service, "2024-06-01", "2000.00").await;
    let sheet = service
        .execute(CreateSalarySheet {
            period: january(),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert_eq!(sheet.total, money("5000.00"));
    let before = payments(&service, &sheet).await;

    _ = service
        .execute(TerminateEmployee {
            employee_id: leaving.id,
            termination_date: date("2025-01-20"),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    let recomputed = service
        .execute(RecomputeSalarySheet {
            sheet_id: sheet.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();

    assert_eq!(recomputed.total, money("5000.00"));
    let after = payments(&service, &sheet).await;
    assert_eq!(after.len(), 2);
    assert_eq!(after, before);
    assert!(after.iter().any(|p| p.employee_id == leaving.id));
    assert!(after.iter().any(|p| p.employee_id == staying.id));
}

#[tokio::test]
async fn missing_sheet_is_not_found() {
    let (service, _) = service(NOW);
    let sheet_id = payroll::Id::new(999);

    let err = service
        .execute(RecomputeSalarySheet {
            sheet_id,
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::NotFound);

    let err = service
        .execute(CloseSheet {
            sheet_id,
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::NotFound);
}

#[tokio::test]
async fn update_of_missing_payment_is_not_found() {
    let (service, _) = service(NOW);

    let err = service
        .execute(UpdatePayment {
            payment_id: payment::Id::new(999),
            adjustments: payment::Adjustments {
                bonus: money("100.00"),
                inss_deduction: money("0.00"),
                family_salary: money("0.00"),
            },
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::NotFound);
}

#[tokio::test]
async fn rejects_negative_adjustment() {
    let (service, _) = service(NOW);
    _ = hire(&service, "2024-06-01", "3000.00").await;
    let sheet = service
        .execute(CreateSalarySheet {
            period: january(),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    let payment_id = payments(&service, &sheet).await[0].id;

    let err = service
        .execute(UpdatePayment {
            payment_id,
            adjustments: payment::Adjustments {
                bonus: money("-1.00"),
                inss_deduction: money("0.00"),
                family_salary: money("0.00"),
            },
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::InvalidInput);
}

#[tokio::test]
async fn duplicate_sheet_leaves_state_untouched() {
    let (service, _) = service(NOW);
    _ = hire(&service, "2024-06-01", "3000.00").await;

    let sheet = service
        .execute(CreateSalarySheet {
            period: january(),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    let before = payments(&service, &sheet).await;

    let err = service
        .execute(CreateSalarySheet {
            period: january(),
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::AlreadyExists);
    assert!(matches!(
        err.as_ref(),
        create_salary_sheet::ExecutionError::SheetExists(id) if *id == sheet.id,
    ));

    let sheets = service.execute(query::sheet::List::by(())).await.unwrap();
    assert_eq!(sheets, [sheet.clone()]);
    assert_eq!(payments(&service, &sheet).await, before);
}

#[tokio::test]
async fn closed_sheet_is_immutable() {
    let (service, _) = service(NOW);
    _ = hire(&service, "2024-06-01", "3000.00").await;
    let sheet = service
        .execute(CreateSalarySheet {
            period: january(),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    let payment_id = payments(&service, &sheet).await[0].id;

    let closed = service
        .execute(CloseSheet {
            sheet_id: sheet.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert!(closed.is_closed);
    assert_eq!(closed.total, money("3000.00"));
    assert!(payments(&service, &sheet).await.iter().all(|p| p.is_paid));

    let recompute = service
        .execute(RecomputeSalarySheet {
            sheet_id: sheet.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(recompute.kind(), Kind::IllegalState);

    let update = service
        .execute(UpdatePayment {
            payment_id,
            adjustments: payment::Adjustments {
                bonus: money("10.00"),
                inss_deduction: money("0.00"),
                family_salary: money("0.00"),
            },
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(update.kind(), Kind::IllegalState);

    let close = service
        .execute(CloseSheet {
            sheet_id: sheet.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(close.kind(), Kind::IllegalState);

    let delete = service
        .execute(DeleteSheet {
            sheet_id: sheet.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(delete.kind(), Kind::IllegalState);

    // Payments of a closed sheet are paid already.
    let payment = service
        .execute(MarkPaymentPaid {
            payment_id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert!(payment.is_paid);

    let stored = service
        .execute(query::sheet::ById::by(sheet.id))
        .await
        .unwrap();
    assert_eq!(stored, Some(closed));
}

#[tokio::test]
async fn open_sheet_can_be_deleted() {
    let (service, _) = service(NOW);
    _ = hire(&service, "2024-06-01", "3000.00").await;
    let sheet = service
        .execute(CreateSalarySheet {
            period: january(),
            initiator: OPERATOR,
        })
        .await
        .unwrap();

    _ = service
        .execute(DeleteSheet {
            sheet_id: sheet.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();

    assert_eq!(
        service
            .execute(query::sheet::ByPeriod::by((
                january(),
                payroll::Kind::Salary,
            )))
            .await
            .unwrap(),
        None,
    );
    assert!(payments(&service, &sheet).await.is_empty());
}

#[tokio::test]
async fn records_audit_trail() {
    let (service, _) = service(NOW);
    _ = hire(&service, "2024-06-01", "3000.00").await;
    let sheet = service
        .execute(CreateSalarySheet {
            period: january(),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    _ = service
        .execute(CloseSheet {
            sheet_id: sheet.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();

    let log = service.execute(query::audit::Log::by(())).await.unwrap();
    let kinds = log.iter().map(|e| e.kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [
            audit::Kind::Create,
            audit::Kind::Update,
            audit::Kind::Create,
            audit::Kind::Update,
        ],
    );
    assert!(log.iter().all(|e| e.actor_id == OPERATOR.id));
}
