mod support;

use common::Period;
use service::{
    command::{
        ApproveAdvance, CloseSheet, CreateAdvance, CreateAdvanceSheet,
        DeactivateAdvance, DeleteAdvance, PayAdvance, RecomputeAdvanceSheet,
        RecomputeSalarySheet,
    },
    domain::{advance, employee, Advance},
    error::{Classify as _, Kind},
    infra::Memory,
    query, Command as _, Query as _, Service,
};

use self::support::{date, hire, money, service, ADMIN, OPERATOR};

const NOW: &str = "2025-02-14T09:30:00Z";

fn february() -> Period {
    Period::new(2, 2025).unwrap()
}

async fn request(
    service: &Service<Memory>,
    employee_id: employee::Id,
    amount: &str,
) -> Advance {
    service
        .execute(CreateAdvance {
            employee_id,
            amount: money(amount),
            date: date("2025-02-10"),
            initiator: OPERATOR,
        })
        .await
        .unwrap()
}

async fn approve(service: &Service<Memory>, advance_id: advance::Id) {
    _ = service
        .execute(ApproveAdvance {
            advance_id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
}

async fn advance(service: &Service<Memory>, id: advance::Id) -> Advance {
    service
        .execute(query::advance::ById::by(id))
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn advance_sheet_lifecycle() {
    let (service, _) = service(NOW);
    let employee = hire(&service, "2024-06-01", "3000.00").await;

    let a1 = request(&service, employee.id, "300.00").await;
    approve(&service, a1.id).await;
    let a2 = request(&service, employee.id, "450.00").await;
    approve(&service, a2.id).await;
    let a3 = request(&service, employee.id, "200.00").await;

    let sheet = service
        .execute(CreateAdvanceSheet {
            period: february(),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert_eq!(sheet.total, money("750.00"));
    let payments = service
        .execute(query::sheet::Payments::by(sheet.id))
        .await
        .unwrap();
    assert_eq!(payments.len(), 2);
    assert!(payments.iter().all(|p| p.base_salary == p.final_amount));

    approve(&service, a3.id).await;
    let sheet = service
        .execute(RecomputeAdvanceSheet {
            sheet_id: sheet.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert_eq!(sheet.total, money("950.00"));
    let payments = service
        .execute(query::sheet::Payments::by(sheet.id))
        .await
        .unwrap();
    assert_eq!(payments.len(), 3);

    let closed = service
        .execute(CloseSheet {
            sheet_id: sheet.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert!(closed.is_closed);
    assert_eq!(closed.total, money("950.00"));
    for id in [a1.id, a2.id, a3.id] {
        assert!(advance(&service, id).await.is_paid, "{id}");
    }

    let err = service
        .execute(RecomputeAdvanceSheet {
            sheet_id: sheet.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::IllegalState);
}

#[tokio::test]
async fn skips_deactivated_advances() {
    let (service, _) = service(NOW);
    let employee = hire(&service, "2024-06-01", "3000.00").await;

    let kept = request(&service, employee.id, "300.00").await;
    approve(&service, kept.id).await;
    let denied = request(&service, employee.id, "450.00").await;
    approve(&service, denied.id).await;
    let denied = service
        .execute(DeactivateAdvance {
            advance_id: denied.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert!(!denied.is_active);

    let sheet = service
        .execute(CreateAdvanceSheet {
            period: february(),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert_eq!(sheet.total, money("300.00"));

    _ = service
        .execute(CloseSheet {
            sheet_id: sheet.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert!(advance(&service, kept.id).await.is_paid);
    assert!(!advance(&service, denied.id).await.is_paid);
}

#[tokio::test]
async fn recompute_rejects_salary_sheet() {
    let (service, _) = service(NOW);
    _ = hire(&service, "2024-06-01", "3000.00").await;
    let sheet = service
        .execute(CreateAdvanceSheet {
            period: february(),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert_eq!(sheet.total, money("0.00"));

    let err = service
        .execute(RecomputeSalarySheet {
            sheet_id: sheet.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::InvalidInput);
}

#[tokio::test]
async fn advance_transitions() {
    let (service, _) = service(NOW);
    let employee = hire(&service, "2024-06-01", "3000.00").await;
    let adv = request(&service, employee.id, "300.00").await;
    assert!(adv.is_active && !adv.is_approved && !adv.is_paid);

    let err = service
        .execute(PayAdvance {
            advance_id: adv.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::IllegalState);

    approve(&service, adv.id).await;
    approve(&service, adv.id).await;
    let paid = service
        .execute(PayAdvance {
            advance_id: adv.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert!(paid.is_paid);

    let err = service
        .execute(DeactivateAdvance {
            advance_id: adv.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::IllegalState);

    let err = service
        .execute(CreateAdvance {
            employee_id: employee.id,
            amount: money("0.00"),
            date: date("2025-02-10"),
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::InvalidInput);
}

#[tokio::test]
async fn only_admin_deletes_advances() {
    let (service, _) = service(NOW);
    let employee = hire(&service, "2024-06-01", "3000.00").await;
    let adv = request(&service, employee.id, "300.00").await;

    let err = service
        .execute(DeleteAdvance {
            advance_id: adv.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::Forbidden);
    assert!(service
        .execute(query::advance::ById::by(adv.id))
        .await
        .unwrap()
        .is_some());

    _ = service
        .execute(DeleteAdvance {
            advance_id: adv.id,
            initiator: ADMIN,
        })
        .await
        .unwrap();
    assert_eq!(
        service
            .execute(query::advance::ById::by(adv.id))
            .await
            .unwrap(),
        None,
    );
}
