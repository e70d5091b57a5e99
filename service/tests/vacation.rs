mod support;

use common::Date;
use service::{
    command::{
        ApproveRest, CreateRest, CreateVacation, DeleteRest, DeleteVacation,
        MarkOneThirdPaid, MarkVacationExpired, PayRest, UpdateRest,
    },
    domain::{vacation, Rest, Vacation},
    error::{Classify as _, Kind},
    infra::Memory,
    query, Command as _, Query as _, Service,
};

use self::support::{date, hire, money, service, OPERATOR};

const NOW: &str = "2025-02-20T10:00:00Z";

async fn entitle(
    service: &Service<Memory>,
    total_days: u16,
) -> Vacation {
    let employee = hire(service, "2024-01-02", "3000.00").await;
    service
        .execute(CreateVacation {
            employee_id: employee.id,
            start: date("2025-01-02"),
            total_days,
            reference_salary: money("3000.00"),
            initiator: OPERATOR,
        })
        .await
        .unwrap()
}

async fn vacation(service: &Service<Memory>, id: vacation::Id) -> Vacation {
    service
        .execute(query::vacation::ById::by(id))
        .await
        .unwrap()
        .unwrap()
}

async fn rests(service: &Service<Memory>, id: vacation::Id) -> Vec<Rest> {
    service
        .execute(query::vacation::Rests::by(id))
        .await
        .unwrap()
}

async fn rest(
    service: &Service<Memory>,
    vacation_id: vacation::Id,
    start: &str,
    end: &str,
) -> Result<Rest, Kind> {
    service
        .execute(CreateRest {
            vacation_id,
            start: date(start),
            end: date(end),
            initiator: OPERATOR,
        })
        .await
        .map_err(|e| e.kind())
}

#[tokio::test]
async fn values_entitlement() {
    let (service, _) = service(NOW);
    let v = entitle(&service, 30).await;

    assert_eq!(v.remaining_days, 30);
    assert_eq!(v.base_value, money("3000.00"));
    assert_eq!(v.one_third_value, money("1000.00"));
    assert_eq!(v.due_date, date("2026-01-02"));
    assert!(!v.is_paid && !v.is_one_third_paid && !v.is_expired);
}

#[tokio::test]
async fn settles_after_last_rest_is_paid() {
    let (service, _) = service(NOW);
    let v = entitle(&service, 30).await;

    let first = date("2025-03-01");
    let mut ids = Vec::new();
    for offset in 0..30 {
        let day = Date::from(
            time::Date::from(first) + time::Duration::days(offset),
        )
        .to_string();
        ids.push(rest(&service, v.id, &day, &day).await.unwrap().id);
    }
    for &rest_id in &ids {
        _ = service
            .execute(ApproveRest {
                rest_id,
                initiator: OPERATOR,
            })
            .await
            .unwrap();
    }
    assert_eq!(vacation(&service, v.id).await.remaining_days, 0);

    let v = service
        .execute(MarkOneThirdPaid {
            vacation_id: v.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert!(v.is_one_third_paid);
    assert!(!v.is_paid);

    let (last, others) = ids.split_last().unwrap();
    for &rest_id in others {
        _ = service
            .execute(PayRest {
                rest_id,
                initiator: OPERATOR,
            })
            .await
            .unwrap();
    }
    assert!(!vacation(&service, v.id).await.is_paid);

    _ = service
        .execute(PayRest {
            rest_id: *last,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    let v = vacation(&service, v.id).await;
    assert!(v.is_paid);
    assert!(v.is_conserved(&rests(&service, v.id).await));
}

#[tokio::test]
async fn pending_rests_reserve_days() {
    let (service, _) = service(NOW);
    let v = entitle(&service, 5).await;

    assert_eq!(
        rest(&service, v.id, "2025-03-01", "2025-03-10").await,
        Err(Kind::InsufficientDays),
    );
    let pending = rest(&service, v.id, "2025-03-01", "2025-03-05")
        .await
        .unwrap();
    assert_eq!(pending.days, 5);
    assert_eq!(
        rest(&service, v.id, "2025-03-06", "2025-03-06").await,
        Err(Kind::InsufficientDays),
    );

    // Deleting the pending rest frees its days again.
    _ = service
        .execute(DeleteRest {
            rest_id: pending.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert!(rest(&service, v.id, "2025-03-06", "2025-03-06").await.is_ok());
}

#[tokio::test]
async fn rejects_inverted_range() {
    let (service, _) = service(NOW);
    let v = entitle(&service, 30).await;

    assert_eq!(
        rest(&service, v.id, "2025-03-10", "2025-03-01").await,
        Err(Kind::InvalidRange),
    );
}

#[tokio::test]
async fn approving_missing_rest_is_not_found() {
    let (service, _) = service(NOW);
    let entitled = entitle(&service, 30).await;

    let err = service
        .execute(ApproveRest {
            rest_id: vacation::rest::Id::new(999),
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::NotFound);

    assert_eq!(vacation(&service, entitled.id).await, entitled);
}

#[tokio::test]
async fn approval_is_idempotent() {
    let (service, _) = service(NOW);
    let v = entitle(&service, 30).await;
    let r = rest(&service, v.id, "2025-03-01", "2025-03-10").await.unwrap();

    for _ in 0..2 {
        let approved = service
            .execute(ApproveRest {
                rest_id: r.id,
                initiator: OPERATOR,
            })
            .await
            .unwrap();
        assert!(approved.is_approved);
        assert_eq!(vacation(&service, v.id).await.remaining_days, 20);
    }

    let v = vacation(&service, v.id).await;
    assert!(v.is_conserved(&rests(&service, v.id).await));
}

#[tokio::test]
async fn approved_rest_is_frozen() {
    let (service, _) = service(NOW);
    let v = entitle(&service, 30).await;
    let r = rest(&service, v.id, "2025-03-01", "2025-03-10").await.unwrap();

    let err = service
        .execute(PayRest {
            rest_id: r.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::IllegalState);

    let updated = service
        .execute(UpdateRest {
            rest_id: r.id,
            start: date("2025-03-01"),
            end: date("2025-03-15"),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert_eq!(updated.days, 15);

    _ = service
        .execute(ApproveRest {
            rest_id: r.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();

    let err = service
        .execute(UpdateRest {
            rest_id: r.id,
            start: date("2025-03-01"),
            end: date("2025-03-02"),
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::IllegalState);

    let err = service
        .execute(DeleteRest {
            rest_id: r.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::IllegalState);

    let err = service
        .execute(DeleteVacation {
            vacation_id: v.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::IllegalState);
}

#[tokio::test]
async fn deletes_vacation_with_pending_rests() {
    let (service, _) = service(NOW);
    let v = entitle(&service, 30).await;
    _ = rest(&service, v.id, "2025-03-01", "2025-03-10").await.unwrap();

    _ = service
        .execute(DeleteVacation {
            vacation_id: v.id,
            initiator: OPERATOR,
        })
        .await
        .unwrap();

    assert_eq!(
        service
            .execute(query::vacation::ById::by(v.id))
            .await
            .unwrap(),
        None,
    );
    assert!(rests(&service, v.id).await.is_empty());
}

#[tokio::test]
async fn expires_vacation() {
    let (service, _) = service(NOW);
    let v = entitle(&service, 30).await;

    for _ in 0..2 {
        let expired = service
            .execute(MarkVacationExpired {
                vacation_id: v.id,
                initiator: OPERATOR,
            })
            .await
            .unwrap();
        assert!(expired.is_expired);
    }
}
