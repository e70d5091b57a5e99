mod support;

use std::time::Duration;

use common::Period;
use service::{
    command::{
        ChangeEffectiveSalary, CreateEmployee, RecordAbsence,
        TerminateEmployee,
    },
    error::{Classify as _, Kind},
    query, Command as _, Query as _,
};

use self::support::{date, hire, money, service, OPERATOR};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::test]
async fn keeps_salary_history_gap_free() {
    let (service, clock) = service("2025-01-10T08:00:00Z");
    let employee = hire(&service, "2024-06-01", "3000.00").await;

    _ = service
        .execute(ChangeEffectiveSalary {
            employee_id: employee.id,
            amount: money("3100.00"),
            initiator: OPERATOR,
        })
        .await
        .unwrap();

    clock.advance(DAY * 20);
    _ = service
        .execute(ChangeEffectiveSalary {
            employee_id: employee.id,
            amount: money("3500.00"),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    // Same day change replaces the amount in place.
    _ = service
        .execute(ChangeEffectiveSalary {
            employee_id: employee.id,
            amount: money("3600.00"),
            initiator: OPERATOR,
        })
        .await
        .unwrap();

    let history = service
        .execute(query::employee::SalaryHistory::by(employee.id))
        .await
        .unwrap();
    let rows = history
        .iter()
        .map(|s| (s.start, s.end, s.amount))
        .collect::<Vec<_>>();
    assert_eq!(
        rows,
        [
            (date("2024-06-01"), Some(date("2025-01-10")), money("3000.00")),
            (date("2025-01-10"), Some(date("2025-01-30")), money("3100.00")),
            (date("2025-01-30"), None, money("3600.00")),
        ],
    );
    assert!(history.windows(2).all(|w| w[0].end == Some(w[1].start)));

    let current = service
        .execute(query::employee::CurrentSalary::by(employee.id))
        .await
        .unwrap()
        .map(|c| c.0);
    assert_eq!(current.as_ref(), history.last());
}

#[tokio::test]
async fn rejects_invalid_salaries() {
    let (service, _) = service("2025-01-10T08:00:00Z");
    let employee = hire(&service, "2024-06-01", "3000.00").await;

    let err = service
        .execute(ChangeEffectiveSalary {
            employee_id: employee.id,
            amount: money("0.00"),
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::InvalidInput);

    _ = service
        .execute(TerminateEmployee {
            employee_id: employee.id,
            termination_date: date("2025-01-10"),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    let err = service
        .execute(ChangeEffectiveSalary {
            employee_id: employee.id,
            amount: money("3500.00"),
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::IllegalState);
}

#[tokio::test]
async fn terminates_employee_once() {
    let (service, _) = service("2025-01-10T08:00:00Z");
    let employee = hire(&service, "2024-06-01", "3000.00").await;

    let err = service
        .execute(TerminateEmployee {
            employee_id: employee.id,
            termination_date: date("2024-05-31"),
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::InvalidInput);

    let terminated = service
        .execute(TerminateEmployee {
            employee_id: employee.id,
            termination_date: date("2025-01-10"),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert_eq!(terminated.termination_date, Some(date("2025-01-10")));
    assert!(service
        .execute(query::employee::ListActive::by(()))
        .await
        .unwrap()
        .is_empty());

    let err = service
        .execute(TerminateEmployee {
            employee_id: employee.id,
            termination_date: date("2025-01-10"),
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::IllegalState);
}

#[tokio::test]
async fn rejects_future_admission() {
    let (service, _) = service("2025-01-10T08:00:00Z");

    let err = service
        .execute(CreateEmployee {
            person_id: 1.into(),
            admission_date: date("2025-01-11"),
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::InvalidInput);
}

#[tokio::test]
async fn upserts_absences() {
    let (service, _) = service("2025-01-10T08:00:00Z");
    let employee = hire(&service, "2024-06-01", "3000.00").await;
    let period = Period::new(1, 2025).unwrap();

    let err = service
        .execute(RecordAbsence {
            employee_id: employee.id,
            period,
            count: 0,
            initiator: OPERATOR,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::InvalidInput);

    let first = service
        .execute(RecordAbsence {
            employee_id: employee.id,
            period,
            count: 2,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    let second = service
        .execute(RecordAbsence {
            employee_id: employee.id,
            period,
            count: 4,
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    assert_eq!(second.id, first.id);

    let stored = service
        .execute(query::employee::AbsenceIn::by((employee.id, period)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.count, 4);
}
