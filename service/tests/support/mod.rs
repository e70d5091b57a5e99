//! Fixtures shared by the scenario tests.

#![allow(dead_code, reason = "not every scenario uses every fixture")]

use common::{clock::ManualClock, Date, DateTime, Money};
use service::{
    command::{ChangeEffectiveSalary, CreateEmployee},
    domain::{user, Employee},
    infra::Memory,
    Command as _, Config, Service,
};

/// Back-office operator without administrative rights.
pub const OPERATOR: user::Actor = user::Actor {
    id: user::Id::new(7),
    role: user::Role::User,
};

/// Administrator allowed to hard-delete records.
pub const ADMIN: user::Actor = user::Actor {
    id: user::Id::new(1),
    role: user::Role::Admin,
};

pub fn money(s: &str) -> Money {
    s.parse().unwrap()
}

pub fn date(s: &str) -> Date {
    s.parse().unwrap()
}

/// Creates a new [`Service`] over an empty [`Memory`] database, with its
/// clock stopped at the provided RFC 3339 instant.
pub fn service(now: &str) -> (Service<Memory>, ManualClock) {
    let clock = ManualClock::new(DateTime::from_rfc3339(now).unwrap());
    let (service, _) =
        Service::with_clock(Config::default(), Memory::new(), clock.clone());
    (service, clock)
}

/// Hires a new [`Employee`] earning the provided monthly salary.
pub async fn hire(
    service: &Service<Memory>,
    admission: &str,
    salary: &str,
) -> Employee {
    let employee = service
        .execute(CreateEmployee {
            person_id: 1.into(),
            admission_date: date(admission),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    _ = service
        .execute(ChangeEffectiveSalary {
            employee_id: employee.id,
            amount: money(salary),
            initiator: OPERATOR,
        })
        .await
        .unwrap();
    employee
}
