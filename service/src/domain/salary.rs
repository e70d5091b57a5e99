//! [`EffectiveSalary`] definitions.

use common::{Date, Money};

use super::{define_id, employee};
#[cfg(doc)]
use super::Employee;

define_id! {
    #[doc = "ID of an [`EffectiveSalary`]."]
    Id
}

/// Salary actually used in payroll arithmetic during `[start, end)`.
///
/// History rows of a single [`Employee`] partition time without gaps: each
/// row ends where the next one starts, and only the latest row is open.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EffectiveSalary {
    /// ID of this [`EffectiveSalary`].
    pub id: Id,

    /// ID of the [`Employee`] receiving this [`EffectiveSalary`].
    pub employee_id: employee::Id,

    /// First [`Date`] this [`EffectiveSalary`] applies to.
    pub start: Date,

    /// [`Date`] this [`EffectiveSalary`] stopped applying at (exclusive).
    ///
    /// [`None`] marks the current [`EffectiveSalary`].
    pub end: Option<Date>,

    /// Monthly amount.
    pub amount: Money,
}

impl EffectiveSalary {
    /// Indicates whether this is the current [`EffectiveSalary`].
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.end.is_none()
    }
}

/// Checks that the provided history (ordered by start) has strictly
/// increasing starts, no gaps, no overlaps and exactly one open row.
#[must_use]
pub fn is_contiguous(history: &[EffectiveSalary]) -> bool {
    let Some((last, rest)) = history.split_last() else {
        return true;
    };
    let closed_chain = rest.iter().zip(history.iter().skip(1)).all(|(a, b)| {
        a.start < b.start && a.end == Some(b.start)
    });
    closed_chain && last.is_current()
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};

    use super::{is_contiguous, EffectiveSalary};

    fn row(start: &str, end: Option<&str>) -> EffectiveSalary {
        EffectiveSalary {
            id: 0.into(),
            employee_id: 1.into(),
            start: start.parse::<Date>().unwrap(),
            end: end.map(|e| e.parse().unwrap()),
            amount: "3000.00".parse::<Money>().unwrap(),
        }
    }

    #[test]
    fn accepts_partitioned_history() {
        assert!(is_contiguous(&[]));
        assert!(is_contiguous(&[row("2024-01-01", None)]));
        assert!(is_contiguous(&[
            row("2024-01-01", Some("2024-06-01")),
            row("2024-06-01", Some("2025-01-01")),
            row("2025-01-01", None),
        ]));
    }

    #[test]
    fn rejects_gaps_overlaps_and_open_rows() {
        assert!(!is_contiguous(&[
            row("2024-01-01", Some("2024-05-01")),
            row("2024-06-01", None),
        ]));
        assert!(!is_contiguous(&[
            row("2024-01-01", Some("2024-07-01")),
            row("2024-06-01", None),
        ]));
        assert!(!is_contiguous(&[
            row("2024-01-01", None),
            row("2024-06-01", None),
        ]));
        assert!(!is_contiguous(&[row("2024-01-01", Some("2024-06-01"))]));
    }
}
