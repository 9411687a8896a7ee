//! Accountability reminder interval set.
//!
//! # Responsibility
//! - Define the validated day-offset set used by reminder scheduling.
//! - Own the normalization rules (range filter, sort, dedup).
//!
//! # Invariants
//! - Every stored interval is in `1..=365` days.
//! - The set is sorted ascending, duplicate-free and never empty.
//!
//! # See also
//! - docs/architecture/data-model.md

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Smallest allowed reminder offset in days.
pub const MIN_INTERVAL_DAYS: i64 = 1;
/// Largest allowed reminder offset in days.
pub const MAX_INTERVAL_DAYS: i64 = 365;
/// Offset used when nothing valid has been configured.
pub const DEFAULT_INTERVAL_DAYS: i64 = 5;

/// Validation failure for interval input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalValidationError {
    /// No value survived the `1..=365` range filter.
    EmptyAfterFilter,
}

impl Display for IntervalValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAfterFilter => write!(
                f,
                "no reminder interval in valid range {MIN_INTERVAL_DAYS}..={MAX_INTERVAL_DAYS}"
            ),
        }
    }
}

impl Error for IntervalValidationError {}

/// Ordered set of distinct reminder offsets in days.
///
/// Only constructible through [`ReminderIntervals::normalize`] or
/// [`Default`], so the set invariants hold for every instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderIntervals {
    days: Vec<i64>,
}

impl ReminderIntervals {
    /// Builds a valid interval set out of arbitrary caller input.
    ///
    /// Values outside `1..=365` are dropped, survivors are sorted ascending
    /// and de-duplicated. Fails when nothing survives; partial input is
    /// otherwise accepted (`[3, 3, 400, -1]` normalizes to `[3]`).
    pub fn normalize(days: &[i64]) -> Result<Self, IntervalValidationError> {
        let mut filtered: Vec<i64> = days
            .iter()
            .copied()
            .filter(|day| (MIN_INTERVAL_DAYS..=MAX_INTERVAL_DAYS).contains(day))
            .collect();
        filtered.sort_unstable();
        filtered.dedup();

        if filtered.is_empty() {
            return Err(IntervalValidationError::EmptyAfterFilter);
        }

        Ok(Self { days: filtered })
    }

    /// Day offsets, ascending and distinct.
    pub fn days(&self) -> &[i64] {
        &self.days
    }

    /// Consumes the set into its backing vector.
    pub fn into_days(self) -> Vec<i64> {
        self.days
    }
}

impl Default for ReminderIntervals {
    fn default() -> Self {
        Self {
            days: vec![DEFAULT_INTERVAL_DAYS],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IntervalValidationError, ReminderIntervals};

    #[test]
    fn normalize_sorts_and_dedups() {
        let set = ReminderIntervals::normalize(&[20, 5, 20, 1]).expect("valid input");
        assert_eq!(set.days(), &[1, 5, 20]);
    }

    #[test]
    fn normalize_drops_out_of_range_values() {
        let set = ReminderIntervals::normalize(&[3, 3, 400, -1]).expect("one survivor");
        assert_eq!(set.days(), &[3]);
    }

    #[test]
    fn normalize_accepts_range_bounds() {
        let set = ReminderIntervals::normalize(&[365, 1, 0, 366]).expect("bounds survive");
        assert_eq!(set.days(), &[1, 365]);
    }

    #[test]
    fn normalize_rejects_empty_results() {
        assert_eq!(
            ReminderIntervals::normalize(&[]),
            Err(IntervalValidationError::EmptyAfterFilter)
        );
        assert_eq!(
            ReminderIntervals::normalize(&[0, -5, 1000]),
            Err(IntervalValidationError::EmptyAfterFilter)
        );
    }

    #[test]
    fn default_is_five_days() {
        assert_eq!(ReminderIntervals::default().days(), &[5]);
    }
}
