/// Calendar-date normalization of completion timestamps
///
/// Every streak, gap and period computation works on a `DateSet`, and a
/// `DateSet` can only be built by normalizing: same-day timestamps collapse to
/// one date and the result is sorted ascending.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Sorted, duplicate-free calendar dates of a habit's completions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DateSet(Vec<NaiveDate>);

/// Two neighbouring dates of a `DateSet` and the number of days between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DayStep {
    pub earlier: NaiveDate,
    pub later: NaiveDate,
    pub days: i64,
}

impl DateSet {
    /// Normalize raw completion timestamps (any order, duplicates allowed)
    pub fn from_timestamps<I>(timestamps: I) -> Self
    where
        I: IntoIterator<Item = NaiveDateTime>,
    {
        Self::from_dates(timestamps.into_iter().map(|t| t.date()))
    }

    /// Normalize calendar dates; a no-op on an already normalized sequence
    pub fn from_dates<I>(dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut dates: Vec<NaiveDate> = dates.into_iter().collect();
        dates.sort_unstable();
        dates.dedup();
        Self(dates)
    }

    pub fn as_slice(&self) -> &[NaiveDate] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.0.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().copied()
    }

    /// Whether any date falls within `start..=end`
    pub fn any_between(&self, start: NaiveDate, end: NaiveDate) -> bool {
        if start > end {
            return false;
        }
        let idx = self.0.partition_point(|d| *d < start);
        self.0.get(idx).map_or(false, |d| *d <= end)
    }

    /// The adjacent-pair scan shared by the streak and gap calculations
    pub(crate) fn day_steps(&self) -> impl Iterator<Item = DayStep> + '_ {
        self.0.windows(2).map(|pair| DayStep {
            earlier: pair[0],
            later: pair[1],
            days: (pair[1] - pair[0]).num_days(),
        })
    }
}

impl From<DateSet> for Vec<NaiveDate> {
    fn from(set: DateSet) -> Self {
        set.0
    }
}
