/// Period boundaries, deadlines and "done for this period" checks
///
/// Periods follow the calendar exactly: a day, a Monday-to-Sunday week, or a
/// calendar month. `now` is always passed in so results are reproducible.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};

use crate::analytics::{AnalyticsError, DateSet};
use crate::domain::Periodicity;

impl Periodicity {
    /// First calendar day of the period containing `now`
    pub fn period_start(&self, now: NaiveDateTime) -> Result<NaiveDate, AnalyticsError> {
        let today = now.date();
        let start = match self {
            Periodicity::Daily => Some(today),
            Periodicity::Weekly => {
                let since_monday = u64::from(today.weekday().num_days_from_monday());
                today.checked_sub_days(Days::new(since_monday))
            }
            Periodicity::Monthly => today.with_day(1),
        };
        start.ok_or_else(|| out_of_range("start", *self, now))
    }

    /// Last calendar day of the period containing `now`
    pub fn period_end(&self, now: NaiveDateTime) -> Result<NaiveDate, AnalyticsError> {
        let today = now.date();
        let end = match self {
            Periodicity::Daily => Some(today),
            Periodicity::Weekly => {
                let until_sunday = u64::from(6 - today.weekday().num_days_from_monday());
                today.checked_add_days(Days::new(until_sunday))
            }
            Periodicity::Monthly => today
                .with_day(1)
                .and_then(|first| first.checked_add_months(Months::new(1)))
                .and_then(|next_first| next_first.pred_opt()),
        };
        end.ok_or_else(|| out_of_range("end", *self, now))
    }

    /// The final second (23:59:59) of the period containing `now`
    pub fn deadline(&self, now: NaiveDateTime) -> Result<NaiveDateTime, AnalyticsError> {
        let last_day = self.period_end(now)?;
        last_day
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| out_of_range("deadline", *self, now))
    }
}

/// Whether the habit has a completion inside the current period, up to `now`
pub fn is_satisfied(periodicity: Periodicity, dates: &DateSet, now: NaiveDateTime) -> Result<bool, AnalyticsError> {
    let start = periodicity.period_start(now)?;
    Ok(dates.any_between(start, now.date()))
}

fn out_of_range(what: &str, periodicity: Periodicity, now: NaiveDateTime) -> AnalyticsError {
    AnalyticsError::DateOutOfRange(format!("{} of the {} period around {}", what, periodicity, now))
}
