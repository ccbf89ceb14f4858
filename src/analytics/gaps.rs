/// Break and gap analysis
///
/// A break is a pair of neighbouring completion dates more than one day
/// apart; the gap is the days strictly between them that were missed.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::DateSet;

/// One pause in a habit: the last date before it and the first date after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GapRecord {
    pub break_date: NaiveDate,
    pub resume_date: NaiveDate,
}

impl GapRecord {
    /// Days missed between the two dates
    pub fn missed_days(&self) -> u32 {
        missed_days((self.resume_date - self.break_date).num_days())
    }
}

/// Everything the gap analysis produces for one date set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GapReport {
    pub break_count: u32,
    pub total_gap_days: u32,
    pub gaps: Vec<GapRecord>,
}

/// Number of times the run of consecutive dates was broken
pub fn break_count(dates: &DateSet) -> u32 {
    let breaks = dates.day_steps().filter(|step| step.days > 1).count();
    u32::try_from(breaks).unwrap_or(u32::MAX)
}

/// Total number of calendar days missed between completions
pub fn total_gap_days(dates: &DateSet) -> u32 {
    dates
        .day_steps()
        .filter(|step| step.days > 1)
        .fold(0u32, |total, step| total.saturating_add(missed_days(step.days)))
}

/// Every break, as (last date before, first date after)
pub fn gap_records(dates: &DateSet) -> Vec<GapRecord> {
    dates
        .day_steps()
        .filter(|step| step.days > 1)
        .map(|step| GapRecord {
            break_date: step.earlier,
            resume_date: step.later,
        })
        .collect()
}

/// Break count, gap days and gap records in a single pass
pub fn analyze_gaps(dates: &DateSet) -> GapReport {
    let mut report = GapReport::default();
    for step in dates.day_steps().filter(|step| step.days > 1) {
        report.break_count = report.break_count.saturating_add(1);
        report.total_gap_days = report.total_gap_days.saturating_add(missed_days(step.days));
        report.gaps.push(GapRecord {
            break_date: step.earlier,
            resume_date: step.later,
        });
    }
    report
}

fn missed_days(day_difference: i64) -> u32 {
    u32::try_from(day_difference - 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::tests::{date_set, days_before};
    use crate::analytics::longest_streak;

    #[test]
    fn test_consecutive_days_have_no_gaps() {
        let dates = date_set(&[2, 1, 0]);
        assert_eq!(break_count(&dates), 0);
        assert_eq!(total_gap_days(&dates), 0);
        assert!(gap_records(&dates).is_empty());
    }

    #[test]
    fn test_single_gap() {
        // D-5, D-1: D-4, D-3 and D-2 were missed
        let dates = date_set(&[5, 1]);
        assert_eq!(break_count(&dates), 1);
        assert_eq!(total_gap_days(&dates), 3);
        assert_eq!(
            gap_records(&dates),
            vec![GapRecord { break_date: days_before(5), resume_date: days_before(1) }]
        );
    }

    #[test]
    fn test_gap_between_runs() {
        let dates = date_set(&[10, 9, 5, 4, 3]);
        assert_eq!(break_count(&dates), 1);
        assert_eq!(total_gap_days(&dates), 3);
        assert_eq!(gap_records(&dates)[0].missed_days(), 3);
    }

    #[test]
    fn test_multiple_gaps() {
        let dates = date_set(&[10, 5, 4, 2]);
        assert_eq!(break_count(&dates), 2);
        assert_eq!(total_gap_days(&dates), 5);
        assert_eq!(
            gap_records(&dates),
            vec![
                GapRecord { break_date: days_before(10), resume_date: days_before(5) },
                GapRecord { break_date: days_before(4), resume_date: days_before(2) },
            ]
        );
    }

    #[test]
    fn test_zero_or_one_date() {
        for offsets in [&[][..], &[3]] {
            let dates = date_set(offsets);
            assert_eq!(analyze_gaps(&dates), GapReport::default());
        }
    }

    #[test]
    fn test_single_pass_matches_individual_functions() {
        let dates = date_set(&[40, 39, 30, 12, 11, 10, 2, 0]);
        let report = analyze_gaps(&dates);
        assert_eq!(report.break_count, break_count(&dates));
        assert_eq!(report.total_gap_days, total_gap_days(&dates));
        assert_eq!(report.gaps, gap_records(&dates));
    }

    #[test]
    fn test_breaks_relate_to_runs() {
        for offsets in [&[0][..], &[2, 1, 0], &[9, 5, 1], &[30, 29, 20, 4, 3, 2]] {
            let dates = date_set(offsets);
            let report = analyze_gaps(&dates);
            // A run starts at every date whose previous day is missing
            let runs = dates
                .iter()
                .filter(|d| d.pred_opt().map_or(true, |prev| !dates.as_slice().contains(&prev)))
                .count() as u32;
            assert_eq!(report.break_count + 1, runs);
            if report.break_count > 0 {
                assert!(report.total_gap_days >= report.break_count);
            }
        }
    }

    #[test]
    fn test_shuffled_input_gives_same_result() {
        let ordered = date_set(&[12, 11, 7, 3, 2, 1]);
        let shuffled = DateSet::from_dates(
            [2, 12, 1, 7, 11, 3, 7].iter().map(|d| days_before(*d)),
        );
        assert_eq!(analyze_gaps(&ordered), analyze_gaps(&shuffled));
        assert_eq!(longest_streak(&ordered), longest_streak(&shuffled));
    }
}
