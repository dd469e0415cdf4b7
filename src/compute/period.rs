use core::fmt;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Period vocabulary persisted in the snapshot tables' `period_type` column.
///
/// `AllTime` is a valid stored label but has no computation step; nothing
/// currently materializes cumulative snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Weekly,
    Monthly,
    Annual,
    AllTime,
}

impl PeriodKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            PeriodKind::Weekly => "weekly",
            PeriodKind::Monthly => "monthly",
            PeriodKind::Annual => "annual",
            PeriodKind::AllTime => "all_time",
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed `[start, end]` bounds of one period occurrence, in UTC.
/// `end` is the last whole second before the next occurrence begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl PeriodWindow {
    /// Week containing `at`: ISO week, Monday 00:00:00 UTC through Sunday
    /// 23:59:59 UTC. A Sunday instant belongs to the week that started the
    /// preceding Monday.
    pub fn week_of(at: DateTime<Utc>) -> Self {
        let days_into_week = i64::from(at.weekday().num_days_from_monday());
        let monday = at.date_naive() - Duration::days(days_into_week);

        Self::from_dates(monday, monday + Duration::days(7))
    }

    /// Calendar month containing `at`.
    pub fn month_of(at: DateTime<Utc>) -> Self {
        let first = at.date_naive() - Duration::days(i64::from(at.day0()));

        Self::from_dates(first, first + Months::new(1))
    }

    /// Calendar year containing `at`.
    pub fn year_of(at: DateTime<Utc>) -> Self {
        let jan_first = at.date_naive() - Duration::days(i64::from(at.ordinal0()));

        Self::from_dates(jan_first, jan_first + Months::new(12))
    }

    /// The ledger's denormalized window-start columns hold dates, not
    /// instants; this is the date form the aggregation filters on.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    fn from_dates(start: NaiveDate, next_start: NaiveDate) -> Self {
        Self {
            start: start.and_time(NaiveTime::MIN).and_utc(),
            end: next_start.and_time(NaiveTime::MIN).and_utc() - Duration::seconds(1),
        }
    }
}

/// One period the orchestrator materializes: its kind, the window containing
/// the reference instant, and the ledger column the aggregation filters on.
#[derive(Debug, Clone, Copy)]
pub struct ComputedPeriod {
    pub kind: PeriodKind,
    pub window: PeriodWindow,
    pub window_column: &'static str,
}

/// The periods computed per run, in fixed execution order.
pub fn computed_periods(now: DateTime<Utc>) -> [ComputedPeriod; 3] {
    [
        ComputedPeriod {
            kind: PeriodKind::Weekly,
            window: PeriodWindow::week_of(now),
            window_column: "week_start",
        },
        ComputedPeriod {
            kind: PeriodKind::Monthly,
            window: PeriodWindow::month_of(now),
            window_column: "month_start",
        },
        ComputedPeriod {
            kind: PeriodKind::Annual,
            window: PeriodWindow::year_of(now),
            window_column: "year_start",
        },
    ]
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Timelike, Weekday};

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn week_starts_on_monday_midnight() {
        // 2024-01-03 is a Wednesday
        let window = PeriodWindow::week_of(at(2024, 1, 3, 15, 30, 0));

        assert_eq!(window.start, at(2024, 1, 1, 0, 0, 0));
        assert_eq!(window.start.weekday(), Weekday::Mon);
        assert_eq!(window.end, at(2024, 1, 7, 23, 59, 59));
    }

    #[test]
    fn sunday_belongs_to_the_preceding_monday() {
        // 2024-01-07 is a Sunday
        let window = PeriodWindow::week_of(at(2024, 1, 7, 10, 0, 0));

        assert_eq!(window.start, at(2024, 1, 1, 0, 0, 0));
        assert_eq!(window.end, at(2024, 1, 7, 23, 59, 59));
    }

    #[test]
    fn monday_starts_its_own_week() {
        let window = PeriodWindow::week_of(at(2024, 1, 8, 0, 0, 0));

        assert_eq!(window.start, at(2024, 1, 8, 0, 0, 0));
    }

    #[test]
    fn week_can_straddle_a_year_boundary() {
        // the week of 2025-01-02 started on Monday 2024-12-30
        let window = PeriodWindow::week_of(at(2025, 1, 2, 8, 0, 0));

        assert_eq!(window.start, at(2024, 12, 30, 0, 0, 0));
        assert_eq!(window.end, at(2025, 1, 5, 23, 59, 59));
    }

    #[test]
    fn month_bounds_cover_leap_february() {
        let window = PeriodWindow::month_of(at(2024, 2, 14, 12, 0, 0));

        assert_eq!(window.start, at(2024, 2, 1, 0, 0, 0));
        assert_eq!(window.end, at(2024, 2, 29, 23, 59, 59));
    }

    #[test]
    fn december_rolls_into_the_next_year() {
        let window = PeriodWindow::month_of(at(2023, 12, 31, 23, 59, 59));

        assert_eq!(window.start, at(2023, 12, 1, 0, 0, 0));
        assert_eq!(window.end, at(2023, 12, 31, 23, 59, 59));
    }

    #[test]
    fn year_bounds_are_january_first_through_december_thirty_first() {
        let window = PeriodWindow::year_of(at(2024, 7, 19, 8, 45, 12));

        assert_eq!(window.start, at(2024, 1, 1, 0, 0, 0));
        assert_eq!(window.end, at(2024, 12, 31, 23, 59, 59));
    }

    #[test]
    fn every_window_contains_its_reference_instant() {
        let instants = [
            at(2024, 1, 1, 0, 0, 0),
            at(2024, 2, 29, 23, 59, 59),
            at(2025, 12, 28, 6, 0, 1),
            at(1999, 6, 15, 12, 0, 0),
        ];

        for now in instants {
            for period in computed_periods(now) {
                assert!(
                    period.window.start <= now && now <= period.window.end,
                    "{} window {:?} does not contain {now}",
                    period.kind,
                    period.window,
                );
                assert_eq!(period.window.start.time().num_seconds_from_midnight(), 0);
            }
        }
    }

    #[test]
    fn windows_are_reproducible() {
        let now = at(2024, 5, 21, 9, 13, 37);

        assert_eq!(PeriodWindow::week_of(now), PeriodWindow::week_of(now));
        assert_eq!(PeriodWindow::month_of(now), PeriodWindow::month_of(now));
        assert_eq!(PeriodWindow::year_of(now), PeriodWindow::year_of(now));
    }

    #[test]
    fn all_time_is_named_but_never_scheduled() {
        let kinds: Vec<PeriodKind> = computed_periods(at(2024, 1, 1, 0, 0, 0))
            .iter()
            .map(|p| p.kind)
            .collect();

        assert_eq!(PeriodKind::AllTime.as_str(), "all_time");
        assert!(!kinds.contains(&PeriodKind::AllTime));
    }
}
