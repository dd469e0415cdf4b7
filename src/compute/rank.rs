//! Dense positional ranking passes.
//!
//! Ranks are 1-based positions in the order the aggregation returned, not
//! tie-compressed: equal scores still receive distinct consecutive ranks.
//! Determinism across reruns comes from the aggregation's explicit
//! ascending-id secondary sort, not from anything done here.

use crate::db::models::club::{ClubId, ClubPointsRow};
use crate::db::models::ledger::UserPointsRow;
use crate::db::models::snapshot::{CityRankRow, ClubSnapshot, UserClubSnapshot};

use super::period::ComputedPeriod;

/// Builds the period's club snapshot rows from the aggregation output,
/// assigning global ranks by position. Input must already be ordered by
/// total points descending.
pub fn club_snapshots(period: &ComputedPeriod, rows: &[ClubPointsRow]) -> Vec<ClubSnapshot> {
    rows.iter()
        .enumerate()
        .map(|(position, row)| ClubSnapshot {
            club_id: row.club_id,
            period: period.kind,
            window: period.window,
            total_points: row.total_points,
            // only the distinct-contributor count is computed; the roster
            // size was never recorded here
            member_count: 0,
            active_member_count: row.active_member_count,
            global_rank: Some(position as i64 + 1),
            city: row.city.clone(),
        })
        .collect()
}

/// Per-locality ranks over the period's read-back snapshot rows, returned as
/// (snapshot row id, local rank) pairs. Input must be ordered by city, then
/// total points descending; each city's run restarts the count at 1. Rows
/// with no city form no locality and receive no rank.
pub fn locality_ranks(rows: &[CityRankRow]) -> Vec<(i64, i64)> {
    let mut ranks = Vec::with_capacity(rows.len());
    let mut current_city: Option<&str> = None;
    let mut rank = 0;

    for row in rows {
        if row.city.is_empty() {
            continue;
        }

        if current_city != Some(row.city.as_str()) {
            current_city = Some(row.city.as_str());
            rank = 0;
        }

        rank += 1;
        ranks.push((row.id, rank));
    }

    ranks
}

/// Builds one club's contributor snapshot rows, ranking by position the same
/// way the global pass does. Input must already be ordered by points
/// descending; users with no entries in the window never reach here.
pub fn contributor_snapshots(
    period: &ComputedPeriod,
    club_id: ClubId,
    rows: &[UserPointsRow],
) -> Vec<UserClubSnapshot> {
    rows.iter()
        .enumerate()
        .map(|(position, row)| UserClubSnapshot {
            user_id: row.user_id,
            club_id,
            period: period.kind,
            window: period.window,
            points_contributed: row.points,
            club_rank: Some(position as i64 + 1),
        })
        .collect()
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::compute::period::computed_periods;

    fn weekly() -> ComputedPeriod {
        computed_periods(Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap())[0]
    }

    fn club_row(id: i64, total: i64, city: &str) -> ClubPointsRow {
        ClubPointsRow {
            club_id: ClubId(id),
            total_points: total,
            active_member_count: 0,
            city: city.to_string(),
        }
    }

    #[test]
    fn global_ranks_are_contiguous_from_one() {
        let rows: Vec<ClubPointsRow> =
            (0..5).map(|i| club_row(i + 1, 100 - i * 10, "a")).collect();

        let snapshots = club_snapshots(&weekly(), &rows);
        let ranks: Vec<i64> = snapshots.iter().filter_map(|s| s.global_rank).collect();

        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn tied_scores_keep_distinct_ranks_in_input_order() {
        let rows = vec![club_row(7, 50, "a"), club_row(9, 50, "a")];

        let snapshots = club_snapshots(&weekly(), &rows);

        assert_eq!(snapshots[0].global_rank, Some(1));
        assert_eq!(snapshots[1].global_rank, Some(2));
    }

    #[test]
    fn locality_ranks_restart_per_city() {
        let rows = vec![
            CityRankRow { id: 1, city: "aarhus".into(), total_points: 90 },
            CityRankRow { id: 2, city: "aarhus".into(), total_points: 40 },
            CityRankRow { id: 3, city: "bergen".into(), total_points: 70 },
        ];

        assert_eq!(locality_ranks(&rows), vec![(1, 1), (2, 2), (3, 1)]);
    }

    #[test]
    fn empty_city_rows_are_skipped() {
        let rows = vec![
            CityRankRow { id: 1, city: String::new(), total_points: 99 },
            CityRankRow { id: 2, city: "bergen".into(), total_points: 10 },
        ];

        assert_eq!(locality_ranks(&rows), vec![(2, 1)]);
    }

    #[test]
    fn no_rows_no_ranks() {
        assert!(locality_ranks(&[]).is_empty());
        assert!(club_snapshots(&weekly(), &[]).is_empty());
    }
}
