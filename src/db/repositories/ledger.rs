use chrono::NaiveDate;
use sqlx::{Pool, Postgres, Result as SqlxResult};
use tracing::instrument;

use crate::db::models::club::{ClubId, ClubPointsRow};
use crate::db::models::ledger::UserPointsRow;

/// Read-only aggregation over the windowed points ledger. `window_column`
/// selects which denormalized start column the filter applies to
/// (`week_start` / `month_start` / `year_start`); it is always one of the
/// compile-time constants carried by `ComputedPeriod`, never caller input.
#[derive(Debug)]
pub struct LedgerRepository {
    pool: &'static Pool<Postgres>,
}

impl LedgerRepository {
    pub fn new(pool: &'static Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Per-club totals for one window: summed points and distinct
    /// contributor count. The roster drives the join, so clubs without a
    /// single matching entry still produce a zeroed row. Ordered by total
    /// descending with an ascending-id tie-break so reruns over an unchanged
    /// ledger rank identically.
    #[instrument(skip(self))]
    pub async fn club_totals(
        &self,
        window_column: &'static str,
        window_start: NaiveDate,
    ) -> SqlxResult<Vec<ClubPointsRow>> {
        sqlx::query_as::<_, ClubPointsRow>(&format!(
            r#"
            SELECT
                c.id AS club_id,
                COALESCE(SUM(p.points), 0)::BIGINT AS total_points,
                COUNT(DISTINCT p.user_id) AS active_member_count,
                COALESCE(c.city, '') AS city
            FROM clubs c
            LEFT JOIN points_ledger p
                ON p.club_id = c.id
                AND p.{window_column} = $1
            GROUP BY c.id, c.city
            ORDER BY total_points DESC, c.id ASC
            "#,
        ))
        .bind(window_start)
        .fetch_all(self.pool)
        .await
    }

    /// One club's contributors for one window, points descending with the
    /// same ascending-id tie-break. Users with no entries in the window do
    /// not appear.
    #[instrument(skip(self))]
    pub async fn user_totals(
        &self,
        club_id: ClubId,
        window_column: &'static str,
        window_start: NaiveDate,
    ) -> SqlxResult<Vec<UserPointsRow>> {
        sqlx::query_as::<_, UserPointsRow>(&format!(
            r#"
            SELECT
                user_id,
                COALESCE(SUM(points), 0)::BIGINT AS points
            FROM points_ledger
            WHERE club_id = $1
                AND {window_column} = $2
            GROUP BY user_id
            ORDER BY points DESC, user_id ASC
            "#,
        ))
        .bind(club_id)
        .bind(window_start)
        .fetch_all(self.pool)
        .await
    }
}
