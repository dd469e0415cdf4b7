use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Result as SqlxResult};
use tracing::instrument;

use crate::compute::period::PeriodKind;
use crate::db::models::snapshot::{CityRankRow, ClubSnapshot, UserClubSnapshot};

/// Idempotent writer for both snapshot tables. Each upsert is keyed on the
/// table's uniqueness constraint, so rerunning a period overwrites values in
/// place; `id` and `created_at` survive, `updated_at` is bumped. No other
/// component writes these tables.
#[derive(Debug)]
pub struct SnapshotRepository {
    pool: &'static Pool<Postgres>,
}

impl SnapshotRepository {
    pub fn new(pool: &'static Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Upsert on (club_id, period_type, period_start). The local rank is not
    /// touched here; it is recomputed by the second pass once the whole
    /// period's rows exist.
    #[instrument(skip(self, snapshot), fields(club = %snapshot.club_id, period = %snapshot.period))]
    pub async fn upsert_club_snapshot(&self, snapshot: &ClubSnapshot) -> SqlxResult<()> {
        sqlx::query(
            r#"
            INSERT INTO club_leaderboard_snapshots (
                club_id,
                period_type,
                period_start,
                period_end,
                total_points,
                member_count,
                active_member_count,
                global_rank,
                city,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
            ON CONFLICT (club_id, period_type, period_start)
            DO UPDATE SET
                total_points = $5,
                active_member_count = $7,
                global_rank = $8,
                city = $9,
                period_end = $4,
                updated_at = NOW()
            "#,
        )
        .bind(snapshot.club_id)
        .bind(snapshot.period.as_str())
        .bind(snapshot.window.start)
        .bind(snapshot.window.end)
        .bind(snapshot.total_points)
        .bind(snapshot.member_count)
        .bind(snapshot.active_member_count)
        .bind(snapshot.global_rank)
        .bind(&snapshot.city)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Upsert on (user_id, club_id, period_type, period_start).
    #[instrument(
        skip(self, snapshot),
        fields(user = %snapshot.user_id, club = %snapshot.club_id, period = %snapshot.period)
    )]
    pub async fn upsert_user_snapshot(&self, snapshot: &UserClubSnapshot) -> SqlxResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_club_leaderboard_snapshots (
                user_id,
                club_id,
                points_contributed,
                period_type,
                period_start,
                period_end,
                club_rank,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
            ON CONFLICT (user_id, club_id, period_type, period_start)
            DO UPDATE SET
                points_contributed = $3,
                club_rank = $7,
                period_end = $6,
                updated_at = NOW()
            "#,
        )
        .bind(snapshot.user_id)
        .bind(snapshot.club_id)
        .bind(snapshot.points_contributed)
        .bind(snapshot.period.as_str())
        .bind(snapshot.window.start)
        .bind(snapshot.window.end)
        .bind(snapshot.club_rank)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Read-back for the locality pass: the period's freshly upserted rows
    /// that belong to a locality, grouped by city with each city's clubs in
    /// rank order.
    #[instrument(skip(self))]
    pub async fn city_rank_rows(
        &self,
        period: PeriodKind,
        period_start: DateTime<Utc>,
    ) -> SqlxResult<Vec<CityRankRow>> {
        sqlx::query_as::<_, CityRankRow>(
            r#"
            SELECT
                id,
                city,
                total_points
            FROM club_leaderboard_snapshots
            WHERE period_type = $1
                AND period_start = $2
                AND city <> ''
            ORDER BY city ASC, total_points DESC, club_id ASC
            "#,
        )
        .bind(period.as_str())
        .bind(period_start)
        .fetch_all(self.pool)
        .await
    }

    /// Second-pass write: stamps a locality rank onto an already-upserted
    /// row by primary key.
    #[instrument(skip(self))]
    pub async fn set_local_rank(&self, snapshot_id: i64, local_rank: i64) -> SqlxResult<()> {
        sqlx::query(
            r#"
            UPDATE club_leaderboard_snapshots
            SET local_rank = $2,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(snapshot_id)
        .bind(local_rank)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
