use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use crate::db::prelude::{
    ClubId, ClubRepository, LedgerRepository, SnapshotRepository, UserId,
};

use self::period::{ComputedPeriod, PeriodKind, computed_periods};

pub mod period;
pub mod rank;


/// Drives one full recomputation: weekly, then monthly, then annual. Each
/// period runs the club pass (aggregate, globally rank and upsert, then
/// recompute locality ranks over the read-back) followed by the per-club
/// contributor pass. The first hard failure aborts the run; everything
/// upserted before it stays committed and is corrected by the next run.
pub struct ComputeService {
    clubs: ClubRepository,
    ledger: LedgerRepository,
    snapshots: SnapshotRepository,
}

impl ComputeService {
    pub fn new(pool: &'static PgPool) -> Self {
        Self {
            clubs: ClubRepository::new(pool),
            ledger: LedgerRepository::new(pool),
            snapshots: SnapshotRepository::new(pool),
        }
    }

    /// Recomputes every supported leaderboard for the windows containing
    /// `now`. Safe to re-invoke blindly: every write is an upsert on the
    /// period key.
    #[instrument(skip(self))]
    pub async fn compute_all(&self, now: DateTime<Utc>) -> ComputeResult<()> {
        for period in computed_periods(now) {
            tracing::info!(
                period = %period.kind,
                start = %period.window.start,
                end = %period.window.end,
                "computing leaderboards"
            );

            self.compute_club_leaderboard(&period).await?;
            self.compute_contributor_leaderboards(&period).await?;

            tracing::info!(period = %period.kind, "completed leaderboards");
        }

        Ok(())
    }

    #[instrument(skip(self, period), fields(period = %period.kind))]
    async fn compute_club_leaderboard(&self, period: &ComputedPeriod) -> ComputeResult<()> {
        let rows = self
            .ledger
            .club_totals(period.window_column, period.window.start_date())
            .await
            .map_err(|source| ComputeError::Aggregate { period: period.kind, source })?;

        tracing::debug!(clubs = rows.len(), "aggregated club points");

        for snapshot in rank::club_snapshots(period, &rows) {
            self.snapshots
                .upsert_club_snapshot(&snapshot)
                .await
                .map_err(|source| ComputeError::ClubUpsert {
                    period: period.kind,
                    club: snapshot.club_id,
                    source,
                })?;
        }

        // locality ranks need the whole period's rows in place first, so
        // they are derived from a read-back of what was just written
        let readback = self
            .snapshots
            .city_rank_rows(period.kind, period.window.start)
            .await
            .map_err(|source| ComputeError::LocalRank { period: period.kind, source })?;

        let ranks = rank::locality_ranks(&readback);
        tracing::debug!(ranked = ranks.len(), "recomputed locality ranks");

        for (snapshot_id, local_rank) in ranks {
            self.snapshots
                .set_local_rank(snapshot_id, local_rank)
                .await
                .map_err(|source| ComputeError::LocalRank { period: period.kind, source })?;
        }

        Ok(())
    }

    #[instrument(skip(self, period), fields(period = %period.kind))]
    async fn compute_contributor_leaderboards(
        &self,
        period: &ComputedPeriod,
    ) -> ComputeResult<()> {
        let clubs = self
            .clubs
            .all()
            .await
            .map_err(|source| ComputeError::Roster { source })?;

        for club in clubs {
            let rows = self
                .ledger
                .user_totals(club.id, period.window_column, period.window.start_date())
                .await
                .map_err(|source| ComputeError::Aggregate { period: period.kind, source })?;

            if rows.is_empty() {
                continue;
            }

            for snapshot in rank::contributor_snapshots(period, club.id, &rows) {
                self.snapshots
                    .upsert_user_snapshot(&snapshot)
                    .await
                    .map_err(|source| ComputeError::ContributorUpsert {
                        period: period.kind,
                        user: snapshot.user_id,
                        club: snapshot.club_id,
                        source,
                    })?;
            }

            tracing::debug!(club = %club.id, contributors = rows.len(), "ranked contributors");
        }

        Ok(())
    }
}

pub type ComputeResult<T> = core::result::Result<T, ComputeError>;

#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("failed to load the club roster: {source}")]
    Roster {
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to aggregate {period} points: {source}")]
    Aggregate {
        period: PeriodKind,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to upsert {period} snapshot for club {club}: {source}")]
    ClubUpsert {
        period: PeriodKind,
        club: ClubId,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to upsert {period} snapshot for user {user} in club {club}: {source}")]
    ContributorUpsert {
        period: PeriodKind,
        user: UserId,
        club: ClubId,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to recompute {period} locality ranks: {source}")]
    LocalRank {
        period: PeriodKind,
        #[source]
        source: sqlx::Error,
    },
}
