use serde::{Deserialize, Serialize};

use super::club::ClubId;
use super::ledger::UserId;
use crate::compute::period::{PeriodKind, PeriodWindow};

/// One club leaderboard snapshot as computed for a period window.
///
/// Row identity (id, created_at) lives in the store and survives re-upserts
/// of the same (club_id, period_type, period_start) key; the local rank is
/// written separately in the second ranking pass and is deliberately absent
/// here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubSnapshot {
    pub club_id: ClubId,
    pub period: PeriodKind,
    pub window: PeriodWindow,
    pub total_points: i64,
    pub member_count: i64,
    pub active_member_count: i64,
    pub global_rank: Option<i64>,
    pub city: String,
}

/// One user's contribution snapshot within a club for a period window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClubSnapshot {
    pub user_id: UserId,
    pub club_id: ClubId,
    pub period: PeriodKind,
    pub window: PeriodWindow,
    pub points_contributed: i64,
    pub club_rank: Option<i64>,
}

/// Read-back row for the locality pass: a freshly upserted snapshot's store
/// identity plus the fields the per-city re-ranking orders on.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CityRankRow {
    pub id: i64,
    pub city: String,
    pub total_points: i64,
}
