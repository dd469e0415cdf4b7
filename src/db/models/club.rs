use core::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct ClubId(pub i64);

/// Base clubs table model. Roster reference data owned by the external
/// club-management system; the engine only ever reads it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    pub city: String,
    pub country: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One club's aggregated standing within a period window. Every club on the
/// roster produces a row; clubs with no ledger activity carry zeroes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClubPointsRow {
    pub club_id: ClubId,
    pub total_points: i64,
    pub active_member_count: i64,
    pub city: String,
}

impl From<i64> for ClubId {
    fn from(value: i64) -> Self {
        ClubId(value)
    }
}

impl fmt::Display for ClubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
