use core::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::club::ClubId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct UserId(pub i64);

/// Base points_ledger table model. Append-only record of point-earning
/// events, pre-denormalized with the start date of the week/month/year each
/// event falls in. Written by the ingestion pipeline, never by this engine.
#[derive(Debug, Clone, sqlx::FromRow)]
#[allow(dead_code)]
pub struct LedgerEntry {
    pub id: i64,
    pub user_id: UserId,
    pub club_id: ClubId,
    pub points: i64,
    pub source: String,
    pub reference_id: Option<i64>,
    pub week_start: NaiveDate,
    pub month_start: NaiveDate,
    pub year_start: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One contributor's summed points within a single club and window.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserPointsRow {
    pub user_id: UserId,
    pub points: i64,
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        UserId(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
