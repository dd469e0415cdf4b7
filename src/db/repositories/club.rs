use sqlx::{Pool, Postgres, Result as SqlxResult};
use tracing::instrument;

use crate::db::models::club::Club;

#[derive(Debug)]
pub struct ClubRepository {
    pool: &'static Pool<Postgres>,
}

impl ClubRepository {
    pub fn new(pool: &'static Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Full roster, id-ascending. The contributor pass walks every club, and
    /// the coverage guarantee (zero-activity clubs still get snapshot rows)
    /// rests on the aggregation joining against this same table.
    #[instrument(skip(self))]
    pub async fn all(&self) -> SqlxResult<Vec<Club>> {
        sqlx::query_as::<_, Club>(
            r#"
            SELECT
                id,
                name,
                COALESCE(city, '') AS city,
                COALESCE(country, '') AS country,
                created_at,
                updated_at
            FROM clubs
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await
    }
}
