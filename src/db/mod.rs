use std::sync::LazyLock;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::util::env;
use crate::util::env::Var;
use crate::var;

pub mod models;
pub mod repositories;

pub mod prelude {
    pub use crate::db::PgError;
    pub use crate::db::PgResult;
    pub use crate::db::db_pool;

    pub use crate::db::models::club::{Club, ClubId, ClubPointsRow};
    pub use crate::db::models::ledger::{UserId, UserPointsRow};
    pub use crate::db::models::snapshot::{CityRankRow, ClubSnapshot, UserClubSnapshot};

    pub use crate::db::repositories::club::ClubRepository;
    pub use crate::db::repositories::ledger::LedgerRepository;
    pub use crate::db::repositories::snapshot::SnapshotRepository;
}

/// Scheduled runs are short; a handful of connections covers the engine's
/// strictly sequential query pattern.
const MAX_POOL_CONNECTIONS: u32 = 5;

static DB_POOL: LazyLock<OnceCell<Db>> = LazyLock::new(OnceCell::new);

/// Process-wide pool, created on first use and reused by every subsequent
/// invocation for as long as the process stays warm. Torn down with the
/// process; there is no explicit close.
pub async fn db_pool() -> PgResult<&'static PgPool> {
    Ok(&DB_POOL
        .get_or_try_init(|| async { Db::new_pool().await })
        .await?
        .pool)
}

struct Db {
    pool: PgPool,
}

impl Db {
    async fn new_pool() -> PgResult<Self> {
        let db_url = var!(Var::DatabaseUrl).await?;
        let pool = PgPoolOptions::new()
            .max_connections(MAX_POOL_CONNECTIONS)
            .connect(db_url)
            .await?;

        Ok(Self { pool })
    }
}

pub type PgResult<T> = core::result::Result<T, PgError>;

#[derive(Debug, Error)]
pub enum PgError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Env(#[from] env::EnvErr),
}
