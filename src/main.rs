use chrono::Utc;
use thiserror::Error;

use crate::compute::ComputeService;
use crate::util::telemetry;

mod compute;
mod db;
mod util;

#[derive(Debug, Error)]
enum RunnerErr {
    #[error(transparent)]
    Compute(#[from] compute::ComputeError),

    #[error(transparent)]
    Db(#[from] db::PgError),

    #[error(transparent)]
    Std(#[from] Box<dyn std::error::Error>),
}

type Result<T> = core::result::Result<T, RunnerErr>;

/// One invocation computes the weekly, monthly, and annual leaderboards for
/// the windows containing "now". The trigger (scheduler, cron, whatever
/// calls this binary) owns retry policy; a failed run is safe to repeat
/// because every write is an idempotent upsert.
#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = telemetry::Telemetry::new().await?.register();

    tracing::info!("starting leaderboard snapshot run");

    let outcome = run().await;

    match &outcome {
        Ok(()) => tracing::info!("leaderboard snapshot run complete"),
        Err(e) => tracing::error!(error = %e, "leaderboard snapshot run failed"),
    }

    telemetry.shutdown();

    outcome
}

async fn run() -> Result<()> {
    let pool = db::db_pool().await?;
    let service = ComputeService::new(pool);

    service.compute_all(Utc::now()).await?;

    Ok(())
}
