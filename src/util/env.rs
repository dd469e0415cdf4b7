use std::sync::LazyLock;

use thiserror::Error;
use tokio::sync::OnceCell;

static ENV_VARS: LazyLock<OnceCell<Env>> = LazyLock::new(OnceCell::new);

pub async fn get_var(var: Var) -> EnvResult<&'static str> {
    let vars = ENV_VARS.get_or_try_init(|| async { Env::new() }).await?;

    Ok(match var {
        Var::DatabaseUrl => &vars.database_url,
        Var::OtelExporterEndpoint => &vars.otel_exporter_otlp_endpoint,
        Var::ServiceName => &vars.service_name,
        Var::TracerName => &vars.tracer_name,
    })
}

/// Process configuration, read once from the environment (a `.env` file is
/// honored if present) and held for the life of the process.
#[derive(Debug, Clone)]
pub struct Env {
    pub database_url: String,
    pub otel_exporter_otlp_endpoint: String,
    pub service_name: String,
    pub tracer_name: String,
}

impl Env {
    pub fn new() -> EnvResult<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: dotenvy::var("DATABASE_URL")?,
            otel_exporter_otlp_endpoint: dotenvy::var("OTEL_EXPORTER_OTLP_ENDPOINT")?,
            service_name: dotenvy::var("ENGINE_SERVICE_NAME")?,
            tracer_name: dotenvy::var("ENGINE_TRACER_NAME")?,
        })
    }
}

#[derive(Debug)]
pub enum Var {
    DatabaseUrl,
    OtelExporterEndpoint,
    ServiceName,
    TracerName,
}

#[macro_export]
macro_rules! var {
    ($ev:expr) => {
        $crate::util::env::get_var($ev)
    };
}

pub type EnvResult<T> = core::result::Result<T, EnvErr>;

#[derive(Debug, Error)]
pub enum EnvErr {
    #[error(transparent)]
    Dotenvy(#[from] dotenvy::Error),
}
