use lazy_static::lazy_static;
use std::{env, io};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn, Level};
use tracing_loki::url::{ParseError, Url};
use tracing_loki::{BackgroundTask, BackgroundTaskController};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter, fmt};

const SERVICE_NAME: &str = "tulumwellness";

lazy_static! {
    static ref LOKI_URL: Option<String> = env::var("LOKI_URL").ok();
}

type LokiParts = (
    tracing_loki::Layer,
    BackgroundTaskController,
    BackgroundTask,
);

#[derive(Debug, Error)]
enum LokiError {
    #[error("Loki URL not provided")]
    NotConfigured,

    #[error("invalid Loki URL ({0})")]
    InvalidUrl(#[from] ParseError),

    #[error("couldn't connect to Loki ({0})")]
    Unreachable(#[from] reqwest::Error),

    #[error("failed building the Loki layer ({0})")]
    Layer(#[from] tracing_loki::Error),
}

async fn connect_loki() -> Result<LokiParts, LokiError> {
    let base_url: Url = LOKI_URL.as_ref().ok_or(LokiError::NotConfigured)?.parse()?;

    reqwest::get(base_url.clone()).await?;

    Ok(tracing_loki::builder()
        .label("service", SERVICE_NAME)?
        .build_controller_url(base_url)?)
}

/// Logs to stdout, and to Loki as well when `LOKI_URL` is set and reachable
pub async fn setup_loki() -> Option<(BackgroundTaskController, JoinHandle<()>)> {
    let filter = filter::Targets::new()
        .with_target(SERVICE_NAME, Level::TRACE)
        .with_default(Level::WARN);

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stdout));

    match connect_loki().await {
        Ok((layer, controller, task)) => {
            registry.with(layer).init();
            let handle = tokio::spawn(task);

            info!("Loki initialized");

            Some((controller, handle))
        }
        Err(err) => {
            registry.init();
            warn!("Logging to stdout only: {}", err);

            None
        }
    }
}
