//! Fulfillment demo entry point.

use app::{AppError, Config, LogFormat, RunSummary, Wiring, demo_request};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration
    let config = Config::from_env()?;

    // 2. Initialize tracing
    init_tracing(&config);

    // 3. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    // 4. Wire the root scope, facades and saga
    let app = Wiring::new().fail_at(config.fail_at).build();
    tracing::info!(fail_at = ?config.fail_at, "starting order fulfillment");

    // 5. Run one fulfillment and report
    let run = app.fulfillment.execute(demo_request()).await;
    let summary = RunSummary::from(&run);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    tracing::info!(
        published_events = app.events.event_names().len(),
        "fulfillment finished"
    );
    tracing::debug!(metrics = %metrics_handle.render(), "metrics snapshot");

    Ok(())
}
