//! geo-fence - IP country allow-list service
//!
//! Composition root: configuration, logging, then the supervisor.

use geo_fence::{load_config, ServiceSupervisor};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    tracing_subscriber::fmt()
        .with_max_level(cfg.tracing_level())
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        http = %cfg.http_addr(),
        grpc = %cfg.grpc_addr(),
        db = %cfg.db_path,
        "starting geo-fence"
    );

    // Startup failures (missing database, port in use) propagate as a
    // non-zero exit.
    let supervisor = ServiceSupervisor::start(&cfg).await?;

    supervisor.run().await
}
