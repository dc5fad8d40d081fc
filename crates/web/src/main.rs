use tracing::info;

use qaboard_common::{default_config_path, DashboardConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = DashboardConfig::load(&default_config_path())?.with_env_overrides();
    let web_addr = cfg.web.socket_addr()?;

    info!(
        "Starting qaboard web console on http://{} (store: {})",
        web_addr,
        cfg.store_path.display()
    );

    qaboard_web::server::serve(web_addr, cfg).await
}
