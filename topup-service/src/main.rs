use service_core::observability::init_tracing;
use topup_service::{config::Config, services::init_metrics, Application};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let shared = service_core::config::Config::load()?;
    let config = Config::from_env()?;

    init_tracing(
        &config.service_name,
        &shared.log_level,
        shared.otlp_endpoint.as_deref(),
    );
    init_metrics();

    tracing::info!(
        service = %config.service_name,
        qr_api = %config.gateway.qr_api_base,
        status_api = %config.gateway.status_api_base,
        "Starting top-up service"
    );

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
