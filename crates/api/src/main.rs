use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use crm_api::app::{build_app, services};
use crm_infra::config::CrmConfig;
use crm_infra::jobs::{CrmBackend, FileJobLog, HttpBackend, InProcessBackend, JobScheduler};
use crm_infra::services::seed_demo_data;

// Sync entrypoint: the blocking HTTP job backend must be built outside the
// async runtime.
fn main() -> anyhow::Result<()> {
    crm_observability::init();

    let config = CrmConfig::from_env().context("failed to load configuration")?;
    let services = services::build_services();

    if config.seed_demo_data {
        let seeded = seed_demo_data(&services)?;
        tracing::info!(
            customers = seeded.customers_created,
            products = seeded.products_created,
            "seeded demo data"
        );
    }

    let backend: Arc<dyn CrmBackend> = match &config.remote_api_url {
        Some(url) => {
            tracing::info!(url = %url, "jobs use the remote CRM API");
            Arc::new(HttpBackend::new(url.clone(), config.http_timeout)?)
        }
        None => Arc::new(InProcessBackend::new(services.clone())),
    };

    let sink = Arc::new(FileJobLog::new(config.job_log_dir.clone()));
    let scheduler = JobScheduler::with_crm_jobs(backend, sink, &config.scheduler)
        .spawn()
        .context("failed to start job scheduler")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let served = runtime.block_on(serve(config.bind_addr, Arc::new(services)));

    scheduler.shutdown();
    served
}

async fn serve(addr: SocketAddr, services: Arc<services::AppServices>) -> anyhow::Result<()> {
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "ctrl-c handler failed");
            }
        })
        .await
        .context("server error")
}
