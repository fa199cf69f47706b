use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};
use yelp_gateway::{config::Config, telemetry, App};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let _telemetry = telemetry::init(&config)?;

    let app = App::new(config)?;
    let bind_address = &app.config().bind_address;
    let listener = TcpListener::bind(bind_address).await?;
    info!(
        yelp_api_host = %app.config().yelp_api_host,
        timeout_secs = app.config().yelp_timeout.as_secs(),
        "listening on {}",
        bind_address
    );

    axum::serve(listener, app.router())
        .with_graceful_shutdown(wait_for_stop())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolves on ctrl+c, or SIGTERM on unix. A missing signal source is logged
/// and the other one is still awaited.
async fn wait_for_stop() {
    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    let source = tokio::select! {
        _ = ctrl_c => "ctrl+c",
        _ = sigterm => "SIGTERM",
    };
    info!(source, "draining connections before exit");
}
