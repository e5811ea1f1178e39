use tokio::net::TcpListener;
use tracing::{info, warn};
use trips::config::{AppConfig, LogFormat};
use trips::db::{init_pool, run_migrations};
use trips::error::AppError;
use trips::routes::create_app;
use trips::server::{serve, Shutdown};
use trips::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_logging(config.log_format);

    let db = init_pool(&config.database_url, config.max_connections).await?;
    run_migrations(&db).await?;

    let state = AppState::from_config(&config, db.clone());
    info!(mode = ?config.service_mode, "trip service wired");

    let app = create_app(state, config.request_timeout);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    match serve(listener, app, shutdown_signal(), config.shutdown_timeout).await? {
        // Abandoned requests may still hold connections, so closing would wait on them.
        Shutdown::DeadlineElapsed => {}
        Shutdown::Drained => db.close().await,
    }
    info!("server exited");
    Ok(())
}

fn init_logging(format: LogFormat) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,trips=debug,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter_layer);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutting down server");
}
