use std::time::Duration;

use anyhow::Context;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use verba_api::{
    ApiConfig, ApiState,
    metrics::init_metrics,
    middleware::{cors::create_cors_layer, security_headers::apply_security_headers},
    node::{HttpService, Node},
    router::router,
    tracing::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    init_tracing(config.environment);

    let pool =
        verba_db::create_pool(&config.database_url, config.database_max_connections).await?;
    verba_db::ensure_db_and_migrate(&config.database_url, &pool).await?;

    let metrics_handle = init_metrics()?;
    let state = ApiState::new(&config, pool.clone()).with_metrics(metrics_handle);

    // Log each request and its response status at INFO. Headers stay out of
    // the spans so bearer tokens never reach the logs.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Create the application router
    let app = apply_security_headers(router().with_state(state), config.environment)
        .layer(create_cors_layer(config.allowed_origins.clone()))
        .layer(trace_layer);

    let addr = config
        .http_addr
        .parse()
        .context("invalid VERBA_HTTP_ADDR")?;
    let node = Node::new(vec![HttpService {
        name: "flashcard-api".to_string(),
        addr,
        router: app,
    }])?;

    // Shutdown order: stop the periodic jobs first, then close the pool.
    let job_handles = verba_api::jobs::start_background_jobs(pool.clone());
    node.add_close_callback("background jobs", move || async move {
        for handle in job_handles {
            handle.abort();
        }
        Ok(())
    });

    let close_pool = pool.clone();
    node.add_close_callback("database pool", move || async move {
        close_pool.close().await;
        Ok(())
    });

    let running = node.run().await?;

    shutdown_signal().await;

    running
        .stop(Duration::from_secs(config.shutdown_timeout_secs))
        .await
}

/// Resolves when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
