//! Word-Sim-Service REST server
//!
//! ## Usage
//!
//! ```bash
//! wsserver config.yaml
//! ```
//!
//! Without a configuration file the version is printed and the process
//! exits. `RUST_LOG` overrides `logging.level`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use word_sim_service::api::build_router;
use word_sim_service::bootstrap::local_searcher;
use word_sim_service::logging::{self, LogTarget};
use word_sim_service::{version_info, ServiceConfig};

#[derive(Parser)]
#[command(name = "wsserver")]
#[command(about = "Serves word similarity and collocation lookups over HTTP")]
#[command(long_about = None)]
struct Cli {
    /// Path to the YAML configuration
    #[arg(env = "WSSERVER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(path) = cli.config else {
        println!("{}", version_info());
        return Ok(());
    };

    let mut conf = ServiceConfig::from_file(&path)?;
    logging::init(&conf.logging.level, LogTarget::Stdout)?;
    conf.apply_defaults();

    let searcher = local_searcher(&conf)?;
    let corpora = conf
        .corpora
        .iter()
        .map(|(id, c)| (id.clone(), c.info.clone()))
        .collect();

    let app = build_router(Arc::new(searcher), corpora).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(RequestBodyTimeoutLayer::new(Duration::from_secs(
                conf.server_read_timeout_secs,
            )))
            .layer(TimeoutLayer::new(Duration::from_secs(
                conf.server_write_timeout_secs,
            ))),
    );

    let addr = conf.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
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
    info!("shutdown signal received");
}
