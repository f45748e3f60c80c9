use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flowdesk_api::config::ServerConfig;
use flowdesk_api::router::build_app_router;
use flowdesk_api::state::AppState;
use flowdesk_engine::{FeedbackClient, ObjectStore, TransformRegistry, WorkflowExecutor};
use flowdesk_store::{FileStore, MemoryStore, RemoteStore, WorkflowStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowdesk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Workflow store ---
    let store = build_store(&config);

    // --- Engine ---
    let http = reqwest::Client::new();
    // Object URLs must be dereferenceable over this API.
    let objects = Arc::new(ObjectStore::with_prefix("/api/v1/objects/"));
    let transforms = Arc::new(TransformRegistry::new());
    let executor = Arc::new(WorkflowExecutor::new(
        http.clone(),
        Arc::clone(&objects),
        transforms,
        config.workflow_base_url.clone(),
    ));
    let feedback = FeedbackClient::new(http, config.feedback_sink_url.clone());

    // --- App state ---
    let state = AppState {
        store,
        executor,
        objects,
        feedback,
        config: Arc::new(config.clone()),
        executions: Arc::new(RwLock::new(HashMap::new())),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Pick the workflow store backend from `WORKFLOW_STORE`:
///
/// - `memory` (default) -- in-process store seeded with the stock catalogue.
/// - `file:<path>` -- JSON document at `<path>`.
/// - `http(s)://...` -- client for another instance's HTTP surface.
fn build_store(config: &ServerConfig) -> Arc<dyn WorkflowStore> {
    let backend = config.workflow_store.as_str();

    if backend == "memory" {
        tracing::info!("Using seeded in-memory workflow store");
        return Arc::new(MemoryStore::seeded());
    }

    if let Some(path) = backend.strip_prefix("file:") {
        tracing::info!(path, "Using file workflow store");
        return Arc::new(FileStore::open(path));
    }

    if backend.starts_with("http://") || backend.starts_with("https://") {
        tracing::info!(base_url = backend, "Using remote workflow store");
        return Arc::new(RemoteStore::new(reqwest::Client::new(), backend));
    }

    panic!("Invalid WORKFLOW_STORE '{backend}': expected 'memory', 'file:<path>', or a base URL");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
