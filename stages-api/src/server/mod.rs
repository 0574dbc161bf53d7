//! HTTP server assembly.

mod request_id;

pub use request_id::MakeRequestUuidV7;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::{require_scope, AuthGate};
use crate::handlers::{list_stages, StageListHandler};
use crate::store::Lookups;

/// Shared state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The stage listing handler.
    pub stages: StageListHandler,
}

impl AppState {
    /// Builds state over the given lookups.
    #[must_use]
    pub fn new(lookups: Lookups) -> Self {
        Self {
            stages: StageListHandler::new(lookups),
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the application router.
///
/// With `auth` set, the API routes sit behind the scope gate; `/health` is
/// always public.
pub fn build_router(state: Arc<AppState>, auth: Option<AuthGate>) -> Router {
    let mut api_routes = Router::new().route("/pipelines/{id}/stages", get(list_stages));
    if let Some(gate) = auth {
        api_routes = api_routes.route_layer(axum::middleware::from_fn_with_state(gate, require_scope));
    }

    let public_routes = Router::new().route("/health", get(health));

    Router::new()
        .merge(api_routes)
        .merge(public_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .with_state(state)
}

/// Serves `router` on `addr` until Ctrl-C or SIGTERM.
pub async fn serve(addr: SocketAddr, router: Router) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
