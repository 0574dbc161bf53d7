use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use stages_api::auth::{AuthGate, StaticTokenVerifier, STAGE_LIST_SCOPES};
use stages_api::config::ServerConfig;
use stages_api::observability::init_logging;
use stages_api::server::{build_router, serve, AppState};
use stages_api::store::{Lookups, MemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    let store = match &config.seed_path {
        Some(path) => MemoryStore::load_seed(path)?,
        None => {
            warn!("No seed file configured, serving an empty store");
            MemoryStore::new()
        }
    };
    let (pipelines, events, stages) = store.counts();
    info!(pipelines, events, stages, "Store ready");

    let auth = if config.auth.enabled {
        let verifier = StaticTokenVerifier::from_entries(&config.auth.tokens);
        info!(tokens = verifier.len(), "Token authentication enabled");
        Some(AuthGate::new(Arc::new(verifier), STAGE_LIST_SCOPES))
    } else {
        warn!("Authentication disabled");
        None
    };

    let state = Arc::new(AppState::new(Lookups::from_store(Arc::new(store))));
    let router = build_router(state, auth);

    serve(config.socket_addr()?, router).await?;
    Ok(())
}
