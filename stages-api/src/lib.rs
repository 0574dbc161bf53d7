//! # Stages API
//!
//! HTTP endpoint that lists the stages of a pipeline's latest commit event.
//!
//! A request for `GET /pipelines/{id}/stages` goes through:
//!
//! - **Validation**: the path id and the pagination parameters are checked
//!   before anything is looked up; `search` is rejected
//! - **Pipeline lookup**: an unknown pipeline is a 404
//! - **Latest event lookup**: the most recent parentless event of type
//!   `pipeline`; none is a 404
//! - **Stage lookup**: the stages of that event, in store order
//!
//! Lookups sit behind the traits in [`store`], so the handler can be driven
//! by any backend. [`store::MemoryStore`] is the bundled one.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stages_api::prelude::*;
//!
//! let store = Arc::new(MemoryStore::load_seed("seed.json")?);
//! let state = Arc::new(AppState::new(Lookups::from_store(store)));
//! let router = build_router(state, None);
//! serve("127.0.0.1:8080".parse()?, router).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod auth;
pub mod config;
pub mod core;
pub mod errors;
pub mod handlers;
pub mod observability;
pub mod server;
pub mod store;
pub mod testing;
pub mod validation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::auth::{
        AuthGate, Credentials, Scope, StaticTokenVerifier, TokenVerifier, STAGE_LIST_SCOPES,
    };
    pub use crate::config::ServerConfig;
    pub use crate::core::{
        Event, EventId, EventType, Pipeline, PipelineId, Stage, StageId, StageRecord,
    };
    pub use crate::errors::{ApiError, ApiResult, StoreError};
    pub use crate::handlers::StageListHandler;
    pub use crate::observability::{init_logging, LoggingConfig};
    pub use crate::server::{build_router, serve, AppState};
    pub use crate::store::{
        EventLookup, EventListQuery, Lookups, MemoryStore, PipelineLookup, StageListQuery,
        StageLookup,
    };
    pub use crate::validation::Pagination;
    pub use std::sync::Arc;
}
