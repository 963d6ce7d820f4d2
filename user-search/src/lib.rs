//! # user-search
//!
//! Token-protected people search over an XML dataset, plus the client that
//! calls it.
//!
//! ## Features
//!
//! - **Search endpoint**: substring filter, ordering by id, name or age, offset/limit paging
//! - **Per-request reload**: the dataset is read from disk on every call, nothing is cached
//! - **Middleware stack**: request tracking, panic recovery, request timeout, header masking
//! - **Client**: local validation, fixed timeout, every failure mapped to one message
//! - **Graceful shutdown**: SIGTERM and SIGINT drain in-flight requests
//!
//! ## Example
//!
//! ```rust,no_run
//! use user_search::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     Server::new(config).serve().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod server;
pub mod state;
pub mod store;
pub mod validation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::{ClientError, SearchClient, SearchRequest, MAX_LIMIT};
    pub use crate::config::{ClientConfig, Config, SearchConfig, ServiceConfig};
    pub use crate::engine::{OrderBy, OrderField, SearchQuery};
    pub use crate::error::{Error, ErrorResponse, Result, SearchError};
    pub use crate::handlers::router;
    pub use crate::health::health;
    pub use crate::models::{Record, SearchResponse, User};
    pub use crate::observability::init_tracing;
    pub use crate::server::Server;
    pub use crate::state::AppState;
    pub use crate::store::{RecordStore, StoreError, XmlFileStore};

    pub use axum::Router;
    pub use tokio;
}
