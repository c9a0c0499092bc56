//! HTTP API for the petitions service.
//!
//! Provides endpoints for:
//! - Listing and creating petitions (`/api/petitions`)
//! - Fetching one petition by id (`/api/petitions/:id`)
//! - Checking an identity proof with the provider (`/api/verify`)
//! - Health and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;
pub mod state;

pub use config::{ServerConfig, StorageBackend};
pub use error::{ApiError, ConfigError, RpcError};
pub use metrics::ApiMetrics;
pub use server::{router, serve, RpcServer};
pub use state::AppState;
