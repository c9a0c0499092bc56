//! Axum-based HTTP server.

use std::future::Future;
use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use petition_store::PetitionStore;
use petition_verification::IdentityVerifier;

use crate::handlers;
use crate::{AppState, RpcError};

/// Build the API router.
///
/// CORS is permissive so that a browser UI served from another origin can
/// call the API. Every response is logged at INFO. `/metrics` is only mounted when `with_metrics` is set.
pub fn router<S, V>(state: AppState<S, V>, with_metrics: bool) -> Router
where
    S: PetitionStore + 'static,
    V: IdentityVerifier,
{
    let mut app = Router::new()
        .route(
            "/api/petitions",
            get(handlers::list_petitions::<S, V>).post(handlers::create_petition::<S, V>),
        )
        .route("/api/petitions/:id", get(handlers::get_petition::<S, V>))
        .route("/api/verify", post(handlers::verify_proof::<S, V>))
        .route("/health", get(handlers::health::<S, V>));

    if with_metrics {
        app = app.route("/metrics", get(handlers::metrics::<S, V>));
    }

    app.layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

pub struct RpcServer {
    pub listen_addr: String,
}

impl RpcServer {
    pub fn new(listen_addr: impl Into<String>) -> Self {
        Self {
            listen_addr: listen_addr.into(),
        }
    }

    /// Bind the listener. Split from [`RpcServer::serve`] so callers can
    /// learn the bound address (port 0) before serving.
    pub async fn bind(&self) -> Result<TcpListener, RpcError> {
        TcpListener::bind(&self.listen_addr)
            .await
            .map_err(|source| RpcError::Bind {
                addr: self.listen_addr.clone(),
                source,
            })
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn start<F>(&self, app: Router, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        serve(listener, app, shutdown).await
    }
}

/// Serve `app` on an already bound listener until `shutdown` resolves.
/// In-flight requests are allowed to finish.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), RpcError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    match addr {
        Some(addr) => tracing::info!("HTTP API listening on {addr}"),
        None => tracing::info!("HTTP API listening"),
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("HTTP API stopped");
    Ok(())
}
