//! Shared handler state.

use std::sync::Arc;

use crate::ApiMetrics;

/// Everything a handler needs. Cloned per request; all fields are shared.
///
/// `verifier` is `None` when the server was started without identity
/// provider settings; `/api/verify` then answers 503.
pub struct AppState<S, V> {
    pub store: Arc<S>,
    pub verifier: Option<Arc<V>>,
    pub metrics: Arc<ApiMetrics>,
}

impl<S, V> AppState<S, V> {
    pub fn new(store: Arc<S>, verifier: Option<Arc<V>>, metrics: Arc<ApiMetrics>) -> Self {
        Self {
            store,
            verifier,
            metrics,
        }
    }
}

impl<S, V> Clone for AppState<S, V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            verifier: self.verifier.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}
