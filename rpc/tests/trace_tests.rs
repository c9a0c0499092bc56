//! Request logging under the default `info` filter.

use std::io;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;

use petition_nullables::NullVerifier;
use petition_rpc::{router, ApiMetrics, AppState};
use petition_store::MemoryPetitionStore;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn requests_are_logged_at_info() {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(captured.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let state = AppState::new(
        Arc::new(MemoryPetitionStore::new()),
        Some(Arc::new(NullVerifier::accepting())),
        Arc::new(ApiMetrics::new().unwrap()),
    );
    let response = router(state, false)
        .oneshot(
            Request::builder()
                .uri("/api/petitions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let logs = captured.text();
    assert!(logs.contains("finished processing request"), "{logs}");
    assert!(logs.contains("/api/petitions"), "{logs}");
    assert!(logs.contains("status=200"), "{logs}");
}
