use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::AnalysisResult;
use crate::core::app::App;
use crate::core::controller::RequestController;
use crate::core::transport::{Transport, TransportError};
use crate::ui::theme::Theme;

/// Transport that answers every call with the same canned reply.
pub struct StubTransport {
    reply: Result<AnalysisResult, TransportError>,
    calls: AtomicUsize,
}

impl StubTransport {
    pub fn new(reply: Result<AnalysisResult, TransportError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn ask(&self, _content: &str) -> Result<AnalysisResult, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

pub fn analysis(payload: serde_json::Value) -> AnalysisResult {
    serde_json::from_value(payload).expect("test payload should be a valid analysis result")
}

pub fn create_test_app_with(transport: Arc<StubTransport>) -> App {
    App::new(
        RequestController::new(transport),
        Theme::dark_default(),
        "http://localhost:8004".to_string(),
    )
}

pub fn create_test_app() -> App {
    create_test_app_with(StubTransport::new(Ok(AnalysisResult::new("ok"))))
}

/// Poll the session until its outstanding request settles.
pub async fn wait_until_settled(app: &mut App) {
    for _ in 0..200 {
        if app.poll_settlement() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("request never settled");
}
