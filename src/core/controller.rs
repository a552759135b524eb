//! Request lifecycle for a single analysis submission.
//!
//! [`RequestController`] is the only writer of [`RequestState`] and of the
//! current input text. A submission spawns the transport call on a tokio task
//! which reports back over a oneshot channel it alone holds; the owner of the
//! controller applies the result with [`RequestController::poll_settlement`]
//! (from an interactive loop) or [`RequestController::wait_for_settlement`]
//! (from a one-shot command). A task that ends without reporting settles the
//! request as failed.

use std::sync::Arc;

use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::api::AnalysisResult;
use crate::core::transport::{Transport, TransportError};

/// Status text shown for every failed request, whatever the underlying cause.
pub const FAILURE_MESSAGE: &str = "Error: Failed to connect to backend API";

/// Notice returned when a submission is blocked because the input is blank.
pub const EMPTY_INPUT_NOTICE: &str = "Please enter some medical information first.";

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    Idle,
    Loading,
    Succeeded(AnalysisResult),
    Failed(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, RequestState::Succeeded(_) | RequestState::Failed(_))
    }
}

/// What happened to a call to [`RequestController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The transport call was issued and the controller is now loading.
    Started { request_id: u64 },
    /// The input was blank; nothing was sent and the state is unchanged.
    Rejected { notice: &'static str },
    /// A request is already outstanding; the submission was dropped.
    IgnoredWhileLoading,
}

/// The in-flight request and the channel its task will answer on.
struct Pending {
    request_id: u64,
    rx: oneshot::Receiver<Result<AnalysisResult, TransportError>>,
}

pub struct RequestController {
    transport: Arc<dyn Transport>,
    state: RequestState,
    input: String,
    next_request_id: u64,
    pending: Option<Pending>,
}

impl RequestController {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            state: RequestState::Idle,
            input: String::new(),
            next_request_id: 1,
            pending: None,
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Editing is locked while a request is in flight. Returns whether the
    /// text was accepted.
    pub fn set_input(&mut self, text: impl Into<String>) -> bool {
        if self.state.is_loading() {
            return false;
        }
        self.input = text.into();
        true
    }

    pub fn submit_input(&mut self) -> SubmitOutcome {
        let text = self.input.clone();
        self.submit(&text)
    }

    /// Submit `text` for analysis.
    ///
    /// Must be called from within a tokio runtime because the transport call
    /// is spawned. `text` is sent exactly as given; trimming is only used to
    /// decide whether there is anything to send.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        if self.state.is_loading() {
            debug!("submission ignored; a request is already in flight");
            return SubmitOutcome::IgnoredWhileLoading;
        }

        if text.trim().is_empty() {
            debug!("submission rejected; input is blank");
            return SubmitOutcome::Rejected {
                notice: EMPTY_INPUT_NOTICE,
            };
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.state = RequestState::Loading;

        info!(request_id, chars = text.chars().count(), "submitting notes");
        self.spawn_request(request_id, text.to_string());

        SubmitOutcome::Started { request_id }
    }

    fn spawn_request(&mut self, request_id: u64, content: String) {
        let transport = Arc::clone(&self.transport);
        let (tx, rx) = oneshot::channel();
        self.pending = Some(Pending { request_id, rx });
        tokio::spawn(async move {
            let result = transport.ask(&content).await;
            let _ = tx.send(result);
        });
    }

    /// Move out of `Loading`. `None` means the request task went away
    /// without reporting, which is treated like any other failure.
    fn settle(
        &mut self,
        request_id: u64,
        result: Option<Result<AnalysisResult, TransportError>>,
    ) {
        self.state = match result {
            Some(Ok(payload)) => {
                info!(request_id, "analysis succeeded");
                RequestState::Succeeded(payload)
            }
            Some(Err(err)) => {
                warn!(request_id, error = %err, "analysis request failed");
                RequestState::Failed(FAILURE_MESSAGE.to_string())
            }
            None => {
                warn!(request_id, "request task ended without reporting a result");
                RequestState::Failed(FAILURE_MESSAGE.to_string())
            }
        };
    }

    /// Apply the outstanding result if it has already arrived, without
    /// blocking. Returns true when the state changed.
    pub fn poll_settlement(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        let result = match pending.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => None,
        };
        let request_id = pending.request_id;
        self.pending = None;
        self.settle(request_id, result);
        true
    }

    /// Wait until the outstanding request settles. Returns immediately when
    /// nothing is in flight.
    pub async fn wait_for_settlement(&mut self) -> &RequestState {
        if let Some(Pending { request_id, rx }) = self.pending.take() {
            let result = rx.await.ok();
            self.settle(request_id, result);
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{render, SectionContent, SectionKind, View};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Scripted transport that records every call and can hold a reply until
    /// released.
    struct ScriptedTransport {
        reply: Result<AnalysisResult, TransportError>,
        calls: AtomicUsize,
        sent: Mutex<Vec<String>>,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedTransport {
        fn replying(reply: Result<AnalysisResult, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                sent: Mutex::new(Vec::new()),
                gate: None,
            })
        }

        fn gated(reply: Result<AnalysisResult, TransportError>, gate: Arc<Notify>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                sent: Mutex::new(Vec::new()),
                gate: Some(gate),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn ask(&self, content: &str) -> Result<AnalysisResult, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sent
                .lock()
                .expect("sent lock")
                .push(content.to_string());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.reply.clone()
        }
    }

    struct PanickingTransport;

    #[async_trait]
    impl Transport for PanickingTransport {
        async fn ask(&self, _content: &str) -> Result<AnalysisResult, TransportError> {
            panic!("transport blew up");
        }
    }

    fn ok_payload() -> AnalysisResult {
        AnalysisResult::new("ok")
    }

    #[tokio::test]
    async fn blank_input_never_reaches_transport() {
        let transport = ScriptedTransport::replying(Ok(ok_payload()));
        let mut controller = RequestController::new(transport.clone());

        for blank in ["", "   ", "\n\t  \n"] {
            let outcome = controller.submit(blank);
            assert_eq!(
                outcome,
                SubmitOutcome::Rejected {
                    notice: EMPTY_INPUT_NOTICE
                }
            );
            assert_eq!(controller.state(), &RequestState::Idle);
        }

        tokio::task::yield_now().await;
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn blank_input_keeps_previous_result() {
        let transport = ScriptedTransport::replying(Ok(ok_payload()));
        let mut controller = RequestController::new(transport.clone());

        controller.submit("notes");
        controller.wait_for_settlement().await;
        assert_eq!(controller.state(), &RequestState::Succeeded(ok_payload()));

        controller.submit("  ");
        assert_eq!(controller.state(), &RequestState::Succeeded(ok_payload()));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn second_submit_while_loading_is_ignored() {
        let gate = Arc::new(Notify::new());
        let transport = ScriptedTransport::gated(Ok(ok_payload()), gate.clone());
        let mut controller = RequestController::new(transport.clone());

        assert_eq!(
            controller.submit("first"),
            SubmitOutcome::Started { request_id: 1 }
        );
        assert!(controller.state().is_loading());

        assert_eq!(
            controller.submit("second"),
            SubmitOutcome::IgnoredWhileLoading
        );
        assert_eq!(
            controller.submit("   "),
            SubmitOutcome::IgnoredWhileLoading
        );

        gate.notify_one();
        controller.wait_for_settlement().await;

        assert_eq!(transport.calls(), 1);
        assert_eq!(
            transport.sent.lock().expect("sent lock").as_slice(),
            ["first".to_string()]
        );
        assert_eq!(controller.state(), &RequestState::Succeeded(ok_payload()));
    }

    #[tokio::test]
    async fn input_is_locked_while_loading() {
        let gate = Arc::new(Notify::new());
        let transport = ScriptedTransport::gated(Ok(ok_payload()), gate.clone());
        let mut controller = RequestController::new(transport);

        assert!(controller.set_input("Patient on penicillin"));
        controller.submit_input();
        assert!(!controller.set_input("edited"));
        assert_eq!(controller.input(), "Patient on penicillin");

        gate.notify_one();
        controller.wait_for_settlement().await;
        assert!(controller.set_input("edited"));
        assert_eq!(controller.input(), "edited");
    }

    #[tokio::test]
    async fn untrimmed_text_is_sent() {
        let transport = ScriptedTransport::replying(Ok(ok_payload()));
        let mut controller = RequestController::new(transport.clone());

        controller.submit("  amoxicillin 500mg \n");
        controller.wait_for_settlement().await;

        assert_eq!(
            transport.sent.lock().expect("sent lock").as_slice(),
            ["  amoxicillin 500mg \n".to_string()]
        );
    }

    #[tokio::test]
    async fn entering_loading_clears_previous_outcome() {
        let gate = Arc::new(Notify::new());
        let transport = ScriptedTransport::gated(
            Err(TransportError::Network("refused".into())),
            gate.clone(),
        );
        let mut controller = RequestController::new(transport);

        controller.submit("first");
        gate.notify_one();
        controller.wait_for_settlement().await;
        assert_eq!(
            controller.state(),
            &RequestState::Failed(FAILURE_MESSAGE.to_string())
        );

        controller.submit("second");
        assert_eq!(controller.state(), &RequestState::Loading);
        assert!(matches!(render(controller.state()), View::Placeholder(_)));

        gate.notify_one();
        controller.wait_for_settlement().await;
    }

    #[tokio::test]
    async fn every_transport_failure_collapses_to_same_state() {
        let failures = [
            TransportError::Status {
                status: 500,
                body: r#"{"detail":"Processing failed"}"#.into(),
            },
            TransportError::Network("connection refused".into()),
            TransportError::Parse("expected value at line 1 column 1".into()),
        ];

        let mut states = Vec::new();
        for failure in failures {
            let transport = ScriptedTransport::replying(Err(failure));
            let mut controller = RequestController::new(transport);
            controller.submit("notes");
            states.push(controller.wait_for_settlement().await.clone());
        }

        for state in &states {
            assert_eq!(state, &RequestState::Failed(FAILURE_MESSAGE.to_string()));
        }
    }

    #[tokio::test]
    async fn poll_settlement_applies_result_once_available() {
        let gate = Arc::new(Notify::new());
        let transport = ScriptedTransport::gated(Ok(ok_payload()), gate.clone());
        let mut controller = RequestController::new(transport);

        controller.submit("notes");
        assert!(!controller.poll_settlement());
        assert!(controller.state().is_loading());

        gate.notify_one();
        let mut applied = false;
        for _ in 0..100 {
            if controller.poll_settlement() {
                applied = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        assert!(applied);
        assert!(controller.state().is_settled());
    }

    #[tokio::test]
    async fn task_ending_without_reply_settles_as_failed() {
        let mut controller = RequestController::new(Arc::new(PanickingTransport));

        controller.submit("notes");
        let state = controller.wait_for_settlement().await;

        assert_eq!(state, &RequestState::Failed(FAILURE_MESSAGE.to_string()));
        assert!(controller.set_input("editable again"));
    }

    #[tokio::test]
    async fn polling_notices_a_task_that_ended_without_reply() {
        let mut controller = RequestController::new(Arc::new(PanickingTransport));
        controller.submit("notes");

        let mut applied = false;
        for _ in 0..100 {
            if controller.poll_settlement() {
                applied = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        assert!(applied);
        assert_eq!(
            controller.state(),
            &RequestState::Failed(FAILURE_MESSAGE.to_string())
        );
        assert!(!controller.poll_settlement());
    }

    #[tokio::test]
    async fn request_ids_increase_per_submission() {
        let transport = ScriptedTransport::replying(Ok(ok_payload()));
        let mut controller = RequestController::new(transport);

        assert_eq!(controller.submit("a"), SubmitOutcome::Started { request_id: 1 });
        controller.wait_for_settlement().await;
        assert_eq!(controller.submit("b"), SubmitOutcome::Started { request_id: 2 });
        controller.wait_for_settlement().await;
    }

    #[tokio::test]
    async fn wait_without_request_returns_current_state() {
        let transport = ScriptedTransport::replying(Ok(ok_payload()));
        let mut controller = RequestController::new(transport.clone());

        assert_eq!(controller.wait_for_settlement().await, &RequestState::Idle);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn end_to_end_penicillin_scenario() {
        let payload: AnalysisResult = serde_json::from_str(
            r#"{"message":"ok","extracted_drugs":["penicillin"],"processing_steps":["step1"]}"#,
        )
        .expect("payload");
        let gate = Arc::new(Notify::new());
        let transport = ScriptedTransport::gated(Ok(payload), gate.clone());
        let mut controller = RequestController::new(transport);

        controller.set_input("Patient on penicillin");
        assert!(matches!(
            controller.submit_input(),
            SubmitOutcome::Started { .. }
        ));
        assert_eq!(controller.state(), &RequestState::Loading);

        gate.notify_one();
        controller.wait_for_settlement().await;
        assert!(matches!(controller.state(), RequestState::Succeeded(_)));

        let View::Sections(sections) = render(controller.state()) else {
            panic!("expected sections for a settled request");
        };
        let present: Vec<(SectionKind, SectionContent)> = sections
            .into_iter()
            .filter(|section| section.is_present())
            .map(|section| (section.kind, section.content))
            .collect();

        assert_eq!(
            present,
            vec![
                (
                    SectionKind::Status,
                    SectionContent::Status {
                        outcome: crate::core::render::Outcome::Success,
                        text: "ok".into()
                    }
                ),
                (
                    SectionKind::ExtractedDrugs,
                    SectionContent::Text("penicillin".into())
                ),
                (
                    SectionKind::ProcessingSteps,
                    SectionContent::List(vec!["1. step1".into()])
                ),
            ]
        );
    }
}
