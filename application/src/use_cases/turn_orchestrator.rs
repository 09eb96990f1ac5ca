//! Turn orchestrator
//!
//! Sequences comparisons (turn 0) and follow-ups (turns 1..n) against the
//! backend. Each operation is admitted synchronously by the session, runs
//! one deadline-bounded backend call, and records the outcome.

use crate::config::SessionParams;
use crate::ports::backend::{CompareRequest, ComparisonBackend};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::use_cases::session_store::SessionStore;
use crate::use_cases::shared::{SessionOpError, call_with_deadline, describe};
use serde_json::json;
use stack_domain::{ComparisonRequest, Turn, TurnStatus, TurnTicket, ValidationError};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Use case for comparisons and follow-up questions
pub struct TurnOrchestrator {
    backend: Arc<dyn ComparisonBackend>,
    store: Arc<SessionStore>,
    params: SessionParams,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl TurnOrchestrator {
    pub fn new(backend: Arc<dyn ComparisonBackend>, store: Arc<SessionStore>) -> Self {
        Self {
            backend,
            store,
            params: SessionParams::default(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_params(mut self, params: SessionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Start a fresh comparison, resetting the session to a single turn.
    ///
    /// Returns the completed turn 0. A failed or timed-out call is recorded
    /// in the session and returned as [`SessionOpError::Failed`].
    pub async fn start_comparison(
        &self,
        request: ComparisonRequest,
    ) -> Result<Turn, SessionOpError> {
        let ticket = self.store.mutate(|s| s.begin_comparison(request))?;
        info!(
            "Comparing {} and {} (generation {})",
            ticket.agent1_id, ticket.agent2_id, ticket.generation
        );
        self.run_turn(ticket).await
    }

    /// Start a comparison from the selected agents, practices and question draft.
    pub async fn submit_comparison(&self) -> Result<Turn, SessionOpError> {
        let ticket = self.store.mutate(|s| s.begin_comparison_from_drafts())?;
        info!("Comparing {} and {}", ticket.agent1_id, ticket.agent2_id);
        self.run_turn(ticket).await
    }

    /// Ask a follow-up question at `index` with the whole conversation as context.
    pub async fn start_follow_up(
        &self,
        index: usize,
        question: &str,
    ) -> Result<Turn, SessionOpError> {
        let ticket = self.store.mutate(|s| s.begin_follow_up(index, question))?;
        info!(
            "Follow-up {} with {} prior entries",
            index,
            ticket.conversation_history.len()
        );
        self.run_turn(ticket).await
    }

    /// Ask the follow-up drafted for `index`.
    pub async fn submit_follow_up(&self, index: usize) -> Result<Turn, SessionOpError> {
        let ticket = self.store.mutate(|s| s.begin_follow_up_from_draft(index))?;
        info!("Follow-up {}", index);
        self.run_turn(ticket).await
    }

    async fn run_turn(&self, ticket: TurnTicket) -> Result<Turn, SessionOpError> {
        let kind = ticket.kind();
        let request = CompareRequest::from(&ticket);

        self.conversation_logger.log(ConversationEvent::new(
            "turn_submitted",
            json!({
                "turn": ticket.index,
                "agent1_id": request.agent1_id,
                "agent2_id": request.agent2_id,
                "question": request.question,
                "best_practices": request.best_practices,
                "history_len": ticket.conversation_history.len(),
            }),
        ));

        let outcome = call_with_deadline(
            self.backend.compare(&request),
            self.params.request_timeout,
            self.store.cancellation(),
        )
        .await
        .map(|reply| (reply.agent1, reply.agent2))
        .map_err(|e| describe(kind, e));

        let failure = outcome.as_ref().err().cloned();
        let recorded = self.store.mutate(|s| {
            s.finish_turn(&ticket, outcome)
                .map(|status| (status, s.turn(ticket.index).cloned()))
        });

        let (status, turn) = match recorded {
            Ok(recorded) => recorded,
            Err(e) => {
                warn!("Dropping {} reply for turn {}: {}", kind, ticket.index, e);
                return Err(e.into());
            }
        };

        match (status, failure, turn) {
            (TurnStatus::Completed, _, Some(turn)) => {
                debug!("Turn {} completed", ticket.index);
                self.conversation_logger.log(ConversationEvent::new(
                    "turn_completed",
                    json!({
                        "turn": ticket.index,
                        "agent1_response": turn.agent1_response(),
                        "agent2_response": turn.agent2_response(),
                    }),
                ));
                Ok(turn)
            }
            (status, Some(error), _) => {
                warn!("Turn {} {}: {}", ticket.index, status, error);
                self.conversation_logger.log(ConversationEvent::new(
                    "turn_failed",
                    json!({
                        "turn": ticket.index,
                        "status": status.as_str(),
                        "kind": error.kind.as_str(),
                        "message": error.message,
                    }),
                ));
                Err(SessionOpError::Failed(error))
            }
            (_, None, _) => Err(ValidationError::TurnNotFound(ticket.index).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::backend::GatewayError;
    use crate::ports::session_observer::SessionObserver;
    use crate::use_cases::test_support::{Reply, ScriptedBackend, answered};
    use stack_domain::{ConversationEntry, ErrorKind, Intent, Session};
    use std::sync::Mutex;
    use std::time::Duration;

    fn setup(
        backend: ScriptedBackend,
    ) -> (TurnOrchestrator, Arc<ScriptedBackend>, Arc<SessionStore>) {
        let backend = Arc::new(backend);
        let store = Arc::new(SessionStore::detached());
        let orchestrator = TurnOrchestrator::new(backend.clone(), store.clone());
        (orchestrator, backend, store)
    }

    fn two_plus_two() -> ComparisonRequest {
        ComparisonRequest::new("Intern1", "Intern2", "What is 2+2?")
    }

    #[tokio::test]
    async fn test_comparison_scenario() {
        let (orchestrator, backend, store) =
            setup(ScriptedBackend::new().on_compare(answered("4", "Four")));

        let turn = orchestrator.start_comparison(two_plus_two()).await.unwrap();
        assert_eq!(turn.question(), "What is 2+2?");
        assert_eq!(turn.responses(), Some(("4", "Four")));
        assert_eq!(turn.status(), TurnStatus::Completed);

        let session = store.snapshot();
        assert_eq!(
            session.history().entries(),
            &[ConversationEntry::new("What is 2+2?", "4", "Four")]
        );
        assert!(!session.busy().comparing);

        let requests = backend.compare_requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].conversation_history.is_none());
    }

    #[tokio::test]
    async fn test_same_agent_twice_makes_no_network_call() {
        let (orchestrator, backend, store) = setup(ScriptedBackend::new());
        let err = orchestrator
            .start_comparison(ComparisonRequest::new("Intern1", "Intern1", "q"))
            .await
            .unwrap_err();
        assert_eq!(err, SessionOpError::Validation(ValidationError::DuplicateAgents));
        assert_eq!(backend.compare_calls(), 0);
        assert!(!store.snapshot().busy().comparing);
    }

    #[tokio::test]
    async fn test_follow_up_sends_history() {
        let (orchestrator, backend, store) = setup(
            ScriptedBackend::new()
                .on_compare(answered("4", "Four"))
                .on_compare(answered("Because", "Arithmetic")),
        );
        orchestrator.start_comparison(two_plus_two()).await.unwrap();

        let turn = orchestrator.start_follow_up(1, "Explain").await.unwrap();
        assert_eq!(turn.index(), 1);
        assert_eq!(turn.status(), TurnStatus::Completed);

        let requests = backend.compare_requests.lock().unwrap();
        assert_eq!(
            requests[1].conversation_history,
            Some(vec![ConversationEntry::new("What is 2+2?", "4", "Four")])
        );
        assert_eq!(store.snapshot().history().len(), 2);
    }

    #[tokio::test]
    async fn test_sequential_follow_ups_grow_history() {
        let mut backend = ScriptedBackend::new().on_compare(answered("4", "Four"));
        for i in 1..=4 {
            backend = backend.on_compare(answered(&format!("a{i}"), &format!("b{i}")));
        }
        let (orchestrator, backend, store) = setup(backend);
        orchestrator.start_comparison(two_plus_two()).await.unwrap();
        for i in 1..=4 {
            orchestrator
                .start_follow_up(i, &format!("q{i}"))
                .await
                .unwrap();
        }

        let session = store.snapshot();
        assert_eq!(session.turns().len(), 5);
        assert_eq!(session.history().len(), 5);
        assert_eq!(session.history().last().unwrap().question, "q4");
        let sent: Vec<usize> = backend
            .compare_requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.conversation_history.as_ref().map_or(0, Vec::len))
            .collect();
        assert_eq!(sent, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_comparison_deadline_resolves_to_timeout() {
        let (orchestrator, _backend, store) =
            setup(ScriptedBackend::new().on_compare(Reply::Hang));

        let err = orchestrator.start_comparison(two_plus_two()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);

        let session = store.snapshot();
        assert_eq!(session.turn(0).unwrap().status(), TurnStatus::TimedOut);
        assert!(session.history().is_empty());
        assert!(!session.busy().comparing);
        assert_eq!(
            session.error().unwrap().message,
            "Request timed out. AI responses are taking longer than expected. Please try again."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_deadline() {
        let backend = Arc::new(
            ScriptedBackend::new().on_compare(Reply::After(
                Duration::from_secs(20),
                Ok(crate::ports::backend::CompareResponse {
                    agent1: stack_domain::AgentAnswer::new("Intern1", "late"),
                    agent2: stack_domain::AgentAnswer::new("Intern2", "late"),
                }),
            )),
        );
        let store = Arc::new(SessionStore::detached());
        let orchestrator = TurnOrchestrator::new(backend, store)
            .with_params(SessionParams::from_timeout_seconds(10));

        let err = orchestrator.start_comparison(two_plus_two()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_follow_up_keeps_prior_turns() {
        let (orchestrator, _backend, store) = setup(
            ScriptedBackend::new()
                .on_compare(answered("4", "Four"))
                .on_compare(Reply::Hang),
        );
        orchestrator.start_comparison(two_plus_two()).await.unwrap();
        let before = store.snapshot().turn(0).cloned();

        let err = orchestrator.start_follow_up(1, "Explain").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);

        let session = store.snapshot();
        assert_eq!(session.turn(0).cloned(), before);
        assert_eq!(session.turn(1).unwrap().status(), TurnStatus::TimedOut);
        assert_eq!(session.history().len(), 1);
        assert_eq!(
            session.error().unwrap().message,
            "Follow-up request timed out. Please try again."
        );
    }

    #[tokio::test]
    async fn test_backend_error_body_marks_turn_failed() {
        let (orchestrator, _backend, store) = setup(ScriptedBackend::new().on_compare(
            Reply::Ready(Err(GatewayError::Backend("Model unavailable".to_string()))),
        ));

        let err = orchestrator.start_comparison(two_plus_two()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert_eq!(err.to_string(), "Model unavailable");

        let session = store.snapshot();
        assert_eq!(session.turn(0).unwrap().status(), TurnStatus::Failed);
        assert!(!session.busy().comparing);
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let (orchestrator, _backend, store) = setup(ScriptedBackend::new().on_compare(
            Reply::Ready(Err(GatewayError::ConnectionError("connection refused".to_string()))),
        ));

        let err = orchestrator.start_comparison(two_plus_two()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(
            store.snapshot().turn(0).unwrap().status(),
            TurnStatus::Failed
        );
    }

    #[tokio::test]
    async fn test_retry_then_resubmit_failed_follow_up() {
        let (orchestrator, backend, store) = setup(
            ScriptedBackend::new()
                .on_compare(answered("4", "Four"))
                .on_compare(Reply::Ready(Err(GatewayError::ConnectionError(
                    "reset".to_string(),
                ))))
                .on_compare(answered("x", "y")),
        );
        orchestrator.start_comparison(two_plus_two()).await.unwrap();
        orchestrator.start_follow_up(1, "Explain").await.unwrap_err();

        store.dispatch(Intent::Retry).unwrap();
        let session = store.snapshot();
        assert!(session.error().is_none());
        assert_eq!(session.turn(1).unwrap().status(), TurnStatus::Failed);
        assert_eq!(backend.compare_calls(), 2);

        let turn = orchestrator.start_follow_up(1, "Explain").await.unwrap();
        assert_eq!(turn.status(), TurnStatus::Completed);
        assert_eq!(store.snapshot().history().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_from_drafts() {
        let (orchestrator, backend, store) = setup(
            ScriptedBackend::new()
                .on_compare(answered("4", "Four"))
                .on_compare(answered("a", "b")),
        );
        for intent in [
            Intent::SelectAgent {
                slot: stack_domain::AgentSlot::First,
                agent_id: Some("Intern1".to_string()),
            },
            Intent::SelectAgent {
                slot: stack_domain::AgentSlot::Second,
                agent_id: Some("Intern2".to_string()),
            },
            Intent::EditQuestion("What is 2+2?".to_string()),
            Intent::TogglePractice("Cite sources.".to_string()),
            Intent::EditFollowUp {
                index: 1,
                text: "Stale draft".to_string(),
            },
        ] {
            store.dispatch(intent).unwrap();
        }

        orchestrator.submit_comparison().await.unwrap();
        // A new comparison starts a fresh session, drafts included.
        assert_eq!(store.snapshot().follow_up_draft(1), None);

        store
            .dispatch(Intent::EditFollowUp {
                index: 1,
                text: "Explain".to_string(),
            })
            .unwrap();
        orchestrator.submit_follow_up(1).await.unwrap();

        let requests = backend.compare_requests.lock().unwrap();
        assert_eq!(requests[0].best_practices, vec!["Cite sources."]);
        assert_eq!(requests[1].question, "Explain");
        assert_eq!(requests[1].best_practices, vec!["Cite sources."]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_comparison_while_busy_is_rejected() {
        let (orchestrator, backend, _store) = setup(ScriptedBackend::new().on_compare(
            Reply::After(
                Duration::from_secs(5),
                Ok(crate::ports::backend::CompareResponse {
                    agent1: stack_domain::AgentAnswer::new("Intern1", "4"),
                    agent2: stack_domain::AgentAnswer::new("Intern2", "Four"),
                }),
            ),
        ));

        let (first, second) = tokio::join!(
            orchestrator.start_comparison(two_plus_two()),
            orchestrator.start_comparison(two_plus_two()),
        );
        assert!(first.is_ok());
        assert_eq!(
            second.unwrap_err(),
            SessionOpError::Validation(ValidationError::Busy(
                stack_domain::OperationKind::Compare
            ))
        );
        assert_eq!(backend.compare_calls(), 1);
    }

    #[tokio::test]
    async fn test_discarded_session_cancels_in_flight_call() {
        let (orchestrator, _backend, store) =
            setup(ScriptedBackend::new().on_compare(Reply::Hang));

        let (result, _) = tokio::join!(orchestrator.start_comparison(two_plus_two()), async {
            tokio::task::yield_now().await;
            store.discard();
        });
        assert!(result.unwrap_err().is_cancelled());
        assert!(!store.snapshot().busy().comparing);
    }

    struct BusyRecorder(Mutex<Vec<bool>>);

    impl SessionObserver for BusyRecorder {
        fn on_snapshot(&self, session: &Session) {
            self.0.lock().unwrap().push(session.busy().comparing);
        }
    }

    #[tokio::test]
    async fn test_observer_sees_busy_then_idle() {
        let recorder = Arc::new(BusyRecorder(Mutex::new(Vec::new())));
        let store = Arc::new(SessionStore::new(recorder.clone()));
        let backend = Arc::new(ScriptedBackend::new().on_compare(answered("4", "Four")));
        let orchestrator = TurnOrchestrator::new(backend, store);

        orchestrator.start_comparison(two_plus_two()).await.unwrap();
        assert_eq!(*recorder.0.lock().unwrap(), vec![true, false]);
    }
}
