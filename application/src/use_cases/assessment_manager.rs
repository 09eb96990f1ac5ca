//! Assessment manager
//!
//! Requests cross-assessments for completed turns. Only one assessment may
//! be outstanding per session, whichever turn it targets.

use crate::config::SessionParams;
use crate::ports::backend::{AssessRequest, ComparisonBackend};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::use_cases::session_store::SessionStore;
use crate::use_cases::shared::{SessionOpError, call_with_deadline, describe};
use serde_json::json;
use stack_domain::{AssessmentResult, AssessmentTicket, OperationKind};
use std::sync::Arc;
use tracing::{info, warn};

/// Use case for cross-assessing a completed turn
pub struct AssessmentManager {
    backend: Arc<dyn ComparisonBackend>,
    store: Arc<SessionStore>,
    params: SessionParams,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl AssessmentManager {
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

    /// Assess turn `turn_index` along `criteria`.
    ///
    /// On success the result replaces any earlier one for the same turn.
    pub async fn request_assessment<I, S>(
        &self,
        turn_index: usize,
        criteria: I,
    ) -> Result<AssessmentResult, SessionOpError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ticket = self
            .store
            .mutate(|s| s.begin_assessment(turn_index, criteria))?;
        self.run(ticket).await
    }

    /// Assess turn `turn_index` along the currently selected criteria.
    pub async fn submit_assessment(
        &self,
        turn_index: usize,
    ) -> Result<AssessmentResult, SessionOpError> {
        let ticket = self
            .store
            .mutate(|s| s.begin_assessment_from_selection(turn_index))?;
        self.run(ticket).await
    }

    async fn run(&self, ticket: AssessmentTicket) -> Result<AssessmentResult, SessionOpError> {
        info!(
            "Assessing turn {} on {} criteria",
            ticket.turn_index,
            ticket.criteria.len()
        );
        let request = AssessRequest::from(&ticket);

        let outcome = call_with_deadline(
            self.backend.assess(&request),
            self.params.request_timeout,
            self.store.cancellation(),
        )
        .await
        .map_err(|e| describe(OperationKind::Assess, e));

        let reply = outcome.clone();
        if let Err(e) = self.store.mutate(|s| s.finish_assessment(&ticket, outcome)) {
            warn!("Dropping assessment for turn {}: {}", ticket.turn_index, e);
            return Err(e.into());
        }

        match reply {
            Ok(result) => {
                self.conversation_logger.log(ConversationEvent::new(
                    "assessment_completed",
                    json!({
                        "turn": ticket.turn_index,
                        "criteria": ticket.criteria,
                        "agent1_assessment_by_agent2": result.agent1_assessment_by_agent2,
                        "agent2_assessment_by_agent1": result.agent2_assessment_by_agent1,
                    }),
                ));
                Ok(result)
            }
            Err(error) => {
                warn!("Assessment of turn {} failed: {}", ticket.turn_index, error);
                self.conversation_logger.log(ConversationEvent::new(
                    "assessment_failed",
                    json!({
                        "turn": ticket.turn_index,
                        "kind": error.kind.as_str(),
                        "message": error.message,
                    }),
                ));
                Err(SessionOpError::Failed(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::backend::{CompareResponse, GatewayError};
    use crate::use_cases::test_support::{Reply, ScriptedBackend, answered, critique};
    use crate::use_cases::turn_orchestrator::TurnOrchestrator;
    use stack_domain::{AgentAnswer, ComparisonRequest, ErrorKind, Intent, ValidationError};
    use std::time::Duration;

    struct Fixture {
        backend: Arc<ScriptedBackend>,
        store: Arc<SessionStore>,
        turns: TurnOrchestrator,
        assessments: AssessmentManager,
    }

    fn fixture(backend: ScriptedBackend) -> Fixture {
        let backend = Arc::new(backend);
        let store = Arc::new(SessionStore::detached());
        Fixture {
            turns: TurnOrchestrator::new(backend.clone(), store.clone()),
            assessments: AssessmentManager::new(backend.clone(), store.clone()),
            backend,
            store,
        }
    }

    /// Backend whose first compare reply answers "What is 2+2?"
    fn backend() -> ScriptedBackend {
        ScriptedBackend::new().on_compare(answered("4", "Four"))
    }

    async fn compared(backend: ScriptedBackend) -> Fixture {
        let fx = fixture(backend);
        fx.turns
            .start_comparison(ComparisonRequest::new("Intern1", "Intern2", "What is 2+2?"))
            .await
            .unwrap();
        fx
    }

    #[tokio::test]
    async fn test_assessment_scenario() {
        let fx = compared(
            backend().on_assess(Reply::Ready(Ok(critique("Correct", "Also correct")))),
        )
        .await;

        let result = fx
            .assessments
            .request_assessment(0, ["Accuracy & factual correctness"])
            .await
            .unwrap();
        assert_eq!(result, critique("Correct", "Also correct"));
        assert_eq!(fx.store.snapshot().assessment(0), Some(&result));

        let requests = fx.backend.assess_requests.lock().unwrap();
        assert_eq!(requests[0].question, "What is 2+2?");
        assert_eq!(requests[0].agent1_response, "4");
        assert_eq!(requests[0].agent2_response, "Four");
        assert_eq!(
            requests[0].assessment_criteria,
            vec!["Accuracy & factual correctness"]
        );
    }

    #[tokio::test]
    async fn test_assessment_for_missing_turn_is_rejected() {
        let fx = compared(backend()).await;
        let err = fx
            .assessments
            .request_assessment(1, ["Technical depth"])
            .await
            .unwrap_err();
        assert_eq!(err, SessionOpError::Validation(ValidationError::TurnNotFound(1)));
        assert_eq!(fx.backend.assess_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_criteria_never_reach_backend() {
        let fresh = fixture(ScriptedBackend::new());
        let err = fresh
            .assessments
            .request_assessment(0, Vec::<String>::new())
            .await
            .unwrap_err();
        assert_eq!(err, SessionOpError::Validation(ValidationError::EmptyCriteria));

        let fx = compared(backend()).await;
        let err = fx.assessments.submit_assessment(0).await.unwrap_err();
        assert_eq!(err, SessionOpError::Validation(ValidationError::EmptyCriteria));
        assert_eq!(fx.backend.assess_calls(), 0);
        assert_eq!(fresh.backend.assess_calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_assessment_keeps_stored_result() {
        let fx = compared(
            backend()
                .on_assess(Reply::Ready(Ok(critique("Correct", "Also correct"))))
                .on_assess(Reply::Ready(Err(GatewayError::Backend(
                    "Assessment failed".to_string(),
                )))),
        )
        .await;
        fx.assessments
            .request_assessment(0, ["Technical depth"])
            .await
            .unwrap();

        let err = fx
            .assessments
            .request_assessment(0, ["Creative approach"])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Backend);

        let session = fx.store.snapshot();
        assert_eq!(session.assessment(0), Some(&critique("Correct", "Also correct")));
        assert_eq!(session.error().unwrap().message, "Assessment failed");
        assert!(!session.busy().assessing);
    }

    #[tokio::test]
    async fn test_reassessment_overwrites() {
        let fx = compared(
            backend()
                .on_assess(Reply::Ready(Ok(critique("first", "first"))))
                .on_assess(Reply::Ready(Ok(critique("second", "second")))),
        )
        .await;
        fx.store
            .dispatch(Intent::ToggleCriterion("Technical depth".to_string()))
            .unwrap();

        fx.assessments.submit_assessment(0).await.unwrap();
        fx.assessments.submit_assessment(0).await.unwrap();
        assert_eq!(
            fx.store.snapshot().assessment(0),
            Some(&critique("second", "second"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_assessment_completes_while_follow_up_in_flight() {
        let fx = compared(
            backend()
                .on_compare(Reply::After(
                    Duration::from_secs(30),
                    Ok(CompareResponse {
                        agent1: AgentAnswer::new("Intern1", "Because"),
                        agent2: AgentAnswer::new("Intern2", "Math"),
                    }),
                ))
                .on_assess(Reply::After(
                    Duration::from_secs(1),
                    Ok(critique("Correct", "Also correct")),
                )),
        )
        .await;

        let store = fx.store.clone();
        let (follow_up, assessment) = tokio::join!(
            fx.turns.start_follow_up(1, "Explain"),
            async {
                let result = fx
                    .assessments
                    .request_assessment(0, ["Technical depth"])
                    .await;
                let session = store.snapshot();
                assert!(session.busy().following_up);
                assert!(session.assessment(0).is_some());
                result
            }
        );
        assert!(follow_up.is_ok());
        assert!(assessment.is_ok());

        let session = fx.store.snapshot();
        assert_eq!(session.history().len(), 2);
        assert!(session.assessment(0).is_some());
        assert!(session.check_invariants());
    }

    #[tokio::test(start_paused = true)]
    async fn test_assessment_is_single_flight_across_turns() {
        let fx = compared(
            backend()
                .on_compare(answered("Because", "Math"))
                .on_assess(Reply::After(
                    Duration::from_secs(5),
                    Ok(critique("Correct", "Also correct")),
                )),
        )
        .await;
        fx.turns.start_follow_up(1, "Explain").await.unwrap();

        let (first, second) = tokio::join!(
            fx.assessments.request_assessment(0, ["Technical depth"]),
            fx.assessments.request_assessment(1, ["Technical depth"]),
        );
        assert!(first.is_ok());
        assert_eq!(
            second.unwrap_err(),
            SessionOpError::Validation(ValidationError::Busy(OperationKind::Assess))
        );
        assert_eq!(fx.backend.assess_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_assessment_deadline() {
        let fx = compared(backend().on_assess(Reply::Hang)).await;
        let err = fx
            .assessments
            .request_assessment(0, ["Technical depth"])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(fx.store.snapshot().assessments().is_empty());
    }
}
