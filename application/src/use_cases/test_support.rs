//! Scripted backend shared by the use case tests.

use crate::ports::backend::{
    AssessRequest, CompareRequest, CompareResponse, ComparisonBackend, GatewayError,
};
use async_trait::async_trait;
use stack_domain::{Agent, AgentAnswer, AgentTier, AssessmentResult, AssessorInfo};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// How the scripted backend answers one call
pub(crate) enum Reply<T> {
    Ready(Result<T, GatewayError>),
    /// Never answers
    Hang,
    /// Answers after a (virtual) delay
    After(Duration, Result<T, GatewayError>),
}

impl<T> Reply<T> {
    async fn play(self) -> Result<T, GatewayError> {
        match self {
            Reply::Ready(result) => result,
            Reply::Hang => std::future::pending().await,
            Reply::After(delay, result) => {
                tokio::time::sleep(delay).await;
                result
            }
        }
    }
}

/// Mock backend that plays scripted replies in order and records requests
pub(crate) struct ScriptedBackend {
    agents: Result<Vec<Agent>, GatewayError>,
    practices: Vec<String>,
    compare_replies: Mutex<VecDeque<Reply<CompareResponse>>>,
    assess_replies: Mutex<VecDeque<Reply<AssessmentResult>>>,
    pub(crate) compare_requests: Mutex<Vec<CompareRequest>>,
    pub(crate) assess_requests: Mutex<Vec<AssessRequest>>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self {
            agents: Ok(vec![
                Agent::new("Intern1", "Intern1", AgentTier::Free),
                Agent::new("Intern2", "Intern2", AgentTier::Premium),
            ]),
            practices: vec!["Explain your reasoning step by step.".to_string()],
            compare_replies: Mutex::new(VecDeque::new()),
            assess_replies: Mutex::new(VecDeque::new()),
            compare_requests: Mutex::new(Vec::new()),
            assess_requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_agents_error(mut self, error: GatewayError) -> Self {
        self.agents = Err(error);
        self
    }

    pub(crate) fn on_compare(self, reply: Reply<CompareResponse>) -> Self {
        self.compare_replies.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn on_assess(self, reply: Reply<AssessmentResult>) -> Self {
        self.assess_replies.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn compare_calls(&self) -> usize {
        self.compare_requests.lock().unwrap().len()
    }

    pub(crate) fn assess_calls(&self) -> usize {
        self.assess_requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ComparisonBackend for ScriptedBackend {
    async fn list_agents(&self) -> Result<Vec<Agent>, GatewayError> {
        self.agents.clone()
    }

    async fn list_best_practices(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self.practices.clone())
    }

    async fn compare(&self, request: &CompareRequest) -> Result<CompareResponse, GatewayError> {
        self.compare_requests.lock().unwrap().push(request.clone());
        let reply = self.compare_replies.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.play().await,
            None => Err(GatewayError::InvalidResponse("no scripted reply".to_string())),
        }
    }

    async fn assess(&self, request: &AssessRequest) -> Result<AssessmentResult, GatewayError> {
        self.assess_requests.lock().unwrap().push(request.clone());
        let reply = self.assess_replies.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.play().await,
            None => Err(GatewayError::InvalidResponse("no scripted reply".to_string())),
        }
    }
}

pub(crate) fn answered(a1: &str, a2: &str) -> Reply<CompareResponse> {
    Reply::Ready(Ok(CompareResponse {
        agent1: AgentAnswer::new("Intern1", a1),
        agent2: AgentAnswer::new("Intern2", a2),
    }))
}

pub(crate) fn critique(a1_by_a2: &str, a2_by_a1: &str) -> AssessmentResult {
    AssessmentResult {
        assessor_info: AssessorInfo {
            agent1_name: "Intern1".to_string(),
            agent2_name: "Intern2".to_string(),
        },
        agent1_assessment_by_agent2: a1_by_a2.to_string(),
        agent2_assessment_by_agent1: a2_by_a1.to_string(),
    }
}
