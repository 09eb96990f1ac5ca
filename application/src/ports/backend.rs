//! Comparison backend port
//!
//! Defines the interface to the service that invokes the underlying agents,
//! together with the wire payloads it exchanges. Implementations (adapters)
//! live in the infrastructure layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stack_domain::{
    Agent, AgentAnswer, AssessmentResult, AssessmentTicket, ConversationEntry, TurnTicket,
};
use thiserror::Error;

/// Errors that can occur while talking to the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never produced a response (DNS, refused, reset, ...)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The transport gave up waiting before any deadline of ours fired
    #[error("Timeout")]
    Timeout,

    /// A well-formed reply whose body carries an `error`
    #[error("Backend error: {0}")]
    Backend(String),

    /// A reply that could not be read as the expected payload
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Body of `POST /compare`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareRequest {
    pub agent1_id: String,
    pub agent2_id: String,
    pub question: String,
    pub best_practices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_history: Option<Vec<ConversationEntry>>,
}

impl From<&TurnTicket> for CompareRequest {
    fn from(ticket: &TurnTicket) -> Self {
        // The initial comparison sends no history at all
        let conversation_history = if ticket.index == 0 {
            None
        } else {
            Some(ticket.conversation_history.clone())
        };
        Self {
            agent1_id: ticket.agent1_id.clone(),
            agent2_id: ticket.agent2_id.clone(),
            question: ticket.question.content().to_string(),
            best_practices: ticket.best_practices.clone(),
            conversation_history,
        }
    }
}

/// Successful reply of `POST /compare`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareResponse {
    pub agent1: AgentAnswer,
    pub agent2: AgentAnswer,
}

/// Body of `POST /assess`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessRequest {
    pub agent1_id: String,
    pub agent2_id: String,
    pub question: String,
    pub agent1_response: String,
    pub agent2_response: String,
    pub assessment_criteria: Vec<String>,
}

impl From<&AssessmentTicket> for AssessRequest {
    fn from(ticket: &AssessmentTicket) -> Self {
        Self {
            agent1_id: ticket.agent1_id.clone(),
            agent2_id: ticket.agent2_id.clone(),
            question: ticket.question.clone(),
            agent1_response: ticket.agent1_response.clone(),
            agent2_response: ticket.agent2_response.clone(),
            assessment_criteria: ticket.criteria.clone(),
        }
    }
}

/// Reply of `GET /agents`
#[derive(Debug, Clone, Deserialize)]
pub struct AgentsResponse {
    pub agents: Vec<Agent>,
}

/// Reply of `GET /best-practices`
#[derive(Debug, Clone, Deserialize)]
pub struct BestPracticesResponse {
    pub phrases: Vec<String>,
}

/// Gateway to the agent comparison service
#[async_trait]
pub trait ComparisonBackend: Send + Sync {
    /// Fetch the agent catalog
    async fn list_agents(&self) -> Result<Vec<Agent>, GatewayError>;

    /// Fetch the best-practice add-on phrases
    async fn list_best_practices(&self) -> Result<Vec<String>, GatewayError>;

    /// Ask both agents the same question
    async fn compare(&self, request: &CompareRequest) -> Result<CompareResponse, GatewayError>;

    /// Have each agent critique the other's answer
    async fn assess(&self, request: &AssessRequest) -> Result<AssessmentResult, GatewayError>;
}
