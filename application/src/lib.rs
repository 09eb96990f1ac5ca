//! Application layer for intern-stack
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_REQUEST_TIMEOUT, SessionParams};
pub use ports::{
    backend::{
        AgentsResponse, AssessRequest, BestPracticesResponse, CompareRequest, CompareResponse,
        ComparisonBackend, GatewayError,
    },
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    session_observer::{NoObserver, SessionObserver},
};
pub use use_cases::assessment_manager::AssessmentManager;
pub use use_cases::load_catalog::LoadCatalogUseCase;
pub use use_cases::session_store::SessionStore;
pub use use_cases::shared::SessionOpError;
pub use use_cases::turn_orchestrator::TurnOrchestrator;
