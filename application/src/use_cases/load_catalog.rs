//! Load catalog use case
//!
//! Fetches the agent list and the best-practice phrases concurrently and
//! installs them in the session.

use crate::config::SessionParams;
use crate::ports::backend::ComparisonBackend;
use crate::use_cases::session_store::SessionStore;
use crate::use_cases::shared::{CallError, SessionOpError, call_with_deadline};
use stack_domain::{AgentCatalog, SessionError};
use std::sync::Arc;
use tracing::{error, info};

const LOAD_FAILED: &str = "Failed to load application data. Please refresh the page.";

/// Use case for loading agents and best practices at session start
pub struct LoadCatalogUseCase {
    backend: Arc<dyn ComparisonBackend>,
    store: Arc<SessionStore>,
    params: SessionParams,
}

impl LoadCatalogUseCase {
    pub fn new(backend: Arc<dyn ComparisonBackend>, store: Arc<SessionStore>) -> Self {
        Self {
            backend,
            store,
            params: SessionParams::default(),
        }
    }

    pub fn with_params(mut self, params: SessionParams) -> Self {
        self.params = params;
        self
    }

    pub async fn execute(&self) -> Result<AgentCatalog, SessionOpError> {
        let token = self.store.cancellation();
        let deadline = self.params.request_timeout;
        let (agents, practices) = tokio::join!(
            call_with_deadline(self.backend.list_agents(), deadline, token),
            call_with_deadline(self.backend.list_best_practices(), deadline, token),
        );

        match (agents, practices) {
            (Ok(agents), Ok(practices)) => {
                info!(
                    "Loaded {} agents and {} best practices",
                    agents.len(),
                    practices.len()
                );
                let catalog = AgentCatalog::new(agents, practices);
                self.store.mutate(|s| s.set_catalog(catalog.clone()));
                Ok(catalog)
            }
            (Err(e), _) | (_, Err(e)) => {
                error!("Failed to load initial data: {:?}", e);
                let failure = match e {
                    CallError::Cancelled => SessionError::cancelled(),
                    CallError::Timeout => SessionError::timeout(LOAD_FAILED),
                    CallError::Gateway(_) => SessionError::network(LOAD_FAILED),
                };
                self.store.mutate(|s| s.record_error(failure.clone()));
                Err(SessionOpError::Failed(failure))
            }
        }
    }
}
