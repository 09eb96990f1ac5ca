//! Agent catalog loaded from the backend at session start

use super::entities::{Agent, AgentTier};
use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Available agents and best-practice phrases.
///
/// The catalog is read-only input; an empty catalog means "not loaded",
/// in which case agent ids are not checked against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCatalog {
    agents: Vec<Agent>,
    best_practices: Vec<String>,
}

impl AgentCatalog {
    pub fn new(agents: Vec<Agent>, best_practices: Vec<String>) -> Self {
        Self {
            agents,
            best_practices,
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn best_practices(&self) -> &[String] {
        &self.best_practices
    }

    pub fn is_loaded(&self) -> bool {
        !self.agents.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn by_tier(&self, tier: AgentTier) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(move |a| a.tier == tier)
    }

    pub fn enabled(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.enabled)
    }

    /// Check that an agent may take part in a comparison.
    pub fn check_selectable(&self, id: &str) -> Result<(), ValidationError> {
        if !self.is_loaded() {
            return Ok(());
        }
        match self.find(id) {
            None => Err(ValidationError::UnknownAgent(id.to_string())),
            Some(agent) if !agent.enabled => Err(ValidationError::AgentDisabled(agent.name.clone())),
            Some(_) => Ok(()),
        }
    }
}
