//! Agent entities as published by the backend catalog

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Pricing tier of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentTier {
    Free,
    Premium,
}

impl AgentTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentTier::Free => "free",
            AgentTier::Premium => "premium",
        }
    }
}

impl fmt::Display for AgentTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable AI agent (Entity, immutable)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub tier: AgentTier,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub enabled: bool,
    /// Upstream provider, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Upstream model name, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Agent {
    pub fn new(id: impl Into<String>, name: impl Into<String>, tier: AgentTier) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tier,
            domains: Vec::new(),
            tags: BTreeSet::new(),
            enabled: true,
            provider: None,
            model: None,
        }
    }

    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Which of the two comparison slots an agent occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentSlot {
    First,
    Second,
}

impl AgentSlot {
    pub fn other(self) -> Self {
        match self {
            AgentSlot::First => AgentSlot::Second,
            AgentSlot::Second => AgentSlot::First,
        }
    }
}

/// The two agents that answered turn 0 of the current session.
///
/// Names start out as the ids and are replaced by the display names the
/// backend reports once the first comparison succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPair {
    pub agent1_id: String,
    pub agent2_id: String,
    pub agent1_name: String,
    pub agent2_name: String,
}

impl AgentPair {
    pub fn new(agent1_id: impl Into<String>, agent2_id: impl Into<String>) -> Self {
        let agent1_id = agent1_id.into();
        let agent2_id = agent2_id.into();
        Self {
            agent1_name: agent1_id.clone(),
            agent2_name: agent2_id.clone(),
            agent1_id,
            agent2_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_catalog_agent() {
        let json = r#"{
            "id": "gpt-3.5",
            "name": "GPT-3.5 Turbo",
            "provider": "openai",
            "model": "gpt-3.5-turbo",
            "domains": ["Chat/Reasoning", "Code"],
            "tags": ["Python", "Summarization"],
            "tier": "free",
            "enabled": true
        }"#;
        let agent: Agent = serde_json::from_str(json).unwrap();
        assert_eq!(agent.id, "gpt-3.5");
        assert_eq!(agent.tier, AgentTier::Free);
        assert_eq!(agent.domains, vec!["Chat/Reasoning", "Code"]);
        assert!(agent.tags.contains("Python"));
        assert_eq!(agent.provider.as_deref(), Some("openai"));
    }

    #[test]
    fn test_domains_keep_order() {
        let agent = Agent::new("a", "A", AgentTier::Premium).with_domains(["Code", "Analysis"]);
        assert_eq!(agent.domains, vec!["Code", "Analysis"]);
    }

    #[test]
    fn test_pair_names_default_to_ids() {
        let pair = AgentPair::new("Intern1", "Intern2");
        assert_eq!(pair.agent1_name, "Intern1");
        assert_eq!(pair.agent2_name, "Intern2");
    }

    #[test]
    fn test_slot_other() {
        assert_eq!(AgentSlot::First.other(), AgentSlot::Second);
    }
}
