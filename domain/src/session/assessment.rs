//! Cross-assessment results

use serde::{Deserialize, Serialize};

/// Evaluation dimensions offered for cross-assessment
pub const ASSESSMENT_CRITERIA: [&str; 7] = [
    "Accuracy & factual correctness",
    "Completeness & thoroughness",
    "Clarity & communication",
    "Practical applicability",
    "Creative approach",
    "Technical depth",
    "Potential risks or limitations",
];

/// Display names of the assessing agents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessorInfo {
    pub agent1_name: String,
    pub agent2_name: String,
}

/// Each agent's critique of the other's answer for one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub assessor_info: AssessorInfo,
    pub agent1_assessment_by_agent2: String,
    pub agent2_assessment_by_agent1: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_payload() {
        let json = r#"{
            "agent1_assessment_by_agent2": "Correct.",
            "agent2_assessment_by_agent1": "Also correct.",
            "assessor_info": {"agent1_name": "Intern1", "agent2_name": "Intern2"}
        }"#;
        let result: AssessmentResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.assessor_info.agent2_name, "Intern2");
        assert_eq!(result.agent1_assessment_by_agent2, "Correct.");
    }

    #[test]
    fn test_criteria_are_unique() {
        let mut sorted = ASSESSMENT_CRITERIA.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ASSESSMENT_CRITERIA.len());
    }
}
