//! Per-class busy flags enforcing single-flight network operations

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three independent classes of network operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Compare,
    FollowUp,
    Assess,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Compare => "comparison",
            OperationKind::FollowUp => "follow-up",
            OperationKind::Assess => "assessment",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// At most one operation of each class may be in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyFlags {
    pub comparing: bool,
    pub following_up: bool,
    pub assessing: bool,
}

impl BusyFlags {
    pub fn is_set(&self, kind: OperationKind) -> bool {
        match kind {
            OperationKind::Compare => self.comparing,
            OperationKind::FollowUp => self.following_up,
            OperationKind::Assess => self.assessing,
        }
    }

    pub fn any(&self) -> bool {
        self.comparing || self.following_up || self.assessing
    }

    pub(crate) fn set(&mut self, kind: OperationKind, value: bool) {
        match kind {
            OperationKind::Compare => self.comparing = value,
            OperationKind::FollowUp => self.following_up = value,
            OperationKind::Assess => self.assessing = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_independent() {
        let mut flags = BusyFlags::default();
        assert!(!flags.any());

        flags.set(OperationKind::FollowUp, true);
        assert!(flags.is_set(OperationKind::FollowUp));
        assert!(!flags.is_set(OperationKind::Compare));
        assert!(!flags.is_set(OperationKind::Assess));
        assert!(flags.any());

        flags.set(OperationKind::FollowUp, false);
        assert!(!flags.any());
    }
}
