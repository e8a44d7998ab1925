//! Verdict types: the result of running content and traffic through the
//! full analysis pipeline.

use serde::{Deserialize, Serialize};

/// The final verdict from the Sentinel analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    /// Passed all checks. Safe to proceed.
    Allow,

    /// Failed a check with high confidence. Do not proceed.
    Block { reason: BlockReason },

    /// Suspicious but not conclusive; proceed but flag for human review.
    Review { flags: Vec<ReviewFlag> },
}

impl Verdict {
    pub fn allow() -> Self {
        Self::Allow
    }

    pub fn block(reason: BlockReason) -> Self {
        Self::Block { reason }
    }

    pub fn review(flags: Vec<ReviewFlag>) -> Self {
        Self::Review { flags }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Block { .. })
    }

    pub fn requires_review(&self) -> bool {
        matches!(self, Self::Review { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockReason {
    ContentThreat {
        threat: String,
        confidence: f64,
        detail: String,
    },
    KnownBadIndicator {
        value: String,
    },
    BehaviorAnomaly {
        analyzer: String,
        confidence: f64,
        detail: String,
    },
    CredentialLeak {
        form_origin: String,
        submit_target: String,
    },
    PolicyBlock {
        policy_id: String,
        policy_name: String,
    },
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContentThreat { threat, confidence, detail } => {
                write!(f, "content threat {threat} (confidence {confidence:.2}): {detail}")
            }
            Self::KnownBadIndicator { value } => write!(f, "matched known-bad indicator: {value}"),
            Self::BehaviorAnomaly { analyzer, confidence, detail } => {
                write!(f, "{analyzer} anomaly (confidence {confidence:.2}): {detail}")
            }
            Self::CredentialLeak { form_origin, submit_target } => {
                write!(f, "credential leak: {form_origin} -> {submit_target}")
            }
            Self::PolicyBlock { policy_id, policy_name } => {
                write!(f, "blocked by policy '{policy_name}' ({policy_id})")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReviewFlag {
    ContentFlagged { threat: String, confidence: f64 },
    BehaviorFlagged { analyzer: String, confidence: f64, detail: String },
    UnverifiedCredentialFlow { form_origin: String, submit_target: String },
}

impl std::fmt::Display for ReviewFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContentFlagged { threat, confidence } => {
                write!(f, "content flagged: {threat} (confidence {confidence:.2})")
            }
            Self::BehaviorFlagged { analyzer, confidence, detail } => {
                write!(f, "{analyzer} flagged (confidence {confidence:.2}): {detail}")
            }
            Self::UnverifiedCredentialFlow { form_origin, submit_target } => {
                write!(f, "unverified credential flow: {form_origin} -> {submit_target}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_allow_predicates() {
        let verdict = Verdict::allow();
        assert!(verdict.is_allowed());
        assert!(!verdict.is_blocked());
        assert!(!verdict.requires_review());
    }

    #[test]
    fn verdict_block_predicates() {
        let verdict = Verdict::block(BlockReason::KnownBadIndicator { value: "evil.example".into() });
        assert!(verdict.is_blocked());
    }

    #[test]
    fn block_reason_display_is_readable() {
        let reason = BlockReason::ContentThreat {
            threat: "injection".into(),
            confidence: 0.9,
            detail: "matched signature".into(),
        };
        assert!(reason.to_string().contains("injection"));
    }
}
