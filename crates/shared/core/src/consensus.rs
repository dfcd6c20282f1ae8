//! Multi-voter consensus types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of action a proposal describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalKind {
    Trade,
    Rebalance,
    Alert,
}

/// An action put to a vote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionProposal {
    pub id: Uuid,
    pub kind: ProposalKind,
    pub proposed_by: String,
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl ActionProposal {
    pub fn new(kind: ProposalKind, proposed_by: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            proposed_by: proposed_by.into(),
            details: serde_json::Value::Null,
            timestamp: Utc::now(),
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

/// One voter's verdict on a proposal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentVote {
    pub agent_id: String,
    pub vote: bool,
    /// Vote weight in [0, 1]
    pub confidence: f64,
}

/// Aggregated outcome of a vote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub approved: bool,
    pub votes: Vec<AgentVote>,
    /// Weighted approval fraction in [0, 1]
    pub final_score: f64,
}
