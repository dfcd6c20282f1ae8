//! Weighted multi-voter consensus

use log::debug;
use warden_core::{ActionProposal, AgentVote, ConsensusResult};

/// Consensus configuration
#[derive(Debug, Clone)]
pub struct ConsensusConfig {
    /// Minimum weighted-approval fraction, in [0.5, 1.0], boundary inclusive
    pub threshold: f64,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self { threshold: 0.6 }
    }
}

/// Aggregates independent votes on a proposal into an approve/reject decision
#[derive(Debug, Clone, Default)]
pub struct ConsensusCoordinator {
    config: ConsensusConfig,
}

impl ConsensusCoordinator {
    pub fn new(config: ConsensusConfig) -> Self {
        Self { config }
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// Weigh votes by confidence. An empty vote set, or one where every
    /// voter reports zero confidence, always rejects.
    pub fn coordinate(&self, proposal: &ActionProposal, votes: &[AgentVote]) -> ConsensusResult {
        let max_weight: f64 = votes.iter().map(|v| v.confidence).sum();
        let yes_weight: f64 = votes
            .iter()
            .filter(|v| v.vote)
            .map(|v| v.confidence)
            .sum();

        let final_score = if max_weight > 0.0 {
            yes_weight / max_weight
        } else {
            0.0
        };
        let approved = max_weight > 0.0 && final_score >= self.config.threshold;

        debug!(
            "[GATE] Consensus on {:?} proposal {}: {:.4} ({} votes, approved={})",
            proposal.kind,
            proposal.id,
            final_score,
            votes.len(),
            approved
        );

        ConsensusResult {
            approved,
            votes: votes.to_vec(),
            final_score,
        }
    }
}
