//! A consensus record — the Propose/Accept/Commit/Reject vote
//! tally for one cross-node proposal.
//!
//! The reference implementation's `consensus_propose`/`consensus_vote`
//! were stubs (`TODO: implement`); this fills in the voting state
//! machine implied by `consensus_t`'s fields and `consensus_is_committed`,
//! resolving a single open question: a `Reject` vote is a veto — one
//! reject moves the record to `Reject` permanently, regardless of how
//! many accepts preceded it.

use cogspace_core::NodeId;
use parking_lot::Mutex;
use std::collections::HashSet;

/// A proposal's lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsensusPhase {
    /// Proposed, awaiting votes.
    Propose,
    /// At least one accept recorded, not yet at quorum or vetoed.
    Accept,
    /// Quorum of accepts reached; the proposal is committed.
    Commit,
    /// At least one reject recorded; the proposal is permanently dead.
    Reject,
}

struct State {
    phase: ConsensusPhase,
    voted: HashSet<NodeId>,
}

/// Tracks votes on one proposal until it commits or is vetoed.
///
/// `proposal_id` is caller-supplied (not generated here): the caller is
/// in the best position to pick an id scheme that is unique across the
/// cluster (e.g. `(node_id, local_counter)`), and nothing in this type
/// needs to mint one itself.
pub struct ConsensusRecord {
    proposal_id: u64,
    proposal_data: Vec<u8>,
    required_votes: usize,
    state: Mutex<State>,
}

impl ConsensusRecord {
    /// Start a new proposal in the `Propose` phase.
    pub fn new(proposal_id: u64, proposal_data: Vec<u8>, required_votes: usize) -> Self {
        ConsensusRecord {
            proposal_id,
            proposal_data,
            required_votes,
            state: Mutex::new(State {
                phase: ConsensusPhase::Propose,
                voted: HashSet::new(),
            }),
        }
    }

    /// The caller-supplied proposal id.
    pub fn proposal_id(&self) -> u64 {
        self.proposal_id
    }

    /// The opaque proposal payload.
    pub fn proposal_data(&self) -> &[u8] {
        &self.proposal_data
    }

    /// Current phase.
    pub fn phase(&self) -> ConsensusPhase {
        self.state.lock().phase
    }

    /// Number of distinct nodes that have cast an accept vote.
    pub fn vote_count(&self) -> usize {
        self.state.lock().voted.len()
    }

    /// Record a vote from `node_id`. A repeated accept from a node that
    /// already voted is a no-op (idempotent duplicate handling); a vote
    /// arriving after the record has already been vetoed or committed
    /// is also a no-op, since both are terminal.
    pub fn record_vote(&self, node_id: NodeId, accept: bool) {
        let mut state = self.state.lock();
        if matches!(state.phase, ConsensusPhase::Commit | ConsensusPhase::Reject) {
            return;
        }

        if !accept {
            state.phase = ConsensusPhase::Reject;
            return;
        }

        if !state.voted.insert(node_id) {
            return;
        }

        state.phase = if state.voted.len() >= self.required_votes {
            ConsensusPhase::Commit
        } else {
            ConsensusPhase::Accept
        };
    }

    /// True once quorum has been reached and the record is committed.
    pub fn is_committed(&self) -> bool {
        self.phase() == ConsensusPhase::Commit
    }

    /// True once the record has been vetoed by any reject vote.
    pub fn is_rejected(&self) -> bool {
        self.phase() == ConsensusPhase::Reject
    }
}
