//! The diplomacy ledger: messages, treaty proposals, treaties, and trust.
//!
//! All three collections are append-only. Proposals move through a simple
//! pending -> accepted | rejected state machine; acceptance instantiates a
//! treaty. Breaking a treaty is irreversible and raises the breaker's public
//! trust penalty.

use crate::types::{PlayerId, TreatyId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recipient id used for public messages.
pub const PUBLIC: &str = "public";

/// Kinds of treaties players can propose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreatyKind {
    Alliance,
    Trade,
    Nap,
    Ceasefire,
}

impl std::fmt::Display for TreatyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreatyKind::Alliance => write!(f, "alliance"),
            TreatyKind::Trade => write!(f, "trade"),
            TreatyKind::Nap => write!(f, "nap"),
            TreatyKind::Ceasefire => write!(f, "ceasefire"),
        }
    }
}

/// A diplomatic message. Public messages have `recipient == "public"`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub sender: PlayerId,
    pub recipient: String,
    pub content: String,
    pub turn: u32,
    pub is_public: bool,
}

/// Lifecycle of a treaty proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

/// A treaty proposal from one player to another.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: TreatyId,
    pub proposer: PlayerId,
    pub target: PlayerId,
    pub kind: TreatyKind,
    pub turn_proposed: u32,
    pub status: ProposalStatus,
}

impl Proposal {
    /// A proposal is terminal once accepted or rejected.
    pub fn is_terminal(&self) -> bool {
        self.status != ProposalStatus::Pending
    }
}

/// An instantiated treaty between two players.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Treaty {
    pub id: TreatyId,
    pub kind: TreatyKind,
    pub parties: [PlayerId; 2],
    pub turn_created: u32,
    pub broken_by: Option<PlayerId>,
    pub turn_broken: Option<u32>,
}

impl Treaty {
    /// Active iff never broken.
    pub fn is_active(&self) -> bool {
        self.broken_by.is_none()
    }

    /// Whether the player is one of the two parties.
    pub fn involves(&self, player: &str) -> bool {
        self.parties.iter().any(|p| p == player)
    }
}

/// Append-only diplomacy state for one game.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DiplomacyLedger {
    pub messages: Vec<Message>,
    pub proposals: Vec<Proposal>,
    pub treaties: Vec<Treaty>,
    /// Public count of treaties each player has broken.
    pub trust_penalties: BTreeMap<PlayerId, u32>,
    next_proposal_id: TreatyId,
    next_treaty_id: TreatyId,
}

impl DiplomacyLedger {
    /// Append a message. Recipient `"public"` marks it public.
    pub fn post_message(&mut self, sender: &str, recipient: &str, content: &str, turn: u32) {
        self.messages.push(Message {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            content: content.to_string(),
            turn,
            is_public: recipient == PUBLIC,
        });
    }

    /// Append a pending proposal with a fresh id.
    pub fn submit_proposal(
        &mut self,
        proposer: &str,
        target: &str,
        kind: TreatyKind,
        turn: u32,
    ) -> TreatyId {
        let id = self.next_proposal_id;
        self.next_proposal_id += 1;
        self.proposals.push(Proposal {
            id,
            proposer: proposer.to_string(),
            target: target.to_string(),
            kind,
            turn_proposed: turn,
            status: ProposalStatus::Pending,
        });
        id
    }

    /// Accept a pending proposal addressed to `by`, instantiating a treaty.
    ///
    /// Returns the new treaty id, or `None` when the proposal is unknown,
    /// terminal, or addressed to someone else.
    pub fn accept_proposal(&mut self, proposal_id: TreatyId, by: &str, turn: u32) -> Option<TreatyId> {
        let proposal = self
            .proposals
            .iter_mut()
            .find(|p| p.id == proposal_id && p.target == by && !p.is_terminal())?;
        proposal.status = ProposalStatus::Accepted;
        let kind = proposal.kind;
        let parties = [proposal.proposer.clone(), proposal.target.clone()];
        let id = self.next_treaty_id;
        self.next_treaty_id += 1;
        self.treaties.push(Treaty {
            id,
            kind,
            parties,
            turn_created: turn,
            broken_by: None,
            turn_broken: None,
        });
        Some(id)
    }

    /// Reject a pending proposal addressed to `by`. Returns false when the
    /// proposal is unknown, terminal, or addressed to someone else.
    pub fn reject_proposal(&mut self, proposal_id: TreatyId, by: &str) -> bool {
        match self
            .proposals
            .iter_mut()
            .find(|p| p.id == proposal_id && p.target == by && !p.is_terminal())
        {
            Some(proposal) => {
                proposal.status = ProposalStatus::Rejected;
                true
            }
            None => false,
        }
    }

    /// Break an active treaty `by` is party to. Increments the breaker's
    /// trust penalty. Returns false when the treaty is unknown, inactive, or
    /// does not involve the breaker.
    pub fn break_treaty(&mut self, treaty_id: TreatyId, by: &str, turn: u32) -> bool {
        match self
            .treaties
            .iter_mut()
            .find(|t| t.id == treaty_id && t.is_active() && t.involves(by))
        {
            Some(treaty) => {
                treaty.broken_by = Some(by.to_string());
                treaty.turn_broken = Some(turn);
                *self.trust_penalties.entry(by.to_string()).or_insert(0) += 1;
                true
            }
            None => false,
        }
    }

    /// Messages a player may see for a given turn: public, sent by them, or
    /// addressed to them.
    pub fn messages_visible_to(&self, player: &str, turn: u32) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| {
                m.turn == turn && (m.is_public || m.sender == player || m.recipient == player)
            })
            .collect()
    }

    /// Pending proposals addressed to a player.
    pub fn pending_proposals_for(&self, player: &str) -> Vec<&Proposal> {
        self.proposals
            .iter()
            .filter(|p| p.target == player && !p.is_terminal())
            .collect()
    }

    /// Active treaties a player is party to.
    pub fn active_treaties_for(&self, player: &str) -> Vec<&Treaty> {
        self.treaties
            .iter()
            .filter(|t| t.is_active() && t.involves(player))
            .collect()
    }

    /// Count of active treaties a player is party to.
    pub fn active_treaty_count(&self, player: &str) -> usize {
        self.active_treaties_for(player).len()
    }
}
