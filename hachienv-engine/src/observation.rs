use serde::{Deserialize, Serialize};

use crate::round::Phase;
use crate::types::{Card, Combination, TerminationReason, NP};

/// Point-in-time view of a round, retrievable at any moment.
///
/// [`GameRound::snapshot`](crate::round::GameRound::snapshot) returns the
/// omniscient view; `snapshot_for` masks the other seats' hands for policy
/// drivers restricted to observable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub phase: Phase,
    pub field: Vec<Card>,
    pub hands: [Vec<Card>; NP],
    pub capture_piles: [Vec<Card>; NP],
    pub active_combinations: [Vec<Combination>; NP],
    pub risk_declared: [bool; NP],
    pub multiplier: u8,
    pub current_player: u8,
    pub deck_remaining: usize,
    pub termination: Option<TerminationReason>,
    pub terminating_player: Option<u8>,
    /// Card awaiting a two-way field choice, with its candidate takes.
    pub pending_card: Option<Card>,
    pub match_options: Vec<Card>,
    pub turn_count: u32,
}

impl RoundSnapshot {
    pub fn hand(&self, player: u8) -> &[Card] {
        &self.hands[player as usize]
    }
}
