use serde::{Deserialize, Serialize};

/// Table rules for a round. Constructed once and carried by the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRule {
    /// How many fresh shuffles the dealer may attempt before an invalid
    /// field (four of one month) aborts round setup.
    pub max_deal_retries: u32,
    /// Whether hand combinations are settled at round start. Some tables
    /// play capture combinations only.
    pub score_teyaku: bool,
}

impl Default for GameRule {
    fn default() -> Self {
        Self::default_hachihachi()
    }
}

impl GameRule {
    pub fn default_hachihachi() -> Self {
        Self {
            max_deal_retries: 50,
            score_teyaku: true,
        }
    }

    /// Capture-combination-only variant without round-start hand settlement.
    pub fn default_dekiyaku_only() -> Self {
        Self {
            max_deal_retries: 50,
            score_teyaku: false,
        }
    }
}
