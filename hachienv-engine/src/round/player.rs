use serde::{Deserialize, Serialize};

use crate::types::{card_points, combination_total, Card, Combination};

/// Per-seat mutable state for one round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerState {
    pub hand: Vec<Card>,
    pub capture_pile: Vec<Card>,
    /// Combinations currently present in the capture pile, refreshed after
    /// every capture.
    pub active_combinations: Vec<Combination>,
    /// Set by a lock event (lock-in freezes all three seats, retreat freezes
    /// the retreater). Never mutated afterwards except by a fresh lock.
    pub locked_combinations: Option<Vec<Combination>>,
    /// Hand combinations fixed at the deal, settled independently.
    pub teyaku: Vec<Combination>,
    pub round_score: i32,
    pub cumulative_score: i32,
    pub has_declared_risk: bool,
    /// Combination value at the most recent continue declaration. Failing to
    /// exceed it by round end forfeits the round.
    pub risk_baseline_value: i32,
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_value(&self) -> i32 {
        combination_total(&self.active_combinations)
    }

    pub fn locked_value(&self) -> i32 {
        combination_total(self.locked_combinations.as_deref().unwrap_or(&[]))
    }

    pub fn teyaku_value(&self) -> i32 {
        combination_total(&self.teyaku)
    }

    pub fn pile_points(&self) -> i32 {
        card_points(&self.capture_pile)
    }

    pub fn hand_points(&self) -> i32 {
        card_points(&self.hand)
    }
}
