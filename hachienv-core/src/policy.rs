//! Decision policies for automated seats.

use hachienv_engine::{DecisionKind, RoundSnapshot};

/// Selects among the engine's enumerated legal decisions for one seat.
///
/// Implementations must act only on the (hand-masked) snapshot they are
/// given; the engine hands policies no hidden information. Replacing the
/// policy never touches the state machine.
pub trait DecisionPolicy {
    fn select(&mut self, player: u8, view: &RoundSnapshot, legal: &[DecisionKind]) -> DecisionKind;
}

/// Always the first legal decision. Baseline for tests and benches; locks in
/// at every opportunity.
pub struct FirstDecisionPolicy;

impl DecisionPolicy for FirstDecisionPolicy {
    fn select(
        &mut self,
        _player: u8,
        _view: &RoundSnapshot,
        legal: &[DecisionKind],
    ) -> DecisionKind {
        legal[0]
    }
}

/// The reference opponent heuristics.
///
/// Plays a field-matching hand card when one exists, else the first card;
/// takes the first option of a two-way match; keeps risking until the deck
/// runs down to `deck_threshold`, then banks (lock-in at a fresh
/// combination, retreat at the pre-turn review).
#[derive(Debug, Clone, Copy)]
pub struct ThresholdPolicy {
    pub deck_threshold: usize,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self { deck_threshold: 2 }
    }
}

impl DecisionPolicy for ThresholdPolicy {
    fn select(&mut self, _player: u8, view: &RoundSnapshot, legal: &[DecisionKind]) -> DecisionKind {
        match legal[0] {
            DecisionKind::PlayHand(_) => legal
                .iter()
                .copied()
                .find(|d| {
                    matches!(d, DecisionKind::PlayHand(c)
                        if view.field.iter().any(|f| f.month() == c.month()))
                })
                .unwrap_or(legal[0]),
            DecisionKind::ChooseMatch(_) => legal[0],
            _ => {
                if view.deck_remaining <= self.deck_threshold {
                    if legal.contains(&DecisionKind::LockIn) {
                        return DecisionKind::LockIn;
                    }
                    if legal.contains(&DecisionKind::Retreat) {
                        return DecisionKind::Retreat;
                    }
                }
                legal
                    .iter()
                    .copied()
                    .find(|d| matches!(d, DecisionKind::Continue))
                    .unwrap_or(legal[0])
            }
        }
    }
}
