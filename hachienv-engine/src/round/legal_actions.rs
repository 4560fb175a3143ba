use serde::{Deserialize, Serialize};

use crate::errors::EngineResult;
use crate::types::Card;

use super::{GameRound, Phase};

/// One selectable decision, enumerated for policy drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionKind {
    PlayHand(Card),
    ChooseMatch(Card),
    LockIn,
    Continue,
    Retreat,
}

impl GameRound {
    /// Decisions the acting player may legally take right now. Empty once the
    /// round has ended. Never empty otherwise: the eager machinery only stops
    /// where a choice exists.
    pub fn legal_decisions(&self) -> Vec<DecisionKind> {
        match self.phase {
            Phase::SelectHand => self.players[self.current_player as usize]
                .hand
                .iter()
                .map(|&c| DecisionKind::PlayHand(c))
                .collect(),
            Phase::SelectField | Phase::SelectDrawnMatch => self
                .match_options()
                .into_iter()
                .map(DecisionKind::ChooseMatch)
                .collect(),
            Phase::RiskDecision => {
                let mut out = vec![DecisionKind::LockIn, DecisionKind::Continue];
                if self.can_retreat(self.current_player) {
                    out.push(DecisionKind::Retreat);
                }
                out
            }
            Phase::RiskReview => {
                let mut out = vec![DecisionKind::Continue];
                if self.can_retreat(self.current_player) {
                    out.push(DecisionKind::Retreat);
                }
                out
            }
            Phase::RoundEnd => Vec::new(),
        }
    }

    /// Apply one enumerated decision through the normal input surface.
    pub fn apply_decision(&mut self, decision: DecisionKind) -> EngineResult<()> {
        match decision {
            DecisionKind::PlayHand(c) => self.select_hand_card(c),
            DecisionKind::ChooseMatch(c) => self.select_field_card(c),
            DecisionKind::LockIn => self.declare_lock_in(),
            DecisionKind::Continue => self.declare_continue(),
            DecisionKind::Retreat => self.declare_retreat(),
        }
    }
}
