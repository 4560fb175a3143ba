//! Multi-round play. A round object lives and dies with its round; only the
//! cumulative scores cross the boundary.

use hachienv_engine::types::NP;
use hachienv_engine::{EngineError, EngineResult, GameRound, GameRule, SettlementReport};

use crate::detector::StandardDetector;
use crate::policy::DecisionPolicy;
use crate::runner::RoundRunner;
use crate::seeding::{KdfDeck, SessionRng};

pub struct Session {
    rng: SessionRng,
    rule: GameRule,
    cumulative: [i32; NP],
    rounds_played: u32,
}

impl Session {
    pub fn new(seed: [u8; 32], rule: GameRule) -> Self {
        Self {
            rng: SessionRng::new(seed),
            rule,
            cumulative: [0; NP],
            rounds_played: 0,
        }
    }

    pub fn cumulative_scores(&self) -> [i32; NP] {
        self.cumulative
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Deal and play one full round under the given policy for every seat.
    /// The deal order comes from the session KDF, so the whole session
    /// replays from its seed alone.
    pub fn play_round(&mut self, policy: &mut dyn DecisionPolicy) -> EngineResult<SettlementReport> {
        let deck = KdfDeck::new(self.rng.next_round_seed());
        let mut round = GameRound::new(
            Box::new(deck),
            Box::new(StandardDetector),
            self.rule,
            true,
        )?;
        for (p, &score) in round.players.iter_mut().zip(&self.cumulative) {
            p.cumulative_score = score;
        }

        let mut runner = RoundRunner::new(round);
        runner.run_to_completion(policy)?;
        let round = runner.into_round();
        let report = round
            .settlement()
            .cloned()
            .ok_or_else(|| EngineError::InvalidState {
                message: "round runner returned without a settlement".to_string(),
            })?;

        for (score, line) in self.cumulative.iter_mut().zip(report.per_player.iter()) {
            *score += line.round_total;
        }
        self.rounds_played += 1;
        Ok(report)
    }
}
