//! Policy-driven round execution.

use log::debug;

use hachienv_engine::{EngineResult, GameRound};

use crate::policy::DecisionPolicy;

/// Hard cap on decisions per round, as a guard against engine bugs.
const MAX_STEPS: u32 = 10_000;

/// Drives a [`GameRound`] by feeding policy decisions through the engine's
/// input surface. With a human seat configured, the runner stops whenever
/// that seat must decide; the caller then talks to the round directly and
/// resumes stepping.
pub struct RoundRunner {
    round: GameRound,
    human_seat: Option<u8>,
    steps: u32,
}

impl RoundRunner {
    pub fn new(round: GameRound) -> Self {
        Self {
            round,
            human_seat: None,
            steps: 0,
        }
    }

    pub fn with_human_seat(round: GameRound, seat: u8) -> Self {
        Self {
            round,
            human_seat: Some(seat),
            steps: 0,
        }
    }

    pub fn round(&self) -> &GameRound {
        &self.round
    }

    pub fn round_mut(&mut self) -> &mut GameRound {
        &mut self.round
    }

    pub fn into_round(self) -> GameRound {
        self.round
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Whether the runner is parked on the human seat's decision.
    pub fn awaiting_human(&self) -> bool {
        !self.round.is_done() && self.human_seat == Some(self.round.current_player)
    }

    /// Apply one automated decision. Returns false when the round is over or
    /// a human decision is pending.
    pub fn step_once(&mut self, policy: &mut dyn DecisionPolicy) -> EngineResult<bool> {
        if self.round.is_done() || self.steps >= MAX_STEPS {
            return Ok(false);
        }
        let pid = self.round.current_player;
        if self.human_seat == Some(pid) {
            return Ok(false);
        }

        let legal = self.round.legal_decisions();
        let view = self.round.snapshot_for(pid);
        let decision = policy.select(pid, &view, &legal);
        debug!(
            "seat {} takes {:?} in {:?} (deck {})",
            pid, decision, view.phase, view.deck_remaining
        );
        self.round.apply_decision(decision)?;
        self.steps += 1;
        Ok(!self.round.is_done())
    }

    /// Run until the round settles or the human seat is up.
    pub fn run_to_completion(&mut self, policy: &mut dyn DecisionPolicy) -> EngineResult<()> {
        while self.step_once(policy)? {}
        Ok(())
    }
}
