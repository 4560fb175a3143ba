use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::deck::Deck;
use crate::detector::CombinationDetector;
use crate::errors::{EngineError, EngineResult};
use crate::observation::RoundSnapshot;
use crate::rule::GameRule;
use crate::settlement::{self, Flow, SettlementReport};
use crate::types::{card_points, Card, TerminationReason, DECK_SIZE, NP};

pub mod deal;
pub mod legal_actions;
pub mod player;

pub use legal_actions::DecisionKind;
use player::PlayerState;

/// Await-points of the round state machine. Every step between them (deck
/// draws, one-match captures, sweeps, draw-only turns) is computed eagerly
/// when a decision is applied, so the engine is always either waiting for
/// exactly one player's input or done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// A risk declarer must re-affirm or retreat before acting.
    RiskReview,
    SelectHand,
    /// The played hand card matched two field cards; the actor picks one.
    SelectField,
    /// The drawn card matched two field cards; the actor picks one.
    SelectDrawnMatch,
    /// A fresh combination: lock in, continue at risk, or retreat.
    RiskDecision,
    RoundEnd,
}

/// Where play resumes after a post-capture risk decision resolves as
/// continue: the suspended draw step or the end of the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resume {
    DrawStep,
    EndTurn,
}

/// One round of three-player hachi-hachi: the owned aggregate every operation
/// goes through. Built by the deal, mutated in place by the state machine and
/// the risk engine, closed by settlement.
pub struct GameRound {
    pub players: [PlayerState; NP],
    pub field: Vec<Card>,
    deck: Box<dyn Deck>,
    detector: Box<dyn CombinationDetector>,
    pub rule: GameRule,
    /// Stakes multiplier from the dealt field, 1, 2 or 4.
    pub multiplier: u8,
    pub phase: Phase,
    pub current_player: u8,
    pub turn_count: u32,
    pub termination: Option<TerminationReason>,
    pub terminating_player: Option<u8>,

    pending_hand_card: Option<Card>,
    pending_drawn_card: Option<Card>,
    resume_after_decision: Resume,
    last_capturer: Option<u8>,
    /// Cards still in the deck when the round ended, drained so settlement
    /// can count them while the card census stays at 48.
    undealt: Vec<Card>,
    teyaku_flows: Vec<Flow>,
    settlement: Option<SettlementReport>,
    event_log: Vec<String>,
    skip_event_log: bool,
}

impl GameRound {
    /// Deal and validate a fresh round. Fails only with
    /// [`EngineError::InvalidDeal`] once the redeal bound is exhausted.
    pub fn new(
        mut deck: Box<dyn Deck>,
        detector: Box<dyn CombinationDetector>,
        rule: GameRule,
        skip_event_log: bool,
    ) -> EngineResult<Self> {
        let outcome = deal::deal(deck.as_mut(), &rule)?;

        let mut players: [PlayerState; NP] = std::array::from_fn(|_| PlayerState::new());
        for (p, hand) in players.iter_mut().zip(outcome.hands) {
            p.hand = hand;
        }

        let mut round = Self {
            players,
            field: outcome.field,
            deck,
            detector,
            rule,
            multiplier: outcome.multiplier,
            phase: Phase::SelectHand,
            current_player: 0,
            turn_count: 0,
            termination: None,
            terminating_player: None,
            pending_hand_card: None,
            pending_drawn_card: None,
            resume_after_decision: Resume::EndTurn,
            last_capturer: None,
            undealt: Vec::new(),
            teyaku_flows: Vec::new(),
            settlement: None,
            event_log: Vec::new(),
            skip_event_log,
        };

        // Hand combinations are fixed here, before any capture, and their
        // payment vector with them.
        for i in 0..NP {
            let teyaku = round.detector.detect(&round.players[i].hand);
            round.players[i].teyaku = teyaku;
        }
        if round.rule.score_teyaku {
            round.teyaku_flows = settlement::teyaku_flows(&round.players, round.multiplier);
        }

        if !round.skip_event_log {
            let mut ev = serde_json::Map::new();
            ev.insert("type".to_string(), Value::String("deal".to_string()));
            ev.insert("multiplier".to_string(), Value::Number(round.multiplier.into()));
            ev.insert("attempts".to_string(), Value::Number(outcome.attempts.into()));
            let field_ids: Vec<u8> = round.field.iter().map(|c| c.id()).collect();
            ev.insert("field".to_string(), serde_json::to_value(field_ids).unwrap());
            if let Some(digest) = outcome.digest {
                ev.insert("deal_digest".to_string(), Value::String(digest));
            }
            let teyaku: Vec<i32> = round.players.iter().map(|p| p.teyaku_value()).collect();
            ev.insert("teyaku".to_string(), serde_json::to_value(teyaku).unwrap());
            round.push_event(Value::Object(ev));
        }

        debug_assert_eq!(round.card_census(), DECK_SIZE);
        round.begin_turn();
        Ok(round)
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::RoundEnd
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn settlement(&self) -> Option<&SettlementReport> {
        self.settlement.as_ref()
    }

    /// JSON event log of everything that happened this round, in order.
    pub fn events(&self) -> &[String] {
        &self.event_log
    }

    /// The card awaiting a two-way field choice, if any.
    pub fn pending_card(&self) -> Option<Card> {
        self.pending_hand_card.or(self.pending_drawn_card)
    }

    /// Field cards the pending card may take.
    pub fn match_options(&self) -> Vec<Card> {
        match self.pending_card() {
            Some(c) => self.month_matches(c.month()),
            None => Vec::new(),
        }
    }

    /// Retreat is open to a standing risk declarer whose combination value
    /// has not grown past the declared baseline.
    pub fn can_retreat(&self, player: u8) -> bool {
        let p = &self.players[player as usize];
        p.has_declared_risk && p.active_value() <= p.risk_baseline_value
    }

    /// Teyaku payment vector as fixed at the deal (before any forfeit).
    pub fn teyaku_shares(&self) -> [i32; NP] {
        let mut shares = [0i32; NP];
        for f in &self.teyaku_flows {
            shares[f.to as usize] += f.amount;
            shares[f.from as usize] -= f.amount;
        }
        shares
    }

    /// Cards accounted for across deck, field, hands, piles and in-flight
    /// selections. Always 48.
    pub fn card_census(&self) -> usize {
        self.deck.remaining()
            + self.field.len()
            + self.undealt.len()
            + usize::from(self.pending_hand_card.is_some())
            + usize::from(self.pending_drawn_card.is_some())
            + self
                .players
                .iter()
                .map(|p| p.hand.len() + p.capture_pile.len())
                .sum::<usize>()
    }

    /// Omniscient state snapshot.
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            phase: self.phase,
            field: self.field.clone(),
            hands: std::array::from_fn(|i| self.players[i].hand.clone()),
            capture_piles: std::array::from_fn(|i| self.players[i].capture_pile.clone()),
            active_combinations: std::array::from_fn(|i| {
                self.players[i].active_combinations.clone()
            }),
            risk_declared: std::array::from_fn(|i| self.players[i].has_declared_risk),
            multiplier: self.multiplier,
            current_player: self.current_player,
            deck_remaining: self.deck.remaining(),
            termination: self.termination,
            terminating_player: self.terminating_player,
            pending_card: self.pending_card(),
            match_options: self.match_options(),
            turn_count: self.turn_count,
        }
    }

    /// Snapshot with the other seats' hands masked out, for policy drivers
    /// that must only see observable state.
    pub fn snapshot_for(&self, player: u8) -> RoundSnapshot {
        let mut snap = self.snapshot();
        for (i, hand) in snap.hands.iter_mut().enumerate() {
            if i != player as usize {
                hand.clear();
            }
        }
        snap
    }

    // ----------------------------------------------------------------------
    // Decision input surface
    // ----------------------------------------------------------------------

    /// Play a card from the acting player's hand against the field.
    pub fn select_hand_card(&mut self, card: Card) -> EngineResult<()> {
        self.expect_phase(Phase::SelectHand, "select_hand_card")?;
        let pid = self.current_player as usize;
        let idx = self.players[pid]
            .hand
            .iter()
            .position(|&c| c == card)
            .ok_or_else(|| {
                EngineError::illegal(format!("{} is not in player {}'s hand", card, pid))
            })?;
        self.players[pid].hand.remove(idx);

        let matches = self.month_matches(card.month());
        match matches.len() {
            0 => {
                self.field.push(card);
                self.emit_card_event("place", pid, card);
                self.draw_step();
            }
            2 => {
                self.pending_hand_card = Some(card);
                self.phase = Phase::SelectField;
            }
            _ => {
                // One match captures the pair; three is an unconditional sweep.
                self.capture(pid, card, &matches);
                if !self.after_capture(Resume::DrawStep) {
                    self.draw_step();
                }
            }
        }
        Ok(())
    }

    /// Resolve a pending two-way match by naming the field card to take.
    pub fn select_field_card(&mut self, card: Card) -> EngineResult<()> {
        let (pending, from_draw) = match self.phase {
            Phase::SelectField => (self.pending_hand_card, false),
            Phase::SelectDrawnMatch => (self.pending_drawn_card, true),
            _ => {
                return Err(EngineError::illegal(format!(
                    "select_field_card is not valid in phase {:?}",
                    self.phase
                )))
            }
        };
        let played = pending.ok_or_else(|| EngineError::InvalidState {
            message: "selection phase without a pending card".to_string(),
        })?;

        if !self.field.contains(&card) {
            return Err(EngineError::illegal(format!("{} is not on the field", card)));
        }
        if card.month() != played.month() {
            return Err(EngineError::illegal(format!(
                "{} does not match the month of {}",
                card, played
            )));
        }

        if from_draw {
            self.pending_drawn_card = None;
        } else {
            self.pending_hand_card = None;
        }

        let pid = self.current_player as usize;
        self.capture(pid, played, &[card]);
        let resume = if from_draw {
            Resume::EndTurn
        } else {
            Resume::DrawStep
        };
        if !self.after_capture(resume) {
            match resume {
                Resume::DrawStep => self.draw_step(),
                Resume::EndTurn => self.end_turn(),
            }
        }
        Ok(())
    }

    /// Bank the current combinations and end the round. Freezes every seat's
    /// combinations at this instant.
    pub fn declare_lock_in(&mut self) -> EngineResult<()> {
        self.expect_phase(Phase::RiskDecision, "declare_lock_in")?;
        self.emit_lock_event(false);
        self.lock_in_internal();
        Ok(())
    }

    /// Keep playing. At a fresh combination this declares (or re-declares)
    /// risk and records the value to beat; at the pre-turn review it merely
    /// resumes the standing risk.
    pub fn declare_continue(&mut self) -> EngineResult<()> {
        match self.phase {
            Phase::RiskDecision => {
                let pid = self.current_player as usize;
                let value = self.players[pid].active_value();
                self.players[pid].has_declared_risk = true;
                self.players[pid].risk_baseline_value = value;
                self.players[pid].locked_combinations = None;
                if !self.skip_event_log {
                    let mut ev = serde_json::Map::new();
                    ev.insert("type".to_string(), Value::String("continue".to_string()));
                    ev.insert("actor".to_string(), Value::Number((pid as u64).into()));
                    ev.insert("baseline".to_string(), Value::Number(value.into()));
                    self.push_event(Value::Object(ev));
                }
                match self.resume_after_decision {
                    Resume::DrawStep => self.draw_step(),
                    Resume::EndTurn => self.end_turn(),
                }
                Ok(())
            }
            Phase::RiskReview => {
                let pid = self.current_player as usize;
                if !self.skip_event_log {
                    let mut ev = serde_json::Map::new();
                    ev.insert("type".to_string(), Value::String("continue".to_string()));
                    ev.insert("actor".to_string(), Value::Number((pid as u64).into()));
                    self.push_event(Value::Object(ev));
                }
                self.begin_action();
                Ok(())
            }
            _ => Err(EngineError::illegal(format!(
                "declare_continue is not valid in phase {:?}",
                self.phase
            ))),
        }
    }

    /// Convert a standing, unimproved risk into a guaranteed half-value
    /// payout, ending the round.
    pub fn declare_retreat(&mut self) -> EngineResult<()> {
        if self.phase != Phase::RiskDecision && self.phase != Phase::RiskReview {
            return Err(EngineError::illegal(format!(
                "declare_retreat is not valid in phase {:?}",
                self.phase
            )));
        }
        let pid = self.current_player as usize;
        if !self.can_retreat(self.current_player) {
            return Err(EngineError::illegal(
                "retreat requires an earlier risk declaration that has not improved",
            ));
        }
        self.players[pid].locked_combinations =
            Some(self.players[pid].active_combinations.clone());
        if !self.skip_event_log {
            let mut ev = serde_json::Map::new();
            ev.insert("type".to_string(), Value::String("retreat".to_string()));
            ev.insert("actor".to_string(), Value::Number((pid as u64).into()));
            self.push_event(Value::Object(ev));
        }
        self.finish(TerminationReason::Retreated, Some(self.current_player));
        Ok(())
    }

    // ----------------------------------------------------------------------
    // Eager machinery
    // ----------------------------------------------------------------------

    fn month_matches(&self, month: u8) -> Vec<Card> {
        self.field
            .iter()
            .copied()
            .filter(|c| c.month() == month)
            .collect()
    }

    fn capture(&mut self, pid: usize, played: Card, taken: &[Card]) {
        for t in taken {
            if let Some(idx) = self.field.iter().position(|c| c == t) {
                self.field.remove(idx);
            }
        }
        let p = &mut self.players[pid];
        p.capture_pile.push(played);
        p.capture_pile.extend_from_slice(taken);
        self.last_capturer = Some(pid as u8);

        if !self.skip_event_log {
            let kind = if taken.len() == 3 { "sweep" } else { "capture" };
            let mut ev = serde_json::Map::new();
            ev.insert("type".to_string(), Value::String(kind.to_string()));
            ev.insert("actor".to_string(), Value::Number((pid as u64).into()));
            ev.insert("card".to_string(), Value::Number(played.id().into()));
            let taken_ids: Vec<u8> = taken.iter().map(|c| c.id()).collect();
            ev.insert("taken".to_string(), serde_json::to_value(taken_ids).unwrap());
            self.push_event(Value::Object(ev));
        }

        debug_assert_eq!(self.card_census(), DECK_SIZE);
    }

    /// Re-run the detector on the actor's pile; returns true when the round
    /// is now waiting on a risk decision or has ended.
    fn after_capture(&mut self, resume: Resume) -> bool {
        let pid = self.current_player as usize;
        let combos = self.detector.detect(&self.players[pid].capture_pile);
        let increased = combos.len() > self.players[pid].active_combinations.len();
        self.players[pid].active_combinations = combos;
        if !increased {
            return false;
        }

        if self.players[pid].hand.is_empty() {
            // With no cards left to play there is no second combination to
            // chase: lock-in is forced on the spot.
            self.emit_lock_event(true);
            self.lock_in_internal();
            return true;
        }

        self.resume_after_decision = resume;
        self.phase = Phase::RiskDecision;
        true
    }

    fn draw_step(&mut self) {
        let pid = self.current_player as usize;
        let Some(card) = self.deck.draw() else {
            self.end_turn();
            return;
        };
        self.emit_card_event("draw", pid, card);

        let matches = self.month_matches(card.month());
        match matches.len() {
            0 => {
                self.field.push(card);
                self.emit_card_event("place", pid, card);
                self.end_turn();
            }
            2 => {
                self.pending_drawn_card = Some(card);
                self.phase = Phase::SelectDrawnMatch;
            }
            _ => {
                self.capture(pid, card, &matches);
                if !self.after_capture(Resume::EndTurn) {
                    self.end_turn();
                }
            }
        }
    }

    fn end_turn(&mut self) {
        let pid = self.current_player as usize;
        if self.players[pid].hand.is_empty() && self.deck.remaining() == 0 {
            self.finish(TerminationReason::Exhausted, None);
            return;
        }
        if self.players.iter().all(|p| p.hand.is_empty()) {
            self.finish(TerminationReason::Exhausted, None);
            return;
        }
        self.turn_count += 1;
        self.current_player = (self.current_player + 1) % NP as u8;
        self.begin_turn();
    }

    fn begin_turn(&mut self) {
        let pid = self.current_player as usize;
        if self.players[pid].has_declared_risk {
            self.phase = Phase::RiskReview;
            return;
        }
        self.begin_action();
    }

    /// Enter the acting part of the turn: hand selection, or an eager
    /// draw-only turn for an empty hand.
    fn begin_action(&mut self) {
        let pid = self.current_player as usize;
        if self.players[pid].hand.is_empty() {
            if self.deck.remaining() == 0 {
                self.finish(TerminationReason::Exhausted, None);
            } else {
                self.draw_step();
            }
            return;
        }
        self.phase = Phase::SelectHand;
    }

    fn lock_in_internal(&mut self) {
        let pid = self.current_player;
        // Every seat is frozen the instant anyone banks; captures made after
        // this point must not move settlement.
        for p in &mut self.players {
            p.locked_combinations = Some(p.active_combinations.clone());
        }
        self.finish(TerminationReason::LockedIn, Some(pid));
    }

    fn finish(&mut self, reason: TerminationReason, terminating: Option<u8>) {
        self.termination = Some(reason);
        self.terminating_player = terminating;
        self.phase = Phase::RoundEnd;

        self.undealt = self.deck.draw_multiple(self.deck.remaining());
        let leftover = card_points(&self.field) + card_points(&self.undealt);

        let report = settlement::settle(
            &self.players,
            &self.teyaku_flows,
            self.multiplier,
            reason,
            terminating,
            self.last_capturer,
            leftover,
        );

        for (i, p) in self.players.iter_mut().enumerate() {
            if report.forfeited[i] {
                p.active_combinations.clear();
                p.locked_combinations = None;
            }
            p.round_score = report.per_player[i].round_total;
            p.cumulative_score += p.round_score;
        }

        if !self.skip_event_log {
            let mut ev = serde_json::Map::new();
            ev.insert("type".to_string(), Value::String("round_end".to_string()));
            ev.insert(
                "reason".to_string(),
                serde_json::to_value(reason).unwrap(),
            );
            let totals: Vec<i32> = report.per_player.iter().map(|p| p.round_total).collect();
            ev.insert("totals".to_string(), serde_json::to_value(totals).unwrap());
            ev.insert("winner".to_string(), Value::Number(report.winner_index.into()));
            self.push_event(Value::Object(ev));
        }

        self.settlement = Some(report);
    }

    fn expect_phase(&self, want: Phase, op: &str) -> EngineResult<()> {
        if self.phase == want {
            Ok(())
        } else {
            Err(EngineError::illegal(format!(
                "{} is not valid in phase {:?}",
                op, self.phase
            )))
        }
    }

    fn emit_card_event(&mut self, kind: &str, pid: usize, card: Card) {
        if self.skip_event_log {
            return;
        }
        let mut ev = serde_json::Map::new();
        ev.insert("type".to_string(), Value::String(kind.to_string()));
        ev.insert("actor".to_string(), Value::Number((pid as u64).into()));
        ev.insert("card".to_string(), Value::Number(card.id().into()));
        self.push_event(Value::Object(ev));
    }

    fn emit_lock_event(&mut self, forced: bool) {
        if self.skip_event_log {
            return;
        }
        let mut ev = serde_json::Map::new();
        ev.insert("type".to_string(), Value::String("lock_in".to_string()));
        ev.insert(
            "actor".to_string(),
            Value::Number(u64::from(self.current_player).into()),
        );
        ev.insert("forced".to_string(), Value::Bool(forced));
        self.push_event(Value::Object(ev));
    }

    fn push_event(&mut self, event: Value) {
        if self.skip_event_log {
            return;
        }
        self.event_log.push(event.to_string());
    }
}
