#[cfg(test)]
mod unit_tests {
    use crate::deck::{Deck, FixedDeck};
    use crate::detector::{CombinationDetector, NullDetector};
    use crate::errors::EngineError;
    use crate::round::player::PlayerState;
    use crate::round::{DecisionKind, GameRound, Phase};
    use crate::rule::GameRule;
    use crate::settlement::{self, Flow};
    use crate::types::{Card, Combination, TerminationReason, DECK_SIZE, NP};

    fn card(id: u8) -> Card {
        Card::new(id).unwrap()
    }

    fn cards(ids: &[u8]) -> Vec<Card> {
        ids.iter().map(|&i| card(i)).collect()
    }

    /// Detector that names one 20-kan combination per captured bright.
    struct BrightDetector;

    impl CombinationDetector for BrightDetector {
        fn detect(&self, pile: &[Card]) -> Vec<Combination> {
            pile.iter()
                .filter(|c| c.is_bright())
                .map(|&c| Combination::new(c.name(), 20, vec![c]))
                .collect()
        }
    }

    /// Build a fixed deck that deals exactly the given hands and field.
    /// Undealt ids follow in ascending order.
    fn scripted(p0: &[u8; 8], p1: &[u8; 8], p2: &[u8; 8], field: &[u8; 8]) -> FixedDeck {
        let mut order: Vec<u8> = Vec::with_capacity(DECK_SIZE);
        for half in 0..2 {
            let range = half * 4..half * 4 + 4;
            order.extend_from_slice(&p0[range.clone()]);
            order.extend_from_slice(&p1[range.clone()]);
            order.extend_from_slice(&p2[range.clone()]);
            order.extend_from_slice(&field[range]);
        }
        let mut seen = [false; DECK_SIZE];
        for &id in &order {
            assert!(!seen[id as usize], "duplicate id {id} in script");
            seen[id as usize] = true;
        }
        for id in 0..DECK_SIZE as u8 {
            if !seen[id as usize] {
                order.push(id);
            }
        }
        FixedDeck::new(cards(&order))
    }

    const P0_SPECIALS: [u8; 8] = [0, 4, 12, 16, 20, 24, 32, 36];
    const P1_SECONDS: [u8; 8] = [1, 5, 9, 13, 17, 21, 25, 29];
    const P2_CHAFF: [u8; 8] = [3, 7, 10, 11, 15, 19, 23, 27];
    const FIELD_CHAFF: [u8; 8] = [2, 6, 14, 18, 22, 26, 34, 38];

    fn base_round(detector: Box<dyn CombinationDetector>, rule: GameRule) -> GameRound {
        let deck = scripted(&P0_SPECIALS, &P1_SECONDS, &P2_CHAFF, &FIELD_CHAFF);
        GameRound::new(Box::new(deck), detector, rule, false).unwrap()
    }

    /// Apply legal decisions (preferring continue over locking) until the
    /// round ends or `stop` holds, asserting conservation at every step.
    fn drive_until(round: &mut GameRound, stop: impl Fn(&GameRound) -> bool) {
        for _ in 0..10_000 {
            if round.is_done() || stop(round) {
                return;
            }
            let legal = round.legal_decisions();
            assert!(!legal.is_empty(), "no legal decisions in a live round");
            let pick = legal
                .iter()
                .copied()
                .find(|d| matches!(d, DecisionKind::Continue))
                .unwrap_or(legal[0]);
            round.apply_decision(pick).unwrap();
            assert_eq!(round.card_census(), DECK_SIZE);
        }
        panic!("round did not settle within the step limit");
    }

    fn drive_to_end(round: &mut GameRound) {
        drive_until(round, |_| false);
    }

    // ------------------------------------------------------------------
    // Deal & validation
    // ------------------------------------------------------------------

    #[test]
    fn scripted_deal_lands_where_expected() {
        let round = base_round(Box::new(NullDetector), GameRule::default());
        assert_eq!(round.players[0].hand, cards(&P0_SPECIALS));
        assert_eq!(round.players[1].hand, cards(&P1_SECONDS));
        assert_eq!(round.players[2].hand, cards(&P2_CHAFF));
        assert_eq!(round.field, cards(&FIELD_CHAFF));
        assert_eq!(round.deck_remaining(), 16);
        assert_eq!(round.card_census(), DECK_SIZE);
        assert_eq!(round.phase, Phase::SelectHand);
        assert_eq!(round.current_player, 0);
    }

    #[test]
    fn four_of_a_month_on_field_aborts_after_bounded_redeals() {
        // Month 1 complete on the field; a fixed deck re-deals identically.
        let deck = scripted(
            &[4, 5, 12, 16, 20, 24, 32, 36],
            &[13, 17, 21, 25, 29, 33, 37, 41],
            &[6, 7, 10, 11, 15, 19, 23, 27],
            &[0, 1, 2, 3, 14, 18, 22, 26],
        );
        let rule = GameRule {
            max_deal_retries: 3,
            ..GameRule::default()
        };
        match GameRound::new(Box::new(deck), Box::new(NullDetector), rule, true) {
            Err(EngineError::InvalidDeal { attempts }) => assert_eq!(attempts, 3),
            Err(other) => panic!("expected InvalidDeal, got {other}"),
            Ok(_) => panic!("a four-of-a-month field must not deal"),
        }
    }

    /// Deck that yields a different preset order on each shuffle.
    struct RedealDeck {
        orders: Vec<Vec<Card>>,
        shuffles: usize,
        cards: Vec<Card>,
    }

    impl Deck for RedealDeck {
        fn shuffle(&mut self) {
            let idx = self.shuffles.min(self.orders.len() - 1);
            self.shuffles += 1;
            self.cards = self.orders[idx].clone();
            self.cards.reverse();
        }
        fn draw(&mut self) -> Option<Card> {
            self.cards.pop()
        }
        fn draw_multiple(&mut self, n: usize) -> Vec<Card> {
            let take = n.min(self.cards.len());
            let at = self.cards.len() - take;
            let mut out = self.cards.split_off(at);
            out.reverse();
            out
        }
        fn remaining(&self) -> usize {
            self.cards.len()
        }
    }

    #[test]
    fn invalid_field_gets_a_fresh_redeal() {
        let mut bad = scripted(
            &[4, 5, 12, 16, 20, 24, 32, 36],
            &[13, 17, 21, 25, 29, 33, 37, 41],
            &[6, 7, 10, 11, 15, 19, 23, 27],
            &[0, 1, 2, 3, 14, 18, 22, 26],
        );
        let mut good = scripted(&P0_SPECIALS, &P1_SECONDS, &P2_CHAFF, &FIELD_CHAFF);
        bad.shuffle();
        good.shuffle();
        let deck = RedealDeck {
            orders: vec![
                bad.draw_multiple(DECK_SIZE),
                good.draw_multiple(DECK_SIZE),
            ],
            shuffles: 0,
            cards: Vec::new(),
        };
        let round =
            GameRound::new(Box::new(deck), Box::new(NullDetector), GameRule::default(), false)
                .unwrap();
        assert_eq!(round.field, cards(&FIELD_CHAFF));
        assert!(round.events()[0].contains("\"attempts\":2"));
    }

    #[test]
    fn multiplier_follows_exact_field_brights() {
        // Rain Man on the field: grand, 4x.
        let deck = scripted(
            &[0, 4, 12, 16, 20, 24, 32, 36],
            &[1, 5, 9, 13, 17, 21, 25, 29],
            &[3, 7, 10, 11, 15, 19, 23, 27],
            &[40, 6, 14, 18, 22, 26, 34, 38],
        );
        let round =
            GameRound::new(Box::new(deck), Box::new(NullDetector), GameRule::default(), true)
                .unwrap();
        assert_eq!(round.multiplier, 4);

        // Curtain but no grand bright: large, 2x.
        let deck = scripted(
            &[0, 4, 12, 16, 20, 24, 32, 36],
            &[1, 5, 9, 13, 17, 21, 25, 29],
            &[3, 7, 10, 11, 15, 19, 23, 27],
            &[8, 6, 14, 18, 22, 26, 34, 38],
        );
        let round =
            GameRound::new(Box::new(deck), Box::new(NullDetector), GameRule::default(), true)
                .unwrap();
        assert_eq!(round.multiplier, 2);

        // Geese is an animal; a bright-free field stays small even with it.
        let deck = scripted(
            &[0, 4, 12, 16, 20, 24, 32, 36],
            &[1, 5, 9, 13, 17, 21, 25, 34],
            &[3, 7, 10, 11, 15, 19, 23, 27],
            &[29, 6, 14, 18, 22, 26, 2, 38],
        );
        let round =
            GameRound::new(Box::new(deck), Box::new(NullDetector), GameRule::default(), true)
                .unwrap();
        assert_eq!(round.multiplier, 1);
    }

    // ------------------------------------------------------------------
    // Matching
    // ------------------------------------------------------------------

    #[test]
    fn zero_matches_places_the_card() {
        let mut round = base_round(Box::new(NullDetector), GameRule::default());
        drive_until(&mut round, |r| r.current_player == 1);
        // The lone month-1 field card is gone by now: the pine ribbon places.
        round.select_hand_card(card(1)).unwrap();
        assert!(round.players[1].capture_pile.is_empty());
        assert!(round.field.contains(&card(1)));
        assert_eq!(round.card_census(), DECK_SIZE);
    }

    #[test]
    fn single_match_captures_the_pair() {
        let mut round = base_round(Box::new(NullDetector), GameRule::default());
        // Crane (month 1) against the lone pine chaff on the field.
        round.select_hand_card(card(0)).unwrap();
        let pile = &round.players[0].capture_pile;
        assert!(pile.contains(&card(0)) && pile.contains(&card(2)));
        assert!(!round.field.contains(&card(2)));
        assert_eq!(round.card_census(), DECK_SIZE);
    }

    #[test]
    fn two_matches_require_an_explicit_choice() {
        // Field holds two month-1 cards; playing the Crane must suspend.
        let deck = scripted(
            &[0, 4, 12, 16, 20, 24, 32, 36],
            &[5, 9, 13, 17, 21, 25, 29, 31],
            &[3, 7, 10, 11, 15, 19, 23, 27],
            &[1, 2, 6, 14, 18, 22, 26, 34],
        );
        let mut round =
            GameRound::new(Box::new(deck), Box::new(NullDetector), GameRule::default(), true)
                .unwrap();
        round.select_hand_card(card(0)).unwrap();
        assert_eq!(round.phase, Phase::SelectField);
        assert_eq!(round.match_options(), cards(&[1, 2]));

        // Wrong month is rejected without effect.
        let err = round.select_field_card(card(6)).unwrap_err();
        assert!(matches!(err, EngineError::IllegalAction { .. }));
        assert_eq!(round.phase, Phase::SelectField);
        assert_eq!(round.card_census(), DECK_SIZE);

        round.select_field_card(card(2)).unwrap();
        let pile = &round.players[0].capture_pile;
        assert!(pile.contains(&card(0)) && pile.contains(&card(2)));
        assert!(round.field.contains(&card(1)));
    }

    #[test]
    fn three_on_field_sweeps_all_four_without_a_prompt() {
        let deck = scripted(
            &[0, 4, 12, 16, 20, 24, 32, 36],
            &[5, 9, 13, 17, 21, 25, 29, 33],
            &[7, 10, 11, 15, 19, 23, 27, 31],
            &[1, 2, 3, 6, 14, 18, 22, 34],
        );
        let mut round =
            GameRound::new(Box::new(deck), Box::new(NullDetector), GameRule::default(), true)
                .unwrap();
        round.select_hand_card(card(0)).unwrap();
        let pile = &round.players[0].capture_pile;
        for id in [0, 1, 2, 3] {
            assert!(pile.contains(&card(id)), "sweep must take id {id}");
        }
        assert!(round.field.iter().all(|c| c.month() != 1));
        // No selection phase happened: the turn ran through to the next seat.
        assert_ne!(round.phase, Phase::SelectField);
        assert_eq!(round.card_census(), DECK_SIZE);
    }

    #[test]
    fn illegal_selections_leave_state_untouched() {
        let mut round = base_round(Box::new(NullDetector), GameRule::default());
        let before = round.snapshot();

        // Not this player's card.
        let err = round.select_hand_card(card(1)).unwrap_err();
        assert!(matches!(err, EngineError::IllegalAction { .. }));
        // Wrong phase for every declaration.
        assert!(round.declare_lock_in().is_err());
        assert!(round.declare_continue().is_err());
        assert!(round.declare_retreat().is_err());
        assert!(round.select_field_card(card(2)).is_err());

        let after = round.snapshot();
        assert_eq!(before.hands, after.hands);
        assert_eq!(before.field, after.field);
        assert_eq!(before.phase, after.phase);
        assert_eq!(round.card_census(), DECK_SIZE);
    }

    // ------------------------------------------------------------------
    // Risk decisions
    // ------------------------------------------------------------------

    #[test]
    fn fresh_combination_opens_the_decision() {
        let mut round =
            base_round(Box::new(BrightDetector), GameRule::default_dekiyaku_only());
        round.select_hand_card(card(0)).unwrap();
        assert_eq!(round.phase, Phase::RiskDecision);
        let legal = round.legal_decisions();
        assert!(legal.contains(&DecisionKind::LockIn));
        assert!(legal.contains(&DecisionKind::Continue));
        // First trigger: no standing risk, so no retreat.
        assert!(!legal.contains(&DecisionKind::Retreat));
        assert!(round.declare_retreat().is_err());
    }

    #[test]
    fn lock_in_freezes_every_seat_and_pays_double_collect() {
        let mut round =
            base_round(Box::new(BrightDetector), GameRule::default_dekiyaku_only());
        round.select_hand_card(card(0)).unwrap();
        round.declare_lock_in().unwrap();

        assert_eq!(round.termination, Some(TerminationReason::LockedIn));
        assert_eq!(round.terminating_player, Some(0));
        for p in &round.players {
            assert!(p.locked_combinations.is_some());
        }

        let report = round.settlement().unwrap();
        assert_eq!(report.per_player[0].round_total, 40);
        assert_eq!(report.per_player[1].round_total, -20);
        assert_eq!(report.per_player[2].round_total, -20);
        assert_eq!(report.winner_index, 0);
        assert_eq!(
            report.per_player.iter().map(|p| p.round_total).sum::<i32>(),
            0
        );
    }

    #[test]
    fn empty_hand_forces_the_lock() {
        let mut round =
            base_round(Box::new(BrightDetector), GameRule::default_dekiyaku_only());
        // Play out the hand bookkeeping: everything but the Crane is already
        // in the pile, so the capture below is this seat's last possible play.
        let rest = round.players[0].hand.split_off(1);
        round.players[0].capture_pile.extend(rest);
        assert_eq!(round.card_census(), DECK_SIZE);

        round.select_hand_card(card(0)).unwrap();
        assert_eq!(round.termination, Some(TerminationReason::LockedIn));
        assert_eq!(round.terminating_player, Some(0));
        let report = round.settlement().unwrap();
        assert_eq!(report.per_player[0].round_total, 40);
        assert!(round.events().iter().any(|e| e.contains("\"forced\":true")));
    }

    #[test]
    fn continue_records_the_baseline_and_resumes() {
        let mut round =
            base_round(Box::new(BrightDetector), GameRule::default_dekiyaku_only());
        round.select_hand_card(card(0)).unwrap();
        round.declare_continue().unwrap();

        let p0 = &round.players[0];
        assert!(p0.has_declared_risk);
        assert_eq!(p0.risk_baseline_value, 20);
        assert!(p0.locked_combinations.is_none());
        // The suspended draw ran and the turn moved on.
        assert_eq!(round.current_player, 1);
        assert_eq!(round.card_census(), DECK_SIZE);
    }

    #[test]
    fn standing_risk_faces_review_and_may_retreat() {
        let mut round =
            base_round(Box::new(BrightDetector), GameRule::default_dekiyaku_only());
        round.select_hand_card(card(0)).unwrap();
        round.declare_continue().unwrap();

        drive_until(&mut round, |r| r.current_player == 0);
        assert_eq!(round.phase, Phase::RiskReview);
        assert!(round.can_retreat(0));

        round.declare_retreat().unwrap();
        assert_eq!(round.termination, Some(TerminationReason::Retreated));
        let report = round.settlement().unwrap();
        // Half of 20 from seat 1; seat 2 declared risk at 20, never improved,
        // and forfeits instead of paying.
        assert!(report.forfeited[2]);
        assert_eq!(report.per_player[0].round_total, 10);
        assert_eq!(report.per_player[1].round_total, -10);
        assert_eq!(report.per_player[2].round_total, 0);
        assert_eq!(
            report.per_player.iter().map(|p| p.round_total).sum::<i32>(),
            0
        );
    }

    #[test]
    fn review_continue_keeps_the_baseline() {
        let mut round =
            base_round(Box::new(BrightDetector), GameRule::default_dekiyaku_only());
        round.select_hand_card(card(0)).unwrap();
        round.declare_continue().unwrap();

        drive_until(&mut round, |r| r.current_player == 0);
        assert_eq!(round.phase, Phase::RiskReview);
        round.declare_continue().unwrap();
        assert_eq!(round.players[0].risk_baseline_value, 20);
        assert_eq!(round.phase, Phase::SelectHand);
    }

    // ------------------------------------------------------------------
    // Whole rounds
    // ------------------------------------------------------------------

    #[test]
    fn passive_round_exhausts_and_cancels() {
        let mut round = base_round(Box::new(NullDetector), GameRule::default());
        drive_to_end(&mut round);
        assert_eq!(round.termination, Some(TerminationReason::Exhausted));
        let report = round.settlement().unwrap();
        assert_eq!(
            report.per_player.iter().map(|p| p.round_total).sum::<i32>(),
            0
        );
        assert_eq!(round.card_census(), DECK_SIZE);
        for (p, line) in round.players.iter().zip(report.per_player.iter()) {
            assert_eq!(p.round_score, line.round_total);
            assert_eq!(p.cumulative_score, line.round_total);
        }
    }

    #[test]
    fn eventful_round_still_cancels() {
        let mut round = base_round(Box::new(BrightDetector), GameRule::default());
        drive_to_end(&mut round);
        let report = round.settlement().unwrap();
        assert_eq!(
            report.per_player.iter().map(|p| p.round_total).sum::<i32>(),
            0
        );
        let teyaku: i32 = report.per_player.iter().map(|p| p.teyaku_share).sum();
        assert_eq!(teyaku, 0);
        assert_eq!(round.card_census(), DECK_SIZE);
    }

    #[test]
    fn draw_only_turn_runs_eagerly() {
        let mut round = base_round(Box::new(NullDetector), GameRule::default());
        // Empty the next seat's hand; its turn must resolve as a bare draw.
        let moved = std::mem::take(&mut round.players[1].hand);
        round.players[1].capture_pile.extend(moved);
        let deck_before = round.deck_remaining();

        drive_until(&mut round, |r| r.current_player == 2);
        assert!(!round.is_done());
        // Seat 1 acted without any selection: two draws happened in total
        // (seat 0's turn and seat 1's bare draw).
        assert_eq!(round.deck_remaining(), deck_before - 2);
        assert_eq!(round.card_census(), DECK_SIZE);
    }

    // ------------------------------------------------------------------
    // Settlement arithmetic
    // ------------------------------------------------------------------

    fn plain_players() -> [PlayerState; NP] {
        std::array::from_fn(|_| PlayerState::new())
    }

    fn combo(value: i32) -> Combination {
        Combination::new("test", value, Vec::new())
    }

    #[test]
    fn teyaku_vector_cancels() {
        let mut players = plain_players();
        players[0].teyaku = vec![combo(8)];
        players[2].teyaku = vec![combo(3)];
        let flows = settlement::teyaku_flows(&players, 1);
        let mut shares = [0i32; NP];
        for f in &flows {
            shares[f.to as usize] += f.amount;
            shares[f.from as usize] -= f.amount;
        }
        assert_eq!(shares, [13, -11, -2]);
        assert_eq!(shares.iter().sum::<i32>(), 0);
    }

    #[test]
    fn locked_in_charges_unconverted_risk_double() {
        let mut players = plain_players();
        players[0].locked_combinations = Some(vec![combo(10)]);
        players[1].locked_combinations = Some(Vec::new());
        players[1].has_declared_risk = true;
        players[1].risk_baseline_value = 5;
        players[2].locked_combinations = Some(Vec::new());

        let report = settlement::settle(
            &players,
            &[],
            1,
            TerminationReason::LockedIn,
            Some(0),
            Some(0),
            0,
        );
        assert_eq!(report.per_player[0].round_total, 30);
        assert_eq!(report.per_player[1].round_total, -20);
        assert_eq!(report.per_player[2].round_total, -10);
        assert!(report.forfeited[1]);
    }

    #[test]
    fn retreat_pays_half_from_each() {
        let mut players = plain_players();
        players[1].locked_combinations = Some(vec![combo(7)]);
        let report = settlement::settle(
            &players,
            &[],
            1,
            TerminationReason::Retreated,
            Some(1),
            Some(1),
            0,
        );
        assert_eq!(report.per_player[0].round_total, -3);
        assert_eq!(report.per_player[1].round_total, 6);
        assert_eq!(report.per_player[2].round_total, -3);
    }

    #[test]
    fn retreat_does_not_charge_a_forfeited_declarer() {
        // Seat 0 retreats its own risk; seat 1 declared later and never
        // improved. Seat 1 forfeits to exactly zero rather than paying.
        let mut players = plain_players();
        players[0].has_declared_risk = true;
        players[0].risk_baseline_value = 8;
        players[0].locked_combinations = Some(vec![combo(8)]);
        players[1].has_declared_risk = true;
        players[1].risk_baseline_value = 5;
        players[1].active_combinations = vec![combo(5)];

        let report = settlement::settle(
            &players,
            &[],
            1,
            TerminationReason::Retreated,
            Some(0),
            Some(0),
            0,
        );
        assert!(report.forfeited[1]);
        assert_eq!(report.per_player[0].round_total, 4);
        assert_eq!(report.per_player[1].round_total, 0);
        assert_eq!(report.per_player[2].round_total, -4);
    }

    #[test]
    fn exhaustion_scores_points_against_par() {
        let mut players = plain_players();
        // Five brights, nine animals, all ribbons plus ten chaff.
        players[0].capture_pile = cards(&[0, 8, 28, 40, 44]);
        players[1].capture_pile = cards(&[4, 12, 16, 20, 24, 29, 32, 36, 41]);
        players[2].capture_pile =
            cards(&[1, 5, 9, 13, 17, 21, 25, 33, 37, 42, 2, 3, 6, 7, 10, 11, 14, 15, 18, 19]);

        let report = settlement::settle(
            &players,
            &[],
            2,
            TerminationReason::Exhausted,
            None,
            Some(2),
            14,
        );
        assert_eq!(report.per_player[0].base_points, 24);
        assert_eq!(report.per_player[1].base_points, 4);
        assert_eq!(report.per_player[2].base_points, -28);
        assert_eq!(
            report.per_player.iter().map(|p| p.round_total).sum::<i32>(),
            0
        );
        assert_eq!(report.winner_index, 0);
    }

    #[test]
    fn exhaustion_with_risk_pays_survivors_half() {
        let mut players = plain_players();
        players[1].has_declared_risk = true;
        players[1].risk_baseline_value = 4;
        players[1].active_combinations = vec![combo(10)];
        players[2].has_declared_risk = true;
        players[2].risk_baseline_value = 6;
        players[2].active_combinations = vec![combo(6)];

        let report = settlement::settle(
            &players,
            &[],
            1,
            TerminationReason::Exhausted,
            None,
            Some(1),
            0,
        );
        // Seat 2 failed to improve: fully out of the graph.
        assert!(report.forfeited[2]);
        assert_eq!(report.per_player[0].round_total, -5);
        assert_eq!(report.per_player[1].round_total, 5);
        assert_eq!(report.per_player[2].round_total, 0);
    }

    #[test]
    fn forfeit_in_exhaustion_is_exactly_zero_despite_teyaku() {
        let mut players = plain_players();
        players[0].teyaku = vec![combo(3)];
        players[2].has_declared_risk = true;
        players[2].risk_baseline_value = 8;
        players[2].active_combinations = vec![combo(8)];
        let teyaku = settlement::teyaku_flows(&players, 1);

        let report = settlement::settle(
            &players,
            &teyaku,
            1,
            TerminationReason::Exhausted,
            None,
            Some(0),
            0,
        );
        assert_eq!(report.per_player[2].round_total, 0);
        assert_eq!(report.per_player[0].teyaku_share, 3);
        assert_eq!(report.per_player[1].teyaku_share, -3);
        assert_eq!(
            report.per_player.iter().map(|p| p.round_total).sum::<i32>(),
            0
        );
    }

    #[test]
    fn flow_filter_spares_outbound_obligations_under_lock() {
        // The forfeiting seat still pays the winner double under a lock.
        let mut players = plain_players();
        players[0].locked_combinations = Some(vec![combo(10)]);
        players[1].locked_combinations = Some(Vec::new());
        players[1].has_declared_risk = true;
        players[1].risk_baseline_value = 0;
        players[1].teyaku = vec![combo(2)];
        players[2].locked_combinations = Some(Vec::new());
        let teyaku = settlement::teyaku_flows(&players, 1);

        let report = settlement::settle(
            &players,
            &teyaku,
            1,
            TerminationReason::LockedIn,
            Some(0),
            Some(0),
            0,
        );
        // Inbound teyaku to the forfeiter is gone; the double payment stands.
        assert_eq!(report.per_player[1].teyaku_share, 0);
        assert_eq!(report.per_player[1].combination_share, -20);
        assert_eq!(
            report.per_player.iter().map(|p| p.round_total).sum::<i32>(),
            0
        );
    }

    #[test]
    fn flows_are_serializable() {
        let f = Flow {
            from: 1,
            to: 0,
            amount: 12,
        };
        let json = serde_json::to_string(&f).unwrap();
        let back: Flow = serde_json::from_str(&json).unwrap();
        assert_eq!(f, back);
    }
}
