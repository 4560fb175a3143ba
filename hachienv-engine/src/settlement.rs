//! End-of-round settlement.
//!
//! Every component is assembled from directed pairwise payments (`Flow`), so
//! the length-3 payment vector sums to zero by construction under all three
//! termination paths. The exhaustion fallback scores absolute card points
//! against par instead; there the deck arithmetic (264 points, par 88) makes
//! the vector cancel.

use serde::{Deserialize, Serialize};

use crate::round::player::PlayerState;
use crate::types::{TerminationReason, NP, PAR_POINTS};

/// A directed payment between two seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub from: u8,
    pub to: u8,
    pub amount: i32,
}

/// One seat's line in the settlement report. `round_total` is the seat's net
/// payment: positive collects, negative pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerSettlement {
    pub base_points: i32,
    pub teyaku_share: i32,
    pub combination_share: i32,
    pub round_total: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    pub per_player: [PlayerSettlement; NP],
    pub termination: TerminationReason,
    pub terminating_player: Option<u8>,
    pub winner_index: u8,
    pub multiplier: u8,
    /// Seats that declared risk and failed to improve past their baseline.
    pub forfeited: [bool; NP],
}

/// Teyaku payments, fixed at the deal: every seat with hand-combination value
/// collects it (times the multiplier) from each other seat.
pub(crate) fn teyaku_flows(players: &[PlayerState; NP], multiplier: u8) -> Vec<Flow> {
    let mut flows = Vec::new();
    for i in 0..NP {
        let value = players[i].teyaku_value();
        if value <= 0 {
            continue;
        }
        for j in 0..NP {
            if j != i {
                flows.push(Flow {
                    from: j as u8,
                    to: i as u8,
                    amount: value * multiplier as i32,
                });
            }
        }
    }
    flows
}

/// Compute the settlement report for a terminated round.
///
/// `leftover_points` is the point value of cards left on the field and in the
/// deck; under exhaustion fallback scoring they are credited to
/// `last_capturer` (the dealer seat if nobody captured) so the counted total
/// is always the full 264.
pub(crate) fn settle(
    players: &[PlayerState; NP],
    teyaku_flows: &[Flow],
    multiplier: u8,
    reason: TerminationReason,
    terminating_player: Option<u8>,
    last_capturer: Option<u8>,
    leftover_points: i32,
) -> SettlementReport {
    let mult = multiplier as i32;

    // The value each seat's combinations settle at. A lock-in froze every
    // seat; a retreat froze only the retreater.
    let final_value = |i: usize| -> i32 {
        let p = &players[i];
        match reason {
            TerminationReason::LockedIn => p.locked_value(),
            TerminationReason::Retreated if terminating_player == Some(i as u8) => p.locked_value(),
            _ => p.active_value(),
        }
    };

    let mut forfeited = [false; NP];
    for (i, p) in players.iter().enumerate() {
        forfeited[i] = p.has_declared_risk
            && terminating_player != Some(i as u8)
            && final_value(i) <= p.risk_baseline_value;
    }

    let mut base = [0i32; NP];
    let mut flows: Vec<Flow> = Vec::new();

    match reason {
        TerminationReason::LockedIn => {
            let t = terminating_player.expect("locked-in round records its terminator") as usize;
            let win = final_value(t) * mult;
            for (j, p) in players.iter().enumerate() {
                if j == t {
                    continue;
                }
                // Risk that was never converted to a lock pays double.
                let amount = if p.has_declared_risk { 2 * win } else { win };
                flows.push(Flow {
                    from: j as u8,
                    to: t as u8,
                    amount,
                });
            }
        }
        TerminationReason::Retreated => {
            let t = terminating_player.expect("retreated round records its terminator") as usize;
            let win = final_value(t) / 2 * mult;
            for j in 0..NP {
                if j != t {
                    flows.push(Flow {
                        from: j as u8,
                        to: t as u8,
                        amount: win,
                    });
                }
            }
        }
        TerminationReason::Exhausted => {
            if players.iter().any(|p| p.has_declared_risk) {
                for (i, p) in players.iter().enumerate() {
                    if !p.has_declared_risk || forfeited[i] {
                        continue;
                    }
                    let win = final_value(i) / 2 * mult;
                    if win == 0 {
                        continue;
                    }
                    for j in 0..NP {
                        if j != i {
                            flows.push(Flow {
                                from: j as u8,
                                to: i as u8,
                                amount: win,
                            });
                        }
                    }
                }
            } else {
                let credit = last_capturer.unwrap_or(0) as usize;
                for (i, p) in players.iter().enumerate() {
                    let mut points = p.pile_points() + p.hand_points();
                    if i == credit {
                        points += leftover_points;
                    }
                    base[i] = (points - PAR_POINTS) * mult;
                }
            }
        }
    }

    // Forfeiting seats lose every inbound payment, and outside a lock-in
    // they drop out of the flow graph entirely (round total exactly zero).
    // A lock-in keeps their outbound side: the double payment to the winner
    // stands.
    let keep = |f: &Flow| -> bool {
        if forfeited[f.to as usize] {
            return false;
        }
        if forfeited[f.from as usize] && reason != TerminationReason::LockedIn {
            return false;
        }
        true
    };

    let mut per = [PlayerSettlement::default(); NP];
    for (i, b) in base.iter().enumerate() {
        per[i].base_points = *b;
    }
    for f in teyaku_flows.iter().filter(|f| keep(f)) {
        per[f.to as usize].teyaku_share += f.amount;
        per[f.from as usize].teyaku_share -= f.amount;
    }
    for f in flows.iter().filter(|f| keep(f)) {
        per[f.to as usize].combination_share += f.amount;
        per[f.from as usize].combination_share -= f.amount;
    }
    for p in per.iter_mut() {
        p.round_total = p.base_points + p.teyaku_share + p.combination_share;
    }

    debug_assert_eq!(
        per.iter().map(|p| p.round_total).sum::<i32>(),
        0,
        "settlement vector must cancel"
    );

    let winner_index = terminating_player.unwrap_or_else(|| {
        let mut best = 0;
        for i in 1..NP {
            if per[i].round_total > per[best].round_total {
                best = i;
            }
        }
        best as u8
    });

    SettlementReport {
        per_player: per,
        termination: reason,
        terminating_player,
        winner_index,
        multiplier,
        forfeited,
    }
}
