use crate::deck::Deck;
use crate::errors::{EngineError, EngineResult};
use crate::rule::GameRule;
use crate::types::{field_multiplier, Card, FIELD_SIZE, HAND_SIZE, NP};

pub(crate) struct DealOutcome {
    pub hands: [Vec<Card>; NP],
    pub field: Vec<Card>,
    pub multiplier: u8,
    pub digest: Option<String>,
    pub attempts: u32,
}

/// Deal 8 cards to each seat and 8 to the field in two passes of four,
/// redealing from a fresh shuffle whenever the field comes up with all four
/// cards of one month. Bounded by `rule.max_deal_retries`; exhausting the
/// bound is fatal.
pub(crate) fn deal(deck: &mut dyn Deck, rule: &GameRule) -> EngineResult<DealOutcome> {
    let max_attempts = rule.max_deal_retries.max(1);
    for attempt in 1..=max_attempts {
        deck.shuffle();

        let mut hands: [Vec<Card>; NP] = std::array::from_fn(|_| Vec::with_capacity(HAND_SIZE));
        let mut field: Vec<Card> = Vec::with_capacity(FIELD_SIZE);
        for _ in 0..2 {
            for hand in hands.iter_mut() {
                hand.extend(deck.draw_multiple(HAND_SIZE / 2));
            }
            field.extend(deck.draw_multiple(FIELD_SIZE / 2));
        }

        if !field_is_valid(&field) {
            continue;
        }

        for hand in hands.iter_mut() {
            hand.sort_by_key(|c| c.id());
        }

        return Ok(DealOutcome {
            multiplier: field_multiplier(&field),
            digest: deck.digest(),
            attempts: attempt,
            hands,
            field,
        });
    }

    Err(EngineError::InvalidDeal {
        attempts: max_attempts,
    })
}

/// A field holding all four cards of any month can never be cleared by play
/// and voids the deal.
pub(crate) fn field_is_valid(field: &[Card]) -> bool {
    let mut counts = [0u8; 12];
    for c in field {
        counts[(c.month() - 1) as usize] += 1;
    }
    counts.iter().all(|&n| n < 4)
}
