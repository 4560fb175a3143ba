//! Standard hachi-hachi combination tables.
//!
//! One pure function serves both call sites: applied to a dealt hand it finds
//! the month-set combinations (teyaku), applied to a capture pile it finds
//! the bright and ribbon sets that accumulate during play. Values are kan.

use hachienv_engine::types::{
    Card, Combination, BLUE_RIBBONS, CRANE, CURTAIN, MOON, PHOENIX, POETRY_RIBBONS, WILLOW_RIBBON,
};
use hachienv_engine::CombinationDetector;

/// The four brights that score together. The rain man never counts.
const FOUR_BRIGHTS: [u8; 4] = [CRANE, CURTAIN, MOON, PHOENIX];

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDetector;

impl StandardDetector {
    fn id_set(cards: &[Card], wanted: &[u8]) -> Option<Vec<Card>> {
        let mut found = Vec::with_capacity(wanted.len());
        for &id in wanted {
            let card = cards.iter().find(|c| c.id() == id)?;
            found.push(*card);
        }
        Some(found)
    }
}

impl CombinationDetector for StandardDetector {
    fn detect(&self, cards: &[Card]) -> Vec<Combination> {
        let mut out = Vec::new();

        if let Some(set) = Self::id_set(cards, &FOUR_BRIGHTS) {
            out.push(Combination::new("Four Brights", 10, set));
        }
        if let Some(set) = Self::id_set(cards, &POETRY_RIBBONS) {
            out.push(Combination::new("Poetry Ribbons", 7, set));
        }
        if let Some(set) = Self::id_set(cards, &BLUE_RIBBONS) {
            out.push(Combination::new("Blue Ribbons", 7, set));
        }

        let plain_ribbons: Vec<Card> = cards
            .iter()
            .copied()
            .filter(|c| c.is_ribbon() && c.id() != WILLOW_RIBBON)
            .collect();
        if plain_ribbons.len() >= 7 {
            out.push(Combination::new("Seven Ribbons", 10, plain_ribbons));
        }

        let mut triplet_cards: Vec<Card> = Vec::new();
        let mut triplets = 0;
        for month in 1..=12u8 {
            let set: Vec<Card> = cards.iter().copied().filter(|c| c.month() == month).collect();
            match set.len() {
                4 => out.push(Combination::new(format!("Four of Month {month}"), 6, set)),
                3 => {
                    triplets += 1;
                    triplet_cards.extend_from_slice(&set);
                    out.push(Combination::new(format!("Triplet of Month {month}"), 2, set));
                }
                _ => {}
            }
        }
        // Two triplets together earn a bonus on top of the pair.
        if triplets >= 2 {
            out.push(Combination::new("Double Triplet", 4, triplet_cards));
        }

        out
    }
}
