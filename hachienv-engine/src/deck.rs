use rand::prelude::*;
use rand::rngs::StdRng;
use sha2::{Digest, Sha256};

use crate::types::{full_deck, Card};

/// The physical deck primitive. The engine draws through this trait and never
/// inspects undrawn cards.
pub trait Deck {
    /// Reset to a full 48-card deck in a fresh order. Called once per deal and
    /// again on every redeal.
    fn shuffle(&mut self);
    fn draw(&mut self) -> Option<Card>;
    fn draw_multiple(&mut self, n: usize) -> Vec<Card>;
    fn remaining(&self) -> usize;
    /// Audit digest of the current order, when the implementation keeps one.
    fn digest(&self) -> Option<String> {
        None
    }
}

/// Uniformly shuffled deck backed by `StdRng`.
///
/// With a seed, each shuffle derives a per-deal seed via splitmix64 of
/// `seed + deal_index`, so redeals within one round differ while the whole
/// round stays reproducible. Every shuffle records a salted SHA-256 digest of
/// the card order for post-hoc audit.
#[derive(Debug, Clone)]
pub struct ShuffledDeck {
    cards: Vec<Card>,
    seed: Option<u64>,
    deal_index: u64,
    salt: String,
    order_digest: String,
}

impl ShuffledDeck {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            cards: Vec::new(),
            seed,
            deal_index: 0,
            salt: String::new(),
            order_digest: String::new(),
        }
    }
}

impl Deck for ShuffledDeck {
    fn shuffle(&mut self) {
        let mut deck = full_deck();

        let mut rng = if let Some(seed) = self.seed {
            let deal_seed = splitmix64(seed.wrapping_add(self.deal_index));
            self.deal_index = self.deal_index.wrapping_add(1);
            StdRng::seed_from_u64(deal_seed)
        } else {
            self.deal_index = self.deal_index.wrapping_add(1);
            StdRng::from_os_rng()
        };

        deck.shuffle(&mut rng);
        self.salt = format!("{:016x}", rng.next_u64());

        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        for c in &deck {
            hasher.update([c.id()]);
        }
        self.order_digest = format!("{:x}", hasher.finalize());

        // Draw from the back.
        deck.reverse();
        self.cards = deck;
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

    fn digest(&self) -> Option<String> {
        if self.order_digest.is_empty() {
            None
        } else {
            Some(self.order_digest.clone())
        }
    }
}

/// Deck with a preset order. `shuffle()` restores the preset, so an invalid
/// preset deal stays invalid through every retry. Used for scripted rounds
/// and externally generated orders.
#[derive(Debug, Clone)]
pub struct FixedDeck {
    order: Vec<Card>,
    cards: Vec<Card>,
}

impl FixedDeck {
    /// `order` is the deal order: `order[0]` is drawn first.
    pub fn new(order: Vec<Card>) -> Self {
        Self {
            order,
            cards: Vec::new(),
        }
    }
}

impl Deck for FixedDeck {
    fn shuffle(&mut self) {
        self.cards = self.order.clone();
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

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
