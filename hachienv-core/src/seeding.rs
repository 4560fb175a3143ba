//! Deterministic session seeding.
//!
//! A session seed fans out into per-round seeds through a SHA-256 KDF, and a
//! round seed expands into a full deal order through ChaCha8 plus a vendored
//! Fisher-Yates shuffle. Vendoring the shuffle keeps the order stable across
//! rand versions, so `(session seed, round index) -> deal` holds on any
//! platform. [`KdfDeck`] carries the scheme into the engine's deck seam.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

use hachienv_engine::types::full_deck;
use hachienv_engine::{Card, Deck};

/// Vendored Fisher-Yates shuffle; does not depend on `rand::seq`'s internal
/// algorithm, which may change between releases.
pub fn fisher_yates_shuffle<T>(slice: &mut [T], rng: &mut impl Rng) {
    for i in (1..slice.len()).rev() {
        let j = rng.random_range(0..=i);
        slice.swap(i, j);
    }
}

/// `SHA-256(session_seed || round_index_le)` as a 32-byte round seed.
pub fn derive_round_seed(session_seed: &[u8; 32], round_index: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(session_seed);
    hasher.update(round_index.to_le_bytes());
    hasher.finalize().into()
}

/// Deterministic 48-card deal order for one round.
pub fn generate_deal(round_seed: &[u8; 32]) -> Vec<Card> {
    let mut rng = ChaCha8Rng::from_seed(*round_seed);
    let mut deck = full_deck();
    fisher_yates_shuffle(&mut deck, &mut rng);
    deck
}

/// Produces per-round seeds from one session seed: 2^64 independent rounds.
pub struct SessionRng {
    seed: [u8; 32],
    round_index: u64,
}

impl SessionRng {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            seed,
            round_index: 0,
        }
    }

    /// Number of round seeds handed out so far.
    pub fn round_index(&self) -> u64 {
        self.round_index
    }

    /// The next round's 32-byte seed; advances the counter.
    pub fn next_round_seed(&mut self) -> [u8; 32] {
        let seed = derive_round_seed(&self.seed, self.round_index);
        self.round_index = self.round_index.wrapping_add(1);
        seed
    }
}

/// Engine deck fed by the session KDF. Each `shuffle()` expands
/// `derive_round_seed(round_seed, attempt)` through [`generate_deal`], so a
/// redeal of an invalid field gets a fresh deterministic order and the whole
/// round replays from `(session seed, round index)` alone.
#[derive(Debug, Clone)]
pub struct KdfDeck {
    round_seed: [u8; 32],
    attempt: u64,
    cards: Vec<Card>,
}

impl KdfDeck {
    pub fn new(round_seed: [u8; 32]) -> Self {
        Self {
            round_seed,
            attempt: 0,
            cards: Vec::new(),
        }
    }
}

impl Deck for KdfDeck {
    fn shuffle(&mut self) {
        let order_seed = derive_round_seed(&self.round_seed, self.attempt);
        self.attempt = self.attempt.wrapping_add(1);
        let mut deck = generate_deal(&order_seed);
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
}
