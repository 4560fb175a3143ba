use crate::types::{Card, Combination};

/// External combination detector.
///
/// A pure function of its input: given a set of cards it names every scoring
/// combination present and its kan value. The engine calls it once per hand at
/// round start (hand combinations) and after every capture (pile
/// combinations); a growing *count* of detected combinations is what arms the
/// risk-decision engine, and the summed *value* is what settlement pays out.
pub trait CombinationDetector {
    fn detect(&self, cards: &[Card]) -> Vec<Combination>;
}

impl<T: CombinationDetector + ?Sized> CombinationDetector for Box<T> {
    fn detect(&self, cards: &[Card]) -> Vec<Combination> {
        (**self).detect(cards)
    }
}

/// Detector that never finds anything. Rounds using it can only end by
/// exhaustion and settle on card points alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDetector;

impl CombinationDetector for NullDetector {
    fn detect(&self, _cards: &[Card]) -> Vec<Combination> {
        Vec::new()
    }
}
