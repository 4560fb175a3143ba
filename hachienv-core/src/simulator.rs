//! Batch session simulation with rayon parallelism.
//!
//! Rounds are independent, so sessions fan out across a dedicated thread
//! pool; each session stays single-threaded as the engine requires.

use rayon::prelude::*;

use hachienv_engine::types::NP;
use hachienv_engine::GameRule;

use crate::policy::ThresholdPolicy;
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub num_sessions: usize,
    pub rounds_per_session: u32,
    /// Session i is seeded from `base_seed + i`.
    pub base_seed: u64,
    /// None uses the rayon default (one thread per CPU).
    pub num_threads: Option<usize>,
    pub rule: GameRule,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            num_sessions: 100,
            rounds_per_session: 8,
            base_seed: 0,
            num_threads: None,
            rule: GameRule::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionResult {
    pub cumulative_scores: [i32; NP],
    pub rounds_played: u32,
    pub seed: u64,
}

fn simulate_session(config: &BatchConfig, index: usize) -> SessionResult {
    let seed = config.base_seed.wrapping_add(index as u64);
    let mut seed_bytes = [0u8; 32];
    seed_bytes[..8].copy_from_slice(&seed.to_le_bytes());

    let mut session = Session::new(seed_bytes, config.rule);
    let mut policy = ThresholdPolicy::default();
    for _ in 0..config.rounds_per_session {
        // An InvalidDeal only loses this session's tail.
        if session.play_round(&mut policy).is_err() {
            break;
        }
    }

    SessionResult {
        cumulative_scores: session.cumulative_scores(),
        rounds_played: session.rounds_played(),
        seed,
    }
}

pub struct BatchSimulator {
    config: BatchConfig,
}

impl BatchSimulator {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Vec<SessionResult> {
        let simulate = || {
            (0..self.config.num_sessions)
                .into_par_iter()
                .map(|i| simulate_session(&self.config, i))
                .collect()
        };

        match self.config.num_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .expect("failed to build rayon pool");
                pool.install(simulate)
            }
            None => simulate(),
        }
    }
}
