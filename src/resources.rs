use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Session-wide random source. Every enemy draws its own seed from here, so
/// a run is fully determined by the configured seed.
#[derive(Resource, Debug)]
pub struct SimRng(pub StdRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn next_seed(&mut self) -> u64 {
        self.0.next_u64()
    }
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Score(pub u64);

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lives(pub u32);

/// Whether the current round is still being played. The simulation sets only
/// run while this is `Playing`.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    #[default]
    Playing,
    Won,
    Lost,
}

impl SessionOutcome {
    pub fn is_over(&self) -> bool {
        *self != SessionOutcome::Playing
    }
}

// ---------------------------------------------------------------------------
// Round stats
// ---------------------------------------------------------------------------

#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct RoundStats {
    pub rounds_started: u32,
    pub enemies_spawned: u32,
    pub pookas_defeated: u32,
    pub fygars_defeated: u32,
    pub fires_armed: u32,
    pub times_caught: u32,
}

impl RoundStats {
    pub fn enemies_defeated(&self) -> u32 {
        self.pookas_defeated + self.fygars_defeated
    }
}

/// Clock for the periodic spawner.
#[derive(Resource, Debug, Default)]
pub struct EnemySpawner {
    pub last_spawn_ms: u64,
}
