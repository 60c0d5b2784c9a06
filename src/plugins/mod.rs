pub mod enemies;
pub mod player;
pub mod round;
pub mod telemetry;

use bevy::prelude::*;

/// Per-tick ordering. The grid has a single writer at a time: the player
/// digs first, then every enemy in turn.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Player,
    Enemies,
    Contact,
    Spawn,
    Outcome,
}

/// Simulation clock in whole milliseconds.
pub fn now_ms(time: &Time) -> u64 {
    time.elapsed().as_millis() as u64
}
