//! Round events triggered by simulation systems and observed for bookkeeping.

use bevy::prelude::*;

use crate::ai::EnemyKind;
use crate::components::{Direction, GridPosition};

/// Reset the grid and repopulate the round.
#[derive(Event, Debug, Default, Clone, Copy)]
pub struct StartRound;

/// An enemy was pumped past its limit and removed.
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyDefeated {
    pub kind: EnemyKind,
    pub position: GridPosition,
}

/// A Fygar armed its fire attack this tick.
#[derive(Event, Debug, Clone, Copy)]
pub struct FireArmed {
    pub enemy: Entity,
    pub direction: Direction,
}

/// An unpumped enemy reached the player's cell.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerCaught {
    pub enemy: Entity,
}
