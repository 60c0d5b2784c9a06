//! Pooka: a melee chaser. Charges when the player is very close, follows
//! only short routes when merely nearby, and otherwise patrols.

use crate::ai::{AiState, BehaviorPolicy, Enemy, flee_when_pumped, patrol_fallback};
use crate::behavior::{BehaviorTree, guarded, selector};
use crate::config::AiTuning;
use crate::grid::Grid;

pub struct Pooka;

impl BehaviorPolicy for Pooka {
    fn build_tree() -> BehaviorTree<Enemy, Grid> {
        selector(vec![
            flee_when_pumped(),
            guarded(
                |e: &Enemy, _: &Grid| e.is_player_very_close(),
                |e: &mut Enemy, g: &mut Grid| e.chase_player(g),
            ),
            guarded(
                |e: &Enemy, _: &Grid| e.is_player_nearby(),
                |e: &mut Enemy, g: &mut Grid| cautious_chase(e, g),
            ),
            patrol_fallback(),
        ])
    }

    fn move_delay_ms(tuning: &AiTuning) -> u64 {
        tuning.pooka_move_delay_ms
    }
}

/// Take a route to the player only if it is short; otherwise keep patrolling.
pub fn cautious_chase(enemy: &mut Enemy, grid: &Grid) -> bool {
    let route = enemy
        .pathfinder()
        .find_path(grid, enemy.position, enemy.target)
        .filter(|path| path.len() < enemy.tuning.cautious_path_limit);

    match route {
        Some(path) => {
            enemy.state = AiState::Cautious;
            enemy.path = path;
            true
        }
        None => enemy.patrol(grid),
    }
}
