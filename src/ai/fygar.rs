//! Fygar: a ranged attacker. Arms a fire attack whenever the player is in a
//! straight, unobstructed line within range, chases when nearby, and
//! otherwise patrols.

use crate::ai::{AiState, BehaviorPolicy, Enemy, flee_when_pumped, patrol_fallback};
use crate::behavior::{BehaviorTree, guarded, selector};
use crate::components::{Direction, GridPosition};
use crate::config::AiTuning;
use crate::grid::Grid;

pub struct Fygar;

impl BehaviorPolicy for Fygar {
    fn build_tree() -> BehaviorTree<Enemy, Grid> {
        selector(vec![
            flee_when_pumped(),
            guarded(
                |e: &Enemy, g: &Grid| is_player_in_line(e, g),
                |e: &mut Enemy, _: &mut Grid| prepare_fire(e),
            ),
            guarded(
                |e: &Enemy, _: &Grid| e.is_player_nearby(),
                |e: &mut Enemy, g: &mut Grid| e.chase_player(g),
            ),
            patrol_fallback(),
        ])
    }

    fn move_delay_ms(tuning: &AiTuning) -> u64 {
        tuning.fygar_move_delay_ms
    }
}

/// Direction from `from` to `to` if they share a row or column within
/// `range` cells and no rock lies between them. A shared cell counts as in
/// line and faces up.
pub fn line_of_fire(grid: &Grid, from: GridPosition, to: GridPosition, range: u32) -> Option<Direction> {
    let dir = match (to.x - from.x, to.y - from.y) {
        (0, 0) => return Some(Direction::Up),
        (0, dy) if dy < 0 => Direction::Up,
        (0, _) => Direction::Down,
        (dx, 0) if dx > 0 => Direction::Right,
        (_, 0) => Direction::Left,
        _ => return None,
    };

    let dist = from.manhattan(to);
    if dist > range {
        return None;
    }

    let mut cell = from;
    for _ in 0..dist {
        cell = cell.step(dir);
        if grid.is_rock(cell.x, cell.y) {
            return None;
        }
    }
    Some(dir)
}

/// Attack is off cooldown and the player is in the line of fire.
pub fn is_player_in_line(enemy: &Enemy, grid: &Grid) -> bool {
    enemy.fire.is_some_and(|f| f.ready)
        && line_of_fire(grid, enemy.position, enemy.target, enemy.tuning.fire_range).is_some()
}

/// Arm the attack toward the player and start the cooldown.
pub fn prepare_fire(enemy: &mut Enemy) -> bool {
    let Some(fire) = enemy.fire.as_mut() else {
        return false;
    };
    // Line already checked; rocks don't matter for the facing.
    let dir = match (enemy.target.x - enemy.position.x, enemy.target.y - enemy.position.y) {
        (dx, _) if dx > 0 => Direction::Right,
        (dx, _) if dx < 0 => Direction::Left,
        (_, dy) if dy > 0 => Direction::Down,
        _ => Direction::Up,
    };

    enemy.state = AiState::Fire;
    fire.ready = false;
    fire.cooldown_until_ms = enemy.now_ms + enemy.tuning.fire_cooldown_ms;
    fire.direction = Some(dir);
    fire.just_armed = true;
    tracing::debug!(
        x = enemy.position.x,
        y = enemy.position.y,
        direction = ?dir,
        "fygar armed fire"
    );
    true
}
