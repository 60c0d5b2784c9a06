//! Player stepping, digging and pumping, with the score and lives they
//! affect.

use bevy::prelude::*;
use micromegas_tracing::prelude::{span_fn, span_scope};
use tracing::{debug, info, warn};

use crate::ai::Enemy;
use crate::components::{Direction, Player, PlayerIntent};
use crate::config::GameConfig;
use crate::events::PlayerCaught;
use crate::grid::Grid;
use crate::plugins::round::clear_player_start;
use crate::plugins::{SimSet, now_ms};
use crate::resources::{Lives, RoundStats, Score, SessionOutcome};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (player_step, player_pump).chain().in_set(SimSet::Player),
        );
        app.add_observer(on_player_caught);
    }
}

/// Result of a step request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Too soon, or rock or the grid edge in the way.
    Blocked,
    /// Moved along an existing tunnel.
    Walked,
    /// Moved into earth and dug it out.
    Dug,
}

/// Move one cell in `dir` if the move delay has elapsed, digging the cell
/// entered. Rock and the grid edge block the step.
pub fn step_player(player: &mut Player, dir: Direction, now_ms: u64, grid: &mut Grid) -> Step {
    if now_ms.saturating_sub(player.last_move_ms) <= player.move_delay_ms {
        return Step::Blocked;
    }
    let next = player.position.step(dir);
    let fresh = !grid.is_tunnel(next.x, next.y);
    if !grid.dig(next.x, next.y) {
        return Step::Blocked;
    }
    player.position = next;
    player.last_move_ms = now_ms;
    if fresh { Step::Dug } else { Step::Walked }
}

#[span_fn]
fn player_step(
    intent: Res<PlayerIntent>,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut grid: ResMut<Grid>,
    mut score: ResMut<Score>,
    mut players: Query<&mut Player>,
) {
    let Some(dir) = intent.step else {
        return;
    };
    let Ok(mut player) = players.single_mut() else {
        return;
    };
    if step_player(&mut player, dir, now_ms(&time), &mut grid) == Step::Dug {
        score.0 += config.scoring.dig_points;
    }
}

/// One pump per request, applied to the closest enemy within one cell
/// (diagonals included).
fn player_pump(
    mut intent: ResMut<PlayerIntent>,
    config: Res<GameConfig>,
    mut score: ResMut<Score>,
    players: Query<&Player>,
    mut enemies: Query<&mut Enemy>,
) {
    if !std::mem::take(&mut intent.pump) {
        return;
    }
    let Ok(player) = players.single() else {
        return;
    };

    let target = enemies
        .iter_mut()
        .filter(|enemy| enemy.position.touches(player.position))
        .min_by_key(|enemy| enemy.position.manhattan(player.position));
    match target {
        Some(mut enemy) => {
            enemy.get_pumped();
            score.0 += config.scoring.pump_points;
        }
        None => debug!(x = player.position.x, y = player.position.y, "pump found no target"),
    }
}

/// Take a life and send the player back to the start cell. The last life
/// ends the session where the player stands.
fn on_player_caught(
    trigger: On<PlayerCaught>,
    mut grid: ResMut<Grid>,
    mut stats: ResMut<RoundStats>,
    mut lives: ResMut<Lives>,
    mut outcome: ResMut<SessionOutcome>,
    score: Res<Score>,
    mut players: Query<&mut Player>,
) {
    stats.times_caught += 1;
    lives.0 = lives.0.saturating_sub(1);
    if lives.0 == 0 {
        *outcome = SessionOutcome::Lost;
        warn!(score = score.0, times_caught = stats.times_caught, "lives exhausted");
        return;
    }

    let Ok(mut player) = players.single_mut() else {
        return;
    };
    player.position = clear_player_start(&mut grid);
    info!(
        enemy = ?trigger.event().enemy,
        lives = lives.0,
        times_caught = stats.times_caught,
        "player caught"
    );
}
