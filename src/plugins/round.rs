//! Round lifecycle: grid reset, player placement, the initial enemies and
//! the win check.

use bevy::prelude::*;
use micromegas_tracing::prelude::{span_fn, span_scope};
use tracing::info;

use crate::ai::Enemy;
use crate::components::{GridPosition, Player};
use crate::config::GameConfig;
use crate::events::StartRound;
use crate::grid::{Grid, Tile};
use crate::plugins::enemies::{pick_kind, spawn_enemy};
use crate::plugins::{SimSet, now_ms};
use crate::resources::{EnemySpawner, Lives, RoundStats, Score, SessionOutcome, SimRng};

pub struct RoundPlugin;

impl Plugin for RoundPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, start_first_round);
        app.add_systems(Update, check_win.in_set(SimSet::Outcome));
        app.add_observer(on_start_round);
    }
}

/// Top-center cell, one row below the surface.
pub fn player_start(grid: &Grid) -> GridPosition {
    GridPosition::new(grid.width() / 2, 1)
}

/// Make sure the start cell is open tunnel and return it. A rock rolled onto
/// the start cell is cleared.
pub fn clear_player_start(grid: &mut Grid) -> GridPosition {
    let start = player_start(grid);
    grid.set(start, Tile::Tunnel);
    start
}

fn start_first_round(mut commands: Commands) {
    commands.trigger(StartRound);
}

#[span_fn]
#[allow(clippy::too_many_arguments)]
fn on_start_round(
    _trigger: On<StartRound>,
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut grid: ResMut<Grid>,
    mut rng: ResMut<SimRng>,
    mut spawner: ResMut<EnemySpawner>,
    mut stats: ResMut<RoundStats>,
    mut score: ResMut<Score>,
    mut lives: ResMut<Lives>,
    mut outcome: ResMut<SessionOutcome>,
    enemies: Query<Entity, With<Enemy>>,
    mut players: Query<&mut Player>,
) {
    let now = now_ms(&time);
    *score = Score(0);
    *lives = Lives(config.player.lives);
    *outcome = SessionOutcome::Playing;

    for entity in &enemies {
        commands.entity(entity).despawn();
    }

    *grid = Grid::new(config.grid.width, config.grid.height);
    grid.reset(config.grid.rock_count, &mut rng.0);
    let start = clear_player_start(&mut grid);

    match players.single_mut() {
        Ok(mut player) => {
            player.position = start;
            player.last_move_ms = now;
        }
        Err(_) => {
            let mut player = Player::new(start, config.player.move_delay_ms);
            player.last_move_ms = now;
            commands.spawn(player);
        }
    }

    let mut spawned = 0;
    for _ in 0..config.spawn.initial_enemies {
        let kind = pick_kind(&mut rng, config.spawn.pooka_share);
        if spawn_enemy(&mut commands, &mut grid, &mut rng, &config, start, kind).is_some() {
            spawned += 1;
        }
    }

    spawner.last_spawn_ms = now;
    stats.rounds_started += 1;
    stats.enemies_spawned += spawned;
    info!(
        round = stats.rounds_started,
        width = grid.width(),
        height = grid.height(),
        rocks = grid.count(Tile::Rock),
        enemies = spawned,
        "round started"
    );
}

/// Reaching the target score wins the round.
fn check_win(config: Res<GameConfig>, score: Res<Score>, mut outcome: ResMut<SessionOutcome>) {
    if *outcome == SessionOutcome::Playing && score.0 >= config.scoring.win_score {
        *outcome = SessionOutcome::Won;
        info!(score = score.0, "round won");
    }
}
