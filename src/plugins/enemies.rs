//! Enemy spawning, per-tick AI dispatch, contact with the player and
//! defeat bookkeeping.

use bevy::prelude::*;
use micromegas_tracing::prelude::{imetric, span_fn, span_scope};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::ai::{Enemy, EnemyKind, spawn_position};
use crate::components::{GridPosition, Player};
use crate::config::GameConfig;
use crate::events::{EnemyDefeated, FireArmed, PlayerCaught};
use crate::grid::Grid;
use crate::plugins::{SimSet, now_ms};
use crate::resources::{EnemySpawner, RoundStats, Score, SimRng};

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                enemy_ai.in_set(SimSet::Enemies),
                enemy_player_contact.in_set(SimSet::Contact),
                spawn_over_time.in_set(SimSet::Spawn),
            ),
        );
        app.add_observer(on_enemy_defeated);
        app.add_observer(on_fire_armed);
    }
}

/// Roll the kind of the next enemy.
pub fn pick_kind(rng: &mut SimRng, pooka_share: f64) -> EnemyKind {
    if rng.0.gen_bool(pooka_share.clamp(0.0, 1.0)) {
        EnemyKind::Pooka
    } else {
        EnemyKind::Fygar
    }
}

/// Place one enemy of `kind` at a random spawn cell. Returns `None` only when
/// the grid has no room at all.
pub fn spawn_enemy(
    commands: &mut Commands,
    grid: &mut Grid,
    rng: &mut SimRng,
    config: &GameConfig,
    player: GridPosition,
    kind: EnemyKind,
) -> Option<Entity> {
    let Some(position) = spawn_position(grid, player, &config.spawn, &mut rng.0) else {
        warn!(kind = kind.name(), "no free cell to spawn enemy");
        return None;
    };
    let seed = rng.next_seed();
    let enemy = Enemy::new(kind, position, grid, config.ai, seed)?;
    debug!(
        kind = kind.name(),
        x = position.x,
        y = position.y,
        patrol_points = enemy.patrol_points.len(),
        "enemy spawned"
    );
    Some(commands.spawn(enemy).id())
}

/// Tick every enemy against the shared grid, one after another.
#[span_fn]
fn enemy_ai(
    mut commands: Commands,
    time: Res<Time>,
    mut grid: ResMut<Grid>,
    players: Query<&Player>,
    mut enemies: Query<(Entity, &mut Enemy)>,
) {
    let Ok(player) = players.single() else {
        return;
    };
    let now = now_ms(&time);

    for (entity, mut enemy) in &mut enemies {
        if enemy.update(now, player.position, &mut grid) {
            commands.entity(entity).despawn();
            commands.trigger(EnemyDefeated {
                kind: enemy.kind,
                position: enemy.position,
            });
            continue;
        }
        if let Some(direction) = enemy.take_armed_fire() {
            commands.trigger(FireArmed {
                enemy: entity,
                direction,
            });
        }
    }
}

/// An enemy that is not being pumped catches the player by sharing its cell.
fn enemy_player_contact(
    mut commands: Commands,
    players: Query<&Player>,
    enemies: Query<(Entity, &Enemy)>,
) {
    let Ok(player) = players.single() else {
        return;
    };
    let caught_by = enemies
        .iter()
        .find(|(_, enemy)| enemy.position == player.position && !enemy.is_being_pumped());
    if let Some((entity, _)) = caught_by {
        commands.trigger(PlayerCaught { enemy: entity });
    }
}

/// Add one enemy every spawn interval while below the cap.
#[span_fn]
#[allow(clippy::too_many_arguments)]
fn spawn_over_time(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut grid: ResMut<Grid>,
    mut rng: ResMut<SimRng>,
    mut spawner: ResMut<EnemySpawner>,
    mut stats: ResMut<RoundStats>,
    players: Query<&Player>,
    enemies: Query<(), With<Enemy>>,
) {
    let now = now_ms(&time);
    if now.saturating_sub(spawner.last_spawn_ms) <= config.spawn.interval_ms {
        return;
    }
    spawner.last_spawn_ms = now;

    let alive = enemies.iter().count();
    if alive >= config.spawn.max_alive {
        debug!(alive, "spawner at capacity");
        return;
    }
    let Ok(player) = players.single() else {
        return;
    };

    let kind = pick_kind(&mut rng, config.spawn.pooka_share);
    if spawn_enemy(&mut commands, &mut grid, &mut rng, &config, player.position, kind).is_some() {
        stats.enemies_spawned += 1;
    }
}

#[span_fn]
fn on_enemy_defeated(
    trigger: On<EnemyDefeated>,
    config: Res<GameConfig>,
    mut stats: ResMut<RoundStats>,
    mut score: ResMut<Score>,
) {
    let event = trigger.event();
    match event.kind {
        EnemyKind::Pooka => stats.pookas_defeated += 1,
        EnemyKind::Fygar => stats.fygars_defeated += 1,
    }
    score.0 += config.scoring.defeat_points;
    let total = stats.enemies_defeated();
    imetric!("enemies_defeated", "count", total as u64);
    info!(
        kind = event.kind.name(),
        x = event.position.x,
        y = event.position.y,
        total,
        score = score.0,
        "enemy defeated"
    );
}

fn on_fire_armed(trigger: On<FireArmed>, mut stats: ResMut<RoundStats>) {
    stats.fires_armed += 1;
    debug!(enemy = ?trigger.event().enemy, direction = ?trigger.event().direction, "fire armed");
}
