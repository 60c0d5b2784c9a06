use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use burrow::BurrowPlugin;
use burrow::ai::{Enemy, EnemyKind};
use burrow::components::{GridPosition, Player, PlayerIntent};
use burrow::config::{GameConfig, GridConfig, PlayerConfig, ScoringConfig, SpawnConfig};
use burrow::events::StartRound;
use burrow::grid::{Grid, Tile};
use burrow::resources::{Lives, RoundStats, Score, SessionOutcome};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TICK: Duration = Duration::from_millis(16);
const START: GridPosition = GridPosition::new(12, 1);

/// Headless app with the first round already started.
fn app_with(config: GameConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(TICK))
        .add_plugins(BurrowPlugin::new(config));
    app.finish();
    app.cleanup();
    app.update();
    app
}

/// No rocks, no automatic enemies: tests place what they need.
fn empty_field() -> GameConfig {
    GameConfig {
        grid: GridConfig {
            rock_count: 0,
            ..default()
        },
        spawn: SpawnConfig {
            initial_enemies: 0,
            interval_ms: u64::MAX / 2,
            ..default()
        },
        ..default()
    }
}

fn player_position(app: &mut App) -> GridPosition {
    let world = app.world_mut();
    let mut players = world.query::<&Player>();
    players.single(world).expect("exactly one player").position
}

fn move_player(app: &mut App, to: GridPosition) {
    let world = app.world_mut();
    let mut players = world.query::<&mut Player>();
    players.single_mut(world).expect("exactly one player").position = to;
}

fn enemy_positions(app: &mut App) -> Vec<GridPosition> {
    let world = app.world_mut();
    let mut enemies = world.query::<&Enemy>();
    let mut out: Vec<_> = enemies.iter(world).map(|e| e.position).collect();
    out.sort_by_key(|p| (p.x, p.y));
    out
}

fn place_enemy(app: &mut App, kind: EnemyKind, at: GridPosition) -> Entity {
    let world = app.world_mut();
    let tuning = world.resource::<GameConfig>().ai;
    let enemy = world
        .resource_scope(|_, mut grid: Mut<Grid>| Enemy::new(kind, at, &mut grid, tuning, 1))
        .expect("open spawn cell");
    world.spawn(enemy).id()
}

fn stats(app: &App) -> RoundStats {
    app.world().resource::<RoundStats>().clone()
}

fn set_intent(app: &mut App, intent: PlayerIntent) {
    *app.world_mut().resource_mut::<PlayerIntent>() = intent;
}

fn pump(app: &mut App) {
    set_intent(
        app,
        PlayerIntent {
            step: None,
            pump: true,
        },
    );
}

fn score(app: &App) -> u64 {
    app.world().resource::<Score>().0
}

fn outcome(app: &App) -> SessionOutcome {
    *app.world().resource::<SessionOutcome>()
}

// ---------------------------------------------------------------------------
// Round start
// ---------------------------------------------------------------------------

#[test]
fn round_starts_with_player_and_initial_enemies() {
    let mut app = app_with(GameConfig {
        seed: 7,
        ..default()
    });

    assert_eq!(player_position(&mut app), START);
    let grid = app.world().resource::<Grid>();
    assert!(grid.is_tunnel(START.x, START.y));
    assert!(grid.count(Tile::Rock) <= 15);

    let enemies = enemy_positions(&mut app);
    assert_eq!(enemies.len(), 2);
    let grid = app.world().resource::<Grid>();
    for p in &enemies {
        assert!(grid.is_tunnel(p.x, p.y), "spawn cell {p:?} not dug");
        assert!(p.y >= 9 && p.y <= 17);
    }

    let stats = stats(&app);
    assert_eq!(stats.rounds_started, 1);
    assert_eq!(stats.enemies_spawned, 2);

    assert_eq!(score(&app), 0);
    assert_eq!(app.world().resource::<Lives>().0, 3);
    assert_eq!(outcome(&app), SessionOutcome::Playing);
}

#[test]
fn start_round_repopulates() {
    let mut app = app_with(GameConfig::default());
    for _ in 0..10 {
        app.update();
    }
    move_player(&mut app, GridPosition::new(3, 3));
    app.world_mut().insert_resource(Score(42));
    app.world_mut().insert_resource(Lives(1));
    app.world_mut().insert_resource(SessionOutcome::Lost);

    app.world_mut().trigger(StartRound);
    app.update();

    let stats = stats(&app);
    assert_eq!(stats.rounds_started, 2);
    assert_eq!(stats.enemies_spawned, 4);
    assert_eq!(enemy_positions(&mut app).len(), 2);
    assert_eq!(player_position(&mut app), START);
    assert_eq!(score(&app), 0);
    assert_eq!(app.world().resource::<Lives>().0, 3);
    assert_eq!(outcome(&app), SessionOutcome::Playing);
}

// ---------------------------------------------------------------------------
// Pumping and contact
// ---------------------------------------------------------------------------

#[test]
fn three_pumps_defeat_adjacent_enemy() {
    let mut app = app_with(empty_field());
    place_enemy(&mut app, EnemyKind::Pooka, GridPosition::new(13, 2));

    for pumps in 1..=3u32 {
        pump(&mut app);
        app.update();
        // The request is consumed each tick
        assert!(!app.world().resource::<PlayerIntent>().pump);
        if pumps < 3 {
            assert_eq!(enemy_positions(&mut app).len(), 1);
        }
    }

    assert!(enemy_positions(&mut app).is_empty());
    let stats = stats(&app);
    assert_eq!(stats.pookas_defeated, 1);
    assert_eq!(stats.enemies_defeated(), 1);
    // Three landed pumps and the defeat bonus
    assert_eq!(score(&app), 3 * 5 + 100);
}

#[test]
fn pump_out_of_reach_does_nothing() {
    let mut app = app_with(empty_field());
    let enemy = place_enemy(&mut app, EnemyKind::Pooka, GridPosition::new(20, 15));

    pump(&mut app);
    app.update();

    let enemy = app.world().get::<Enemy>(enemy).expect("enemy still alive");
    assert_eq!(enemy.pump_count, 0);
    assert_eq!(score(&app), 0);
}

#[test]
fn enemy_on_player_cell_sends_player_back() {
    let mut app = app_with(empty_field());
    let cell = GridPosition::new(5, 5);
    move_player(&mut app, cell);
    place_enemy(&mut app, EnemyKind::Pooka, cell);

    app.update();
    assert_eq!(stats(&app).times_caught, 1);
    assert_eq!(player_position(&mut app), START);
    assert_eq!(app.world().resource::<Lives>().0, 2);

    app.update();
    assert_eq!(stats(&app).times_caught, 1);
    assert_eq!(outcome(&app), SessionOutcome::Playing);
}

#[test]
fn last_life_ends_the_round() {
    let mut app = app_with(GameConfig {
        player: PlayerConfig {
            lives: 1,
            ..default()
        },
        ..empty_field()
    });
    let cell = GridPosition::new(5, 5);
    move_player(&mut app, cell);
    place_enemy(&mut app, EnemyKind::Pooka, cell);

    app.update();
    assert_eq!(app.world().resource::<Lives>().0, 0);
    assert_eq!(outcome(&app), SessionOutcome::Lost);
    // Caught on the last life: no trip back to the start cell
    assert_eq!(player_position(&mut app), cell);

    // The simulation stands still once the round is lost
    set_intent(
        &mut app,
        PlayerIntent {
            step: Some(burrow::components::Direction::Right),
            pump: false,
        },
    );
    let enemies = enemy_positions(&mut app);
    for _ in 0..30 {
        app.update();
    }
    assert_eq!(player_position(&mut app), cell);
    assert_eq!(enemy_positions(&mut app), enemies);
    assert_eq!(stats(&app).times_caught, 1);
}

#[test]
fn reaching_win_score_ends_the_round() {
    let mut app = app_with(GameConfig {
        scoring: ScoringConfig {
            win_score: 100,
            ..default()
        },
        ..empty_field()
    });
    place_enemy(&mut app, EnemyKind::Fygar, GridPosition::new(11, 2));

    for _ in 0..3 {
        pump(&mut app);
        app.update();
    }
    app.update();

    assert_eq!(score(&app), 115);
    assert_eq!(outcome(&app), SessionOutcome::Won);
}

#[test]
fn pumped_enemy_on_player_cell_is_harmless() {
    let mut app = app_with(empty_field());
    let cell = GridPosition::new(5, 5);
    move_player(&mut app, cell);
    place_enemy(&mut app, EnemyKind::Fygar, cell);

    pump(&mut app);
    app.update();
    assert_eq!(stats(&app).times_caught, 0);
    assert_eq!(player_position(&mut app), cell);
}

// ---------------------------------------------------------------------------
// Player movement
// ---------------------------------------------------------------------------

#[test]
fn held_step_digs_a_tunnel() {
    let mut app = app_with(empty_field());
    set_intent(
        &mut app,
        PlayerIntent {
            step: Some(burrow::components::Direction::Down),
            pump: false,
        },
    );
    // 150 ms move delay at 16 ms ticks: roughly one cell every ten ticks
    for _ in 0..60 {
        app.update();
    }

    let pos = player_position(&mut app);
    assert_eq!(pos.x, START.x);
    assert!(pos.y > START.y + 2, "player only reached {pos:?}");
    let grid = app.world().resource::<Grid>();
    for y in START.y..=pos.y {
        assert!(grid.is_tunnel(START.x, y));
    }
    // One point per cell dug out
    assert_eq!(score(&app), (pos.y - START.y) as u64);

    // Walking back along the tunnel digs nothing new
    set_intent(
        &mut app,
        PlayerIntent {
            step: Some(burrow::components::Direction::Up),
            pump: false,
        },
    );
    let dug = score(&app);
    for _ in 0..30 {
        app.update();
    }
    assert!(player_position(&mut app).y < pos.y);
    assert_eq!(score(&app), dug);
}

// ---------------------------------------------------------------------------
// Fygar fire
// ---------------------------------------------------------------------------

#[test]
fn fygar_in_line_arms_once_per_cooldown() {
    let mut app = app_with(empty_field());
    place_enemy(&mut app, EnemyKind::Fygar, GridPosition::new(12, 4));

    for _ in 0..5 {
        app.update();
    }
    assert_eq!(stats(&app).fires_armed, 1);
}

// ---------------------------------------------------------------------------
// Spawner
// ---------------------------------------------------------------------------

#[test]
fn spawner_fills_up_to_cap() {
    let mut app = app_with(GameConfig {
        grid: GridConfig {
            rock_count: 0,
            ..default()
        },
        spawn: SpawnConfig {
            initial_enemies: 0,
            interval_ms: 100,
            max_alive: 2,
            ..default()
        },
        ..default()
    });

    for _ in 0..40 {
        app.update();
    }
    assert_eq!(enemy_positions(&mut app).len(), 2);
    assert_eq!(stats(&app).enemies_spawned, 2);
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn same_seed_same_round() {
    let run = || {
        let mut app = app_with(GameConfig {
            seed: 11,
            ..default()
        });
        for _ in 0..300 {
            app.update();
        }
        let grid = app.world().resource::<Grid>().render();
        (grid, enemy_positions(&mut app), stats(&app))
    };
    assert_eq!(run(), run());
}
