use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use burrow::BurrowPlugin;
use burrow::ai::Enemy;
use burrow::components::{Direction, Player, PlayerIntent};
use burrow::config::GameConfig;
use burrow::grid::Grid;
use burrow::pathfinding::Pathfinder;
use burrow::resources::{Lives, RoundStats, Score, SessionOutcome};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "burrow.json";
const TICK: Duration = Duration::from_millis(16);
/// One simulated minute at most; the run stops early once the round is over.
const TICKS: u32 = 60_000 / 16;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = match GameConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "cannot start simulation");
            return ExitCode::FAILURE;
        }
    };
    info!(
        config = %path.display(),
        seed = config.seed,
        width = config.grid.width,
        height = config.grid.height,
        "burrow simulation starting"
    );

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(TICK))
        .add_plugins(BurrowPlugin::new(config));
    app.finish();
    app.cleanup();

    for _ in 0..TICKS {
        let intent = autopilot(app.world_mut());
        *app.world_mut().resource_mut::<PlayerIntent>() = intent;
        app.update();
        if app.world().resource::<SessionOutcome>().is_over() {
            break;
        }
    }

    let world = app.world();
    let stats = world.resource::<RoundStats>();
    info!(
        outcome = ?world.resource::<SessionOutcome>(),
        score = world.resource::<Score>().0,
        lives = world.resource::<Lives>().0,
        spawned = stats.enemies_spawned,
        pookas_defeated = stats.pookas_defeated,
        fygars_defeated = stats.fygars_defeated,
        fires_armed = stats.fires_armed,
        times_caught = stats.times_caught,
        "simulation finished"
    );
    print!("{}", world.resource::<Grid>().render());
    ExitCode::SUCCESS
}

/// Scripted player: dig toward the closest enemy and pump it once adjacent.
fn autopilot(world: &mut World) -> PlayerIntent {
    let mut players = world.query::<&Player>();
    let Some(player) = players.iter(world).next().map(|p| p.position) else {
        return PlayerIntent::default();
    };
    let mut enemies = world.query::<&Enemy>();
    let Some(target) = enemies
        .iter(world)
        .map(|e| e.position)
        .min_by_key(|p| p.manhattan(player))
    else {
        return PlayerIntent::default();
    };

    if target.touches(player) {
        return PlayerIntent {
            step: None,
            pump: true,
        };
    }
    let grid = world.resource::<Grid>();
    let step = Pathfinder::new(0)
        .find_path(grid, player, target)
        .and_then(|path| path.next())
        .and_then(|next| Direction::between(player, next));
    PlayerIntent { step, pump: false }
}
