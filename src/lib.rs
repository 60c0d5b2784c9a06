pub mod ai;
pub mod behavior;
pub mod components;
pub mod config;
pub mod events;
pub mod grid;
pub mod pathfinding;
pub mod plugins;
pub mod resources;

use bevy::prelude::*;

use components::PlayerIntent;
use config::GameConfig;
use grid::Grid;
use plugins::SimSet;
use plugins::enemies::EnemyPlugin;
use plugins::player::PlayerPlugin;
use plugins::round::RoundPlugin;
use plugins::telemetry::TelemetryPlugin;
use resources::{EnemySpawner, Lives, RoundStats, Score, SessionOutcome, SimRng};

/// Headless dig-and-chase simulation. Add it next to `MinimalPlugins`; the
/// first update starts a round.
#[derive(Default)]
pub struct BurrowPlugin {
    pub config: GameConfig,
}

impl BurrowPlugin {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }
}

impl Plugin for BurrowPlugin {
    fn build(&self, app: &mut App) {
        let config = self.config.clone();

        // Session resources. The round observer fills the grid on start.
        app.insert_resource(Grid::new(config.grid.width, config.grid.height));
        app.insert_resource(SimRng::new(config.seed));
        app.insert_resource(Lives(config.player.lives));
        app.insert_resource(config);
        app.init_resource::<Score>();
        app.init_resource::<SessionOutcome>();
        app.init_resource::<RoundStats>();
        app.init_resource::<EnemySpawner>();
        app.init_resource::<PlayerIntent>();

        app.configure_sets(
            Update,
            (
                SimSet::Player,
                SimSet::Enemies,
                SimSet::Contact,
                SimSet::Spawn,
                SimSet::Outcome,
            )
                .chain()
                .run_if(resource_equals(SessionOutcome::Playing)),
        );

        app.add_plugins(RoundPlugin);
        app.add_plugins(PlayerPlugin);
        app.add_plugins(EnemyPlugin);
        app.add_plugins(TelemetryPlugin);
    }
}
