//! Tick-level telemetry: wraps the simulation loop with Micromegas instrumentation.

use bevy::prelude::*;
use micromegas_tracing::prelude::{fmetric, imetric, span_scope};

use crate::ai::Enemy;

pub struct TelemetryPlugin;

impl Plugin for TelemetryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Last, tick_telemetry);
    }
}

fn tick_telemetry(time: Res<Time>, enemies: Query<(), With<Enemy>>) {
    span_scope!("tick");
    let dt_ms = time.delta_secs_f64() * 1000.0;
    fmetric!("tick_time_ms", "ms", dt_ms);
    imetric!("enemies_alive", "count", enemies.iter().count() as u64);
}
