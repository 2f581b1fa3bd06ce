use super::types::TrailRegistry;
use bevy_ecs::prelude::*;

/// Tick every registered trail against the world that owns its segments.
pub fn sys_update_trails(world: &mut World) {
    world.resource_scope(|world, mut registry: Mut<TrailRegistry>| {
        for (id, trail) in registry.iter_mut() {
            if let Err(err) = trail.tick(world) {
                log::warn!("{id} skipped this update: {err:#}");
            }
        }
    });
}
