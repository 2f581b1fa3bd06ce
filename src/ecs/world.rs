use super::*;
use crate::config::TrailConfig;
use crate::trail::TrailController;
use anyhow::{anyhow, Result};
use bevy_ecs::prelude::{Entity, Schedule, World};
use glam::Vec3;

// ---------- World container ----------
pub struct TrailWorld {
    pub world: World,
    schedule: Schedule,
}

impl Default for TrailWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TrailWorld {
    pub fn new() -> Self {
        let mut world = World::new();
        world.insert_resource(TrailRegistry::default());

        let mut schedule = Schedule::default();
        schedule.add_systems(sys_update_trails);

        Self { world, schedule }
    }

    pub fn spawn_trail(&mut self, config: TrailConfig, prototype: EcsSegmentPrototype) -> Result<TrailId> {
        let controller = TrailController::new(config, prototype)?;
        Ok(self.world.resource_mut::<TrailRegistry>().insert(controller))
    }

    /// Drop a trail from the registry. Its segment entities are despawned with it.
    pub fn despawn_trail(&mut self, id: TrailId) -> Result<()> {
        let controller = self
            .world
            .resource_mut::<TrailRegistry>()
            .remove(id)
            .ok_or_else(|| anyhow!("Unknown trail {id}"))?;
        for root in controller.pool().handles() {
            let renderer = self.world.get::<TrailSegmentRoot>(root).map(|segment| segment.renderer);
            if let Some(renderer) = renderer {
                self.world.despawn(renderer);
            }
            self.world.despawn(root);
        }
        Ok(())
    }

    pub fn spawn_anchor(&mut self, position: Vec3) -> Entity {
        self.world.spawn((Transform3D::from_translation(position), TrailAnchor)).id()
    }

    pub fn set_anchor_position(&mut self, anchor: Entity, position: Vec3) -> Result<()> {
        let mut transform = self
            .world
            .get_mut::<Transform3D>(anchor)
            .ok_or_else(|| anyhow!("Anchor {anchor:?} has no Transform3D"))?;
        transform.translation = position;
        Ok(())
    }

    pub fn set_trail_anchors(&mut self, id: TrailId, anchors: Vec<Entity>) -> Result<()> {
        self.trail_mut(id)?.set_anchors(anchors);
        Ok(())
    }

    pub fn set_trail_positions(&mut self, id: TrailId, positions: Vec<Vec3>) -> Result<()> {
        self.trail_mut(id)?.set_override_positions(positions);
        Ok(())
    }

    pub fn set_trail_width(&mut self, id: TrailId, width: f32) -> Result<()> {
        self.trail_mut(id)?.set_width(width)
    }

    pub fn trail(&self, id: TrailId) -> Option<&EcsTrailController> {
        self.world.resource::<TrailRegistry>().get(id)
    }

    fn trail_mut(&mut self, id: TrailId) -> Result<&mut EcsTrailController> {
        self.world
            .resource_mut::<TrailRegistry>()
            .into_inner()
            .get_mut(id)
            .ok_or_else(|| anyhow!("Unknown trail {id}"))
    }

    /// Root entities of the segments currently drawn for `id`, in acquisition order.
    pub fn active_segments(&self, id: TrailId) -> Vec<Entity> {
        self.trail(id).map(|trail| trail.pool().active_handles().collect()).unwrap_or_default()
    }

    pub fn segment_renderer(&self, root: Entity) -> Option<Entity> {
        self.world.get::<TrailSegmentRoot>(root).map(|segment| segment.renderer)
    }

    pub fn update(&mut self) {
        self.schedule.run(&mut self.world);
    }
}
