use super::types::*;
use crate::backend::SegmentBackend;
use bevy_ecs::prelude::*;
use glam::{Quat, Vec2, Vec3};

/// Segments live directly in the world: a root entity with the pose and activity flag, and one
/// renderer child holding the stretched transform and material scalars. Anchors are entities
/// tagged `TrailAnchor`; their `Transform3D` translation is taken as the world position.
impl SegmentBackend for World {
    type Handle = Entity;
    type Prototype = EcsSegmentPrototype;
    type Anchor = Entity;

    fn instantiate(&mut self, prototype: &EcsSegmentPrototype, position: Vec3, rotation: Quat) -> Entity {
        let renderer = self
            .spawn((
                Transform3D { translation: Vec3::ZERO, rotation: prototype.local_rotation, scale: prototype.base_scale },
                SegmentRenderer,
                MaterialParams::default(),
            ))
            .id();
        let root = self
            .spawn((
                Transform3D { translation: position, rotation, scale: Vec3::ONE },
                TrailSegmentRoot { renderer },
                SegmentActive(true),
                Children(vec![renderer]),
            ))
            .id();
        self.entity_mut(renderer).insert(Parent(root));
        root
    }

    fn set_pose(&mut self, handle: Entity, position: Vec3, rotation: Quat) {
        if let Some(mut transform) = self.get_mut::<Transform3D>(handle) {
            transform.translation = position;
            transform.rotation = rotation;
        }
    }

    fn set_active(&mut self, handle: Entity, active: bool) {
        if let Some(mut flag) = self.get_mut::<SegmentActive>(handle) {
            flag.0 = active;
        }
    }

    fn set_segment_scale(&mut self, handle: Entity, scale: Vec2) {
        let Some(renderer) = self.get::<TrailSegmentRoot>(handle).map(|root| root.renderer) else {
            return;
        };
        if let Some(mut transform) = self.get_mut::<Transform3D>(renderer) {
            transform.scale.x = scale.x;
            transform.scale.y = scale.y;
        }
    }

    fn set_scalar_parameter(&mut self, handle: Entity, name: &str, value: f32) {
        let Some(renderer) = self.get::<TrailSegmentRoot>(handle).map(|root| root.renderer) else {
            return;
        };
        if let Some(mut params) = self.get_mut::<MaterialParams>(renderer) {
            params.set_scalar(name, value);
        }
    }

    fn anchor_position(&self, anchor: &Entity) -> Option<Vec3> {
        self.get::<TrailAnchor>(*anchor)?;
        self.get::<Transform3D>(*anchor).map(|transform| transform.translation)
    }
}
