use crate::trail::TrailController;
use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use std::collections::HashMap;
use std::fmt;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform3D {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}
impl Default for Transform3D {
    fn default() -> Self {
        Self { translation: Vec3::ZERO, rotation: Quat::IDENTITY, scale: Vec3::ONE }
    }
}
impl Transform3D {
    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, ..Self::default() }
    }
}
#[derive(Component, Clone, Copy)]
pub struct Parent(pub Entity);
#[derive(Component, Default)]
pub struct Children(pub Vec<Entity>);

/// Marks an entity whose translation is sampled as a trail point.
#[derive(Component, Clone, Copy, Default)]
pub struct TrailAnchor;

/// Root of a pooled trail segment. The root carries the pose; `renderer` is the stretched child.
#[derive(Component, Clone, Copy)]
pub struct TrailSegmentRoot {
    pub renderer: Entity,
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentActive(pub bool);

#[derive(Component, Clone, Copy, Default)]
pub struct SegmentRenderer;

#[derive(Component, Clone, Debug, Default)]
pub struct MaterialParams {
    scalars: HashMap<String, f32>,
}

impl MaterialParams {
    pub fn set_scalar(&mut self, name: &str, value: f32) {
        if let Some(slot) = self.scalars.get_mut(name) {
            *slot = value;
        } else {
            self.scalars.insert(name.to_string(), value);
        }
    }

    pub fn scalar(&self, name: &str) -> Option<f32> {
        self.scalars.get(name).copied()
    }
}

/// Authored shape of the segment renderer. The child renderer is usually pre-rotated so the quad
/// lies flat along the root's forward axis; only its x/y scale is rewritten per segment.
#[derive(Clone, Copy, Debug)]
pub struct EcsSegmentPrototype {
    pub local_rotation: Quat,
    pub base_scale: Vec3,
}

impl Default for EcsSegmentPrototype {
    fn default() -> Self {
        Self { local_rotation: Quat::IDENTITY, base_scale: Vec3::ONE }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrailId(pub u32);

impl fmt::Display for TrailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trail#{}", self.0)
    }
}

pub type EcsTrailController = TrailController<World>;

#[derive(Resource, Default)]
pub struct TrailRegistry {
    trails: Vec<(TrailId, EcsTrailController)>,
    next_id: u32,
}

impl TrailRegistry {
    pub fn insert(&mut self, controller: EcsTrailController) -> TrailId {
        let id = TrailId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.trails.push((id, controller));
        id
    }

    pub fn remove(&mut self, id: TrailId) -> Option<EcsTrailController> {
        let index = self.trails.iter().position(|(trail_id, _)| *trail_id == id)?;
        Some(self.trails.remove(index).1)
    }

    pub fn get(&self, id: TrailId) -> Option<&EcsTrailController> {
        self.trails.iter().find(|(trail_id, _)| *trail_id == id).map(|(_, trail)| trail)
    }

    pub fn get_mut(&mut self, id: TrailId) -> Option<&mut EcsTrailController> {
        self.trails.iter_mut().find(|(trail_id, _)| *trail_id == id).map(|(_, trail)| trail)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TrailId, &mut EcsTrailController)> + '_ {
        self.trails.iter_mut().map(|(id, trail)| (*id, trail))
    }

    pub fn len(&self) -> usize {
        self.trails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }
}
