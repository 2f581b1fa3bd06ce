use crate::backend::SegmentBackend;
use glam::{Quat, Vec2, Vec3};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HeadlessHandle(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HeadlessAnchor(pub usize);

#[derive(Clone, Debug)]
pub struct HeadlessSegment {
    pub prototype: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec2,
    pub active: bool,
    pub parameters: HashMap<String, f32>,
}

impl HeadlessSegment {
    pub fn parameter(&self, name: &str) -> Option<f32> {
        self.parameters.get(name).copied()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackendCounters {
    pub instantiated: u64,
    pub pose_updates: u64,
    pub activations: u64,
    pub deactivations: u64,
    pub scale_updates: u64,
    pub parameter_writes: u64,
}

/// In-memory backend that records every segment and call it receives.
///
/// Anchors are plain slots holding a position; removing one leaves the slot unresolvable so that
/// callers can exercise the missing-anchor path.
#[derive(Default)]
pub struct HeadlessBackend {
    segments: Vec<HeadlessSegment>,
    anchors: Vec<Option<Vec3>>,
    counters: BackendCounters,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_anchor(&mut self, position: Vec3) -> HeadlessAnchor {
        self.anchors.push(Some(position));
        HeadlessAnchor(self.anchors.len() - 1)
    }

    pub fn move_anchor(&mut self, anchor: HeadlessAnchor, position: Vec3) -> bool {
        match self.anchors.get_mut(anchor.0) {
            Some(slot) if slot.is_some() => {
                *slot = Some(position);
                true
            }
            _ => false,
        }
    }

    pub fn remove_anchor(&mut self, anchor: HeadlessAnchor) {
        if let Some(slot) = self.anchors.get_mut(anchor.0) {
            *slot = None;
        }
    }

    pub fn segment(&self, handle: HeadlessHandle) -> Option<&HeadlessSegment> {
        self.segments.get(handle.0)
    }

    pub fn segments(&self) -> &[HeadlessSegment] {
        &self.segments
    }

    pub fn active_segments(&self) -> impl Iterator<Item = (HeadlessHandle, &HeadlessSegment)> + '_ {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| segment.active)
            .map(|(index, segment)| (HeadlessHandle(index), segment))
    }

    pub fn counters(&self) -> BackendCounters {
        self.counters
    }

    pub fn reset_counters(&mut self) {
        self.counters = BackendCounters::default();
    }
}

impl SegmentBackend for HeadlessBackend {
    type Handle = HeadlessHandle;
    type Prototype = String;
    type Anchor = HeadlessAnchor;

    fn instantiate(&mut self, prototype: &String, position: Vec3, rotation: Quat) -> HeadlessHandle {
        self.counters.instantiated += 1;
        self.segments.push(HeadlessSegment {
            prototype: prototype.clone(),
            position,
            rotation,
            scale: Vec2::ONE,
            active: true,
            parameters: HashMap::new(),
        });
        HeadlessHandle(self.segments.len() - 1)
    }

    fn set_pose(&mut self, handle: HeadlessHandle, position: Vec3, rotation: Quat) {
        self.counters.pose_updates += 1;
        if let Some(segment) = self.segments.get_mut(handle.0) {
            segment.position = position;
            segment.rotation = rotation;
        }
    }

    fn set_active(&mut self, handle: HeadlessHandle, active: bool) {
        if active {
            self.counters.activations += 1;
        } else {
            self.counters.deactivations += 1;
        }
        if let Some(segment) = self.segments.get_mut(handle.0) {
            segment.active = active;
        }
    }

    fn set_segment_scale(&mut self, handle: HeadlessHandle, scale: Vec2) {
        self.counters.scale_updates += 1;
        if let Some(segment) = self.segments.get_mut(handle.0) {
            segment.scale = scale;
        }
    }

    fn set_scalar_parameter(&mut self, handle: HeadlessHandle, name: &str, value: f32) {
        self.counters.parameter_writes += 1;
        if let Some(segment) = self.segments.get_mut(handle.0) {
            segment.parameters.insert(name.to_string(), value);
        }
    }

    fn anchor_position(&self, anchor: &HeadlessAnchor) -> Option<Vec3> {
        self.anchors.get(anchor.0).copied().flatten()
    }
}
