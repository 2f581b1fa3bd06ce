use glam::{Quat, Vec2, Vec3};
use std::fmt::Debug;

/// Capabilities a rendering backend exposes to the trail core.
///
/// A backend owns the drawables. The core only keeps opaque handles and drives them through this
/// trait: construct at a pose, move, toggle visibility, stretch, and push material scalars. The
/// same backend also resolves anchors into world positions each tick.
pub trait SegmentBackend {
    /// Opaque reference to one constructed segment.
    type Handle: Copy + Eq + Debug;
    /// Template the backend clones when a new segment is needed.
    type Prototype;
    /// External position provider sampled every tick.
    type Anchor;

    /// Construct a new segment from `prototype` at the given pose. New segments start active.
    fn instantiate(&mut self, prototype: &Self::Prototype, position: Vec3, rotation: Quat) -> Self::Handle;

    /// Move the segment's container transform.
    fn set_pose(&mut self, handle: Self::Handle, position: Vec3, rotation: Quat);

    fn set_active(&mut self, handle: Self::Handle, active: bool);

    /// Stretch the segment's renderer. `x` spans the segment length, `y` the trail width.
    fn set_segment_scale(&mut self, handle: Self::Handle, scale: Vec2);

    fn set_scalar_parameter(&mut self, handle: Self::Handle, name: &str, value: f32);

    /// Current world position of `anchor`, or `None` if it no longer exists.
    fn anchor_position(&self, anchor: &Self::Anchor) -> Option<Vec3>;
}
