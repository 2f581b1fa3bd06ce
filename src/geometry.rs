use crate::config::DegenerateRotation;
use glam::{Mat3, Quat, Vec2, Vec3};

pub const WORLD_UP: Vec3 = Vec3::Y;

const PARALLEL_EPSILON: f32 = 1.0e-12;

/// Pose and sizing for one segment spanning two consecutive trail points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPlacement {
    pub world_position: Vec3,
    pub world_rotation: Quat,
    /// `x` is the segment length, `y` the trail width.
    pub scale: Vec2,
    pub aspect_ratio: f32,
    pub length: f32,
    /// Set when the endpoints coincide and `world_rotation` is a fallback.
    pub degenerate: bool,
}

impl SegmentPlacement {
    /// Replace the rotation of a degenerate placement according to `policy`.
    pub fn with_degenerate_policy(mut self, policy: DegenerateRotation, previous: Option<Quat>) -> Self {
        if self.degenerate {
            self.world_rotation = match policy {
                DegenerateRotation::Identity => Quat::IDENTITY,
                DegenerateRotation::Previous => previous.unwrap_or(Quat::IDENTITY),
            };
        }
        self
    }
}

/// Rotation whose local +Z axis points along `forward`, keeping local +Y as close to `up` as possible.
///
/// Returns `None` when `forward` has no usable direction (zero length or non-finite). The vector
/// is rescaled by its largest component first, so huge or tiny finite vectors still normalize. When
/// `forward` is parallel to `up`, world +X stands in as the right axis, which tips local +Y to -Z
/// when looking up and to +Z when looking down.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let extent = forward.abs().max_element();
    if !extent.is_finite() || extent <= 0.0 {
        return None;
    }
    let forward = (forward / extent).try_normalize()?;
    let mut right = up.cross(forward);
    if right.length_squared() <= PARALLEL_EPSILON {
        right = Vec3::X - forward * forward.dot(Vec3::X);
        if right.length_squared() <= PARALLEL_EPSILON {
            right = Vec3::Z - forward * forward.dot(Vec3::Z);
        }
    }
    let right = right.try_normalize()?;
    let true_up = forward.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, true_up, forward)).normalize())
}

/// Solve the placement of the segment from `start` to `end`.
///
/// `width` must be positive; it is validated when the trail is configured, not here.
pub fn solve_segment(start: Vec3, end: Vec3, width: f32) -> SegmentPlacement {
    let length = start.distance(end);
    let rotation = look_rotation(end - start, WORLD_UP);
    SegmentPlacement {
        world_position: start.lerp(end, 0.5),
        world_rotation: rotation.unwrap_or(Quat::IDENTITY),
        scale: Vec2::new(length, width),
        aspect_ratio: length / width,
        length,
        degenerate: rotation.is_none(),
    }
}

/// Placements for every consecutive pair of `points`, in order.
pub fn trail_placements(
    points: &[Vec3],
    width: f32,
    policy: DegenerateRotation,
) -> impl Iterator<Item = SegmentPlacement> + '_ {
    let mut previous_rotation: Option<Quat> = None;
    points.windows(2).map(move |pair| {
        let placement = solve_segment(pair[0], pair[1], width).with_degenerate_policy(policy, previous_rotation);
        previous_rotation = Some(placement.world_rotation);
        placement
    })
}

pub fn solve_trail(points: &[Vec3], width: f32, policy: DegenerateRotation) -> Vec<SegmentPlacement> {
    trail_placements(points, width, policy).collect()
}
