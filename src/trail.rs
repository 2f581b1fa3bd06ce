use crate::backend::SegmentBackend;
use crate::config::TrailConfig;
use crate::geometry::trail_placements;
use crate::pool::SegmentPool;
use anyhow::{anyhow, Result};
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrailUpdate {
    Unchanged,
    Regenerated { segments: usize },
}

impl TrailUpdate {
    pub fn regenerated(self) -> bool {
        matches!(self, TrailUpdate::Regenerated { .. })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrailStats {
    pub ticks: u64,
    pub regenerations: u64,
    pub unresolved_anchor_ticks: u64,
}

/// Keeps a ribbon of pooled segments in sync with a changing point sequence.
///
/// Points come from the anchors when any are set, otherwise from the override positions. Each
/// tick samples them and compares the result with the sequence used for the last regeneration.
/// Only a mismatch rebuilds the trail: every pooled segment is deactivated, then one segment per
/// consecutive pair is acquired in point order.
pub struct TrailController<B: SegmentBackend> {
    config: TrailConfig,
    prototype: B::Prototype,
    anchors: Vec<B::Anchor>,
    override_positions: Vec<Vec3>,
    previous_points: Vec<Vec3>,
    sample_scratch: Vec<Vec3>,
    pool: SegmentPool<B::Handle>,
    force_regenerate: bool,
    stats: TrailStats,
}

impl<B: SegmentBackend> TrailController<B> {
    pub fn new(config: TrailConfig, prototype: B::Prototype) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            prototype,
            anchors: Vec::new(),
            override_positions: Vec::new(),
            previous_points: Vec::new(),
            sample_scratch: Vec::new(),
            pool: SegmentPool::new(),
            force_regenerate: false,
            stats: TrailStats::default(),
        })
    }

    pub fn with_anchors(mut self, anchors: Vec<B::Anchor>) -> Self {
        self.anchors = anchors;
        self
    }

    /// Positions used while no anchors are set. Picked up by the next tick.
    pub fn set_override_positions(&mut self, positions: Vec<Vec3>) {
        self.override_positions = positions;
    }

    pub fn override_positions(&self) -> &[Vec3] {
        &self.override_positions
    }

    pub fn set_anchors(&mut self, anchors: Vec<B::Anchor>) {
        self.anchors = anchors;
    }

    pub fn anchors(&self) -> &[B::Anchor] {
        &self.anchors
    }

    pub fn width(&self) -> f32 {
        self.config.width
    }

    /// Change the trail width. Existing segments are rescaled on the next tick.
    pub fn set_width(&mut self, width: f32) -> Result<()> {
        TrailConfig::validate_width(width)?;
        if width != self.config.width {
            self.config.width = width;
            self.force_regenerate = true;
        }
        Ok(())
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn prototype(&self) -> &B::Prototype {
        &self.prototype
    }

    /// Force the next tick to regenerate even if the points are unchanged.
    pub fn invalidate(&mut self) {
        self.force_regenerate = true;
    }

    pub fn pool(&self) -> &SegmentPool<B::Handle> {
        &self.pool
    }

    /// Sequence the current segments were generated from.
    pub fn previous_points(&self) -> &[Vec3] {
        &self.previous_points
    }

    pub fn stats(&self) -> TrailStats {
        self.stats
    }

    /// Whether the next tick would regenerate.
    pub fn is_dirty(&self, backend: &B) -> Result<bool> {
        if self.force_regenerate {
            return Ok(true);
        }
        let mut points = Vec::with_capacity(self.previous_points.len());
        sample_points(backend, &self.anchors, &self.override_positions, &mut points)?;
        Ok(points != self.previous_points)
    }

    /// Sample the point source and regenerate the trail if it changed.
    ///
    /// Fails only when an anchor cannot be resolved; the pool and cached sequence are then left
    /// untouched so the previous trail stays visible.
    pub fn tick(&mut self, backend: &mut B) -> Result<TrailUpdate> {
        self.stats.ticks += 1;
        let mut points = std::mem::take(&mut self.sample_scratch);
        if let Err(err) = sample_points(backend, &self.anchors, &self.override_positions, &mut points) {
            self.sample_scratch = points;
            self.stats.unresolved_anchor_ticks += 1;
            return Err(err);
        }
        if !self.force_regenerate && points == self.previous_points {
            self.sample_scratch = points;
            return Ok(TrailUpdate::Unchanged);
        }
        self.sample_scratch = std::mem::replace(&mut self.previous_points, points);
        self.force_regenerate = false;
        let segments = self.regenerate(backend);
        Ok(TrailUpdate::Regenerated { segments })
    }

    fn regenerate(&mut self, backend: &mut B) -> usize {
        self.stats.regenerations += 1;
        self.pool.deactivate_all(backend);
        if self.previous_points.len() < 2 {
            log::debug!("Trail cleared ({} point(s))", self.previous_points.len());
            return 0;
        }

        let parameter = self.config.aspect_ratio_parameter.as_str();
        let mut segments = 0usize;
        for placement in trail_placements(&self.previous_points, self.config.width, self.config.degenerate_rotation)
        {
            if placement.degenerate {
                log::debug!(
                    "Trail segment {segments} has coincident endpoints; using {} rotation",
                    self.config.degenerate_rotation.label()
                );
            }
            let handle =
                self.pool.acquire(backend, &self.prototype, placement.world_position, placement.world_rotation);
            backend.set_segment_scale(handle, placement.scale);
            backend.set_scalar_parameter(handle, parameter, placement.aspect_ratio);
            segments += 1;
        }
        log::debug!("Trail regenerated: {segments} segment(s), pool size {}", self.pool.len());
        segments
    }
}

fn sample_points<B: SegmentBackend>(
    backend: &B,
    anchors: &[B::Anchor],
    overrides: &[Vec3],
    out: &mut Vec<Vec3>,
) -> Result<()> {
    out.clear();
    if anchors.is_empty() {
        out.extend_from_slice(overrides);
        return Ok(());
    }
    for (index, anchor) in anchors.iter().enumerate() {
        let position =
            backend.anchor_position(anchor).ok_or_else(|| anyhow!("Trail anchor {index} could not be resolved"))?;
        out.push(position);
    }
    Ok(())
}
