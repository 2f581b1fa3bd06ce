use crate::backend::SegmentBackend;
use glam::{Quat, Vec3};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub acquired: u64,
    pub created: u64,
    pub reused: u64,
    pub deactivate_calls: u64,
}

#[derive(Clone, Copy, Debug)]
struct PooledSegment<H> {
    handle: H,
    active: bool,
}

/// Insertion-ordered set of every segment handle ever created for one trail.
///
/// Handles are never released back to the backend; the pool grows only when every existing
/// handle is active. Reuse is a linear scan for the first inactive handle, so acquisition is
/// O(pool size), which stays small because the pool is bounded by the longest trail seen.
#[derive(Debug)]
pub struct SegmentPool<H> {
    segments: Vec<PooledSegment<H>>,
    stats: PoolStats,
}

impl<H> Default for SegmentPool<H> {
    fn default() -> Self {
        Self { segments: Vec::new(), stats: PoolStats::default() }
    }
}

impl<H: Copy + Eq> SegmentPool<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the first inactive handle, moved to the given pose, or construct a new one.
    pub fn acquire<B>(&mut self, backend: &mut B, prototype: &B::Prototype, position: Vec3, rotation: Quat) -> H
    where
        B: SegmentBackend<Handle = H>,
    {
        self.stats.acquired += 1;
        if let Some(slot) = self.segments.iter_mut().find(|slot| !slot.active) {
            backend.set_pose(slot.handle, position, rotation);
            backend.set_active(slot.handle, true);
            slot.active = true;
            self.stats.reused += 1;
            return slot.handle;
        }
        let handle = backend.instantiate(prototype, position, rotation);
        self.segments.push(PooledSegment { handle, active: true });
        self.stats.created += 1;
        handle
    }

    pub fn deactivate_all<B>(&mut self, backend: &mut B)
    where
        B: SegmentBackend<Handle = H>,
    {
        self.stats.deactivate_calls += 1;
        for slot in &mut self.segments {
            backend.set_active(slot.handle, false);
            slot.active = false;
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.segments.iter().filter(|slot| slot.active).count()
    }

    pub fn inactive_count(&self) -> usize {
        self.len() - self.active_count()
    }

    pub fn is_active(&self, handle: H) -> bool {
        self.segments.iter().any(|slot| slot.handle == handle && slot.active)
    }

    /// Every handle in creation order.
    pub fn handles(&self) -> impl Iterator<Item = H> + '_ {
        self.segments.iter().map(|slot| slot.handle)
    }

    pub fn active_handles(&self) -> impl Iterator<Item = H> + '_ {
        self.segments.iter().filter(|slot| slot.active).map(|slot| slot.handle)
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessBackend, HeadlessHandle};

    fn acquire_at(pool: &mut SegmentPool<HeadlessHandle>, backend: &mut HeadlessBackend, x: f32) -> HeadlessHandle {
        pool.acquire(backend, &"segment".to_string(), Vec3::new(x, 0.0, 0.0), Quat::IDENTITY)
    }

    #[test]
    fn empty_pool_constructs_on_demand() {
        let mut backend = HeadlessBackend::new();
        let mut pool = SegmentPool::new();
        assert!(pool.is_empty());

        let first = acquire_at(&mut pool, &mut backend, 1.0);
        let second = acquire_at(&mut pool, &mut backend, 2.0);
        assert_ne!(first, second);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.active_count(), 2);
        assert_eq!(backend.counters().instantiated, 2);
        assert_eq!(backend.segment(second).unwrap().position, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(pool.stats(), PoolStats { acquired: 2, created: 2, reused: 0, deactivate_calls: 0 });
    }

    #[test]
    fn inactive_handles_are_reused_in_insertion_order() {
        let mut backend = HeadlessBackend::new();
        let mut pool = SegmentPool::new();
        let first = acquire_at(&mut pool, &mut backend, 0.0);
        let second = acquire_at(&mut pool, &mut backend, 0.0);
        let _third = acquire_at(&mut pool, &mut backend, 0.0);

        pool.deactivate_all(&mut backend);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.inactive_count(), 3);
        assert!(backend.segments().iter().all(|segment| !segment.active));

        let reused = acquire_at(&mut pool, &mut backend, 5.0);
        assert_eq!(reused, first);
        assert!(pool.is_active(first));
        assert!(!pool.is_active(second));
        let segment = backend.segment(first).unwrap();
        assert!(segment.active);
        assert_eq!(segment.position, Vec3::new(5.0, 0.0, 0.0));

        assert_eq!(acquire_at(&mut pool, &mut backend, 6.0), second);
        assert_eq!(pool.len(), 3);
        assert_eq!(backend.counters().instantiated, 3);
        assert_eq!(pool.stats().reused, 2);
        assert_eq!(pool.active_handles().collect::<Vec<_>>(), vec![first, second]);
    }
}
