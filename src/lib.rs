pub mod backend;
pub mod config;
pub mod ecs;
pub mod geometry;
pub mod headless;
pub mod pool;
pub mod trail;

pub use backend::SegmentBackend;
pub use config::{DegenerateRotation, TrailConfig, TrailConfigOverrides};
pub use geometry::{solve_segment, solve_trail, SegmentPlacement};
pub use pool::{PoolStats, SegmentPool};
pub use trail::{TrailController, TrailStats, TrailUpdate};
