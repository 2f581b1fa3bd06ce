mod backend;
mod systems;
mod types;
mod world;

pub use systems::*;
pub use types::*;
pub use world::*;
