mod galaxy_config;
mod generator;
mod spawn_galaxy;

pub use galaxy_config::{GalaxyConfigPlugin, GalaxyParameters, GalaxySet};
pub use generator::{generate, GalaxyBuffers};
pub use spawn_galaxy::{GalaxySpawningControl, SpawnGalaxyPlugin};
