pub use crate::galaxy::{GalaxyBuffers, GalaxyParameters, GalaxySet, GalaxySpawningControl};
