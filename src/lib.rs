pub mod archetype;
pub mod config;
pub mod filler;
pub mod generator;
pub mod geometry;
pub mod layout;
pub mod partition;
pub mod raster;
pub mod render;
pub mod rng;

pub use config::CityConfig;
pub use generator::{CityPlan, GenerationSummary, Generator, GeneratorBuilder, GeneratorSettings};
