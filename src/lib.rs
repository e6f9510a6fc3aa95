pub mod align;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod layouts;
pub mod loader;
pub mod ranking;
pub mod signal;
pub mod synth;
pub mod trainer;
pub mod vocab;

pub use engine::{EngineBuildParams, GazeEngine};
pub use error::{GazeError, GtResult};
