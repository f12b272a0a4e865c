//! Configuration and dependency wiring.

mod dependencies;
mod engine_config;

pub use dependencies::Dependencies;
pub use engine_config::EngineConfig;
