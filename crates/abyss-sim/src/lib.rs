//! Simulation engine for ABYSS.
//!
//! Owns the hecs ECS world, runs the vehicle and torpedo systems at a fixed
//! tick rate, and produces `SimSnapshot`s for the host.

pub mod engine;
pub mod guidance;
pub mod handles;
pub mod persistence;
pub mod rate_limit;
pub mod systems;
pub mod world_setup;

pub use abyss_core as core;
pub use engine::{SimConfig, SimulationEngine};
