//! ABYSS headless harness.
//!
//! Wires the simulation crates together: builds an ocean, runs the engine on
//! a fixed-rate game-loop thread and drives it with a scripted sortie.

pub mod error;
pub mod game_loop;
pub mod scenario;
pub mod state;

pub use abyss_core as core;
