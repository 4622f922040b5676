//! Core types and definitions for the ABYSS submarine simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, configs, inventory, commands, state snapshots, events, and constants.
//! It has no dependency on the ECS or any runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod contact;
pub mod enums;
pub mod events;
pub mod inventory;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
