//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only
//! passes) plus the terrain. They do not own state; all state lives in components.

pub mod cleanup;
pub mod collision;
pub mod damage;
pub mod environment;
pub mod movement;
pub mod power;
pub mod projectile;
pub mod snapshot;
pub mod sonar;
pub mod vehicle;
pub mod weapons;
