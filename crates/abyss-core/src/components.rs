//! ECS components for hecs entities.
//!
//! Components are plain data structs. Subsystem logic (helm easing, power,
//! weapons, sonar, guidance) lives in the simulation systems, not here.

use serde::{Deserialize, Serialize};

use crate::config::{ProjectileConfig, VehicleConfig};
use crate::contact::SonarContact;
use crate::enums::{MovementMode, TargetingMode};
use crate::types::{ActorId, EntityId, Position};

/// Orientation in degrees. Yaw 0 faces +z, increasing clockwise seen from above.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub yaw: f64,
    pub pitch: f64,
}

/// Physical dimensions. The position is the bottom-center of the box, or its
/// center for oriented bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
    pub length: f64,
    /// When true the box is rotated with the yaw; otherwise it is a square
    /// footprint sized by the larger of width and length.
    pub oriented: bool,
}

/// Hit points, always within [0, max].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

/// Marker: entity is hidden from torpedo seekers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invisible;

/// Six independent pilot input axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Controls {
    /// Any translation or turn input active.
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }
}

/// Current helm rates, eased toward the commanded values each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Helm {
    /// Blocks per tick along the heading (negative = astern).
    pub forward: f64,
    /// Blocks per tick along world-up.
    pub vertical: f64,
    /// Degrees per tick (positive = starboard).
    pub rotation: f64,
    pub controls: Controls,
}

/// Energy store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerCell {
    pub current: f64,
    pub max: f64,
}

/// Torpedo bay timers and ammunition bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponBay {
    /// Ticks until the next shot is permitted.
    pub cooldown: u32,
    /// Ticks until loaded ordnance is warm.
    pub arming: u32,
    pub torpedo_count: u32,
    /// Count seen on the previous recount; used to detect the empty-to-loaded edge.
    pub previous_count: u32,
}

/// Active sonar state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sonar {
    /// Vehicle-relative sweep bearing in [0, 360).
    pub sweep_angle: f64,
    pub contacts: Vec<SonarContact>,
}

/// Vehicle identity, settings and edge-detection memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub config: VehicleConfig,
    pub movement_mode: MovementMode,
    pub targeting_mode: TargetingMode,
    /// The sole occupant, if any.
    pub pilot: Option<ActorId>,
    pub was_moving: bool,
    pub was_low_power: bool,
    /// Ticks since spawn (or load).
    pub age: u64,
}

/// Derived display values, recomputed at the end of every vehicle tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Blocks per tick; negative when moving astern.
    pub signed_speed: f64,
    pub depth: i32,
    pub submerged: bool,
}

/// Guided torpedo in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub config: ProjectileConfig,
    pub start: Position,
    pub distance_traveled: f64,
    pub ticks_alive: u32,
    /// Current seeker lock (weak).
    pub target: Option<EntityId>,
    /// Launching vehicle (weak), used only to exclude self-hits.
    pub owner: Option<EntityId>,
    pub targeting_mode: TargetingMode,
}
