//! Data-driven vehicle and projectile configuration.
//!
//! Variants are expressed as different config values injected into the one
//! concrete vehicle and projectile type. Every struct deserializes with
//! missing fields taken from its default preset, so hosts can ship partial
//! JSON overrides.

use serde::{Deserialize, Serialize};

/// Easing constants for the three helm axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelmTuning {
    /// Forward/vertical speed gained per tick toward the commanded speed.
    pub acceleration: f64,
    /// Forward/vertical speed shed per tick when the axis is released.
    pub deceleration: f64,
    /// Turn rate at full rudder (degrees per tick).
    pub rotation_speed: f64,
    pub rotation_acceleration: f64,
    pub rotation_deceleration: f64,
    /// Vertical top speed as a fraction of the mode's forward top speed.
    pub vertical_multiplier: f64,
    /// Reverse top speed as a fraction of the mode's forward top speed.
    pub backward_multiplier: f64,
}

impl Default for HelmTuning {
    fn default() -> Self {
        Self {
            acceleration: 0.005,
            deceleration: 0.003,
            rotation_speed: 2.0,
            rotation_acceleration: 0.5,
            rotation_deceleration: 0.7,
            vertical_multiplier: 0.4,
            backward_multiplier: 0.6,
        }
    }
}

/// Guided torpedo parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Constant travel speed (blocks per tick).
    pub speed: f64,
    /// Detonates beyond this distance from the launch point.
    pub max_range: f64,
    /// Detonates once total distance traveled reaches this.
    pub travel_cap: f64,
    pub explosion_power: f64,
    /// Damage dealt to an entity struck directly.
    pub direct_damage: f64,
    pub width: f64,
    pub height: f64,
    pub length: f64,
    /// Ticks after launch before the seeker acquires or steers.
    pub arming_ticks: u32,
    /// Ticks after launch during which leaving the water is tolerated.
    pub medium_grace_ticks: u32,
    pub detection_range: f64,
    /// Full width of the seeker cone (degrees).
    pub detection_cone_degrees: f64,
    pub max_turn_degrees: f64,
}

impl ProjectileConfig {
    /// The standard lightweight torpedo.
    pub fn lightweight() -> Self {
        Self {
            speed: 55.0 / 20.0,
            max_range: 128.0,
            travel_cap: 128.0,
            explosion_power: 4.0,
            direct_damage: 50.0,
            width: 0.5,
            height: 0.5,
            length: 2.0,
            arming_ticks: 10,
            medium_grace_ticks: 5,
            detection_range: 30.0,
            detection_cone_degrees: 90.0,
            max_turn_degrees: 5.0,
        }
    }
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self::lightweight()
    }
}

/// Full vehicle configuration: hull, power plant, armament and helm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub helm: HelmTuning,
    pub max_power: f64,
    /// Power drained per tick while moving, before the mode multiplier.
    pub power_consumption: f64,
    pub max_health: f64,
    pub cooldown_ticks: u32,
    /// Warm-up after launch or after loading into an empty bay.
    pub arming_ticks: u32,
    pub fire_cost: f64,
    pub ping_cost: f64,
    /// Distance ahead of the hull at which torpedoes are spawned.
    pub launch_offset: f64,
    pub width: f64,
    pub height: f64,
    pub length: f64,
    /// Blast power when the hull is destroyed.
    pub destruction_power: f64,
    pub projectile: ProjectileConfig,
}

impl VehicleConfig {
    /// The standard tactical submarine.
    pub fn tactical() -> Self {
        Self {
            helm: HelmTuning::default(),
            max_power: 100.0,
            power_consumption: 0.01,
            max_health: 100.0,
            cooldown_ticks: 40,
            arming_ticks: 60,
            fire_cost: 2.0,
            ping_cost: 2.0,
            launch_offset: 4.0,
            width: 2.5,
            height: 2.5,
            length: 6.5,
            destruction_power: 4.0,
            projectile: ProjectileConfig::lightweight(),
        }
    }
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self::tactical()
    }
}
