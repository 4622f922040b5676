//! Per-tick snapshot of the simulation, consumed by renderers and HUDs.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::TICK_RATE;
use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{ActorId, EntityId, Position, SimTime, Velocity};

/// Complete simulation state after one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub vehicles: Vec<VehicleView>,
    pub projectiles: Vec<ProjectileView>,
    /// Events raised since the previous snapshot.
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleView {
    pub id: EntityId,
    pub position: Position,
    pub yaw: f64,
    pub health: f64,
    pub power: f64,
    pub power_percent: f64,
    /// Blocks per tick, negative astern.
    pub signed_speed: f64,
    pub depth: i32,
    pub submerged: bool,
    pub torpedo_count: u32,
    pub arming_ticks: u32,
    pub cooldown_ticks: u32,
    /// Ready-to-fire indicator: warm and loaded.
    pub torpedo_armed: bool,
    pub movement_mode: MovementMode,
    pub targeting_mode: TargetingMode,
    pub pilot: Option<ActorId>,
    pub sonar: SonarView,
}

impl VehicleView {
    /// Speed for the HUD in blocks per second.
    pub fn speed_blocks_per_sec(&self) -> f64 {
        self.signed_speed * TICK_RATE as f64
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SonarView {
    pub sweep_angle: f64,
    /// Only contacts that are revealed and not yet fully faded.
    pub contacts: Vec<ContactView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactView {
    pub relative: DVec3,
    pub distance: f64,
    pub bearing: f64,
    pub class: ContactClass,
    pub alpha: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub position: Position,
    pub velocity: Velocity,
    pub yaw: f64,
    pub ticks_alive: u32,
    pub target: Option<EntityId>,
}
