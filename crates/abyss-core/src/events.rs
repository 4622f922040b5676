//! Events emitted by the simulation for audio, effects and the host world.
//!
//! State transitions (motor start, low-power crossing) are edge-detected inside
//! the simulation; consumers only ever see the discrete events.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, Position};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    VehiclePlaced {
        vehicle: EntityId,
        position: Position,
    },
    VehicleRepaired {
        vehicle: EntityId,
        health: f64,
    },
    VehicleDestroyed {
        vehicle: EntityId,
        position: Position,
    },
    /// Vehicle started moving this tick.
    MotorStarted {
        vehicle: EntityId,
        volume: f32,
        pitch: f32,
    },
    /// Periodic motor loop while moving.
    MotorHum {
        vehicle: EntityId,
        volume: f32,
        pitch: f32,
    },
    /// Power just dropped below the warning threshold.
    LowPowerWarning { vehicle: EntityId },
    TorpedoFired {
        vehicle: EntityId,
        projectile: EntityId,
    },
    FireRejected {
        vehicle: EntityId,
        reason: FireRejection,
    },
    SonarPing {
        vehicle: EntityId,
        contact_count: usize,
    },
    /// Request for the host to apply an area effect.
    Detonation {
        position: Position,
        power: f64,
        cause: DetonationCause,
    },
    EntityDamaged { target: EntityId, amount: f64 },
}
