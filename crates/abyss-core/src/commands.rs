//! Pilot commands addressed to a vehicle.
//!
//! Commands arrive already decoded, pass the rate limiter and occupancy
//! check at the engine boundary, and are applied at the next tick.

use serde::{Deserialize, Serialize};

use crate::components::Controls;
use crate::enums::CommandCategory;
use crate::types::EntityId;

/// All pilot actions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VehicleCommand {
    /// Latest state of the six input axes.
    MoveInput {
        vehicle: EntityId,
        forward: bool,
        backward: bool,
        left: bool,
        right: bool,
        up: bool,
        down: bool,
    },
    Fire { vehicle: EntityId },
    Dismount { vehicle: EntityId },
    Ping { vehicle: EntityId },
    ToggleMovementMode { vehicle: EntityId },
    ToggleTargetingMode { vehicle: EntityId },
}

impl VehicleCommand {
    /// Vehicle this command addresses.
    pub fn vehicle(&self) -> EntityId {
        match *self {
            VehicleCommand::MoveInput { vehicle, .. }
            | VehicleCommand::Fire { vehicle }
            | VehicleCommand::Dismount { vehicle }
            | VehicleCommand::Ping { vehicle }
            | VehicleCommand::ToggleMovementMode { vehicle }
            | VehicleCommand::ToggleTargetingMode { vehicle } => vehicle,
        }
    }

    pub fn category(&self) -> CommandCategory {
        match self {
            VehicleCommand::MoveInput { .. } => CommandCategory::Input,
            VehicleCommand::Fire { .. } => CommandCategory::Fire,
            VehicleCommand::Dismount { .. } => CommandCategory::Dismount,
            VehicleCommand::Ping { .. } => CommandCategory::Ping,
            VehicleCommand::ToggleMovementMode { .. }
            | VehicleCommand::ToggleTargetingMode { .. } => CommandCategory::ModeToggle,
        }
    }

    /// Build a `MoveInput` from a controls snapshot.
    pub fn move_input(vehicle: EntityId, controls: Controls) -> Self {
        VehicleCommand::MoveInput {
            vehicle,
            forward: controls.forward,
            backward: controls.backward,
            left: controls.left,
            right: controls.right,
            up: controls.up,
            down: controls.down,
        }
    }
}
