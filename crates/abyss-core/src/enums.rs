//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

/// Propulsion setting. Trades top speed for power draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementMode {
    #[default]
    Silent,
    Cruise,
    Flank,
}

impl MovementMode {
    /// Top forward speed in blocks per tick.
    pub fn max_speed(self) -> f64 {
        match self {
            MovementMode::Silent => 0.15,
            MovementMode::Cruise => 0.3,
            MovementMode::Flank => 0.45,
        }
    }

    /// Multiplier on the base movement power draw.
    pub fn power_multiplier(self) -> f64 {
        match self {
            MovementMode::Silent => 1.0,
            MovementMode::Cruise => 1.5,
            MovementMode::Flank => 2.5,
        }
    }

    /// Motor sound (volume, pitch) for this mode.
    pub fn motor_sound(self) -> (f32, f32) {
        match self {
            MovementMode::Silent => (0.3, 0.8),
            MovementMode::Cruise => (0.6, 1.0),
            MovementMode::Flank => (1.0, 1.2),
        }
    }

    pub fn next(self) -> Self {
        match self {
            MovementMode::Silent => MovementMode::Cruise,
            MovementMode::Cruise => MovementMode::Flank,
            MovementMode::Flank => MovementMode::Silent,
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(MovementMode::Silent),
            1 => Some(MovementMode::Cruise),
            2 => Some(MovementMode::Flank),
            _ => None,
        }
    }
}

/// Which entities a launched torpedo may lock onto.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetingMode {
    /// Any living creature or vehicle.
    #[default]
    All,
    Players,
    Vehicles,
    /// Living creatures that are not players.
    Other,
}

impl TargetingMode {
    pub fn next(self) -> Self {
        match self {
            TargetingMode::All => TargetingMode::Players,
            TargetingMode::Players => TargetingMode::Vehicles,
            TargetingMode::Vehicles => TargetingMode::Other,
            TargetingMode::Other => TargetingMode::All,
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(TargetingMode::All),
            1 => Some(TargetingMode::Players),
            2 => Some(TargetingMode::Vehicles),
            3 => Some(TargetingMode::Other),
            _ => None,
        }
    }
}

/// What an entity in the world is. Drives sonar classification and target filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Vehicle,
    Projectile,
    Player,
    /// Small fish and squid.
    SmallCreature,
    Creature,
    /// A dropped item floating in the world.
    Item,
}

impl EntityKind {
    pub fn is_living(self) -> bool {
        matches!(
            self,
            EntityKind::Player | EntityKind::SmallCreature | EntityKind::Creature
        )
    }
}

/// Sonar contact classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactClass {
    Small,
    Medium,
    Player,
    Item,
    Vehicle,
    Terrain,
}

/// Source of a damage application. Vehicles only take explosion damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageKind {
    Explosion,
    Other,
}

/// Why an area-effect detonation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetonationCause {
    /// Torpedo stayed out of the water past its grace window.
    LeftMedium,
    /// Torpedo went beyond its range from the launch point.
    OutOfRange,
    /// Torpedo hit its absolute travel cap.
    TravelCap,
    BlockImpact,
    EntityImpact,
    VehicleDestroyed,
}

/// Rate-limit bucket a command is charged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandCategory {
    Input,
    Fire,
    Ping,
    /// Shared by both mode toggles.
    ModeToggle,
    Dismount,
}

impl CommandCategory {
    /// Minimum time between two accepted commands of this category (ms).
    pub fn cooldown_ms(self) -> u64 {
        match self {
            CommandCategory::Input => RATE_LIMIT_INPUT_MS,
            CommandCategory::Fire => RATE_LIMIT_FIRE_MS,
            CommandCategory::Ping => RATE_LIMIT_PING_MS,
            CommandCategory::ModeToggle => RATE_LIMIT_MODE_TOGGLE_MS,
            CommandCategory::Dismount => RATE_LIMIT_DISMOUNT_MS,
        }
    }
}

/// Reason a fire request did not launch a torpedo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FireRejection {
    #[error("vehicle is not submerged")]
    NotSubmerged,
    #[error("weapon is cooling down or arming")]
    NotReady,
    #[error("insufficient power to fire")]
    InsufficientPower,
    #[error("no torpedoes loaded")]
    NoOrdnance,
}
