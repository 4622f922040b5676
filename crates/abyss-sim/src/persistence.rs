//! Save/load of vehicles and torpedoes.
//!
//! Records are flat named fields in a structured store (JSON here). Absent
//! fields default to a fresh entity; present but malformed fields fail the
//! load with a `PersistError`.

use std::collections::HashMap;
use std::path::Path;

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use abyss_core::components::*;
use abyss_core::config::VehicleConfig;
use abyss_core::constants::INVENTORY_SLOTS;
use abyss_core::enums::{MovementMode, TargetingMode};
use abyss_core::inventory::{Inventory, ItemKind, ItemStack};
use abyss_core::types::{Position, Velocity};

use crate::handles::id_of;
use crate::world_setup;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("save file I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown {field} ordinal {value}")]
    UnknownOrdinal { field: &'static str, value: u8 },
    #[error("inventory slot {0} out of range")]
    SlotOutOfRange(usize),
    #[error("{0} is not a finite number")]
    NotFinite(&'static str),
}

/// One occupied inventory slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SlotRecord {
    pub slot: usize,
    pub item: ItemKind,
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VehicleRecord {
    /// Handle at save time; used only to re-link torpedo owners on load.
    pub id: Option<u64>,
    pub config: Option<VehicleConfig>,
    pub pos: Position,
    pub yaw: f64,
    pub health: Option<f64>,
    pub power: Option<f64>,
    pub forward_speed: f64,
    pub vertical_speed: f64,
    pub rotation_speed: f64,
    pub torpedo_cooldown: u32,
    pub previous_torpedo_count: u32,
    pub movement_mode: u8,
    pub targeting_mode: u8,
    pub inventory: Vec<SlotRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProjectileRecord {
    pub config: Option<abyss_core::config::ProjectileConfig>,
    pub pos: Position,
    pub motion: Velocity,
    pub yaw: f64,
    pub pitch: f64,
    /// Launch point; defaults to the current position.
    pub start_pos: Option<Position>,
    pub ticks_alive: u32,
    /// Saved handle of the launching vehicle, -1 for none.
    pub owner_vehicle_id: i64,
    pub distance_traveled: f64,
    pub targeting_mode: u8,
}

impl Default for ProjectileRecord {
    fn default() -> Self {
        Self {
            config: None,
            pos: Position::default(),
            motion: Velocity::default(),
            yaw: 0.0,
            pitch: 0.0,
            start_pos: None,
            ticks_alive: 0,
            owner_vehicle_id: -1,
            distance_traveled: 0.0,
            targeting_mode: TargetingMode::All.ordinal(),
        }
    }
}

/// Everything needed to rebuild the vehicles and torpedoes of a world.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSave {
    pub tick: u64,
    pub vehicles: Vec<VehicleRecord>,
    pub projectiles: Vec<ProjectileRecord>,
}

impl VehicleRecord {
    pub fn from_value(value: serde_json::Value) -> Result<Self, PersistError> {
        Ok(serde_json::from_value(value)?)
    }
}

impl ProjectileRecord {
    pub fn from_value(value: serde_json::Value) -> Result<Self, PersistError> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Save to a JSON file.
pub fn save_to_file(save: &WorldSave, path: &Path) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(save)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load from a JSON file.
pub fn load_from_file(path: &Path) -> Result<WorldSave, PersistError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn finite(value: f64, field: &'static str) -> Result<f64, PersistError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PersistError::NotFinite(field))
    }
}

/// Snapshot a vehicle entity into a record.
pub fn vehicle_record(world: &World, entity: Entity) -> Option<VehicleRecord> {
    let mut query = world
        .query_one::<(
            &Vehicle,
            &Position,
            &Heading,
            &Health,
            &PowerCell,
            &Helm,
            &WeaponBay,
            &Inventory,
        )>(entity)
        .ok()?;
    let (vehicle, pos, heading, health, cell, helm, bay, cargo) = query.get()?;
    Some(VehicleRecord {
        id: Some(id_of(entity).0),
        config: Some(vehicle.config),
        pos: *pos,
        yaw: heading.yaw,
        health: Some(health.current),
        power: Some(cell.current),
        forward_speed: helm.forward,
        vertical_speed: helm.vertical,
        rotation_speed: helm.rotation,
        torpedo_cooldown: bay.cooldown,
        previous_torpedo_count: bay.previous_count,
        movement_mode: vehicle.movement_mode.ordinal(),
        targeting_mode: vehicle.targeting_mode.ordinal(),
        inventory: cargo
            .iter()
            .map(|(slot, stack)| SlotRecord {
                slot,
                item: stack.kind,
                count: stack.count,
            })
            .collect(),
    })
}

/// Rebuild a vehicle from a record. The record is fully validated before
/// anything is spawned.
pub fn restore_vehicle(world: &mut World, record: &VehicleRecord) -> Result<Entity, PersistError> {
    let config = record.config.unwrap_or_default();
    let movement_mode =
        MovementMode::from_ordinal(record.movement_mode).ok_or(PersistError::UnknownOrdinal {
            field: "MovementMode",
            value: record.movement_mode,
        })?;
    let targeting_mode =
        TargetingMode::from_ordinal(record.targeting_mode).ok_or(PersistError::UnknownOrdinal {
            field: "TargetingMode",
            value: record.targeting_mode,
        })?;

    let mut cargo = Inventory::default();
    for slot in &record.inventory {
        if slot.slot >= INVENTORY_SLOTS {
            return Err(PersistError::SlotOutOfRange(slot.slot));
        }
        cargo.set(slot.slot, Some(ItemStack::new(slot.item, slot.count)));
    }

    let health = finite(record.health.unwrap_or(config.max_health), "Health")?;
    let power = finite(record.power.unwrap_or(config.max_power), "Power")?;
    let pos = Position::new(
        finite(record.pos.x, "Pos")?,
        finite(record.pos.y, "Pos")?,
        finite(record.pos.z, "Pos")?,
    );

    let yaw = finite(record.yaw, "Yaw")?;
    let rates = Helm {
        forward: finite(record.forward_speed, "ForwardSpeed")?,
        vertical: finite(record.vertical_speed, "VerticalSpeed")?,
        rotation: finite(record.rotation_speed, "RotationSpeed")?,
        controls: Default::default(),
    };

    let entity = world_setup::spawn_vehicle(world, pos, yaw, config);
    if let Ok((vehicle, hp, cell, helm, bay, inv)) = world.query_one_mut::<(
        &mut Vehicle,
        &mut Health,
        &mut PowerCell,
        &mut Helm,
        &mut WeaponBay,
        &mut Inventory,
    )>(entity)
    {
        vehicle.movement_mode = movement_mode;
        vehicle.targeting_mode = targeting_mode;
        hp.current = health.clamp(0.0, hp.max);
        cell.current = power.clamp(0.0, cell.max);
        *helm = rates;
        bay.cooldown = record.torpedo_cooldown;
        bay.previous_count = record.previous_torpedo_count;
        bay.torpedo_count = cargo.count_where(|kind| kind.is_ordnance());
        *inv = cargo;
    }
    Ok(entity)
}

/// Snapshot a torpedo entity into a record.
pub fn projectile_record(world: &World, entity: Entity) -> Option<ProjectileRecord> {
    let mut query = world
        .query_one::<(&Projectile, &Position, &Velocity, &Heading)>(entity)
        .ok()?;
    let (state, pos, vel, heading) = query.get()?;
    Some(ProjectileRecord {
        config: Some(state.config),
        pos: *pos,
        motion: *vel,
        yaw: heading.yaw,
        pitch: heading.pitch,
        start_pos: Some(state.start),
        ticks_alive: state.ticks_alive,
        owner_vehicle_id: state.owner.map_or(-1, |id| id.0 as i64),
        distance_traveled: state.distance_traveled,
        targeting_mode: state.targeting_mode.ordinal(),
    })
}

/// Rebuild a torpedo. `owners` maps saved vehicle handles to their restored
/// entities; an owner that did not survive the load is simply dropped.
pub fn restore_projectile(
    world: &mut World,
    record: &ProjectileRecord,
    owners: &HashMap<u64, Entity>,
) -> Result<Entity, PersistError> {
    let targeting_mode =
        TargetingMode::from_ordinal(record.targeting_mode).ok_or(PersistError::UnknownOrdinal {
            field: "TargetingMode",
            value: record.targeting_mode,
        })?;
    let owner = u64::try_from(record.owner_vehicle_id)
        .ok()
        .and_then(|saved| owners.get(&saved))
        .map(|&entity| id_of(entity));

    let projectile = Projectile {
        config: record.config.unwrap_or_default(),
        start: record.start_pos.unwrap_or(record.pos),
        distance_traveled: finite(record.distance_traveled, "DistanceTraveled")?,
        ticks_alive: record.ticks_alive,
        target: None,
        owner,
        targeting_mode,
    };
    Ok(world_setup::spawn_projectile_with(
        world,
        record.pos,
        record.motion,
        Heading {
            yaw: finite(record.yaw, "Yaw")?,
            pitch: finite(record.pitch, "Pitch")?,
        },
        projectile,
    ))
}

/// Capture every vehicle and torpedo in the world.
pub fn capture(world: &World, tick: u64) -> WorldSave {
    let mut vehicles: Vec<Entity> = world.query::<&Vehicle>().iter().map(|(e, _)| e).collect();
    let mut projectiles: Vec<Entity> = world.query::<&Projectile>().iter().map(|(e, _)| e).collect();
    vehicles.sort_by_key(|e| e.to_bits());
    projectiles.sort_by_key(|e| e.to_bits());
    WorldSave {
        tick,
        vehicles: vehicles
            .into_iter()
            .filter_map(|e| vehicle_record(world, e))
            .collect(),
        projectiles: projectiles
            .into_iter()
            .filter_map(|e| projectile_record(world, e))
            .collect(),
    }
}

/// Restore all records into `world`. Returns the new vehicle entities.
pub fn restore(world: &mut World, save: &WorldSave) -> Result<Vec<Entity>, PersistError> {
    let mut owners = HashMap::new();
    let mut restored = Vec::with_capacity(save.vehicles.len());
    for record in &save.vehicles {
        let entity = restore_vehicle(world, record)?;
        if let Some(saved) = record.id {
            owners.insert(saved, entity);
        }
        restored.push(entity);
    }
    for record in &save.projectiles {
        restore_projectile(world, record, &owners)?;
    }
    Ok(restored)
}
