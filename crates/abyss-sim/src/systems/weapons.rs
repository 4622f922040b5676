//! Torpedo bay: cooldown/arming timers, ammunition recount and the fire sequence.

use hecs::{Entity, World};
use tracing::debug;

use abyss_core::components::{Extent, Heading, PowerCell, Vehicle, WeaponBay};
use abyss_core::enums::FireRejection;
use abyss_core::inventory::Inventory;
use abyss_core::types::Position;
use abyss_terrain::Terrain;

use crate::handles::id_of;
use crate::systems::{collision, environment, power};
use crate::world_setup;

/// Count both timers down, floored at zero.
pub fn tick(bay: &mut WeaponBay) {
    bay.cooldown = bay.cooldown.saturating_sub(1);
    bay.arming = bay.arming.saturating_sub(1);
}

pub fn can_fire(bay: &WeaponBay) -> bool {
    bay.cooldown == 0 && bay.arming == 0
}

pub fn is_armed(bay: &WeaponBay) -> bool {
    bay.arming == 0
}

/// Recount ordnance. Loading into an empty bay (0 -> positive) restarts arming;
/// other count changes leave the timer alone.
pub fn update_ammo_count(bay: &mut WeaponBay, cargo: &Inventory, arming_ticks: u32) {
    let count = cargo.count_where(|kind| kind.is_ordnance());
    if bay.previous_count == 0 && count > 0 {
        bay.arming = arming_ticks;
    }
    bay.previous_count = count;
    bay.torpedo_count = count;
}

/// Start both timers after a launch.
pub fn set_fired(bay: &mut WeaponBay, cooldown_ticks: u32, arming_ticks: u32) {
    bay.cooldown = cooldown_ticks;
    bay.arming = arming_ticks;
}

/// Remove one ordnance item from the first slot holding any.
pub fn find_and_consume_one(cargo: &mut Inventory) -> bool {
    let slot = cargo
        .iter()
        .find(|(_, stack)| stack.kind.is_ordnance())
        .map(|(slot, _)| slot);
    match slot {
        Some(slot) => {
            cargo.decrement(slot, 1);
            true
        }
        None => false,
    }
}

/// Launch a torpedo from `vehicle`.
///
/// Reserves the fire cost before looking for ordnance and refunds it if none
/// is found. Nothing is mutated on any other failure.
pub fn fire<T: Terrain + ?Sized>(
    world: &mut World,
    terrain: &T,
    vehicle: Entity,
) -> Result<Entity, FireRejection> {
    let (spawn_at, yaw, config, targeting_mode) = {
        let (v, pos, heading, extent, cell, bay, cargo) = world
            .query_one_mut::<(
                &Vehicle,
                &Position,
                &Heading,
                &Extent,
                &mut PowerCell,
                &mut WeaponBay,
                &mut Inventory,
            )>(vehicle)
            .map_err(|_| FireRejection::NotReady)?;

        let hull = collision::body_box(pos, extent, heading.yaw);
        if !environment::is_submerged(terrain, &hull) {
            return Err(FireRejection::NotSubmerged);
        }
        if !can_fire(bay) {
            return Err(FireRejection::NotReady);
        }
        let cost = v.config.fire_cost;
        if !power::has_power(cell) || !power::consume_amount(cell, cost) {
            return Err(FireRejection::InsufficientPower);
        }
        if !find_and_consume_one(cargo) {
            power::refund(cell, cost);
            return Err(FireRejection::NoOrdnance);
        }

        let spawn_at = world_setup::launch_point(pos, heading.yaw, &v.config);
        (spawn_at, heading.yaw, v.config, v.targeting_mode)
    };

    let torpedo = world_setup::spawn_projectile(
        world,
        spawn_at,
        Heading { yaw, pitch: 0.0 },
        config.projectile,
        Some(id_of(vehicle)),
        targeting_mode,
    );

    if let Ok((bay, cargo)) = world.query_one_mut::<(&mut WeaponBay, &Inventory)>(vehicle) {
        set_fired(bay, config.cooldown_ticks, config.arming_ticks);
        update_ammo_count(bay, cargo, config.arming_ticks);
    }
    debug!(?vehicle, ?torpedo, "torpedo launched");
    Ok(torpedo)
}
