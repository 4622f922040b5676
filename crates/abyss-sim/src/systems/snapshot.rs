//! Snapshot builder: reads the ECS world and produces a `SimSnapshot`.

use hecs::{Entity, World};

use abyss_core::components::*;
use abyss_core::events::SimEvent;
use abyss_core::state::*;
use abyss_core::types::{Position, SimTime, Velocity};

use crate::handles::id_of;
use crate::systems::{projectile, weapons};

/// Build a complete snapshot from the current world state.
///
/// Contact fades are sampled at `now_ms`, the clock the systems just ran at,
/// so a contact revealed this tick shows at full opacity.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    now_ms: u64,
    events: Vec<SimEvent>,
) -> SimSnapshot {
    let mut vehicles: Vec<VehicleView> = {
        let mut query = world.query::<(
            &Vehicle,
            &Position,
            &Heading,
            &Health,
            &PowerCell,
            &WeaponBay,
            &Sonar,
            &Telemetry,
        )>();
        query
            .iter()
            .map(|(entity, parts)| vehicle_view(entity, now_ms, parts))
            .collect()
    };
    vehicles.sort_by_key(|v| v.id);

    let mut projectiles: Vec<ProjectileView> = {
        let mut query = world.query::<(&Projectile, &Position, &Velocity, &Heading)>();
        query
            .iter()
            .map(|(entity, (state, pos, vel, heading))| ProjectileView {
                id: id_of(entity),
                position: *pos,
                velocity: *vel,
                yaw: heading.yaw,
                ticks_alive: state.ticks_alive,
                target: projectile::locked_target(world, state),
            })
            .collect()
    };
    projectiles.sort_by_key(|p| p.id);

    SimSnapshot {
        time: *time,
        vehicles,
        projectiles,
        events,
    }
}

type VehicleParts<'a> = (
    &'a Vehicle,
    &'a Position,
    &'a Heading,
    &'a Health,
    &'a PowerCell,
    &'a WeaponBay,
    &'a Sonar,
    &'a Telemetry,
);

fn vehicle_view(entity: Entity, now_ms: u64, parts: VehicleParts<'_>) -> VehicleView {
    let (v, pos, heading, health, cell, bay, sonar, telemetry) = parts;
    let contacts = sonar
        .contacts
        .iter()
        .filter_map(|c| {
            let alpha = c.fade_alpha(now_ms);
            (alpha > 0.0).then(|| ContactView {
                relative: c.relative,
                distance: c.distance,
                bearing: c.bearing,
                class: c.class,
                alpha,
            })
        })
        .collect();

    VehicleView {
        id: id_of(entity),
        position: *pos,
        yaw: heading.yaw,
        health: health.current,
        power: cell.current,
        power_percent: if cell.max > 0.0 {
            cell.current / cell.max * 100.0
        } else {
            0.0
        },
        signed_speed: telemetry.signed_speed,
        depth: telemetry.depth,
        submerged: telemetry.submerged,
        torpedo_count: bay.torpedo_count,
        arming_ticks: bay.arming,
        cooldown_ticks: bay.cooldown,
        torpedo_armed: weapons::is_armed(bay) && bay.torpedo_count > 0,
        movement_mode: v.movement_mode,
        targeting_mode: v.targeting_mode,
        pilot: v.pilot,
        sonar: SonarView {
            sweep_angle: sonar.sweep_angle,
            contacts,
        },
    }
}

/// View of a single vehicle outside the tick (for host queries).
pub fn view_of(world: &World, entity: Entity, now_ms: u64) -> Option<VehicleView> {
    let mut query = world
        .query_one::<(
            &Vehicle,
            &Position,
            &Heading,
            &Health,
            &PowerCell,
            &WeaponBay,
            &Sonar,
            &Telemetry,
        )>(entity)
        .ok()?;
    let parts = query.get()?;
    Some(vehicle_view(entity, now_ms, parts))
}
