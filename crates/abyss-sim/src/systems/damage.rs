//! Damage application and vehicle destruction.
//!
//! Blast propagation is the host's job: destruction and torpedo detonations
//! are surfaced as `SimEvent::Detonation` requests.

use hecs::{Entity, World};
use tracing::info;

use abyss_core::components::{Health, Helm, Vehicle};
use abyss_core::enums::{DamageKind, DetonationCause};
use abyss_core::events::SimEvent;
use abyss_core::types::Position;

use crate::handles::id_of;

/// Apply damage to `target`. Returns whether any was applied.
///
/// Vehicles only accept explosion damage. An entity reaching zero health is
/// queued for despawn; a vehicle additionally ejects its pilot and requests a
/// destruction blast.
pub fn apply(
    world: &mut World,
    target: Entity,
    kind: DamageKind,
    amount: f64,
    events: &mut Vec<SimEvent>,
    despawn: &mut Vec<Entity>,
) -> bool {
    if amount <= 0.0 {
        return false;
    }
    let is_vehicle = world.get::<&Vehicle>(target).is_ok();
    if is_vehicle && kind != DamageKind::Explosion {
        return false;
    }

    let dead = {
        let Ok(mut health) = world.get::<&mut Health>(target) else {
            return false;
        };
        if health.current <= 0.0 {
            return false;
        }
        health.current = (health.current - amount).clamp(0.0, health.max);
        health.current <= 0.0
    };
    events.push(SimEvent::EntityDamaged {
        target: id_of(target),
        amount,
    });

    if dead {
        if is_vehicle {
            destroy_vehicle(world, target, events);
        }
        despawn.push(target);
    }
    true
}

fn destroy_vehicle(world: &mut World, target: Entity, events: &mut Vec<SimEvent>) {
    let Ok((vehicle, pos, helm)) =
        world.query_one_mut::<(&mut Vehicle, &Position, &mut Helm)>(target)
    else {
        return;
    };
    let pilot = vehicle.pilot.take();
    *helm = Helm::default();
    info!(vehicle = ?target, ?pilot, "vehicle destroyed");
    events.push(SimEvent::VehicleDestroyed {
        vehicle: id_of(target),
        position: *pos,
    });
    events.push(SimEvent::Detonation {
        position: *pos,
        power: vehicle.config.destruction_power,
        cause: DetonationCause::VehicleDestroyed,
    });
}
