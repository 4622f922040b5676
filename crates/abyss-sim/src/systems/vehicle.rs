//! Per-tick vehicle update in fixed order:
//! helm -> environment -> power -> weapons -> sonar, then telemetry and
//! edge-detected events.

use hecs::{Entity, World};

use abyss_core::components::*;
use abyss_core::constants::{LOW_POWER_FRACTION, MOTOR_HUM_INTERVAL_TICKS};
use abyss_core::events::SimEvent;
use abyss_core::inventory::Inventory;
use abyss_core::types::Position;
use abyss_terrain::Terrain;

use crate::handles::id_of;
use crate::systems::{collision, environment, movement, power, sonar, weapons};

pub fn run<T: Terrain + ?Sized>(
    world: &mut World,
    terrain: &T,
    now_ms: u64,
    events: &mut Vec<SimEvent>,
) {
    let vehicles: Vec<Entity> = world
        .query::<&Vehicle>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();

    for entity in vehicles {
        let Ok((vehicle, pos, heading, extent, helm, cell, bay, sonar_state, cargo, telemetry)) =
            world.query_one_mut::<(
                &mut Vehicle,
                &mut Position,
                &mut Heading,
                &Extent,
                &mut Helm,
                &mut PowerCell,
                &mut WeaponBay,
                &mut Sonar,
                &mut Inventory,
                &mut Telemetry,
            )>(entity)
        else {
            continue;
        };
        let id = id_of(entity);
        let config = vehicle.config;
        vehicle.age += 1;

        // 1. Helm. Unpowered or dry: all stop, input ignored.
        let hull = collision::body_box(pos, extent, heading.yaw);
        let submerged = environment::is_submerged(terrain, &hull);
        if power::has_power(cell) && submerged {
            movement::advance(helm, &config.helm, vehicle.movement_mode.max_speed());
        } else {
            movement::stop(helm);
        }
        heading.yaw = sonar::sweep::normalize_degrees(heading.yaw + helm.rotation);

        // 2. Environment.
        let mut motion = movement::displacement(helm, heading.yaw);
        motion = environment::apply_fluid_constraint(submerged, motion);
        motion = environment::clamp_to_surface(terrain, pos.y, extent.height, motion);
        let hull = collision::body_box(pos, extent, heading.yaw);
        *pos = pos.offset(environment::resolve_motion(terrain, &hull, motion));

        // 3. Power.
        let moving = helm.controls.is_moving();
        power::consume(
            cell,
            moving,
            config.power_consumption,
            vehicle.movement_mode.power_multiplier(),
        );
        power::try_consume_fuel(cell, cargo);

        // 4. Weapons.
        weapons::tick(bay);
        weapons::update_ammo_count(bay, cargo, config.arming_ticks);

        // 5. Sonar.
        sonar::tick(sonar_state, now_ms);

        // 6. Telemetry.
        let hull = collision::body_box(pos, extent, heading.yaw);
        *telemetry = Telemetry {
            signed_speed: movement::signed_speed(helm),
            depth: environment::depth(terrain, pos.y),
            submerged: environment::is_submerged(terrain, &hull),
        };

        // 7. Edge-detected events.
        let (volume, pitch) = vehicle.movement_mode.motor_sound();
        if moving && !vehicle.was_moving {
            events.push(SimEvent::MotorStarted {
                vehicle: id,
                volume,
                pitch,
            });
        }
        if moving && vehicle.age % MOTOR_HUM_INTERVAL_TICKS == 0 {
            events.push(SimEvent::MotorHum {
                vehicle: id,
                volume,
                pitch,
            });
        }
        vehicle.was_moving = moving;

        let low = cell.max > 0.0 && cell.current / cell.max < LOW_POWER_FRACTION;
        if low && !vehicle.was_low_power {
            events.push(SimEvent::LowPowerWarning { vehicle: id });
        }
        vehicle.was_low_power = low;
    }
}
