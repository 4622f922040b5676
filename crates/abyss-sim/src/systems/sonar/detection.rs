//! Ping scan: finds submerged entities and underwater terrain around a vehicle.

use std::collections::BTreeMap;

use glam::{DVec3, IVec3};
use hecs::{Entity, World};

use abyss_core::components::{Extent, Heading};
use abyss_core::constants::*;
use abyss_core::contact::SonarContact;
use abyss_core::enums::{ContactClass, EntityKind};
use abyss_core::types::Position;
use abyss_terrain::{fluid, Terrain};

use super::sweep::normalize_degrees;
use crate::guidance::forward_vector;
use crate::systems::collision;

pub fn classify(kind: EntityKind) -> ContactClass {
    match kind {
        EntityKind::Vehicle => ContactClass::Vehicle,
        EntityKind::Player => ContactClass::Player,
        EntityKind::Item => ContactClass::Item,
        EntityKind::SmallCreature => ContactClass::Small,
        EntityKind::Creature | EntityKind::Projectile => ContactClass::Medium,
    }
}

/// Bearing of `relative` measured from the vehicle's heading, in [0, 360).
pub fn relative_bearing(relative: DVec3, yaw_deg: f64) -> f64 {
    normalize_degrees((-relative.x).atan2(relative.z).to_degrees() - yaw_deg)
}

/// Full scan from `origin`. The result replaces the vehicle's previous contact set.
pub fn scan<T: Terrain + ?Sized>(
    world: &World,
    terrain: &T,
    pinger: Entity,
    origin: DVec3,
    yaw_deg: f64,
    now_ms: u64,
) -> Vec<SonarContact> {
    let mut contacts = scan_entities(world, terrain, pinger, origin, yaw_deg, now_ms);
    contacts.extend(scan_terrain(terrain, origin, yaw_deg, now_ms));
    contacts
}

fn scan_entities<T: Terrain + ?Sized>(
    world: &World,
    terrain: &T,
    pinger: Entity,
    origin: DVec3,
    yaw_deg: f64,
    now_ms: u64,
) -> Vec<SonarContact> {
    let mut query = world.query::<(&Position, &Extent, &EntityKind, Option<&Heading>)>();
    query
        .iter()
        .filter(|(entity, _)| *entity != pinger)
        .filter_map(|(_, (pos, extent, kind, heading))| {
            let relative = pos.as_vec() - origin;
            let distance = relative.length();
            if !(SONAR_MIN_RANGE..=SONAR_MAX_RANGE).contains(&distance) {
                return None;
            }
            let bounds = collision::body_box(pos, extent, heading.map_or(0.0, |h| h.yaw));
            if !fluid::touches_water(terrain, &bounds) {
                return None;
            }
            Some(SonarContact::new(
                relative,
                relative_bearing(relative, yaw_deg),
                classify(*kind),
                now_ms,
            ))
        })
        .collect()
}

/// Radial raycasts; keeps the first underwater surface hit per ray and the
/// closest hit per bearing bucket.
fn scan_terrain<T: Terrain + ?Sized>(
    terrain: &T,
    origin: DVec3,
    yaw_deg: f64,
    now_ms: u64,
) -> Vec<SonarContact> {
    let rays = (360.0 / SONAR_RAY_SPACING).round() as u32;
    let mut buckets: BTreeMap<i64, SonarContact> = BTreeMap::new();

    for i in 0..rays {
        let dir = forward_vector(yaw_deg + i as f64 * SONAR_RAY_SPACING);
        let start = origin + dir * SONAR_RAY_START;
        let end = origin + dir * SONAR_MAX_RANGE;
        let Some(hit) = terrain.raycast(start, end) else {
            continue;
        };
        // The face the ray struck must border water.
        let approach = (hit.point - dir * 0.01).floor().as_ivec3();
        if !terrain.is_water(approach) && !terrain.is_water(hit.cell + IVec3::Y) {
            continue;
        }

        let relative = hit.point - origin;
        let bearing = relative_bearing(relative, yaw_deg);
        let contact = SonarContact::new(relative, bearing, ContactClass::Terrain, now_ms);
        let bucket = (bearing / SONAR_TERRAIN_BUCKET).floor() as i64;
        match buckets.get(&bucket) {
            Some(existing) if existing.distance <= contact.distance => {}
            _ => {
                buckets.insert(bucket, contact);
            }
        }
    }
    buckets.into_values().collect()
}
