//! Entity construction: vehicles, torpedoes and passive bodies.

use glam::DVec3;
use hecs::{Entity, EntityBuilder, World};
use thiserror::Error;

use abyss_core::components::*;
use abyss_core::config::{ProjectileConfig, VehicleConfig};
use abyss_core::constants::PLACEMENT_WATER_SEARCH_DEPTH;
use abyss_core::enums::{EntityKind, TargetingMode};
use abyss_core::inventory::Inventory;
use abyss_core::types::{EntityId, Position, Velocity};
use abyss_terrain::{fluid, Block, Terrain};

use crate::guidance::{forward_vector, launch_velocity};

/// Health given to living bodies spawned without an explicit value.
const DEFAULT_CREATURE_HEALTH: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("placement target is not water")]
    NotInWater,
    #[error("cannot place into lava")]
    Lava,
    #[error("no water within reach below a surface placement")]
    NoWaterBelow,
}

/// Check that a vehicle may be placed with its base at `position`.
pub fn validate_placement<T: Terrain + ?Sized>(
    terrain: &T,
    position: &Position,
) -> Result<(), PlacementError> {
    let cell = position.as_vec().floor().as_ivec3();
    let block = terrain.block(cell);
    if block == Block::Lava {
        return Err(PlacementError::Lava);
    }
    if !block.is_water() && !terrain.is_water(cell + glam::IVec3::Y) {
        return Err(PlacementError::NotInWater);
    }
    if cell.y >= terrain.sea_level()
        && !fluid::water_below(terrain, cell, PLACEMENT_WATER_SEARCH_DEPTH)
    {
        return Err(PlacementError::NoWaterBelow);
    }
    Ok(())
}

fn hull_extent(config: &VehicleConfig) -> Extent {
    Extent {
        width: config.width,
        height: config.height,
        length: config.length,
        oriented: false,
    }
}

/// Fresh vehicle: full health and power, empty cargo, Silent / All, no pilot.
pub fn spawn_vehicle(
    world: &mut World,
    position: Position,
    yaw: f64,
    config: VehicleConfig,
) -> Entity {
    let mut builder = EntityBuilder::new();
    builder
        .add(EntityKind::Vehicle)
        .add(position)
        .add(Heading { yaw, pitch: 0.0 })
        .add(hull_extent(&config))
        .add(Health {
            current: config.max_health,
            max: config.max_health,
        })
        .add(PowerCell {
            current: config.max_power,
            max: config.max_power,
        })
        .add(Helm::default())
        .add(WeaponBay::default())
        .add(Sonar::default())
        .add(Inventory::default())
        .add(Telemetry::default())
        .add(Vehicle {
            config,
            movement_mode: Default::default(),
            targeting_mode: Default::default(),
            pilot: None,
            was_moving: false,
            was_low_power: false,
            age: 0,
        });
    world.spawn(builder.build())
}

/// Torpedo at `position` flying along `heading` at the configured speed.
pub fn spawn_projectile(
    world: &mut World,
    position: Position,
    heading: Heading,
    config: ProjectileConfig,
    owner: Option<EntityId>,
    targeting_mode: TargetingMode,
) -> Entity {
    let velocity = launch_velocity(heading.yaw, heading.pitch, config.speed);
    spawn_projectile_with(
        world,
        position,
        Velocity::from(velocity),
        heading,
        Projectile {
            config,
            start: position,
            distance_traveled: 0.0,
            ticks_alive: 0,
            target: None,
            owner,
            targeting_mode,
        },
    )
}

/// Torpedo with explicit flight state (used when restoring a save).
pub fn spawn_projectile_with(
    world: &mut World,
    position: Position,
    velocity: Velocity,
    heading: Heading,
    projectile: Projectile,
) -> Entity {
    let extent = Extent {
        width: projectile.config.width,
        height: projectile.config.height,
        length: projectile.config.length,
        oriented: true,
    };
    world.spawn((
        EntityKind::Projectile,
        position,
        velocity,
        heading,
        extent,
        projectile,
    ))
}

/// Passive body (player, creature, item). Living kinds get health.
pub fn spawn_body(
    world: &mut World,
    kind: EntityKind,
    position: Position,
    width: f64,
    height: f64,
) -> Entity {
    let mut builder = EntityBuilder::new();
    builder.add(kind).add(position).add(Heading::default()).add(Extent {
        width,
        height,
        length: width,
        oriented: false,
    });
    if kind.is_living() {
        builder.add(Health {
            current: DEFAULT_CREATURE_HEALTH,
            max: DEFAULT_CREATURE_HEALTH,
        });
    }
    world.spawn(builder.build())
}

/// Point ahead of a hull where a torpedo leaves the tube.
pub fn launch_point(position: &Position, yaw: f64, config: &VehicleConfig) -> Position {
    let lift = (config.height - config.projectile.height) / 2.0;
    position.offset(forward_vector(yaw) * config.launch_offset + DVec3::Y * lift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use abyss_terrain::VoxelGrid;

    #[test]
    fn test_placement_rules() {
        let mut grid = VoxelGrid::flat_ocean(16, 0, 10);
        assert!(validate_placement(&grid, &Position::new(0.5, 5.0, 0.5)).is_ok());
        // Resting on the surface, water right below.
        assert!(validate_placement(&grid, &Position::new(0.5, 9.0, 0.5)).is_ok());
        assert_eq!(
            validate_placement(&grid, &Position::new(0.5, 12.0, 0.5)),
            Err(PlacementError::NotInWater)
        );
        grid.set(glam::IVec3::new(3, 5, 3), Block::Lava);
        assert_eq!(
            validate_placement(&grid, &Position::new(3.5, 5.0, 3.5)),
            Err(PlacementError::Lava)
        );
        // Sitting on the bed: the cell above is water.
        assert!(validate_placement(&grid, &Position::new(0.5, 0.5, 0.5)).is_ok());
    }

    #[test]
    fn test_surface_placement_needs_water_below() {
        let mut grid = VoxelGrid::new(glam::IVec3::splat(-8), glam::IVec3::splat(32), 4);
        // A lone water block floating at sea level with air beneath.
        grid.set(glam::IVec3::new(0, 5, 0), Block::Water);
        assert_eq!(
            validate_placement(&grid, &Position::new(0.5, 4.0, 0.5)),
            Err(PlacementError::NoWaterBelow)
        );
    }

    #[test]
    fn test_spawned_vehicle_is_fresh() {
        let mut world = World::new();
        let v = spawn_vehicle(&mut world, Position::new(0.0, 5.0, 0.0), 0.0, VehicleConfig::tactical());
        let vehicle = world.get::<&Vehicle>(v).unwrap();
        assert_eq!(vehicle.pilot, None);
        assert_eq!(world.get::<&Health>(v).unwrap().current, 100.0);
        assert_eq!(world.get::<&PowerCell>(v).unwrap().current, 100.0);
        assert!(world.get::<&Inventory>(v).unwrap().is_empty());
    }

    #[test]
    fn test_projectile_launch_state() {
        let mut world = World::new();
        let p = spawn_projectile(
            &mut world,
            Position::new(1.0, 2.0, 3.0),
            Heading { yaw: 0.0, pitch: 0.0 },
            ProjectileConfig::lightweight(),
            None,
            TargetingMode::Players,
        );
        let v = *world.get::<&Velocity>(p).unwrap();
        assert!((v.speed() - 2.75).abs() < 1e-12);
        assert!((v.z - 2.75).abs() < 1e-12);
        let state = world.get::<&Projectile>(p).unwrap();
        assert_eq!(state.start, Position::new(1.0, 2.0, 3.0));
        assert_eq!(state.targeting_mode, TargetingMode::Players);
    }
}
