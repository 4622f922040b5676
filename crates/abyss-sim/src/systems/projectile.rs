//! Torpedo flight: self-destruct checks, block and entity impact, seeker
//! acquisition and steering, then the constant-speed position update.

use glam::DVec3;
use hecs::{Entity, World};

use abyss_core::components::{Extent, Heading, Invisible, Projectile};
use abyss_core::enums::{DamageKind, DetonationCause, EntityKind, TargetingMode};
use abyss_core::events::SimEvent;
use abyss_core::types::{EntityId, Position, Velocity};
use abyss_terrain::{fluid, Terrain};

use crate::guidance;
use crate::handles::{id_of, resolve};
use crate::systems::{collision, damage};

/// Seeker parameters for one projectile this tick.
struct Seeker {
    origin: DVec3,
    yaw: f64,
    mode: TargetingMode,
    range: f64,
    half_cone: f64,
    exclude: [Option<Entity>; 2],
}

/// Advance every torpedo by one tick.
pub fn run<T: Terrain + ?Sized>(
    world: &mut World,
    terrain: &T,
    events: &mut Vec<SimEvent>,
    despawn: &mut Vec<Entity>,
) {
    let projectiles: Vec<Entity> = world
        .query::<&Projectile>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();

    for entity in projectiles {
        // A torpedo may have been removed by an earlier impact this tick.
        if despawn.contains(&entity) {
            continue;
        }
        step(world, terrain, entity, events, despawn);
    }
}

fn step<T: Terrain + ?Sized>(
    world: &mut World,
    terrain: &T,
    entity: Entity,
    events: &mut Vec<SimEvent>,
    despawn: &mut Vec<Entity>,
) {
    let Ok((pos, vel, heading, extent, state)) = world
        .query_one_mut::<(&Position, &Velocity, &Heading, &Extent, &mut Projectile)>(entity)
    else {
        return;
    };
    state.ticks_alive += 1;
    let (pos, mut vel, heading, extent, mut state) = (*pos, vel.as_vec(), *heading, *extent, state.clone());
    let cfg = state.config;

    let mut detonate = |at: Position, cause: DetonationCause, events: &mut Vec<SimEvent>| {
        events.push(SimEvent::Detonation {
            position: at,
            power: cfg.explosion_power,
            cause,
        });
        despawn.push(entity);
    };

    // 1. Self-destruct conditions.
    let body = collision::body_box(&pos, &extent, heading.yaw);
    if state.ticks_alive > cfg.medium_grace_ticks && !fluid::touches_water(terrain, &body) {
        detonate(pos, DetonationCause::LeftMedium, events);
        return;
    }
    if state.start.distance_to(&pos) > cfg.max_range {
        detonate(pos, DetonationCause::OutOfRange, events);
        return;
    }
    if state.distance_traveled >= cfg.travel_cap {
        detonate(pos, DetonationCause::TravelCap, events);
        return;
    }

    // 2. Block impact along this tick's path.
    if let Some(hit) = terrain.raycast(pos.as_vec(), pos.as_vec() + vel) {
        detonate(Position::from(hit.point), DetonationCause::BlockImpact, events);
        return;
    }

    // 3. Entity impact: direct damage, then detonate.
    let owner = state.owner.and_then(|id| resolve(world, id));
    let swept = body.stretch(vel);
    let exclude: Vec<Entity> = std::iter::once(entity).chain(owner).collect();
    if let Some(victim) = collision::first_entity_hit(world, &swept, pos.as_vec(), &exclude) {
        let mut pending = Vec::new();
        damage::apply(
            world,
            victim,
            DamageKind::Explosion,
            cfg.direct_damage,
            events,
            &mut pending,
        );
        despawn.extend(pending);
        events.push(SimEvent::Detonation {
            position: pos,
            power: cfg.explosion_power,
            cause: DetonationCause::EntityImpact,
        });
        despawn.push(entity);
        return;
    }

    // 4. Seeker: hold a valid lock, otherwise reacquire; then steer.
    if state.ticks_alive > cfg.arming_ticks {
        let seeker = Seeker {
            origin: pos.as_vec(),
            yaw: heading.yaw,
            mode: state.targeting_mode,
            range: cfg.detection_range,
            half_cone: cfg.detection_cone_degrees / 2.0,
            exclude: [Some(entity), owner],
        };
        let locked = state
            .target
            .and_then(|id| resolve(world, id))
            .filter(|&target| target_valid(world, terrain, &seeker, target));
        let target = locked.or_else(|| find_target(world, terrain, &seeker));
        state.target = target.map(id_of);

        if let Some(aim) = target.and_then(|t| aim_point(world, t)) {
            vel = guidance::steer(vel, pos.as_vec(), aim, cfg.max_turn_degrees);
        }
    }

    // 5. Constant-speed travel.
    let new_pos = pos.offset(vel);
    state.distance_traveled += vel.length();
    let new_heading = if vel.length_squared() > 0.0 {
        guidance::heading_from_velocity(vel)
    } else {
        heading
    };

    if let Ok((p, v, h, s)) =
        world.query_one_mut::<(&mut Position, &mut Velocity, &mut Heading, &mut Projectile)>(entity)
    {
        *p = new_pos;
        *v = Velocity::from(vel);
        *h = new_heading;
        *s = state;
    }
}

/// Center of an entity's box; torpedoes home on mid-body.
fn aim_point(world: &World, target: Entity) -> Option<DVec3> {
    collision::entity_box(world, target).map(|b| b.center())
}

/// Whether `target` is an acceptable lock for this seeker right now.
fn target_valid<T: Terrain + ?Sized>(
    world: &World,
    terrain: &T,
    seeker: &Seeker,
    target: Entity,
) -> bool {
    if seeker.exclude.contains(&Some(target)) {
        return false;
    }
    let Ok(kind) = world.get::<&EntityKind>(target).map(|k| *k) else {
        return false;
    };
    if !guidance::matches_targeting_mode(seeker.mode, kind) {
        return false;
    }
    if world.get::<&Invisible>(target).is_ok() {
        return false;
    }
    let Some(bounds) = collision::entity_box(world, target) else {
        return false;
    };
    if !fluid::touches_water(terrain, &bounds) {
        return false;
    }
    let aim = bounds.center();
    seeker.origin.distance(aim) <= seeker.range
        && guidance::in_detection_cone(seeker.yaw, seeker.origin, aim, seeker.half_cone)
}

/// Closest acceptable target, if any.
fn find_target<T: Terrain + ?Sized>(world: &World, terrain: &T, seeker: &Seeker) -> Option<Entity> {
    let candidates: Vec<Entity> = world
        .query::<&EntityKind>()
        .iter()
        .filter(|(_, kind)| guidance::matches_targeting_mode(seeker.mode, **kind))
        .map(|(entity, _)| entity)
        .collect();

    candidates
        .into_iter()
        .filter(|&candidate| target_valid(world, terrain, seeker, candidate))
        .filter_map(|candidate| {
            aim_point(world, candidate).map(|aim| (candidate, seeker.origin.distance(aim)))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(entity, _)| entity)
}

/// Current lock of a torpedo, if it still resolves.
pub fn locked_target(world: &World, projectile: &Projectile) -> Option<EntityId> {
    projectile
        .target
        .filter(|&id| resolve(world, id).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use abyss_core::config::ProjectileConfig;
    use abyss_core::types::SimTime;
    use abyss_terrain::{Block, VoxelGrid};
    use glam::IVec3;

    use crate::systems::{cleanup, snapshot};
    use crate::world_setup::{spawn_body, spawn_projectile_with};

    const DEPTH: f64 = -2.0;

    fn ocean() -> VoxelGrid {
        VoxelGrid::flat_ocean(64, -40, 0)
    }

    /// Torpedo heading +z at full speed.
    fn torpedo(world: &mut World, at: Position, ticks_alive: u32) -> Entity {
        let config = ProjectileConfig::lightweight();
        spawn_projectile_with(
            world,
            at,
            Velocity::from(DVec3::new(0.0, 0.0, config.speed)),
            Heading::default(),
            Projectile {
                config,
                start: at,
                distance_traveled: 0.0,
                ticks_alive,
                target: None,
                owner: None,
                targeting_mode: TargetingMode::All,
            },
        )
    }

    fn creature(world: &mut World, x: f64, z: f64) -> Entity {
        spawn_body(
            world,
            EntityKind::Creature,
            Position::new(x, DEPTH - 0.4, z),
            0.9,
            0.9,
        )
    }

    fn step_all(world: &mut World, grid: &VoxelGrid) -> Vec<SimEvent> {
        let mut events = Vec::new();
        let mut despawn = Vec::new();
        run(world, grid, &mut events, &mut despawn);
        cleanup::run(world, &mut despawn);
        events
    }

    fn lock(world: &World, torpedo: Entity) -> Option<EntityId> {
        world.get::<&Projectile>(torpedo).ok().and_then(|p| p.target)
    }

    fn causes(events: &[SimEvent]) -> Vec<DetonationCause> {
        events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Detonation { cause, .. } => Some(*cause),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_seeker_waits_out_arming_delay() {
        let grid = ocean();
        let mut world = World::new();
        let t = torpedo(&mut world, Position::new(0.5, DEPTH, 0.5), 0);
        let fish = creature(&mut world, -9.5, 45.5);

        // In range and inside the cone from tick 10 on, but not yet armed.
        for _ in 0..10 {
            assert!(step_all(&mut world, &grid).is_empty());
            assert_eq!(lock(&world, t), None);
        }
        step_all(&mut world, &grid);
        assert_eq!(lock(&world, t), Some(id_of(fish)));
    }

    #[test]
    fn test_valid_lock_is_held_against_nearer_target() {
        let grid = ocean();
        let mut world = World::new();
        let t = torpedo(&mut world, Position::new(0.5, DEPTH, 0.5), 20);
        let far = creature(&mut world, -9.5, 20.5);

        step_all(&mut world, &grid);
        assert_eq!(lock(&world, t), Some(id_of(far)));

        let near = creature(&mut world, 3.5, 10.5);
        let fresh = Seeker {
            origin: world.get::<&Position>(t).unwrap().as_vec(),
            yaw: world.get::<&Heading>(t).unwrap().yaw,
            mode: TargetingMode::All,
            range: 30.0,
            half_cone: 45.0,
            exclude: [Some(t), None],
        };
        assert_eq!(find_target(&world, &grid, &fresh), Some(near));

        step_all(&mut world, &grid);
        assert_eq!(lock(&world, t), Some(id_of(far)));
        let snap = snapshot::build_snapshot(&world, &SimTime::default(), 0, Vec::new());
        assert_eq!(snap.projectiles[0].target, Some(id_of(far)));
    }

    #[test]
    fn test_invisible_target_is_dropped_for_next_best() {
        let grid = ocean();
        let mut world = World::new();
        let t = torpedo(&mut world, Position::new(0.5, DEPTH, 0.5), 20);
        let first = creature(&mut world, -9.5, 20.5);
        let second = creature(&mut world, 8.5, 22.5);

        step_all(&mut world, &grid);
        assert_eq!(lock(&world, t), Some(id_of(first)));

        world.insert_one(first, Invisible).unwrap();
        step_all(&mut world, &grid);
        assert_eq!(lock(&world, t), Some(id_of(second)));
    }

    #[test]
    fn test_invisible_body_is_never_acquired() {
        let grid = ocean();
        let mut world = World::new();
        let t = torpedo(&mut world, Position::new(0.5, DEPTH, 0.5), 20);
        let fish = creature(&mut world, -9.5, 20.5);
        world.insert_one(fish, Invisible).unwrap();

        for _ in 0..3 {
            step_all(&mut world, &grid);
            assert_eq!(lock(&world, t), None);
        }
    }

    #[test]
    fn test_surfaced_target_is_dropped() {
        let grid = ocean();
        let mut world = World::new();
        let t = torpedo(&mut world, Position::new(0.5, DEPTH, 0.5), 20);
        let fish = creature(&mut world, -9.5, 20.5);

        step_all(&mut world, &grid);
        assert_eq!(lock(&world, t), Some(id_of(fish)));

        // Still in range and cone, but clear of the water.
        *world.get::<&mut Position>(fish).unwrap() = Position::new(-9.5, 0.5, 20.5);
        step_all(&mut world, &grid);
        assert_eq!(lock(&world, t), None);
    }

    #[test]
    fn test_seeker_range_is_inclusive() {
        let grid = ocean();
        let mut world = World::new();
        // Box centre lands exactly 30 blocks ahead.
        let fish = spawn_body(
            &mut world,
            EntityKind::Creature,
            Position::new(0.0, -2.5, 30.0),
            1.0,
            1.0,
        );
        let seeker = Seeker {
            origin: DVec3::new(0.0, -2.0, 0.0),
            yaw: 0.0,
            mode: TargetingMode::All,
            range: 30.0,
            half_cone: 45.0,
            exclude: [None, None],
        };
        assert!(target_valid(&world, &grid, &seeker, fish));

        let beyond = Seeker {
            origin: DVec3::new(0.0, -2.0, -0.5),
            ..seeker
        };
        assert!(!target_valid(&world, &grid, &beyond, fish));
    }

    #[test]
    fn test_leaving_water_detonates_after_grace() {
        let grid = ocean();
        let mut world = World::new();
        let t = torpedo(&mut world, Position::new(0.5, 3.0, 0.5), 0);

        for _ in 0..5 {
            assert!(step_all(&mut world, &grid).is_empty());
        }
        let events = step_all(&mut world, &grid);
        assert_eq!(causes(&events), vec![DetonationCause::LeftMedium]);
        assert!(!world.contains(t));
    }

    #[test]
    fn test_out_of_range_detonates() {
        let grid = ocean();
        let mut world = World::new();
        let t = torpedo(&mut world, Position::new(0.5, DEPTH, 0.5), 20);
        world.get::<&mut Projectile>(t).unwrap().start = Position::new(0.5, DEPTH, -130.0);

        let events = step_all(&mut world, &grid);
        assert_eq!(causes(&events), vec![DetonationCause::OutOfRange]);
        assert!(!world.contains(t));
    }

    #[test]
    fn test_travel_cap_counts_distance_flown() {
        let grid = ocean();
        let mut world = World::new();
        let t = torpedo(&mut world, Position::new(0.5, DEPTH, 0.5), 20);
        world.get::<&mut Projectile>(t).unwrap().distance_traveled = 126.0;

        assert!(step_all(&mut world, &grid).is_empty());
        let flown = world.get::<&Projectile>(t).unwrap().distance_traveled;
        assert!((flown - 128.75).abs() < 1e-9);

        let events = step_all(&mut world, &grid);
        assert_eq!(causes(&events), vec![DetonationCause::TravelCap]);
    }

    #[test]
    fn test_block_impact_detonates_at_the_face() {
        let mut grid = ocean();
        grid.fill(IVec3::new(-2, -5, 4), IVec3::new(2, -1, 4), Block::Solid);
        let mut world = World::new();
        let t = torpedo(&mut world, Position::new(0.5, DEPTH, 0.5), 0);

        assert!(step_all(&mut world, &grid).is_empty());
        let events = step_all(&mut world, &grid);
        assert_eq!(causes(&events), vec![DetonationCause::BlockImpact]);
        let Some(SimEvent::Detonation { position, .. }) = events.first() else {
            panic!("expected a detonation, got {events:?}");
        };
        assert!((position.z - 4.0).abs() < 1e-9);
        assert!(!world.contains(t));
    }

    #[test]
    fn test_direct_hit_damages_and_detonates() {
        let grid = ocean();
        let mut world = World::new();
        let t = torpedo(&mut world, Position::new(0.5, DEPTH, 0.5), 0);
        let fish = creature(&mut world, 0.5, 5.5);

        assert!(step_all(&mut world, &grid).is_empty());
        let events = step_all(&mut world, &grid);
        assert_eq!(causes(&events), vec![DetonationCause::EntityImpact]);
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::EntityDamaged { target, .. } if *target == id_of(fish))));
        assert!(!world.contains(t));
    }
}
