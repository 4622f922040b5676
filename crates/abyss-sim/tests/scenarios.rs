//! End-to-end scenarios driven through the public engine API.

use abyss_sim::core::commands::VehicleCommand;
use abyss_sim::core::components::Sonar;
use abyss_sim::core::config::VehicleConfig;
use abyss_sim::core::enums::{ContactClass, EntityKind, FireRejection};
use abyss_sim::core::events::SimEvent;
use abyss_sim::core::inventory::{ItemKind, ItemStack};
use abyss_sim::core::types::{ActorId, EntityId, Position};
use abyss_sim::handles::resolve;
use abyss_sim::{SimConfig, SimulationEngine};
use abyss_terrain::VoxelGrid;

const PILOT: ActorId = ActorId(7);

fn engine_with_vehicle() -> (SimulationEngine<VoxelGrid>, EntityId) {
    let mut engine =
        SimulationEngine::new(VoxelGrid::flat_ocean(48, -20, 10), SimConfig::default());
    let vehicle = engine
        .place_vehicle(Position::new(0.0, 0.0, 0.0), 0.0, VehicleConfig::tactical())
        .unwrap();
    assert!(engine.board(PILOT, vehicle));
    (engine, vehicle)
}

fn set_sweep(engine: &mut SimulationEngine<VoxelGrid>, vehicle: EntityId, angle: f64) {
    let entity = resolve(engine.world(), vehicle).unwrap();
    engine
        .world_mut()
        .get::<&mut Sonar>(entity)
        .unwrap()
        .sweep_angle = angle;
}

#[test]
fn idle_vehicle_burns_one_coal() {
    let (mut engine, vehicle) = engine_with_vehicle();
    engine.set_power(vehicle, 5.0);
    engine.load_inventory(vehicle, 0, Some(ItemStack::new(ItemKind::Coal, 1)));

    engine.tick();
    let view = engine.vehicle_view(vehicle).unwrap();
    assert!((view.power - 8.0).abs() < 1e-9);
    assert_eq!(engine.inventory(vehicle).unwrap().get(0), None);

    for _ in 0..9500 {
        engine.tick();
    }
    let view = engine.vehicle_view(vehicle).unwrap();
    assert!((view.power - 8.0).abs() < 1e-9);
}

#[test]
fn fire_with_empty_bay_changes_nothing() {
    let (mut engine, vehicle) = engine_with_vehicle();
    engine.tick();
    let before = engine.vehicle_view(vehicle).unwrap();

    assert!(engine.submit(PILOT, VehicleCommand::Fire { vehicle }));
    let snap = engine.tick();

    assert!(snap.events.contains(&SimEvent::FireRejected {
        vehicle,
        reason: FireRejection::NoOrdnance,
    }));
    let after = &snap.vehicles[0];
    assert_eq!(after.power, before.power);
    assert_eq!(after.cooldown_ticks, 0);
    assert_eq!(after.arming_ticks, 0);
    assert!(snap.projectiles.is_empty());
}

#[test]
fn ping_reveals_on_following_sweep() {
    let (mut engine, vehicle) = engine_with_vehicle();
    // Distance 10 at bearing 45 off the bow.
    let offset = 10.0 / 2f64.sqrt();
    engine.spawn_body(
        EntityKind::Creature,
        Position::new(-offset, 0.0, offset),
        0.9,
        0.9,
    );

    // Sweep far from the contact: the ping alone reveals nothing.
    set_sweep(&mut engine, vehicle, 200.0);
    assert!(engine.submit(PILOT, VehicleCommand::Ping { vehicle }));
    let snap = engine.tick();
    assert!(snap.events.contains(&SimEvent::SonarPing {
        vehicle,
        contact_count: 1,
    }));
    assert!(snap.vehicles[0].sonar.contacts.is_empty());

    set_sweep(&mut engine, vehicle, 44.0);
    let snap = engine.tick();
    let contacts = &snap.vehicles[0].sonar.contacts;
    assert_eq!(contacts.len(), 1);
    assert!((contacts[0].bearing - 45.0).abs() < 1e-6);
    assert!((contacts[0].distance - 10.0).abs() < 1e-6);
    assert_eq!(contacts[0].class, ContactClass::Medium);
    assert_eq!(contacts[0].alpha, 1.0);
    assert_eq!(
        engine.vehicle_view(vehicle).unwrap().sonar.contacts[0].alpha,
        1.0
    );
}

#[test]
fn revealed_contact_fades_out() {
    let (mut engine, vehicle) = engine_with_vehicle();
    engine.spawn_body(EntityKind::Player, Position::new(0.0, 0.0, 20.0), 0.6, 1.8);

    set_sweep(&mut engine, vehicle, 359.0);
    assert!(engine.submit(PILOT, VehicleCommand::Ping { vehicle }));
    let snap = engine.tick();
    assert_eq!(snap.vehicles[0].sonar.contacts.len(), 1);
    assert_eq!(snap.vehicles[0].sonar.contacts[0].alpha, 1.0);

    let mut last = snap.vehicles[0].sonar.contacts[0].alpha;
    for _ in 0..38 {
        let snap = engine.tick();
        let alpha = snap.vehicles[0].sonar.contacts[0].alpha;
        assert!(alpha < last);
        last = alpha;
    }
    for _ in 0..5 {
        engine.tick();
    }
    assert!(engine.vehicle_view(vehicle).unwrap().sonar.contacts.is_empty());
}
