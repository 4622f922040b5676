//! The demo ocean and the scripted sortie the harness flies through it.

use glam::IVec3;
use tracing::info;

use abyss_core::commands::VehicleCommand;
use abyss_core::components::Controls;
use abyss_core::config::VehicleConfig;
use abyss_core::enums::EntityKind;
use abyss_core::inventory::{ItemKind, ItemStack};
use abyss_core::types::{ActorId, EntityId, Position};
use abyss_sim::{SimConfig, SimulationEngine};
use abyss_terrain::{Block, VoxelGrid};

use crate::error::AppError;
use crate::state::GameLoopCommand;

/// Pilot identity used by the scripted sortie.
pub const SORTIE_PILOT: ActorId = ActorId(1);

const OCEAN_HALF_EXTENT: i32 = 96;
const SEA_BED: i32 = -32;
const SEA_LEVEL: i32 = 0;

/// Open ocean with a seamount off the starboard bow.
pub fn build_ocean() -> VoxelGrid {
    let mut grid = VoxelGrid::flat_ocean(OCEAN_HALF_EXTENT, SEA_BED, SEA_LEVEL);
    grid.fill(
        IVec3::new(-30, SEA_BED, 25),
        IVec3::new(-20, -12, 35),
        Block::Solid,
    );
    grid
}

/// The crewed vehicle plus the other parties in the water.
pub struct Sortie {
    pub engine: SimulationEngine<VoxelGrid>,
    pub vehicle: EntityId,
    pub target: EntityId,
}

/// Place the pilot's vehicle with a full load, an uncrewed hull dead ahead
/// and a few creatures to show up on sonar.
pub fn setup(seed: u64, config: VehicleConfig) -> Result<Sortie, AppError> {
    let mut engine = SimulationEngine::new(build_ocean(), SimConfig { seed });

    let vehicle = engine.place_vehicle(Position::new(0.5, -10.0, 0.5), 0.0, config)?;
    engine.load_inventory(vehicle, 0, Some(ItemStack::new(ItemKind::Torpedo, 4)));
    engine.load_inventory(vehicle, 1, Some(ItemStack::new(ItemKind::Coal, 16)));
    engine.board(SORTIE_PILOT, vehicle);

    let target = engine.place_vehicle(Position::new(0.5, -10.0, 40.5), 180.0, config)?;
    engine.spawn_body(
        EntityKind::Creature,
        Position::new(-12.0, -8.0, 14.0),
        0.9,
        0.9,
    );
    engine.spawn_body(
        EntityKind::SmallCreature,
        Position::new(9.0, -14.0, 20.0),
        0.5,
        0.4,
    );

    info!(?vehicle, ?target, "sortie ready");
    Ok(Sortie {
        engine,
        vehicle,
        target,
    })
}

fn at(at_tick: u64, command: VehicleCommand) -> GameLoopCommand {
    GameLoopCommand::Schedule {
        at_tick,
        actor: SORTIE_PILOT,
        command,
    }
}

fn helm(vehicle: EntityId, forward: bool, right: bool) -> VehicleCommand {
    VehicleCommand::move_input(
        vehicle,
        Controls {
            forward,
            right,
            ..Default::default()
        },
    )
}

/// Timeline: ring up Cruise, get under way, ping, wait out the arming delay,
/// fire on the hull ahead, come about, then a second shot in Other mode.
/// The toggle at tick 121 lands inside the mode-toggle cooldown and is dropped.
pub fn script(vehicle: EntityId) -> Vec<GameLoopCommand> {
    vec![
        at(1, VehicleCommand::ToggleMovementMode { vehicle }),
        at(2, helm(vehicle, true, false)),
        at(40, VehicleCommand::Ping { vehicle }),
        at(70, helm(vehicle, false, false)),
        at(80, VehicleCommand::Fire { vehicle }),
        at(120, VehicleCommand::ToggleTargetingMode { vehicle }),
        at(121, VehicleCommand::ToggleTargetingMode { vehicle }),
        at(125, VehicleCommand::ToggleTargetingMode { vehicle }),
        at(130, helm(vehicle, true, true)),
        at(175, helm(vehicle, true, false)),
        at(200, VehicleCommand::Ping { vehicle }),
        at(240, VehicleCommand::ToggleTargetingMode { vehicle }),
        at(260, VehicleCommand::Fire { vehicle }),
        at(300, helm(vehicle, false, false)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use abyss_core::enums::TargetingMode;
    use abyss_core::events::SimEvent;
    use abyss_terrain::Terrain;

    #[test]
    fn test_ocean_has_seamount() {
        let grid = build_ocean();
        assert!(grid.block(IVec3::new(-25, -13, 30)).is_solid());
        assert!(grid.is_water(IVec3::new(0, -10, 0)));
        assert_eq!(grid.sea_level(), SEA_LEVEL);
    }

    #[test]
    fn test_setup_places_everything() {
        let sortie = setup(7, VehicleConfig::tactical()).unwrap();
        let view = sortie.engine.vehicle_view(sortie.vehicle).unwrap();
        assert_eq!(view.pilot, Some(SORTIE_PILOT));
        assert!(sortie.engine.vehicle_view(sortie.target).is_some());
        assert_eq!(sortie.engine.world().len(), 4);
    }

    #[test]
    fn test_script_is_ordered() {
        let script = script(EntityId(1));
        let ticks: Vec<u64> = script
            .iter()
            .filter_map(|c| match c {
                GameLoopCommand::Schedule { at_tick, .. } => Some(*at_tick),
                GameLoopCommand::Shutdown => None,
            })
            .collect();
        assert!(ticks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_sortie_fires_and_hits() {
        let Sortie {
            mut engine,
            vehicle,
            target,
        } = setup(42, VehicleConfig::tactical()).unwrap();
        let mut script = script(vehicle).into_iter().peekable();
        let mut events = Vec::new();

        for _ in 0..400 {
            let now = engine.time().tick;
            while let Some(GameLoopCommand::Schedule {
                at_tick,
                actor,
                command,
            }) = script.peek().cloned()
            {
                if at_tick > now {
                    break;
                }
                engine.submit(actor, command);
                script.next();
            }
            events.extend(engine.tick().events);
        }

        let fired = events
            .iter()
            .filter(|e| matches!(e, SimEvent::TorpedoFired { .. }))
            .count();
        assert!(fired >= 1);
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::SonarPing { contact_count, .. } if *contact_count > 0)));
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::EntityDamaged { target: t, .. } if *t == target)));
        let view = engine.vehicle_view(vehicle).unwrap();
        assert_eq!(view.targeting_mode, TargetingMode::Other);
    }
}
