//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs ECS world and the terrain, takes pilot
//! commands through a rate-limited boundary, runs all systems at a fixed
//! tick and produces `SimSnapshot`s. Headless and deterministic.

use std::collections::VecDeque;
use std::path::Path;

use hecs::{Entity, World};
use tracing::{debug, info, trace, warn};

use abyss_core::commands::VehicleCommand;
use abyss_core::components::*;
use abyss_core::config::VehicleConfig;
use abyss_core::constants::{DT_MS, REPAIR_AMOUNT};
use abyss_core::enums::{DamageKind, EntityKind};
use abyss_core::events::SimEvent;
use abyss_core::inventory::{Inventory, ItemStack};
use abyss_core::state::{SimSnapshot, VehicleView};
use abyss_core::types::{ActorId, EntityId, Position, SimTime};
use abyss_terrain::Terrain;

use crate::handles::{id_of, resolve};
use crate::persistence::{self, PersistError, WorldSave};
use crate::rate_limit::RateLimiter;
use crate::systems;
use crate::systems::{collision, environment, movement, power, sonar, weapons};
use crate::world_setup::{self, PlacementError};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// The simulation engine. Owns the ECS world, the terrain and all sim state.
pub struct SimulationEngine<T: Terrain> {
    world: World,
    terrain: T,
    time: SimTime,
    /// Clock the systems ran at during the last tick; views fade contacts against it.
    sampled_ms: u64,
    rate_limiter: RateLimiter,
    command_queue: VecDeque<(ActorId, VehicleCommand)>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
}

impl<T: Terrain> SimulationEngine<T> {
    pub fn new(terrain: T, config: SimConfig) -> Self {
        Self {
            world: World::new(),
            terrain,
            time: SimTime::default(),
            sampled_ms: 0,
            rate_limiter: RateLimiter::new(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Offer a command from `actor`. Returns whether it was queued.
    ///
    /// Rate-limited commands are dropped silently. Commands from anyone other
    /// than the vehicle's current pilot are rejected.
    pub fn submit(&mut self, actor: ActorId, command: VehicleCommand) -> bool {
        if !self
            .rate_limiter
            .check(actor, command.category(), self.time.elapsed_ms)
        {
            return false;
        }
        if self.pilot_entity(actor, command.vehicle()).is_none() {
            debug!(?actor, ?command, "command rejected: not the pilot");
            return false;
        }
        trace!(?actor, ?command, "command queued");
        self.command_queue.push_back((actor, command));
        true
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        self.sampled_ms = self.time.elapsed_ms;
        self.process_commands();
        self.run_systems();
        self.time.advance();

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(&self.world, &self.time, self.sampled_ms, events)
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for hosts that manage their own bodies.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn terrain(&self) -> &T {
        &self.terrain
    }

    pub fn terrain_mut(&mut self) -> &mut T {
        &mut self.terrain
    }

    // ---- Host operations ----

    /// Place a fresh vehicle with its base at `position`.
    pub fn place_vehicle(
        &mut self,
        position: Position,
        yaw: f64,
        config: VehicleConfig,
    ) -> Result<EntityId, PlacementError> {
        world_setup::validate_placement(&self.terrain, &position)?;
        let entity = world_setup::spawn_vehicle(&mut self.world, position, yaw, config);
        let id = id_of(entity);
        info!(vehicle = ?id, ?position, "vehicle placed");
        self.events.push(SimEvent::VehiclePlaced {
            vehicle: id,
            position,
        });
        Ok(id)
    }

    /// Spawn a passive body (player, creature, item).
    pub fn spawn_body(
        &mut self,
        kind: EntityKind,
        position: Position,
        width: f64,
        height: f64,
    ) -> EntityId {
        id_of(world_setup::spawn_body(
            &mut self.world,
            kind,
            position,
            width,
            height,
        ))
    }

    pub fn move_body(&mut self, id: EntityId, position: Position) -> bool {
        let Some(entity) = resolve(&self.world, id) else {
            return false;
        };
        match self.world.get::<&mut Position>(entity) {
            Ok(mut pos) => {
                *pos = position;
                true
            }
            Err(_) => false,
        }
    }

    /// Toggle the invisibility effect that hides a body from torpedo seekers.
    pub fn set_invisible(&mut self, id: EntityId, invisible: bool) -> bool {
        let Some(entity) = resolve(&self.world, id) else {
            return false;
        };
        if invisible {
            self.world.insert_one(entity, Invisible).is_ok()
        } else {
            let _ = self.world.remove_one::<Invisible>(entity);
            true
        }
    }

    /// Take the helm. Capacity is one; an actor may pilot only one vehicle.
    pub fn board(&mut self, actor: ActorId, vehicle: EntityId) -> bool {
        let Some(entity) = resolve(&self.world, vehicle) else {
            return false;
        };
        let elsewhere = self
            .world
            .query::<&Vehicle>()
            .iter()
            .any(|(e, v)| e != entity && v.pilot == Some(actor));
        if elsewhere {
            return false;
        }
        let Ok(mut state) = self.world.get::<&mut Vehicle>(entity) else {
            return false;
        };
        match state.pilot {
            Some(pilot) => pilot == actor,
            None => {
                state.pilot = Some(actor);
                debug!(?actor, ?vehicle, "boarded");
                true
            }
        }
    }

    /// Purge an actor's rate-limit state and dismount them.
    pub fn disconnect(&mut self, actor: ActorId) {
        self.rate_limiter.forget(actor);
        for (_entity, (vehicle, helm)) in self.world.query_mut::<(&mut Vehicle, &mut Helm)>() {
            if vehicle.pilot == Some(actor) {
                vehicle.pilot = None;
                movement::release_controls(helm);
            }
        }
        self.command_queue.retain(|(queued, _)| *queued != actor);
    }

    /// Restore some hull integrity. Fails at full health.
    pub fn repair(&mut self, vehicle: EntityId) -> bool {
        let Some(entity) = self.vehicle_entity(vehicle) else {
            return false;
        };
        let repaired = match self.world.get::<&mut Health>(entity) {
            Ok(mut health) if health.current < health.max => {
                health.current = (health.current + REPAIR_AMOUNT).min(health.max);
                health.current
            }
            _ => return false,
        };
        self.events.push(SimEvent::VehicleRepaired {
            vehicle,
            health: repaired,
        });
        true
    }

    /// Manual removal. No detonation.
    pub fn remove_vehicle(&mut self, vehicle: EntityId) -> bool {
        let Some(entity) = self.vehicle_entity(vehicle) else {
            return false;
        };
        info!(?vehicle, "vehicle removed");
        self.world.despawn(entity).is_ok()
    }

    /// Apply damage from an outside source. Returns whether it landed.
    pub fn damage_entity(&mut self, target: EntityId, kind: DamageKind, amount: f64) -> bool {
        let Some(entity) = resolve(&self.world, target) else {
            return false;
        };
        systems::damage::apply(
            &mut self.world,
            entity,
            kind,
            amount,
            &mut self.events,
            &mut self.despawn_buffer,
        )
    }

    /// Overwrite one cargo slot.
    pub fn load_inventory(
        &mut self,
        vehicle: EntityId,
        slot: usize,
        stack: Option<ItemStack>,
    ) -> bool {
        let Some(entity) = self.vehicle_entity(vehicle) else {
            return false;
        };
        match self.world.get::<&mut Inventory>(entity) {
            Ok(mut cargo) => cargo.set(slot, stack),
            Err(_) => false,
        }
    }

    /// Stow items in the first fitting slots. Returns what did not fit.
    pub fn insert_item(&mut self, vehicle: EntityId, stack: ItemStack) -> Option<ItemStack> {
        let Some(entity) = self.vehicle_entity(vehicle) else {
            return Some(stack);
        };
        match self.world.get::<&mut Inventory>(entity) {
            Ok(mut cargo) => cargo.insert(stack),
            Err(_) => Some(stack),
        }
    }

    pub fn inventory(&self, vehicle: EntityId) -> Option<Inventory> {
        let entity = self.vehicle_entity(vehicle)?;
        let cargo = self.world.get::<&Inventory>(entity).ok()?;
        Some((*cargo).clone())
    }

    /// Set stored power, clamped to the cell.
    pub fn set_power(&mut self, vehicle: EntityId, amount: f64) -> bool {
        let Some(entity) = self.vehicle_entity(vehicle) else {
            return false;
        };
        match self.world.get::<&mut PowerCell>(entity) {
            Ok(mut cell) => {
                cell.current = amount.clamp(0.0, cell.max);
                true
            }
            Err(_) => false,
        }
    }

    pub fn vehicle_view(&self, vehicle: EntityId) -> Option<VehicleView> {
        let entity = self.vehicle_entity(vehicle)?;
        systems::snapshot::view_of(&self.world, entity, self.sampled_ms)
    }

    // ---- Persistence ----

    pub fn save(&self) -> WorldSave {
        persistence::capture(&self.world, self.time.tick)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), PersistError> {
        persistence::save_to_file(&self.save(), path)
    }

    /// Replace all simulated entities with the contents of `save`.
    ///
    /// The save is restored into a fresh world first; on error the engine is
    /// left untouched. Host bodies are not part of a save and must be
    /// re-spawned.
    pub fn load(&mut self, save: &WorldSave) -> Result<Vec<EntityId>, PersistError> {
        let mut world = World::new();
        let restored = persistence::restore(&mut world, save).map_err(|err| {
            warn!(%err, "world load failed");
            err
        })?;
        self.world = world;
        self.time = SimTime {
            tick: save.tick,
            elapsed_ms: save.tick * DT_MS,
        };
        self.sampled_ms = self.time.elapsed_ms;
        self.command_queue.clear();
        self.despawn_buffer.clear();
        info!(
            vehicles = restored.len(),
            projectiles = save.projectiles.len(),
            "world loaded"
        );
        Ok(restored.into_iter().map(id_of).collect())
    }

    pub fn load_from_file(&mut self, path: &Path) -> Result<Vec<EntityId>, PersistError> {
        let save = persistence::load_from_file(path).map_err(|err| {
            warn!(%err, path = %path.display(), "save file unreadable");
            err
        })?;
        self.load(&save)
    }

    // ---- Internals ----

    fn vehicle_entity(&self, vehicle: EntityId) -> Option<Entity> {
        resolve(&self.world, vehicle).filter(|&e| self.world.get::<&Vehicle>(e).is_ok())
    }

    /// The vehicle entity, if `actor` is its current pilot.
    fn pilot_entity(&self, actor: ActorId, vehicle: EntityId) -> Option<Entity> {
        let entity = self.vehicle_entity(vehicle)?;
        let state = self.world.get::<&Vehicle>(entity).ok()?;
        (state.pilot == Some(actor)).then_some(entity)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some((actor, command)) = self.command_queue.pop_front() {
            self.handle_command(actor, command);
        }
    }

    /// Handle a single pilot command. The pilot is re-checked since the helm
    /// may have changed hands after the command was queued.
    fn handle_command(&mut self, actor: ActorId, command: VehicleCommand) {
        let Some(entity) = self.pilot_entity(actor, command.vehicle()) else {
            return;
        };
        let vehicle = command.vehicle();
        let now_ms = self.time.elapsed_ms;

        match command {
            VehicleCommand::MoveInput {
                forward,
                backward,
                left,
                right,
                up,
                down,
                ..
            } => {
                let Ok((pos, heading, extent, cell, helm)) = self.world.query_one_mut::<(
                    &Position,
                    &Heading,
                    &Extent,
                    &PowerCell,
                    &mut Helm,
                )>(entity) else {
                    return;
                };
                let hull = collision::body_box(pos, extent, heading.yaw);
                if power::has_power(cell) && environment::is_submerged(&self.terrain, &hull) {
                    helm.controls = Controls {
                        forward,
                        backward,
                        left,
                        right,
                        up,
                        down,
                    };
                } else {
                    movement::release_controls(helm);
                }
            }
            VehicleCommand::Fire { .. } => {
                match weapons::fire(&mut self.world, &self.terrain, entity) {
                    Ok(torpedo) => self.events.push(SimEvent::TorpedoFired {
                        vehicle,
                        projectile: id_of(torpedo),
                    }),
                    Err(reason) => {
                        debug!(?vehicle, %reason, "fire rejected");
                        self.events.push(SimEvent::FireRejected { vehicle, reason });
                    }
                }
            }
            VehicleCommand::Dismount { .. } => {
                if let Ok((state, helm)) =
                    self.world.query_one_mut::<(&mut Vehicle, &mut Helm)>(entity)
                {
                    state.pilot = None;
                    movement::release_controls(helm);
                    debug!(?actor, ?vehicle, "dismounted");
                }
            }
            VehicleCommand::Ping { .. } => {
                let (origin, yaw) = {
                    let Ok((state, pos, heading, cell)) = self.world.query_one_mut::<(
                        &Vehicle,
                        &Position,
                        &Heading,
                        &mut PowerCell,
                    )>(entity) else {
                        return;
                    };
                    if !power::consume_amount(cell, state.config.ping_cost) {
                        debug!(?vehicle, "ping dropped: insufficient power");
                        return;
                    }
                    (pos.as_vec(), heading.yaw)
                };
                let contacts =
                    sonar::scan(&self.world, &self.terrain, entity, origin, yaw, now_ms);
                let contact_count = contacts.len();
                if let Ok(mut state) = self.world.get::<&mut Sonar>(entity) {
                    state.contacts = contacts;
                }
                debug!(?vehicle, contact_count, "sonar ping");
                self.events.push(SimEvent::SonarPing {
                    vehicle,
                    contact_count,
                });
            }
            VehicleCommand::ToggleMovementMode { .. } => {
                if let Ok(mut state) = self.world.get::<&mut Vehicle>(entity) {
                    state.movement_mode = state.movement_mode.next();
                    debug!(?vehicle, mode = ?state.movement_mode, "movement mode");
                }
            }
            VehicleCommand::ToggleTargetingMode { .. } => {
                if let Ok(mut state) = self.world.get::<&mut Vehicle>(entity) {
                    state.targeting_mode = state.targeting_mode.next();
                    debug!(?vehicle, mode = ?state.targeting_mode, "targeting mode");
                }
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let now_ms = self.time.elapsed_ms;
        // 1. Vehicles (helm, environment, power, weapons, sonar)
        systems::vehicle::run(&mut self.world, &self.terrain, now_ms, &mut self.events);
        // 2. Torpedoes (medium, range, collision, guidance)
        systems::projectile::run(
            &mut self.world,
            &self.terrain,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        // 3. Cleanup (destroyed vehicles, detonated torpedoes, dead bodies)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }
}
