//! Game loop thread. Runs the simulation engine at 20Hz and forwards snapshots.
//!
//! The engine is moved into the thread and handed back through the join
//! handle when the loop ends. Commands arrive via `mpsc` channel and are held
//! until the tick they are scheduled for.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use abyss_core::commands::VehicleCommand;
use abyss_core::constants::TICK_RATE;
use abyss_core::state::SimSnapshot;
use abyss_core::types::ActorId;
use abyss_sim::SimulationEngine;
use abyss_terrain::Terrain;

use crate::state::{GameLoopCommand, LoopSettings};

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

type Schedule = BTreeMap<u64, Vec<(ActorId, VehicleCommand)>>;

/// Spawns the game loop in a new thread.
///
/// `preload` is queued before the first tick. Returns the command sender and
/// a handle that yields the engine once the loop stops.
pub fn spawn_game_loop<T>(
    engine: SimulationEngine<T>,
    settings: LoopSettings,
    snapshot_tx: mpsc::Sender<SimSnapshot>,
    preload: Vec<GameLoopCommand>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<SimulationEngine<T>>)>
where
    T: Terrain + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    for command in preload {
        // The receiver is still held here.
        let _ = cmd_tx.send(command);
    }

    let handle = std::thread::Builder::new()
        .name("abyss-game-loop".into())
        .spawn(move || run_game_loop(engine, settings, cmd_rx, snapshot_tx))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until `max_ticks`, a Shutdown command or channel disconnect.
pub fn run_game_loop<T: Terrain>(
    mut engine: SimulationEngine<T>,
    settings: LoopSettings,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    snapshot_tx: mpsc::Sender<SimSnapshot>,
) -> SimulationEngine<T> {
    let mut schedule = Schedule::new();
    let mut next_tick_time = Instant::now();
    let mut ticks_run = 0;

    while ticks_run < settings.max_ticks {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Schedule {
                    at_tick,
                    actor,
                    command,
                }) => {
                    schedule.entry(at_tick).or_default().push((actor, command));
                }
                Ok(GameLoopCommand::Shutdown) => {
                    debug!(tick = engine.time().tick, "game loop shut down");
                    return engine;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return engine,
            }
        }

        // 2. Offer everything that is due
        submit_due(&mut engine, &mut schedule);

        // 3. Advance one tick and forward the snapshot; a gone receiver is not an error
        let snapshot = engine.tick();
        let _ = snapshot_tx.send(snapshot);
        ticks_run += 1;

        // 4. Sleep until next tick
        if settings.realtime {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind: reset to avoid catch-up spiral
                next_tick_time = now;
            }
        }
    }
    engine
}

fn submit_due<T: Terrain>(engine: &mut SimulationEngine<T>, schedule: &mut Schedule) {
    let now = engine.time().tick;
    while let Some(entry) = schedule.first_entry() {
        if *entry.key() > now {
            break;
        }
        for (actor, command) in entry.remove() {
            let accepted = engine.submit(actor, command);
            trace!(tick = now, ?actor, ?command, accepted, "scheduled command");
        }
    }
}
